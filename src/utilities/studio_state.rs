use std::fmt;
use std::sync::Arc;

use reqwest::header::InvalidHeaderValue;
use reqwest::{Client, redirect};

use super::config::Config;
use crate::apis::gateway::GatewayClient;
use crate::apis::prompts::{AudioRequest, GameRequest, ImageRequest, VideoRequest};
use crate::apis::transport::{HttpTransport, Transport};
use crate::hooks::{ChatHook, GenerationHook, HealthHook, SettlePolicy};

#[derive(Debug)]
pub enum StateError {
    HttpClient(reqwest::Error),
    InvalidHeader(InvalidHeaderValue),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "could not build the HTTP client: {err}"),
            Self::InvalidHeader(err) => {
                write!(f, "MYTHIQ_API_KEY or USER_AGENT is not a valid header value: {err}")
            }
        }
    }
}

impl From<reqwest::Error> for StateError {
    fn from(value: reqwest::Error) -> Self {
        Self::HttpClient(value)
    }
}

impl From<InvalidHeaderValue> for StateError {
    fn from(value: InvalidHeaderValue) -> Self {
        Self::InvalidHeader(value)
    }
}

/// Everything the commands share. One hook per capability.
pub struct StudioState {
    pub chat: ChatHook,
    pub game: GenerationHook<GameRequest>,
    pub image: GenerationHook<ImageRequest>,
    pub audio: GenerationHook<AudioRequest>,
    pub video: GenerationHook<VideoRequest>,
    pub health: HealthHook,
}

impl StudioState {
    pub fn new(config: &Config) -> Result<Self, StateError> {
        let mut http_client = Client::builder();

        if let Some(user_agent) = &config.user_agent {
            http_client = http_client.user_agent(user_agent);
        }

        let http_client =
            http_client.redirect(redirect::Policy::none()).timeout(config.timeout).build()?;

        let transport = HttpTransport::new(
            http_client,
            config.api_base_url.clone(),
            &config.api_key,
            config.user_agent.as_deref(),
        )?;

        log::info!(
            "using gateway {} with the {} settle policy",
            config.api_base_url,
            config.settle_policy
        );

        Ok(Self::with_transport(Arc::new(transport), config.settle_policy))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, policy: SettlePolicy) -> Self {
        let gateway = Arc::new(GatewayClient::new(transport));

        Self {
            chat: ChatHook::with_greeting(gateway.clone()),
            game: GenerationHook::new(gateway.clone(), policy),
            image: GenerationHook::new(gateway.clone(), policy),
            audio: GenerationHook::new(gateway.clone(), policy),
            video: GenerationHook::new(gateway.clone(), policy),
            health: HealthHook::new(gateway),
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::hooks::GREETING;

    fn config(api_key: &str) -> Config {
        Config {
            api_base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            api_key: api_key.into(),
            user_agent: Some("mythiq-tests".into()),
            timeout: Duration::from_secs(5),
            log_file: None,
            settle_policy: SettlePolicy::LatestIssued,
        }
    }

    #[test]
    fn test_new_state() {
        let state = StudioState::new(&config("sk-test")).unwrap();

        assert!(!state.image.loading());
        assert_eq!(state.chat.messages()[0].content, GREETING);
        assert_eq!(state.health.is_healthy(), None);
    }

    #[test]
    fn test_invalid_api_key() {
        let Err(StateError::InvalidHeader(_)) = StudioState::new(&config("sk\ntest")) else {
            panic!("expected an invalid header");
        };
    }
}
