use std::sync::Arc;
use std::{fmt, io};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use super::envelope::{self, ShapeError};
use super::fallback;
use super::generation::{Capability, ChatReply, GameResult, HealthStatus, MediaResult};
use super::prompts::{self, AudioRequest, GameRequest, ImageRequest, VideoRequest};
use super::transport::{RequestOptions, Transport, TransportError};

const CHAT_ENDPOINT: &str = "/chat";
const PROCESS_ENDPOINT: &str = "/process";
const HEALTH_ENDPOINT: &str = "/health";

#[derive(Debug)]
pub enum GatewayError {
    Network(reqwest::Error),
    Http(StatusCode),
    Shape(ShapeError),
    Storage(io::Error),
}

impl GatewayError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Http(_) => "http",
            Self::Shape(_) => "shape",
            Self::Storage(_) => "storage",
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => write!(f, "could not reach the gateway: {err}"),
            Self::Http(status) => write!(f, "gateway responded with {status}"),
            Self::Shape(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "could not store media: {err}"),
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Network(err) => Self::Network(err),
            TransportError::Http(status) => Self::Http(status),
            TransportError::Decode(err) => Self::Shape(ShapeError::Body(err)),
        }
    }
}

impl From<ShapeError> for GatewayError {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<io::Error> for GatewayError {
    fn from(value: io::Error) -> Self {
        Self::Storage(value)
    }
}

/// What a generation produced: the real thing, or a stand-in plus the reason.
#[derive(Debug)]
pub enum Outcome<T> {
    Generated(T),
    Fallback { result: T, error: GatewayError },
}

impl<T> Outcome<T> {
    pub const fn result(&self) -> &T {
        match self {
            Self::Generated(result) | Self::Fallback { result, .. } => result,
        }
    }

    pub const fn error(&self) -> Option<&GatewayError> {
        match self {
            Self::Generated(_) => None,
            Self::Fallback { error, .. } => Some(error),
        }
    }

    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[async_trait]
pub trait Generate: Send + Sync {
    type Output: Send + Sync;

    const CAPABILITY: Capability;

    async fn generate(&self, gateway: &GatewayClient) -> Result<Self::Output, GatewayError>;

    fn fallback() -> Self::Output;
}

pub struct GatewayClient {
    transport: Arc<dyn Transport>,
}

impl GatewayClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn post(&self, endpoint: &str, message: &str) -> Result<Value, GatewayError> {
        let options = RequestOptions::post(json!({ "message": message }));
        Ok(self.transport.request(endpoint, options).await?)
    }

    async fn process(&self, prompt: &str) -> Result<Value, GatewayError> {
        log::info!("processing prompt {prompt:?}");
        self.post(PROCESS_ENDPOINT, prompt).await
    }

    pub async fn chat(&self, message: &str) -> Result<ChatReply, GatewayError> {
        let body = self.post(CHAT_ENDPOINT, message).await?;
        Ok(ChatReply { content: envelope::unpack_chat_reply(body)? })
    }

    pub async fn generate_game(&self, request: &GameRequest) -> Result<GameResult, GatewayError> {
        let body = self.process(&prompts::game(request)).await?;
        Ok(GameResult::from_data(&envelope::unpack_data(body)?)?)
    }

    pub async fn generate_image(&self, request: &ImageRequest) -> Result<MediaResult, GatewayError> {
        self.generate_media(Capability::Image, &prompts::image(request)).await
    }

    pub async fn generate_audio(&self, request: &AudioRequest) -> Result<MediaResult, GatewayError> {
        self.generate_media(Capability::Audio, &prompts::audio(request)).await
    }

    pub async fn generate_video(&self, request: &VideoRequest) -> Result<MediaResult, GatewayError> {
        self.generate_media(Capability::Video, &prompts::video(request)).await
    }

    async fn generate_media(
        &self,
        capability: Capability,
        prompt: &str,
    ) -> Result<MediaResult, GatewayError> {
        let body = self.process(prompt).await?;
        let data = envelope::unpack_data(body)?;
        MediaResult::from_data(capability, &data)
    }

    pub async fn health(&self) -> Result<HealthStatus, GatewayError> {
        let body = self.transport.request(HEALTH_ENDPOINT, RequestOptions::default()).await?;

        match body.get("status") {
            Some(Value::String(status)) => Ok(HealthStatus { status: status.clone() }),
            _ => Err(ShapeError::MissingField("status").into()),
        }
    }

    /// Never fails: on any error the capability's stand-in is returned along
    /// with the error that caused it.
    pub async fn generate_or_fallback<R: Generate>(&self, request: &R) -> Outcome<R::Output> {
        match request.generate(self).await {
            Ok(result) => Outcome::Generated(result),
            Err(error) => {
                log::warn!("{} generation failed ({}): {error}", R::CAPABILITY, error.kind());
                Outcome::Fallback { result: R::fallback(), error }
            }
        }
    }

    pub async fn chat_or_fallback(&self, message: &str) -> Outcome<ChatReply> {
        match self.chat(message).await {
            Ok(reply) => Outcome::Generated(reply),
            Err(error) => {
                log::warn!("chat failed ({}): {error}", error.kind());
                Outcome::Fallback {
                    result: fallback::mock_data(Capability::Chat).into_chat(),
                    error,
                }
            }
        }
    }
}

#[async_trait]
impl Generate for GameRequest {
    type Output = GameResult;

    const CAPABILITY: Capability = Capability::Game;

    async fn generate(&self, gateway: &GatewayClient) -> Result<GameResult, GatewayError> {
        gateway.generate_game(self).await
    }

    fn fallback() -> GameResult {
        fallback::mock_data(Self::CAPABILITY).into_game()
    }
}

#[async_trait]
impl Generate for ImageRequest {
    type Output = MediaResult;

    const CAPABILITY: Capability = Capability::Image;

    async fn generate(&self, gateway: &GatewayClient) -> Result<MediaResult, GatewayError> {
        gateway.generate_image(self).await
    }

    fn fallback() -> MediaResult {
        fallback::mock_data(Self::CAPABILITY).into_media()
    }
}

#[async_trait]
impl Generate for AudioRequest {
    type Output = MediaResult;

    const CAPABILITY: Capability = Capability::Audio;

    async fn generate(&self, gateway: &GatewayClient) -> Result<MediaResult, GatewayError> {
        gateway.generate_audio(self).await
    }

    fn fallback() -> MediaResult {
        fallback::mock_data(Self::CAPABILITY).into_media()
    }
}

#[async_trait]
impl Generate for VideoRequest {
    type Output = MediaResult;

    const CAPABILITY: Capability = Capability::Video;

    async fn generate(&self, gateway: &GatewayClient) -> Result<MediaResult, GatewayError> {
        gateway.generate_video(self).await
    }

    fn fallback() -> MediaResult {
        fallback::mock_data(Self::CAPABILITY).into_media()
    }
}
