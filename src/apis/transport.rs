use std::fmt;

use async_trait::async_trait;
use reqwest::header::{
    AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue, USER_AGENT,
};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

#[derive(Debug)]
pub enum TransportError {
    Network(reqwest::Error),
    Http(StatusCode),
    Decode(reqwest::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => write!(f, "network error: {err}"),
            Self::Http(status) => write!(f, "HTTP error {status}"),
            Self::Decode(err) => write!(f, "invalid JSON body: {err}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Merged over the transport's fixed headers; entries here win.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn post(body: Value) -> Self {
        Self { method: Method::POST, body: Some(body), headers: HeaderMap::new() }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, endpoint: &str, options: RequestOptions)
    -> Result<Value, TransportError>;
}

pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl HttpTransport {
    pub fn new(
        http_client: reqwest::Client,
        base_url: Url,
        api_key: &str,
        user_agent: Option<&str>,
    ) -> Result<Self, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        if let Some(user_agent) = user_agent {
            headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        }

        Ok(Self { http_client, base_url, headers })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint_url(endpoint);
        log::debug!("{} {url}", options.method);

        let mut headers = self.headers.clone();
        headers.extend(options.headers);

        let mut request = self.http_client.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(TransportError::Network)?;
        let status = response.status();

        if !status.is_success() {
            log::warn!("{url} responded with {status}");
            return Err(TransportError::Http(status));
        }

        response.json::<Value>().await.map_err(TransportError::Decode)
    }
}
