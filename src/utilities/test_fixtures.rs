use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use super::command_context::CommandContext;
use super::command_manager::CommandManager;
use super::studio_state::StudioState;
use crate::apis::transport::{HttpTransport, RequestOptions, Transport, TransportError};
use crate::hooks::SettlePolicy;

pub enum Reply {
    Now(Result<Value, TransportError>),
    /// Resolves once the test sends the reply, letting it order settlements.
    Gated(oneshot::Receiver<Result<Value, TransportError>>),
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<Value>,
}

/// Answers requests from a queue of canned replies and records them.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Result<Value, TransportError>>) -> Arc<Self> {
        Self::with_replies(replies.into_iter().map(Reply::Now))
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn wait_for_requests(&self, count: usize) {
        while self.requests.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            endpoint: endpoint.into(),
            method: options.method,
            body: options.body,
        });

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Gated(receiver)) => {
                receiver.await.unwrap_or(Err(TransportError::Http(StatusCode::GATEWAY_TIMEOUT)))
            }
            None => Err(TransportError::Http(StatusCode::SERVICE_UNAVAILABLE)),
        }
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn http_transport(base_url: &str) -> Arc<HttpTransport> {
    Arc::new(
        HttpTransport::new(http_client(), Url::parse(base_url).unwrap(), "demo-key", None)
            .unwrap(),
    )
}

/// Accepts a single connection, answers it with `body`, and resolves to the
/// request head that was received.
pub async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buffer = [0; 4096];

        let head_end = loop {
            let read = stream.read(&mut buffer).await.unwrap();
            assert!(read > 0, "connection closed before the request head");
            request.extend_from_slice(&buffer[..read]);

            if let Some(position) = request.windows(4).position(|window| window == b"\r\n\r\n") {
                break position + 4;
            }
        };

        let head = String::from_utf8_lossy(&request[..head_end]).into_owned();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while request.len() < head_end + content_length {
            let read = stream.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();

        head
    });

    (base_url, server)
}

/// A URL nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{address}")
}

pub fn command_context(
    transport: Arc<ScriptedTransport>,
) -> (CommandContext, mpsc::UnboundedReceiver<String>) {
    command_context_with(transport, CommandManager::new())
}

pub fn command_context_with(
    transport: Arc<ScriptedTransport>,
    command_manager: CommandManager,
) -> (CommandContext, mpsc::UnboundedReceiver<String>) {
    let (replies, receiver) = mpsc::unbounded_channel();
    let state = Arc::new(StudioState::with_transport(transport, SettlePolicy::default()));

    (CommandContext::new(state, Arc::new(command_manager), replies), receiver)
}

/// Every reply sent so far, in order.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut replies = Vec::new();
    while let Ok(reply) = receiver.try_recv() {
        replies.push(reply);
    }
    replies
}
