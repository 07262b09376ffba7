//! Per-feature state containers sitting between the commands and the gateway.
//!
//! Each hook tracks its latest result, whether a request is in flight, and the
//! last error. Hooks never block concurrent invocations; the commands check
//! [`GenerationHook::loading`] before issuing another one.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use time::OffsetDateTime;

use crate::apis::gateway::{GatewayClient, Generate, Outcome};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Whichever invocation finishes last overwrites the stored result.
    #[default]
    LastSettled,
    /// Results of invocations superseded by a newer one are discarded.
    LatestIssued,
}

impl FromStr for SettlePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last-settled" | "last_settled" => Ok(Self::LastSettled),
            "latest-issued" | "latest_issued" => Ok(Self::LatestIssued),
            _ => Err(format!("unknown settle policy {value:?}")),
        }
    }
}

impl fmt::Display for SettlePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastSettled => f.write_str("last-settled"),
            Self::LatestIssued => f.write_str("latest-issued"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settled {
    Stored,
    Discarded,
}

/// Counts in-flight invocations and hands out sequence numbers.
#[derive(Default)]
struct Tracker {
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

impl Tracker {
    fn begin(&self) -> u64 {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn finish(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn is_latest(&self, sequence: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == sequence
    }

    fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

struct HookState<T> {
    data: Option<T>,
    error: Option<String>,
}

impl<T> Default for HookState<T> {
    fn default() -> Self {
        Self { data: None, error: None }
    }
}

pub struct GenerationHook<R: Generate> {
    gateway: Arc<GatewayClient>,
    policy: SettlePolicy,
    tracker: Tracker,
    state: Mutex<HookState<Arc<Outcome<R::Output>>>>,
    request: PhantomData<fn(R)>,
}

impl<R: Generate> GenerationHook<R> {
    pub fn new(gateway: Arc<GatewayClient>, policy: SettlePolicy) -> Self {
        Self {
            gateway,
            policy,
            tracker: Tracker::default(),
            state: Mutex::new(HookState::default()),
            request: PhantomData,
        }
    }

    pub async fn invoke(&self, request: R) -> Settled {
        let sequence = self.tracker.begin();
        let outcome = self.gateway.generate_or_fallback(&request).await;
        let settled = self.settle(sequence, outcome);
        self.tracker.finish();

        settled
    }

    fn settle(&self, sequence: u64, outcome: Outcome<R::Output>) -> Settled {
        // checked under the lock so a newer result cannot be stored in between
        let mut state = self.state.lock().unwrap();
        if self.policy == SettlePolicy::LatestIssued && !self.tracker.is_latest(sequence) {
            log::debug!("discarding stale {} result #{sequence}", R::CAPABILITY);
            return Settled::Discarded;
        }

        state.error = outcome.error().map(ToString::to_string);
        // the previous result is released once no command holds it anymore
        state.data = Some(Arc::new(outcome));

        Settled::Stored
    }

    pub fn loading(&self) -> bool {
        self.tracker.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    pub fn with_data<O>(&self, f: impl FnOnce(Option<&Outcome<R::Output>>) -> O) -> O {
        f(self.state.lock().unwrap().data.as_deref())
    }

    /// A handle to the stored result that stays valid across `.await`.
    pub fn latest(&self) -> Option<Arc<Outcome<R::Output>>> {
        self.state.lock().unwrap().data.clone()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("you"),
            Self::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    fn new(role: Role, content: String) -> Self {
        Self { role, content, timestamp: OffsetDateTime::now_utc() }
    }
}

pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

pub struct ChatHook {
    gateway: Arc<GatewayClient>,
    tracker: Tracker,
    messages: Mutex<Vec<ChatMessage>>,
    error: Mutex<Option<String>>,
}

impl ChatHook {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self {
            gateway,
            tracker: Tracker::default(),
            messages: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    pub fn with_greeting(gateway: Arc<GatewayClient>) -> Self {
        let hook = Self::new(gateway);
        hook.push(ChatMessage::new(Role::Assistant, GREETING.into()));
        hook
    }

    fn push(&self, message: ChatMessage) {
        self.messages.lock().unwrap().push(message);
    }

    /// Appends the user's message right away and the reply (or the apology
    /// fallback) once the gateway answers. Returns the appended reply.
    pub async fn send_message(&self, message: String) -> Outcome<ChatMessage> {
        self.tracker.begin();
        self.push(ChatMessage::new(Role::User, message.clone()));

        let outcome = match self.gateway.chat_or_fallback(&message).await {
            Outcome::Generated(reply) => {
                Outcome::Generated(ChatMessage::new(Role::Assistant, reply.content))
            }
            Outcome::Fallback { result, error } => Outcome::Fallback {
                result: ChatMessage::new(Role::Assistant, result.content),
                error,
            },
        };

        *self.error.lock().unwrap() = outcome.error().map(ToString::to_string);
        self.push(outcome.result().clone());
        self.tracker.finish();

        outcome
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn loading(&self) -> bool {
        self.tracker.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }
}

pub struct HealthHook {
    gateway: Arc<GatewayClient>,
    tracker: Tracker,
    healthy: Mutex<Option<bool>>,
    error: Mutex<Option<String>>,
}

impl HealthHook {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self {
            gateway,
            tracker: Tracker::default(),
            healthy: Mutex::new(None),
            error: Mutex::new(None),
        }
    }

    pub async fn check(&self) -> bool {
        self.tracker.begin();

        let (healthy, error) = match self.gateway.health().await {
            Ok(status) => (status.is_healthy(), None),
            Err(err) => {
                log::warn!("health check failed ({}): {err}", err.kind());
                (false, Some(err.to_string()))
            }
        };

        *self.healthy.lock().unwrap() = Some(healthy);
        *self.error.lock().unwrap() = error;
        self.tracker.finish();

        healthy
    }

    pub fn is_healthy(&self) -> Option<bool> {
        *self.healthy.lock().unwrap()
    }

    pub fn loading(&self) -> bool {
        self.tracker.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }
}
