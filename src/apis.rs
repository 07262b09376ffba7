pub mod envelope;
pub mod fallback;
pub mod gateway;
pub mod generation;
pub mod media;
pub mod prompts;
pub mod transport;

pub use gateway::GatewayError;
