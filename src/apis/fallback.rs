//! Static stand-ins used when the gateway cannot produce a result.

use super::generation::{
    Capability, ChatReply, GameResult, GenerationResult, MediaResult, MediaSource, ResultStatus,
};
use super::prompts::{DEFAULT_AUDIO_DURATION, DEFAULT_VIDEO_DURATION};

pub const CHAT_REPLY: &str = "Sorry, I encountered an error. Please try again.";
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/1024x1024/6366f1/ffffff?text=AI+Generated+Image";

/// The stand-in for `capability`. Always the variant matching `capability`.
pub fn mock_data(capability: Capability) -> GenerationResult {
    match capability {
        Capability::Chat => GenerationResult::Chat(chat()),
        Capability::Game => GenerationResult::Game(game()),
        Capability::Image => GenerationResult::Image(media(Capability::Image)),
        Capability::Audio => GenerationResult::Audio(media(Capability::Audio)),
        Capability::Video => GenerationResult::Video(media(Capability::Video)),
    }
}

fn chat() -> ChatReply {
    ChatReply { content: CHAT_REPLY.into() }
}

fn game() -> GameResult {
    GameResult {
        game_id: "game_placeholder".into(),
        title: "Generated Game".into(),
        description: "Your AI-generated game is ready!".into(),
        play_url: None,
        download_url: None,
        html: None,
        status: ResultStatus::Placeholder,
    }
}

fn media(capability: Capability) -> MediaResult {
    let (source, duration) = match capability {
        Capability::Image => (MediaSource::Remote(PLACEHOLDER_IMAGE_URL.into()), None),
        Capability::Audio => (MediaSource::Unavailable, Some(DEFAULT_AUDIO_DURATION)),
        _ => (MediaSource::Unavailable, Some(DEFAULT_VIDEO_DURATION)),
    };

    MediaResult {
        id: format!("{capability}_placeholder"),
        capability,
        source,
        status: ResultStatus::Placeholder,
        description: format!("Placeholder {capability} shown while the gateway is unavailable"),
        duration,
    }
}
