use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use super::envelope::ShapeError;
use super::media::{self, MediaFile};
use super::GatewayError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Chat,
    Game,
    Image,
    Audio,
    Video,
}

impl Capability {
    pub const ALL: [Self; 5] = [Self::Chat, Self::Game, Self::Image, Self::Audio, Self::Video];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Game => "game",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Key of the base64 payload inside `result.data`.
    pub const fn data_field(self) -> &'static str {
        match self {
            Self::Chat => "message",
            Self::Game => "html",
            Self::Image => "image_data",
            Self::Audio => "audio_data",
            Self::Video => "video_data",
        }
    }

    pub const fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Audio | Self::Video)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|capability| capability.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown capability {value:?}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultStatus {
    Completed,
    Placeholder,
    Other(String),
}

impl ResultStatus {
    fn parse(status: Option<String>) -> Self {
        let Some(status) = status else {
            return Self::Completed;
        };

        match status.to_ascii_lowercase().as_str() {
            "completed" | "complete" | "success" | "done" => Self::Completed,
            "placeholder" | "mock" => Self::Placeholder,
            _ => Self::Other(status),
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Placeholder => f.write_str("placeholder"),
            Self::Other(status) => f.write_str(status),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub game_id: String,
    pub title: String,
    pub description: String,
    pub play_url: Option<String>,
    pub download_url: Option<String>,
    pub html: Option<String>,
    pub status: ResultStatus,
}

impl GameResult {
    pub(super) fn from_data(data: &Map<String, Value>) -> Result<Self, ShapeError> {
        let title = string_field(data, &["title", "name"]);
        let html = string_field(data, &["html", "game_code", "code"]);

        if title.is_none() && html.is_none() {
            return Err(ShapeError::MissingField("title"));
        }

        Ok(Self {
            game_id: string_field(data, &["game_id", "gameId", "id"]).unwrap_or_default(),
            title: title.unwrap_or_else(|| "Untitled game".into()),
            description: string_field(data, &["description", "summary"]).unwrap_or_default(),
            play_url: string_field(data, &["play_url", "playUrl"]),
            download_url: string_field(data, &["download_url", "downloadUrl"]),
            html,
            status: ResultStatus::parse(string_field(data, &["status"])),
        })
    }
}

#[derive(Debug)]
pub enum MediaSource {
    /// Decoded payload held in a scoped temporary file.
    Local(MediaFile),
    Remote(String),
    Unavailable,
}

#[derive(Debug)]
pub struct MediaResult {
    pub id: String,
    pub capability: Capability,
    pub source: MediaSource,
    pub status: ResultStatus,
    pub description: String,
    pub duration: Option<u32>,
}

impl MediaResult {
    pub(super) fn from_data(
        capability: Capability,
        data: &Map<String, Value>,
    ) -> Result<Self, GatewayError> {
        let prefix = capability.as_str();
        let (url_key, url_camel_key) = (format!("{prefix}_url"), format!("{prefix}Url"));
        let (id_key, id_camel_key) = (format!("{prefix}_id"), format!("{prefix}Id"));

        let encoded = string_field(data, &[capability.data_field(), "data", "b64_json"]);
        let url = string_field(data, &[url_key.as_str(), url_camel_key.as_str(), "url"]);

        let source = match (encoded, url) {
            (Some(encoded), _) => {
                let decoded = media::decode_media(&encoded).map_err(ShapeError::InvalidBase64)?;
                MediaSource::Local(MediaFile::store(capability, decoded)?)
            }
            (None, Some(url)) => MediaSource::Remote(url),
            (None, None) => {
                return Err(ShapeError::MissingField(capability.data_field()).into());
            }
        };

        Ok(Self {
            id: string_field(data, &[id_key.as_str(), id_camel_key.as_str(), "id"])
                .unwrap_or_default(),
            capability,
            source,
            status: ResultStatus::parse(string_field(data, &["status"])),
            description: string_field(data, &["description", "prompt"]).unwrap_or_default(),
            duration: number_field(data, "duration"),
        })
    }

    pub const fn local_file(&self) -> Option<&MediaFile> {
        match &self.source {
            MediaSource::Local(file) => Some(file),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum GenerationResult {
    Chat(ChatReply),
    Game(GameResult),
    Image(MediaResult),
    Audio(MediaResult),
    Video(MediaResult),
}

impl GenerationResult {
    pub const fn capability(&self) -> Capability {
        match self {
            Self::Chat(_) => Capability::Chat,
            Self::Game(_) => Capability::Game,
            Self::Image(_) => Capability::Image,
            Self::Audio(_) => Capability::Audio,
            Self::Video(_) => Capability::Video,
        }
    }

    /// # Panics
    ///
    /// Panics if this is not a chat result.
    pub fn into_chat(self) -> ChatReply {
        match self {
            Self::Chat(reply) => reply,
            other => unreachable!("expected a chat result, got {}", other.capability()),
        }
    }

    /// # Panics
    ///
    /// Panics if this is not a game result.
    pub fn into_game(self) -> GameResult {
        match self {
            Self::Game(game) => game,
            other => unreachable!("expected a game result, got {}", other.capability()),
        }
    }

    /// # Panics
    ///
    /// Panics if this is not an image, audio or video result.
    pub fn into_media(self) -> MediaResult {
        match self {
            Self::Image(media) | Self::Audio(media) | Self::Video(media) => media,
            other => unreachable!("expected a media result, got {}", other.capability()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

fn string_field(data: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match data.get(*key) {
        Some(Value::String(value)) if !value.is_empty() => Some(value.clone()),
        _ => None,
    })
}

fn number_field(data: &Map<String, Value>, key: &str) -> Option<u32> {
    match data.get(key)? {
        Value::Number(number) => number.as_u64().and_then(|number| number.try_into().ok()),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}
