use time::OffsetDateTime;
use time::macros::format_description;

use crate::apis::gateway::Outcome;
use crate::apis::generation::{GameResult, MediaResult, MediaSource, ResultStatus};
use crate::hooks::ChatMessage;

const MAX_PROMPT_LENGTH: usize = 2000;

pub trait TruncateWithEllipsis {
    fn truncate_with_ellipsis(self, max_len: usize) -> Self;
}

impl TruncateWithEllipsis for String {
    fn truncate_with_ellipsis(mut self, max_len: usize) -> Self {
        if self.chars().count() > max_len {
            let end = self.char_indices().nth(max_len - 1).map_or(self.len(), |(index, _)| index);
            self.truncate(end);
            self.push('…');
        }

        self
    }
}

pub fn check_prompt<S: AsRef<str>>(prompt: S) -> Option<&'static str> {
    let prompt = prompt.as_ref();
    if prompt.trim().is_empty() {
        Some("the description cannot be empty.")
    } else if prompt.chars().count() > MAX_PROMPT_LENGTH {
        Some("this description is too long (>2000).")
    } else {
        None
    }
}

pub fn format_size(bytes: usize) -> String {
    #[expect(clippy::cast_precision_loss)]
    let kib = bytes as f64 / 1024.;

    if kib < 1. {
        format!("{bytes} B")
    } else if kib < 1024. {
        format!("{kib:.1} KiB")
    } else {
        format!("{:.1} MiB", kib / 1024.)
    }
}

fn status_suffix(status: &ResultStatus) -> String {
    match status {
        ResultStatus::Completed => String::new(),
        status => format!(" [{status}]"),
    }
}

fn fallback_note<T>(outcome: &Outcome<T>) -> String {
    outcome.error().map_or_else(String::new, |err| {
        format!("\n(placeholder shown because the {} request failed: {err})", err.kind())
    })
}

pub fn describe_game(outcome: &Outcome<GameResult>) -> String {
    let game = outcome.result();
    let mut lines = vec![format!("🎮 {}{}", game.title, status_suffix(&game.status))];

    if !game.description.is_empty() {
        lines.push(game.description.clone());
    }
    if let Some(play_url) = &game.play_url {
        lines.push(format!("play: {play_url}"));
    }
    if let Some(download_url) = &game.download_url {
        lines.push(format!("download: {download_url}"));
    }
    if let Some(html) = &game.html {
        lines.push(format!("inline HTML build ({} characters)", html.chars().count()));
    }

    lines.join("\n") + &fallback_note(outcome)
}

pub fn describe_media(outcome: &Outcome<MediaResult>) -> String {
    let media = outcome.result();
    let mut lines = vec![format!("{} {}{}", media.capability, media.id, status_suffix(&media.status))];

    if !media.description.is_empty() {
        lines.push(media.description.clone());
    }
    if let Some(duration) = media.duration {
        lines.push(format!("duration: {duration}s"));
    }

    lines.push(match &media.source {
        MediaSource::Local(file) => format!(
            "stored at {} ({}{}), keep it with /save {} <path>",
            file.path().display(),
            format_size(file.size),
            file.content_type.as_ref().map_or_else(String::new, |mime| format!(", {mime}")),
            media.capability
        ),
        MediaSource::Remote(url) => format!("available at {url}"),
        MediaSource::Unavailable => "no media available".into(),
    });

    lines.join("\n") + &fallback_note(outcome)
}

pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp.format(format_description!("[hour]:[minute]:[second]")).unwrap_or_default()
}

pub fn format_message(message: &ChatMessage) -> String {
    format!("[{}] {}: {}", format_timestamp(message.timestamp), message.role, message.content)
}
