use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tempfile::TempDir;

use super::generation::Capability;

pub struct DecodedMedia {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Decodes a base64 media field, accepting an optional `data:<mime>;base64,` prefix.
pub fn decode_media(encoded: &str) -> Result<DecodedMedia, base64::DecodeError> {
    let encoded = encoded.trim();
    let (mime_type, payload) = match encoded
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    {
        Some((mime_type, payload)) => (Some(mime_type.to_string()), payload),
        None => (None, encoded),
    };

    let payload = payload.chars().filter(|char| !char.is_ascii_whitespace()).collect::<String>();

    Ok(DecodedMedia { bytes: BASE64.decode(payload)?, mime_type })
}

/// A decoded media payload written to its own temporary directory. The file
/// is deleted when this value is dropped.
pub struct MediaFile {
    temp_dir: TempDir,
    path: PathBuf,
    pub content_type: Option<String>,
    pub size: usize,
}

impl MediaFile {
    pub fn store(capability: Capability, media: DecodedMedia) -> io::Result<Self> {
        let extension = extension(capability, &media);
        let digest = md5::compute(&media.bytes);

        let temp_dir = tempfile::Builder::new().prefix("mythiq-").tempdir()?;
        let path = temp_dir.path().join(format!("{capability}-{digest:x}.{extension}"));

        let mut file = BufWriter::new(File::create(&path)?);
        file.write_all(&media.bytes)?;
        file.flush()?;

        log::debug!("stored {} bytes of {capability} at {}", media.bytes.len(), path.display());

        Ok(Self { temp_dir, path, content_type: media.mime_type, size: media.bytes.len() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save_to(&self, destination: &Path) -> io::Result<u64> {
        tokio::fs::copy(&self.path, destination).await
    }
}

impl Drop for MediaFile {
    fn drop(&mut self) {
        log::debug!("releasing {}", self.temp_dir.path().display());
    }
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("path", &self.path)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

fn extension(capability: Capability, media: &DecodedMedia) -> &'static str {
    let from_mime = media.mime_type.as_deref().and_then(|mime_type| match mime_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/ogg" => Some("ogg"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        _ => None,
    });

    if let Some(extension) = from_mime {
        return extension;
    }

    match capability {
        Capability::Image => image::guess_format(&media.bytes)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("png"),
        Capability::Audio => "mp3",
        Capability::Video => "mp4",
        Capability::Game => "html",
        Capability::Chat => "txt",
    }
}
