use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::{CommandError, CommandResult, CommandTrait, convert};
use crate::apis::gateway::Outcome;
use crate::apis::generation::{Capability, MediaResult, MediaSource};
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::{StringGreedy, Word};
use crate::utilities::text_utils;

const USAGE: &str = "<image|audio|video> <path>";

pub struct Save;

#[async_trait]
impl CommandTrait for Save {
    fn command_names(&self) -> &[&str] {
        &["save"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("copy the latest generated media to a file")
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult {
        let (Word(capability), StringGreedy(path)) =
            convert::<(Word<Capability>, StringGreedy)>(&arguments, USAGE)?;

        let (latest, error) = latest_media(ctx, capability)?;
        let Some(file) = latest.result().local_file() else {
            return Err(match (&latest.result().source, error) {
                (MediaSource::Remote(url), _) => {
                    format!("the latest {capability} is only available at {url}")
                }
                (_, Some(error)) if latest.is_fallback() => {
                    format!("the latest {capability} is a placeholder, the request failed: {error}")
                }
                _ => format!("the latest {capability} has no media to save."),
            }
            .into());
        };

        let written = file.save_to(Path::new(&path)).await?;
        log::info!("saved {capability} {} to {path}", latest.result().id);

        let written = usize::try_from(written).unwrap_or(usize::MAX);
        ctx.reply(format!("saved {} to {path}", text_utils::format_size(written)));

        Ok(())
    }
}

/// The stored result for `capability` and the error of the request that produced it.
fn latest_media(
    ctx: &CommandContext,
    capability: Capability,
) -> Result<(Arc<Outcome<MediaResult>>, Option<String>), CommandError> {
    if !capability.is_media() {
        return Err(format!("{capability} results cannot be saved, usage: {USAGE}").into());
    }

    let (latest, error) = match capability {
        Capability::Image => (ctx.state.image.latest(), ctx.state.image.error()),
        Capability::Audio => (ctx.state.audio.latest(), ctx.state.audio.error()),
        _ => (ctx.state.video.latest(), ctx.state.video.error()),
    };

    match latest {
        Some(latest) => Ok((latest, error)),
        None => Err(format!("no {capability} has been generated yet.").into()),
    }
}
