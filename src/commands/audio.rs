use async_trait::async_trait;

use super::{CommandResult, CommandTrait, check_range, convert, run_generation};
use crate::apis::prompts::AudioRequest;
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::{FormOptions, StringGreedy};
use crate::utilities::text_utils;

const MAX_DURATION: u32 = 120;
const USAGE: &str = "[kind=music|speech|effects] \
                     [style=ambient|electronic|orchestral|rock|jazz|cinematic] \
                     [duration=1-120] <description or text to speak>";

pub struct Audio;

#[async_trait]
impl CommandTrait for Audio {
    fn command_names(&self) -> &[&str] {
        &["audio", "music"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("generate music, speech or sound effects")
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult {
        let (mut options, StringGreedy(description)) =
            convert::<(FormOptions, StringGreedy)>(&arguments, USAGE)?;

        let request = AudioRequest {
            kind: options.take("kind")?,
            style: options.take("style")?,
            duration: options.take("duration")?,
            description,
        };
        options.finish()?;

        check_range("duration", request.duration, MAX_DURATION)?;
        if let Some(issue) = text_utils::check_prompt(&request.description) {
            Err(issue)?;
        }

        run_generation(ctx, &ctx.state.audio, request, text_utils::describe_media).await
    }
}
