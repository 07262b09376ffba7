use async_trait::async_trait;

use super::{CommandResult, CommandTrait, check_range, convert, run_generation};
use crate::apis::prompts::VideoRequest;
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::{FormOptions, StringGreedy};
use crate::utilities::text_utils;

const MAX_DURATION: u32 = 15;
const USAGE: &str = "[style=realistic|animated|cinematic|abstract|vintage|futuristic] \
                     [duration=1-15] [aspect=16:9|9:16|1:1|4:3] <description>";

pub struct Video;

#[async_trait]
impl CommandTrait for Video {
    fn command_names(&self) -> &[&str] {
        &["video"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("generate a short video")
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult {
        let (mut options, StringGreedy(description)) =
            convert::<(FormOptions, StringGreedy)>(&arguments, USAGE)?;

        let request = VideoRequest {
            style: options.take("style")?,
            duration: options.take("duration")?,
            aspect: options.take("aspect")?,
            description,
        };
        options.finish()?;

        check_range("duration", request.duration, MAX_DURATION)?;
        if let Some(issue) = text_utils::check_prompt(&request.description) {
            Err(issue)?;
        }

        run_generation(ctx, &ctx.state.video, request, text_utils::describe_media).await
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::utilities::test_fixtures::{self, ScriptedTransport};

    #[tokio::test]
    async fn test_video() {
        let transport = ScriptedTransport::new([Ok(json!({ "success": false }))]);
        let (ctx, mut replies) = test_fixtures::command_context(transport.clone());

        Video.execute(&ctx, "aspect=9:16 duration=5 waves at dusk".into()).await.unwrap();

        assert_eq!(
            transport.requests()[0].body,
            Some(json!({
                "message": "Generate a 5-second realistic-style video of waves at dusk \
                            in 9:16 aspect ratio"
            }))
        );
        let replies = test_fixtures::drain(&mut replies);
        assert!(replies[1].contains("[placeholder]"));
        assert!(replies[1].contains("no media available"));
        assert_eq!(ctx.state.video.error().as_deref(), Some("gateway reported failure"));
    }
}
