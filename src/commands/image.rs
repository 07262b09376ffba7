use async_trait::async_trait;

use super::{CommandResult, CommandTrait, convert, run_generation};
use crate::apis::prompts::ImageRequest;
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::{FormOptions, StringGreedy};
use crate::utilities::text_utils;

const USAGE: &str = "[style=realistic|artistic|cartoon|abstract|vintage|futuristic] \
                     [size=512x512|1024x1024|1024x768|768x1024] [quality=standard|high] \
                     <description>";

pub struct Image;

#[async_trait]
impl CommandTrait for Image {
    fn command_names(&self) -> &[&str] {
        &["image", "img"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("generate an image")
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult {
        let (mut options, StringGreedy(description)) =
            convert::<(FormOptions, StringGreedy)>(&arguments, USAGE)?;

        let request = ImageRequest {
            style: options.take("style")?,
            size: options.take("size")?,
            quality: options.take("quality")?,
            description,
        };
        options.finish()?;

        if let Some(issue) = text_utils::check_prompt(&request.description) {
            Err(issue)?;
        }

        run_generation(ctx, &ctx.state.image, request, text_utils::describe_media).await
    }
}
