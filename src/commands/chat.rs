use async_trait::async_trait;

use super::{CommandResult, CommandTrait, convert};
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::StringGreedy;
use crate::utilities::text_utils;

pub struct Chat;

#[async_trait]
impl CommandTrait for Chat {
    fn command_names(&self) -> &[&str] {
        &["chat", "ask"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("talk to the assistant")
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult {
        let StringGreedy(message) = convert(&arguments, "<message>")?;

        if let Some(issue) = text_utils::check_prompt(&message) {
            log::info!("message rejected: {issue:?}");
            Err(issue)?;
        }

        let chat = &ctx.state.chat;
        if chat.loading() {
            Err("still waiting for the previous reply.")?;
        }

        let reply = chat.send_message(message).await;

        let mut text = text_utils::format_message(reply.result());
        if let Some(err) = reply.error() {
            text.push_str(&format!("\n({} error: {err})", err.kind()));
        }
        ctx.reply(text);

        Ok(())
    }
}
