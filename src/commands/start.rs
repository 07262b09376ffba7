use std::fmt::Write;

use async_trait::async_trait;

use super::{CommandResult, CommandTrait};
use crate::utilities::command_context::CommandContext;

pub struct Start;

#[async_trait]
impl CommandTrait for Start {
    fn command_names(&self) -> &[&str] {
        &["start", "help"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("list the available commands")
    }

    async fn execute(&self, ctx: &CommandContext, _: String) -> CommandResult {
        let mut text = String::from("Mythiq studio: chat, games, images, audio and video.\n");

        for (name, description) in ctx.command_manager.public_command_list() {
            writeln!(text, "  /{name:<8} {description}").ok();
        }

        text.push_str("Options go before the description, e.g. /image style=cartoon a red apple.\n");
        text.push_str("Anything not starting with / is sent to the chat.");

        ctx.reply(text);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commands::health::Health;
    use crate::utilities::command_manager::CommandManager;
    use crate::utilities::test_fixtures::{self, ScriptedTransport};

    #[tokio::test]
    async fn test_lists_commands() {
        let mut command_manager = CommandManager::new();
        command_manager.add_command(Box::new(Start));
        command_manager.add_command(Box::new(Health));
        let (ctx, mut replies) =
            test_fixtures::command_context_with(ScriptedTransport::new([]), command_manager);

        Start.execute(&ctx, String::new()).await.unwrap();

        let replies = test_fixtures::drain(&mut replies);
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("/start    list the available commands"));
        assert!(replies[0].contains("/health "));
    }
}
