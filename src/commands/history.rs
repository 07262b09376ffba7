use async_trait::async_trait;

use super::{CommandResult, CommandTrait};
use crate::utilities::command_context::CommandContext;
use crate::utilities::text_utils::{self, TruncateWithEllipsis};

const PREVIEW_LENGTH: usize = 200;

pub struct History;

#[async_trait]
impl CommandTrait for History {
    fn command_names(&self) -> &[&str] {
        &["history"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("show the conversation so far")
    }

    async fn execute(&self, ctx: &CommandContext, _: String) -> CommandResult {
        let chat = &ctx.state.chat;
        let mut text = chat
            .messages()
            .iter()
            .map(|message| text_utils::format_message(message).truncate_with_ellipsis(PREVIEW_LENGTH))
            .collect::<Vec<_>>()
            .join("\n");

        if let Some(error) = chat.error() {
            text.push_str(&format!("\n(the last reply is a stand-in, the request failed: {error})"));
        }

        ctx.reply(text);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::commands::chat::Chat;
    use crate::hooks::GREETING;
    use crate::utilities::test_fixtures::{self, ScriptedTransport};

    #[tokio::test]
    async fn test_history() {
        let transport = ScriptedTransport::new([Ok(json!({
            "success": true,
            "response": { "result": { "data": { "message": "a".repeat(300) } } }
        }))]);
        let (ctx, mut replies) = test_fixtures::command_context(transport);

        Chat.execute(&ctx, "Hello".into()).await.unwrap();
        test_fixtures::drain(&mut replies);
        History.execute(&ctx, String::new()).await.unwrap();

        let replies = test_fixtures::drain(&mut replies);
        let lines = replies[0].lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(GREETING));
        assert!(lines[1].ends_with("you: Hello"));
        assert!(lines[2].ends_with('…'));
        assert_eq!(lines[2].chars().count(), PREVIEW_LENGTH);
    }

    #[tokio::test]
    async fn test_history_after_failed_reply() {
        let (ctx, mut replies) = test_fixtures::command_context(ScriptedTransport::new([]));

        Chat.execute(&ctx, "Hello".into()).await.unwrap();
        test_fixtures::drain(&mut replies);
        History.execute(&ctx, String::new()).await.unwrap();

        let replies = test_fixtures::drain(&mut replies);
        let lines = replies[0].lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("(the last reply is a stand-in, the request failed:"));
        assert!(lines[3].contains("503"));
    }
}
