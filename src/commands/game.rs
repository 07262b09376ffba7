use async_trait::async_trait;

use super::{CommandResult, CommandTrait, convert, run_generation};
use crate::apis::prompts::GameRequest;
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::{FormOptions, StringGreedy};
use crate::utilities::text_utils;

const USAGE: &str = "[type=rpg|puzzle|action|strategy|adventure|casual] \
                     [difficulty=easy|medium|hard] <description>";

pub struct Game;

#[async_trait]
impl CommandTrait for Game {
    fn command_names(&self) -> &[&str] {
        &["game"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("generate a playable game")
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult {
        let (mut options, StringGreedy(description)) =
            convert::<(FormOptions, StringGreedy)>(&arguments, USAGE)?;

        let request = GameRequest {
            game_type: options.take("type")?,
            difficulty: options.take("difficulty")?,
            description,
        };
        options.finish()?;

        if let Some(issue) = text_utils::check_prompt(&request.description) {
            Err(issue)?;
        }

        run_generation(ctx, &ctx.state.game, request, text_utils::describe_game).await
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::commands::CommandError;
    use crate::utilities::test_fixtures::{self, ScriptedTransport};

    #[tokio::test]
    async fn test_game() {
        let transport = ScriptedTransport::new([Ok(json!({
            "success": true,
            "response": { "result": { "data": {
                "game_id": "g-1",
                "title": "Crystal Keeper",
                "playUrl": "https://games.example/g-1"
            } } }
        }))]);
        let (ctx, mut replies) = test_fixtures::command_context(transport.clone());

        Game.execute(&ctx, "type=puzzle difficulty=hard connect the crystals".into())
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].body,
            Some(json!({ "message": "Create a hard difficulty puzzle game: connect the crystals" }))
        );
        let replies = test_fixtures::drain(&mut replies);
        assert_eq!(replies[0], "generating game…");
        assert!(replies[1].starts_with("🎮 Crystal Keeper\n"));
        assert!(replies[1].contains("play: https://games.example/g-1"));
    }

    #[tokio::test]
    async fn test_bad_options() {
        let transport = ScriptedTransport::new([]);
        let (ctx, _replies) = test_fixtures::command_context(transport.clone());

        let Err(CommandError::Conversion(_)) = Game.execute(&ctx, "type=mmo a world".into()).await
        else {
            panic!("expected a conversion error");
        };
        let Err(CommandError::Conversion(_)) = Game.execute(&ctx, "genre=rpg a world".into()).await
        else {
            panic!("expected an unknown option");
        };
        let Err(CommandError::MissingArgument(USAGE)) = Game.execute(&ctx, "type=rpg".into()).await
        else {
            panic!("expected a missing description");
        };
        assert!(transport.requests().is_empty());
    }
}
