use async_trait::async_trait;

use super::{CommandResult, CommandTrait};
use crate::utilities::command_context::CommandContext;

pub struct Health;

#[async_trait]
impl CommandTrait for Health {
    fn command_names(&self) -> &[&str] {
        &["health", "status"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("check whether the gateway is up")
    }

    async fn execute(&self, ctx: &CommandContext, _: String) -> CommandResult {
        let health = &ctx.state.health;

        if health.loading() {
            Err("a health check is already running.")?;
        }

        let was_healthy = health.is_healthy();

        if health.check().await {
            if was_healthy == Some(false) {
                log::info!("gateway recovered");
                ctx.reply("gateway is healthy again ✅".into());
            } else {
                ctx.reply("gateway is healthy ✅".into());
            }
        } else {
            let reason = health.error().unwrap_or_else(|| "it reported an unhealthy status".into());
            ctx.reply(format!("gateway is unavailable ❌ ({reason})"));
        }

        Ok(())
    }
}
