use std::sync::Arc;

use tokio::sync::mpsc;

use super::command_manager::CommandManager;
use super::studio_state::StudioState;

#[derive(Clone)]
pub struct CommandContext {
    pub state: Arc<StudioState>,
    pub command_manager: Arc<CommandManager>,
    replies: mpsc::UnboundedSender<String>,
}

impl CommandContext {
    pub const fn new(
        state: Arc<StudioState>,
        command_manager: Arc<CommandManager>,
        replies: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self { state, command_manager, replies }
    }

    pub fn reply(&self, text: String) {
        if self.replies.send(text).is_err() {
            log::warn!("reply dropped, the console is already closed");
        }
    }
}
