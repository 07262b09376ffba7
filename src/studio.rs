use std::future::Future;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use futures_util::future;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::utilities::command_context::CommandContext;
use crate::utilities::command_dispatcher;
use crate::utilities::command_manager::{CommandManager, CommandRef};
use crate::utilities::parsed_command::ParsedCommand;
use crate::utilities::studio_state::StudioState;

/// Command used for lines that do not start with `/`.
const PLAIN_TEXT_COMMAND: &str = "chat";

pub struct Studio {
    state: Arc<StudioState>,
    command_manager: CommandManager,
    tasks: Vec<JoinHandle<()>>,
}

impl Studio {
    pub fn new(state: StudioState) -> Self {
        Self { state: Arc::new(state), command_manager: CommandManager::new(), tasks: Vec::new() }
    }

    pub fn add_command(&mut self, command: CommandRef) {
        self.command_manager.add_command(command);
    }

    pub async fn run(mut self) -> io::Result<()> {
        let (replies, receiver) = mpsc::unbounded_channel();
        let printer = tokio::spawn(print_replies(receiver));
        let context = CommandContext::new(
            self.state.clone(),
            Arc::new(std::mem::take(&mut self.command_manager)),
            replies,
        );

        if let Some(greeting) = self.state.chat.messages().first() {
            context.reply(format!("{}\ntype /help to see what I can do.", greeting.content));
        }

        let mut lines = spawn_stdin_reader();
        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(line) => self.on_input(line, &context),
                    None => {
                        log::info!("end of input");
                        break;
                    }
                },
                result = &mut ctrl_c => {
                    match result {
                        Ok(()) => log::warn!("Ctrl+C received"),
                        Err(err) => log::error!("could not listen for Ctrl+C: {err}"),
                    }
                    break;
                }
            }

            self.tasks.retain(|task| !task.is_finished());
        }

        self.wait_for_tasks().await;
        drop(context);
        printer.await.map_err(io::Error::other)?;

        Ok(())
    }

    fn on_input(&mut self, line: io::Result<String>, context: &CommandContext) {
        match line {
            Ok(line) => self.on_line(&line, context),
            Err(err) => {
                log::warn!("skipping unreadable input line: {err}");
                context.reply("could not read that line as UTF-8.".into());
            }
        }
    }

    fn on_line(&mut self, line: &str, context: &CommandContext) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let (name, arguments) = match ParsedCommand::parse(line) {
            Some(command) => (command.name, command.arguments),
            None => (PLAIN_TEXT_COMMAND.into(), line.into()),
        };

        let Some(command) = context.command_manager.get_command(&name) else {
            log::debug!("unknown command /{name}");
            context.reply(format!("unknown command /{name}, type /help for the list."));
            return;
        };

        self.run_task(command_dispatcher::dispatch_command(command, arguments, context.clone()));
    }

    fn run_task<T: Future<Output = ()> + Send + 'static>(&mut self, future: T) {
        self.tasks.push(tokio::spawn(future));
    }

    async fn wait_for_tasks(&mut self) {
        self.tasks.retain(|task| !task.is_finished());
        if self.tasks.is_empty() {
            return;
        }

        log::info!("waiting for {} task(s) to finish…", self.tasks.len());
        for result in future::join_all(self.tasks.drain(..)).await {
            if let Err(err) = result {
                log::error!("command task failed: {err}");
            }
        }
    }
}

/// Reads stdin on a plain thread so a pending read never holds up shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<io::Result<String>> {
    let (sender, receiver) = mpsc::unbounded_channel();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if sender.send(line).is_err() {
                break;
            }
        }
    });

    receiver
}

async fn print_replies(mut receiver: mpsc::UnboundedReceiver<String>) {
    while let Some(reply) = receiver.recv().await {
        println!("{reply}\n");
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::commands::chat::Chat;
    use crate::commands::health::Health;
    use crate::hooks::SettlePolicy;
    use crate::utilities::test_fixtures::{self, ScriptedTransport};

    fn studio(transport: Arc<ScriptedTransport>) -> (Studio, CommandContext) {
        let mut studio =
            Studio::new(StudioState::with_transport(transport, SettlePolicy::default()));
        studio.add_command(Box::new(Chat));
        studio.add_command(Box::new(Health));

        let (replies, _) = mpsc::unbounded_channel();
        let context = CommandContext::new(
            studio.state.clone(),
            Arc::new(std::mem::take(&mut studio.command_manager)),
            replies,
        );

        (studio, context)
    }

    #[tokio::test]
    async fn test_plain_text_goes_to_chat() {
        let transport = ScriptedTransport::new([
            Ok(json!({ "success": true, "response": { "result": "Hi!" } })),
            Ok(json!({ "status": "healthy" })),
        ]);
        let (mut studio, context) = studio(transport.clone());

        studio.on_line("  hello studio  ", &context);
        studio.wait_for_tasks().await;
        studio.on_line("/STATUS", &context);
        studio.wait_for_tasks().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].endpoint, "/chat");
        assert_eq!(requests[0].body, Some(json!({ "message": "hello studio" })));
        assert_eq!(requests[1].endpoint, "/health");
        assert_eq!(context.state.health.is_healthy(), Some(true));
    }

    #[tokio::test]
    async fn test_unreadable_line_is_skipped() {
        let transport =
            ScriptedTransport::new([Ok(json!({ "success": true, "response": { "result": "Hi!" } }))]);
        let (mut studio, _) = studio(transport.clone());
        let (replies, mut receiver) = mpsc::unbounded_channel();
        let context = CommandContext::new(
            studio.state.clone(),
            Arc::new({
                let mut command_manager = CommandManager::new();
                command_manager.add_command(Box::new(Chat));
                command_manager
            }),
            replies,
        );

        studio.on_input(Err(io::Error::from(io::ErrorKind::InvalidData)), &context);
        studio.on_input(Ok("hello after".into()), &context);
        studio.wait_for_tasks().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, Some(json!({ "message": "hello after" })));

        let replies = test_fixtures::drain(&mut receiver);
        assert_eq!(replies[0], "could not read that line as UTF-8.");
        assert!(replies[1].ends_with("assistant: Hi!"));
    }

    #[tokio::test]
    async fn test_unknown_and_empty_lines() {
        let transport = ScriptedTransport::new([]);
        let (mut studio, _) = studio(transport.clone());
        let (replies, mut receiver) = mpsc::unbounded_channel();
        let context = CommandContext::new(
            studio.state.clone(),
            Arc::new({
                let mut command_manager = CommandManager::new();
                command_manager.add_command(Box::new(Chat));
                command_manager
            }),
            replies,
        );

        studio.on_line("   ", &context);
        studio.on_line("/dance now", &context);

        assert!(studio.tasks.is_empty());
        assert!(transport.requests().is_empty());
        assert_eq!(
            test_fixtures::drain(&mut receiver),
            ["unknown command /dance, type /help for the list."]
        );
    }
}
