use std::sync::Arc;

use super::command_context::CommandContext;
use super::command_manager::CommandInstance;
use crate::commands::CommandError;

pub async fn dispatch_command(
    command: Arc<CommandInstance>,
    arguments: String,
    context: CommandContext,
) {
    log::info!("running {command} {arguments:?}");

    if let Err(err) = command.command.execute(&context, arguments).await {
        report_command_error(&command, &context, err);
    }
}

fn report_command_error(command: &CommandInstance, context: &CommandContext, error: CommandError) {
    match error {
        CommandError::Custom(text) => context.reply(text),
        CommandError::MissingArgument(usage) => context.reply(format!("usage: {command} {usage}")),
        CommandError::Conversion(err) => context.reply(format!("{err}.")),
        CommandError::Io(err) => {
            log::error!("I/O error in the {command} command: {err}");
            context.reply(format!("could not write the file: {err}"));
        }
    }
}
