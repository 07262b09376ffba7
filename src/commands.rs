use std::{fmt, io};

use async_trait::async_trait;

use crate::apis::gateway::{Generate, Outcome};
use crate::hooks::{GenerationHook, Settled};
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::{ConversionError, ConvertArgument};

pub mod audio;
pub mod chat;
pub mod game;
pub mod health;
pub mod history;
pub mod image;
pub mod save;
pub mod start;
pub mod video;

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug)]
pub enum CommandError {
    Custom(String),
    /// Carries the usage line of the command.
    MissingArgument(&'static str),
    Conversion(ConversionError),
    Io(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(text) => f.write_str(text),
            Self::MissingArgument(usage) => write!(f, "missing argument, usage: {usage}"),
            Self::Conversion(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl From<String> for CommandError {
    fn from(value: String) -> Self {
        Self::Custom(value)
    }
}

impl From<&str> for CommandError {
    fn from(value: &str) -> Self {
        Self::Custom(value.into())
    }
}

impl From<ConversionError> for CommandError {
    fn from(value: ConversionError) -> Self {
        Self::Conversion(value)
    }
}

impl From<io::Error> for CommandError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[async_trait]
pub trait CommandTrait {
    fn command_names(&self) -> &[&str];

    fn description(&self) -> Option<&'static str> {
        None
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult;
}

/// Converts all of `arguments`, reporting a missing argument with `usage`.
fn convert<T: ConvertArgument>(arguments: &str, usage: &'static str) -> Result<T, CommandError> {
    match T::convert(arguments) {
        Ok((value, rest)) if rest.trim().is_empty() => Ok(value),
        Ok((_, rest)) => Err(format!("unexpected {:?}, usage: {usage}", rest.trim()).into()),
        Err(ConversionError::MissingArgument) => Err(CommandError::MissingArgument(usage)),
        Err(err) => Err(err.into()),
    }
}

fn check_range(name: &str, value: Option<u32>, max: u32) -> Result<(), CommandError> {
    match value {
        Some(value) if value == 0 || value > max => {
            Err(format!("{name} must be between 1 and {max} seconds.").into())
        }
        _ => Ok(()),
    }
}

async fn run_generation<R: Generate>(
    ctx: &CommandContext,
    hook: &GenerationHook<R>,
    request: R,
    render: fn(&Outcome<R::Output>) -> String,
) -> CommandResult {
    if hook.loading() {
        Err(format!("the previous {} is still being generated, please wait.", R::CAPABILITY))?;
    }

    ctx.reply(format!("generating {}…", R::CAPABILITY));

    match hook.invoke(request).await {
        Settled::Stored => {
            if let Some(text) = hook.with_data(|outcome| outcome.map(render)) {
                ctx.reply(text);
            }
        }
        Settled::Discarded => {
            ctx.reply(format!("this {} was superseded by a newer request.", R::CAPABILITY));
        }
    }

    Ok(())
}
