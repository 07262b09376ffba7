use std::fmt;
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq)]
pub enum ConversionError {
    MissingArgument,
    BadArgument(String),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument => write!(f, "missing command argument"),
            Self::BadArgument(reason) => write!(f, "bad command argument: {reason}"),
        }
    }
}

pub trait ConvertArgument: Sized {
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError>;
}

impl ConvertArgument for String {
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError> {
        let mut arguments = arguments.trim_start().chars();
        let argument =
            arguments.by_ref().take_while(|char| !char.is_ascii_whitespace()).collect::<Self>();

        if argument.is_empty() {
            Err(ConversionError::MissingArgument)?;
        }

        Ok((argument, arguments.as_str()))
    }
}

impl<T: ConvertArgument> ConvertArgument for Option<T> {
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError> {
        match T::convert(arguments) {
            Ok((argument, rest)) => Ok((Some(argument), rest)),
            Err(_) => Ok((None, arguments)),
        }
    }
}

impl<T1, T2> ConvertArgument for (T1, T2)
where
    T1: ConvertArgument,
    T2: ConvertArgument,
{
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError> {
        let (arg1, rest) = T1::convert(arguments)?;
        let (arg2, rest) = T2::convert(rest)?;

        Ok(((arg1, arg2), rest))
    }
}

/// Everything that is left, trimmed. Fails if nothing is left.
pub struct StringGreedy(pub String);

impl ConvertArgument for StringGreedy {
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError> {
        let argument = arguments.trim();

        if argument.is_empty() {
            Err(ConversionError::MissingArgument)?;
        }

        Ok((Self(argument.into()), ""))
    }
}

/// A single word parsed with [`FromStr`].
pub struct Word<T>(pub T);

impl<T> ConvertArgument for Word<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError> {
        let (word, rest) = String::convert(arguments)?;
        let value = word.parse().map_err(|err: T::Err| ConversionError::BadArgument(err.to_string()))?;

        Ok((Self(value), rest))
    }
}

/// Leading `key=value` words, e.g. `style=cartoon size=512x512`.
#[derive(Debug, Default)]
pub struct FormOptions {
    options: Vec<(String, String)>,
}

impl ConvertArgument for FormOptions {
    fn convert(mut arguments: &str) -> Result<(Self, &str), ConversionError> {
        let mut options = Vec::new();

        while let Ok((word, rest)) = String::convert(arguments) {
            let Some((key, value)) = word.split_once('=') else {
                break;
            };
            if key.is_empty() || !key.chars().all(|char| char.is_ascii_alphabetic() || char == '_')
            {
                break;
            }
            if value.is_empty() {
                Err(ConversionError::BadArgument(format!("{key} needs a value")))?;
            }

            options.push((key.to_ascii_lowercase(), value.to_string()));
            arguments = rest;
        }

        Ok((Self { options }, arguments))
    }
}

impl FormOptions {
    pub fn take<T>(&mut self, key: &str) -> Result<Option<T>, ConversionError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let Some(index) = self.options.iter().position(|(name, _)| name == key) else {
            return Ok(None);
        };

        let (_, value) = self.options.remove(index);
        if self.options.iter().any(|(name, _)| name == key) {
            Err(ConversionError::BadArgument(format!("{key} given more than once")))?;
        }

        value
            .parse()
            .map(Some)
            .map_err(|err: T::Err| ConversionError::BadArgument(format!("{key}: {err}")))
    }

    /// Fails on any option that was never taken.
    pub fn finish(self) -> Result<(), ConversionError> {
        match self.options.first() {
            Some((key, _)) => Err(ConversionError::BadArgument(format!("unknown option {key}"))),
            None => Ok(()),
        }
    }
}
