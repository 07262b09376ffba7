pub struct ParsedCommand {
    pub name: String,
    pub arguments: String,
}

impl ParsedCommand {
    /// Splits `/name arguments`. Returns `None` for lines that are not commands.
    pub fn parse(text: &str) -> Option<Self> {
        let command = text.trim_ascii().strip_prefix('/')?;

        let (name, arguments) = command
            .split_once(|char: char| char.is_ascii_whitespace())
            .map_or((command, ""), |(name, arguments)| (name, arguments.trim_ascii_start()));

        if name.is_empty() {
            return None;
        }

        Some(Self { name: name.to_lowercase(), arguments: arguments.into() })
    }
}
