//! Slash commands understood by the REPL

use chatstream_application::ExportFormat;

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Quit,
    Help,
    Settings,
    Clear,
    Export(ExportFormat),
    Temperature(f32),
    MaxTokens(u32),
    /// Empty text removes the system instruction
    System(String),
    /// Empty text removes the prefill
    Prefill(String),
    /// A known command with a bad argument; carries the usage line
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match name {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/settings" => ReplCommand::Settings,
            "/clear" => ReplCommand::Clear,
            "/export" if arg.is_empty() => ReplCommand::Export(ExportFormat::default()),
            "/export" => arg
                .parse()
                .map(ReplCommand::Export)
                .unwrap_or(ReplCommand::Usage("/export [txt|md]")),
            "/temperature" | "/temp" => arg
                .parse()
                .map(ReplCommand::Temperature)
                .unwrap_or(ReplCommand::Usage("/temperature <0.0-1.0>")),
            "/max-tokens" | "/max_tokens" => arg
                .parse()
                .map(ReplCommand::MaxTokens)
                .unwrap_or(ReplCommand::Usage("/max-tokens <n>")),
            "/system" => ReplCommand::System(arg.to_string()),
            "/prefill" => ReplCommand::Prefill(arg.to_string()),
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  /help, /h, /?          - Show this help
  /settings              - Show model and generation settings
  /clear                 - Forget the conversation so far
  /export [txt|md]       - Write the conversation to a file
  /temperature <x>       - Set sampling temperature (0.0-1.0)
  /max-tokens <n>        - Set the reply length bound
  /system <text>         - Set the system instruction (empty to remove)
  /prefill <text>        - Force replies to begin with <text> (empty to remove)
  /quit, /exit, /q       - Exit chat

Press Ctrl-C while a reply is streaming to stop it.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("  /h "), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/clear"), ReplCommand::Clear);
        assert_eq!(
            ReplCommand::parse("/frobnicate now"),
            ReplCommand::Unknown("/frobnicate".to_string())
        );
    }

    #[test]
    fn test_parse_export_format() {
        assert_eq!(
            ReplCommand::parse("/export"),
            ReplCommand::Export(ExportFormat::Text)
        );
        assert_eq!(
            ReplCommand::parse("/export md"),
            ReplCommand::Export(ExportFormat::Markdown)
        );
        assert_eq!(
            ReplCommand::parse("/export yaml"),
            ReplCommand::Usage("/export [txt|md]")
        );
    }

    #[test]
    fn test_parse_numeric_arguments() {
        assert_eq!(
            ReplCommand::parse("/temperature 0.7"),
            ReplCommand::Temperature(0.7)
        );
        assert_eq!(
            ReplCommand::parse("/max-tokens 8000"),
            ReplCommand::MaxTokens(8000)
        );
        assert_eq!(
            ReplCommand::parse("/max-tokens lots"),
            ReplCommand::Usage("/max-tokens <n>")
        );
    }

    #[test]
    fn test_parse_text_arguments_keep_inner_spacing() {
        assert_eq!(
            ReplCommand::parse("/system You are  terse. "),
            ReplCommand::System("You are  terse.".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/prefill"),
            ReplCommand::Prefill(String::new())
        );
    }
}
