use crate::interpreter::DEFAULT_PROMPT;
use argh::FromArgs;

#[derive(FromArgs, Debug, PartialEq)]
/// A minimal interactive command interpreter.
///
/// Reads one command per line, runs the builtins cd, help and exit in-process
/// and launches everything else as an external program.
pub struct ShellConfig {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// prompt printed before each line is read (default: "> ")
    pub prompt: String,

    #[argh(switch)]
    /// read plain lines without the line editor, even on a terminal
    pub plain: bool,

    #[argh(option, default = "String::from(\"warn\")")]
    /// log filter used when RUST_LOG is not set, e.g. "debug" (default: warn)
    pub log_level: String,
}

impl ShellConfig {
    /// Whether to read through the line editor, given whether stdin is a terminal.
    pub fn use_line_editor(&self, stdin_is_terminal: bool) -> bool {
        stdin_is_terminal && !self.plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ShellConfig, argh::EarlyExit> {
        ShellConfig::from_args(&["tinysh"], args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.prompt, "> ");
        assert!(!config.plain);
        assert_eq!(config.log_level, "warn");
        assert!(config.use_line_editor(true));
        assert!(!config.use_line_editor(false));
    }

    #[test]
    fn test_options() {
        let config = parse(&["--prompt", "$ ", "--plain", "--log-level", "debug"]).unwrap();
        assert_eq!(config.prompt, "$ ");
        assert!(config.plain);
        assert_eq!(config.log_level, "debug");
        assert!(!config.use_line_editor(true));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let early = parse(&["--bogus"]).unwrap_err();
        assert!(early.status.is_err());
        assert!(early.output.contains("--bogus"));
    }

    #[test]
    fn test_help_is_an_early_success() {
        let early = parse(&["--help"]).unwrap_err();
        assert!(early.status.is_ok());
        assert!(early.output.contains("--prompt"));
    }
}
