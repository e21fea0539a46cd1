//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Agent backend override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Hosted assistant with remote threads
    Hosted,
    /// Local streaming model
    Local,
}

/// CLI arguments for negotia
#[derive(Parser, Debug)]
#[command(name = "negotia")]
#[command(author, version, about = "Debt negotiation assistant shell")]
#[command(long_about = r#"
negotia runs a debt negotiation conversation with an AI agent (ANA).

Every agent reply may end with a product tag such as [LOG: produto_id=7,9];
the tag is stripped from what you see and the products are recorded in the
negotiation's product log. Sessions are saved as JSON documents once the
client's name and phone are known.

Configuration files are loaded from (in priority order):
1. NEGOTIA_* environment variables  (e.g. NEGOTIA_AGENT__BACKEND=local)
2. --config <path>                   Explicit config file
3. ./negotia.toml                    Project-level config
4. ~/.config/negotia/config.toml     Global config

Example:
  negotia
  negotia --backend local
  negotia --list souza
  negotia --load session_20240501_100000.json
"#)]
pub struct Cli {
    /// Override the configured agent backend
    #[arg(short, long, value_enum, value_name = "BACKEND")]
    pub backend: Option<BackendArg>,

    /// List saved sessions (optionally filtered by name or phone) and exit
    #[arg(long, value_name = "TERM", num_args = 0..=1, default_missing_value = "")]
    pub list: Option<String>,

    /// Resume a saved session on start-up
    #[arg(long, value_name = "FILENAME")]
    pub load: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write daily rotated log files to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_without_term() {
        let cli = Cli::parse_from(["negotia", "--list"]);
        assert_eq!(cli.list.as_deref(), Some(""));
    }

    #[test]
    fn test_list_with_term_and_backend() {
        let cli = Cli::parse_from(["negotia", "--list", "souza", "-b", "local", "-vv"]);
        assert_eq!(cli.list.as_deref(), Some("souza"));
        assert_eq!(cli.backend, Some(BackendArg::Local));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["negotia"]);
        assert!(cli.list.is_none());
        assert!(cli.backend.is_none());
        assert!(!cli.quiet);
    }
}
