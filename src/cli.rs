//! Command-line interface for notetaker
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Auditable SOAP notes from clinical conversation transcripts
#[derive(Parser, Debug)]
#[command(
    name = "notetaker",
    version,
    about = "Auditable SOAP notes from clinical conversation transcripts"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Transcript text given inline
    #[arg(long, short = 't', value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the transcript from a file
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// File name of the persisted audit document
    #[arg(long, short = 'o', value_name = "NAME", default_value = "audit_output.json")]
    pub output: String,

    /// Directory for audit documents (overrides output.directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the whole audit document as JSON instead of the SOAP note
    #[arg(long)]
    pub json: bool,

    /// Per-request inference timeout for both backends. Examples: 30, 45s, 2m
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout_secs)]
    pub timeout: Option<u64>,
}

/// Parse a timeout string into whole seconds.
///
/// Accepts bare numbers (seconds) and anything `humantime` understands
/// (`30s`, `2m`, `1m30s`). Zero and anything above an hour are rejected.
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let secs = match s.parse::<u64>() {
        Ok(secs) => secs,
        Err(_) => humantime::parse_duration(s)
            .map(|d| d.as_secs())
            .map_err(|e| e.to_string())?,
    };
    if secs == 0 {
        return Err("timeout must be at least one second".to_string());
    }
    if secs > crate::defaults::MAX_TIMEOUT_SECS {
        return Err(format!(
            "timeout must not exceed {}s",
            crate::defaults::MAX_TIMEOUT_SECS
        ));
    }
    Ok(secs)
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective entity pattern table
    Patterns,

    /// View and initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["notetaker"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.text.is_none());
        assert!(cli.file.is_none());
        assert_eq!(cli.output, "audit_output.json");
        assert!(cli.output_dir.is_none());
        assert!(!cli.json);
        assert!(cli.timeout.is_none());
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_verbose_double() {
        let cli = Cli::try_parse_from(["notetaker", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_inline_text() {
        let cli = Cli::try_parse_from(["notetaker", "--text", "Patient has fever."]).unwrap();
        assert_eq!(cli.text.as_deref(), Some("Patient has fever."));
    }

    #[test]
    fn test_parse_file_and_output() {
        let cli = Cli::try_parse_from([
            "notetaker",
            "-f",
            "visit.txt",
            "-o",
            "visit.json",
            "--output-dir",
            "/tmp/audits",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("visit.txt")));
        assert_eq!(cli.output, "visit.json");
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/audits")));
        assert!(cli.json);
    }

    #[test]
    fn test_text_conflicts_with_file() {
        let err = Cli::try_parse_from(["notetaker", "--text", "x", "--file", "y.txt"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_parse_timeout_formats() {
        assert_eq!(parse_timeout_secs("30").unwrap(), 30);
        assert_eq!(parse_timeout_secs("45s").unwrap(), 45);
        assert_eq!(parse_timeout_secs("2m").unwrap(), 120);
        assert_eq!(parse_timeout_secs(" 1m30s ").unwrap(), 90);
    }

    #[test]
    fn test_parse_timeout_rejects_zero_and_garbage() {
        assert!(parse_timeout_secs("0").is_err());
        assert!(parse_timeout_secs("0s").is_err());
        assert!(parse_timeout_secs("soon").is_err());
    }

    #[test]
    fn test_parse_timeout_rejects_values_above_cap() {
        assert_eq!(parse_timeout_secs("1h").unwrap(), 3600);
        assert!(parse_timeout_secs("3601").is_err());
        assert!(parse_timeout_secs("18446744073709551615").is_err());
        assert!(Cli::try_parse_from(["notetaker", "--timeout", "18446744073709551615"]).is_err());
    }

    #[test]
    fn test_timeout_flag() {
        let cli = Cli::try_parse_from(["notetaker", "--timeout", "90s"]).unwrap();
        assert_eq!(cli.timeout, Some(90));
    }

    #[test]
    fn test_parse_patterns() {
        let cli = Cli::try_parse_from(["notetaker", "patterns"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Patterns)));
    }

    #[test]
    fn test_parse_config_init_force() {
        let cli = Cli::try_parse_from(["notetaker", "config", "init", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigAction::Init { force },
            }) => assert!(force),
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["notetaker", "config", "show", "--config", "/etc/n.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/n.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["notetaker", "completions", "bash"]).unwrap();
        match cli.command {
            Some(Commands::Completions { shell }) => assert_eq!(shell, Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_invalid_command_returns_error() {
        let err = Cli::try_parse_from(["notetaker", "invalid"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }
}
