use anyhow::Result;
use clap::{CommandFactory, Parser};
use notetaker::app::{self, RunOptions};
use notetaker::cli::{Cli, Commands, ConfigAction};
use notetaker::config::Config;
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    notetaker::logging::init(cli.quiet, cli.verbose);
    tracing::debug!(version = %notetaker::version_string(), "notetaker starting");

    match cli.command {
        None => {
            let config = app::load_config(cli.config.as_deref())?;
            let options = RunOptions {
                text: cli.text,
                file: cli.file,
                output: cli.output,
                output_dir: cli.output_dir,
                timeout_secs: cli.timeout,
                json: cli.json,
            };
            app::run_transcript_command(config, options).await?;
        }
        Some(Commands::Patterns) => {
            let config = app::load_config(cli.config.as_deref())?;
            app::run_patterns_command(&config)?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "notetaker", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Handle configuration commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&std::path::Path>) -> Result<()> {
    let config_path = match custom_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()
            .ok_or_else(|| anyhow::anyhow!("No configuration directory on this platform; use --config"))?,
    };

    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Path => {
            let marker = if config_path.exists() {
                "exists".green().to_string()
            } else {
                "not created".dimmed().to_string()
            };
            println!("{} ({})", config_path.display(), marker);
        }
        ConfigAction::Init { force } => {
            app::init_config_file(&config_path, force)?;
            println!("Wrote default configuration to {}", config_path.display());
        }
    }
    Ok(())
}
