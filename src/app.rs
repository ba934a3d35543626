//! Command-line application flow.
//!
//! Loads configuration, initializes the inference backends once, then reads
//! the transcript and runs the pipeline on it.

use crate::config::Config;
use crate::extraction::patterns::PatternTable;
use crate::inference::registry::InferenceBackends;
use crate::output;
use crate::pipeline::audit::AuditOutcome;
use crate::pipeline::orchestrator::Pipeline;
use crate::pipeline::store::JsonFileStore;
use anyhow::{Context, Result, bail};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Options for a single pipeline run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub output: String,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub json: bool,
}

/// Where the transcript comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl TranscriptSource {
    /// Inline text wins over a file; stdin is used only when it is piped.
    pub fn resolve(text: Option<String>, file: Option<PathBuf>, stdin_is_terminal: bool) -> Result<Self> {
        match (text, file) {
            (Some(text), _) => Ok(Self::Inline(text)),
            (None, Some(path)) => Ok(Self::File(path)),
            (None, None) if !stdin_is_terminal => Ok(Self::Stdin),
            (None, None) => bail!("No transcript provided. Use --text, --file, or pipe text on stdin."),
        }
    }

    pub fn read(self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text),
            Self::File(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("Could not read file: {}", path.display())),
            Self::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Could not read transcript from stdin")?;
                Ok(buf)
            }
        }
    }
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config), which must exist
/// 2. Default config path (~/.config/notetaker/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides are applied last.
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}

/// Fold command-line overrides into the configuration and validate it.
pub fn apply_overrides(mut config: Config, options: &RunOptions) -> Result<Config> {
    if let Some(dir) = &options.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(secs) = options.timeout_secs {
        config.classifier.timeout_secs = secs;
        config.summarizer.timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

/// Initialize the backends, read the transcript, run the pipeline once and
/// print the result to stdout.
///
/// Errors here are initialization or input failures; a processed transcript,
/// even one that produced a failure envelope, returns `Ok`.
pub async fn run_transcript_command(config: Config, options: RunOptions) -> Result<AuditOutcome> {
    run_with_backends(config, options, InferenceBackends::init_global).await
}

async fn run_with_backends<F>(config: Config, options: RunOptions, init: F) -> Result<AuditOutcome>
where
    F: FnOnce(&Config) -> crate::error::Result<&'static InferenceBackends> + Send + 'static,
{
    let config = apply_overrides(config, &options)?;

    let started = Instant::now();
    let init_config = config.clone();
    let backends = tokio::task::spawn_blocking(move || init(&init_config))
        .await
        .context("Backend initialization task failed")??;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        backends = ?backends,
        "Inference backends ready"
    );

    let transcript = TranscriptSource::resolve(
        options.text.clone(),
        options.file.clone(),
        std::io::stdin().is_terminal(),
    )?
    .read()?;

    let store = Arc::new(JsonFileStore::from_config(&config.output));
    let pipeline = Pipeline::new(backends, &config, store)?;
    let outcome = pipeline.run(&transcript, &options.output).await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", output::render_outcome(&outcome, std::io::stdout().is_terminal()));
    }
    Ok(outcome)
}

/// Print the pattern table the extractor would use with this configuration.
pub fn run_patterns_command(config: &Config) -> Result<()> {
    let table = PatternTable::from_config(&config.extraction.patterns)?;
    print!("{}", output::render_patterns(&table, std::io::stdout().is_terminal()));
    Ok(())
}

/// Write the default configuration to `path`, refusing to clobber unless forced.
pub fn init_config_file(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    std::fs::write(path, Config::default().to_toml_string()?)
        .with_context(|| format!("Could not write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn inline_text_wins_over_file() {
        let source = TranscriptSource::resolve(
            Some("fever".to_string()),
            Some(PathBuf::from("ignored.txt")),
            true,
        )
        .unwrap();
        assert_eq!(source, TranscriptSource::Inline("fever".to_string()));
    }

    #[test]
    fn piped_stdin_is_used_without_flags() {
        assert_eq!(
            TranscriptSource::resolve(None, None, false).unwrap(),
            TranscriptSource::Stdin
        );
    }

    #[test]
    fn terminal_without_flags_is_an_error() {
        let err = TranscriptSource::resolve(None, None, true).unwrap_err();
        assert!(err.to_string().contains("No transcript provided"));
    }

    #[test]
    fn file_source_reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Patient has cough.").unwrap();
        let text = TranscriptSource::File(file.path().to_path_buf()).read().unwrap();
        assert_eq!(text, "Patient has cough.");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = TranscriptSource::File(PathBuf::from("/nonexistent/visit.txt"))
            .read()
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not read file"));
    }

    #[test]
    fn overrides_replace_directory_and_timeouts() {
        let options = RunOptions {
            output_dir: Some(PathBuf::from("/tmp/audits")),
            timeout_secs: Some(15),
            ..RunOptions::default()
        };
        let config = apply_overrides(Config::default(), &options).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("/tmp/audits"));
        assert_eq!(config.classifier.timeout_secs, 15);
        assert_eq!(config.summarizer.timeout_secs, 15);
    }

    #[test]
    fn overrides_still_validate() {
        let mut config = Config::default();
        config.extraction.keyword_threshold = 3.0;
        assert!(apply_overrides(config, &RunOptions::default()).is_err());
    }

    #[tokio::test]
    async fn backend_init_failure_wins_over_unreadable_input() {
        let options = RunOptions {
            file: Some(PathBuf::from("/nonexistent/visit.txt")),
            ..RunOptions::default()
        };
        let err = run_with_backends(Config::default(), options, |_| {
            Err(crate::error::NotetakerError::BackendInit {
                backend: "classifier".to_string(),
                message: "unreachable".to_string(),
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<crate::error::NotetakerError>(),
            Some(crate::error::NotetakerError::BackendInit { .. })
        ));
    }

    #[tokio::test]
    async fn backends_are_ready_before_transcript_is_read() {
        use crate::inference::{MockClassifier, MockSummarizer};
        use std::sync::atomic::{AtomicBool, Ordering};

        let initialized = Arc::new(AtomicBool::new(false));
        let flag = initialized.clone();
        let options = RunOptions {
            file: Some(PathBuf::from("/nonexistent/visit.txt")),
            ..RunOptions::default()
        };
        let err = run_with_backends(Config::default(), options, move |_| {
            flag.store(true, Ordering::SeqCst);
            let backends: &'static InferenceBackends = Box::leak(Box::new(InferenceBackends::new(
                Arc::new(MockClassifier::new("m")),
                Arc::new(MockSummarizer::new("m")),
            )));
            Ok(backends)
        })
        .await
        .unwrap_err();

        assert!(initialized.load(Ordering::SeqCst));
        assert!(err.to_string().starts_with("Could not read file"));
    }

    #[test]
    fn explicit_missing_config_path_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/notetaker.toml"))).is_err());
    }

    #[test]
    fn init_config_file_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init_config_file(&path, false).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[classifier]"));

        assert!(init_config_file(&path, false).is_err());
        init_config_file(&path, true).unwrap();
    }
}
