// Inbox Triage V1 Entry Point
// Classifies emails from the command line and prints JSON results

use anyhow::Context;
use clap::{Parser, Subcommand};
use inbox_triage::actors::ClassifierHandle;
use inbox_triage::config::ClassifierConfig;
use inbox_triage::models::{Attachment, ClassificationRequest};
use inbox_triage::{preflight, telemetry};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "inbox-triage")]
#[command(
    about = "Classify emails as productive or unproductive and draft a reply",
    long_about = None
)]
struct Cli {
    /// Base URL of the classification service (overrides CLASSIFIER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Skip the simulated processing delay on local results
    #[arg(long, global = true, default_value_t = false)]
    no_latency: bool,

    /// Seed for reproducible confidence jitter and reply choice
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a single email
    Classify {
        /// Email body
        #[arg(short, long)]
        text: Option<String>,

        /// File holding the email (txt, eml, md, csv, json, pdf, docx)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Classify every email of a text file, one per blank-line-separated block
    Batch {
        /// Input file
        file: PathBuf,
    },
    /// Check the lexicon, the templates and the classification service
    Preflight,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClassifierConfig::read_env().context("Failed to load configuration")?;
    apply_overrides(&cli, &mut config);
    config.check().context("Invalid configuration")?;

    telemetry::init_tracing(&config)?;
    info!(remote = config.api_url.is_some(), "Inbox Triage starting");

    match cli.command {
        Command::Classify { text, file } => {
            let attachment = file.as_deref().map(load_attachment).transpose()?;
            let classifier = ClassifierHandle::from_config(&config)?;
            let result = classifier
                .classify(ClassificationRequest::new(text, attachment))
                .await?;
            print_json(&result)?;
            classifier.shutdown().await?;
        }
        Command::Batch { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let classifier = ClassifierHandle::from_config(&config)?;
            let items = classifier.classify_batch(split_emails(&content)).await?;
            print_json(&items)?;
            classifier.shutdown().await?;
        }
        Command::Preflight => {
            let report = preflight::run_preflight_checks(&config).await?;
            print_json(&report)?;
            if !report.ready_to_start {
                anyhow::bail!("{}", report.summary);
            }
        }
    }

    Ok(())
}

/// Command-line flags win over the environment.
fn apply_overrides(cli: &Cli, config: &mut ClassifierConfig) {
    if cli.api_url.is_some() {
        config.api_url = cli.api_url.clone();
    }
    if cli.no_latency {
        config.simulate_latency = false;
    }
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }
}

fn load_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Attachment::new(file_name, data))
}

/// Splits on blank lines. Blocks keep their inner line breaks.
fn split_emails(content: &str) -> Vec<String> {
    let mut emails = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                emails.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        emails.push(current.join("\n"));
    }

    emails
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_emails() {
        let content = "Preciso de suporte\ncom o sistema\n\n\n  \nFeliz natal!\n";
        assert_eq!(
            split_emails(content),
            vec!["Preciso de suporte\ncom o sistema", "Feliz natal!"]
        );
        assert!(split_emails("\n \n").is_empty());
    }

    #[test]
    fn test_load_attachment_keeps_file_name() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Segue a fatura pendente").unwrap();

        let attachment = load_attachment(file.path()).unwrap();
        assert!(attachment.file_name.ends_with(".txt"));
        assert_eq!(attachment.extract_text().unwrap(), "Segue a fatura pendente");
    }

    #[test]
    fn test_cli_parses_classify() {
        let cli =
            Cli::try_parse_from(["inbox-triage", "--no-latency", "classify", "--text", "Olá"])
                .unwrap();
        assert!(cli.no_latency);
        assert!(matches!(cli.command, Command::Classify { text: Some(_), file: None }));
    }

    #[test]
    fn test_flags_replace_bad_environment_values() {
        let mut config = ClassifierConfig {
            api_url: Some("not a url".to_string()),
            ..ClassifierConfig::default()
        };
        assert!(config.check().is_err());

        let cli = Cli::try_parse_from([
            "inbox-triage",
            "--api-url",
            "http://localhost:5000/api",
            "--seed",
            "7",
            "--no-latency",
            "preflight",
        ])
        .unwrap();
        apply_overrides(&cli, &mut config);

        assert!(config.check().is_ok());
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:5000/api"));
        assert_eq!(config.rng_seed, Some(7));
        assert!(!config.simulate_latency);
    }

    #[test]
    fn test_absent_flags_keep_environment_values() {
        let mut config = ClassifierConfig {
            rng_seed: Some(99),
            ..ClassifierConfig::default()
        };
        let cli = Cli::try_parse_from(["inbox-triage", "preflight"]).unwrap();

        apply_overrides(&cli, &mut config);

        assert_eq!(config.rng_seed, Some(99));
        assert!(config.simulate_latency);
    }
}
