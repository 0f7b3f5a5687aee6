//! Hackcheck CLI
//!
//! Verifies a batch of hackathon submissions against their GitHub
//! repositories and writes one report per submission. Reads provider
//! credentials from the environment (GITHUB_TOKEN, GEMINI_API_KEY).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hackcheck_verifier::adapters::{GeminiClient, GithubClient};
use hackcheck_verifier::report::render_report;
use hackcheck_verifier::{
    EventWindow, ProviderConfig, SubmissionRecord, VerificationPipeline, Verdict, VerifierConfig,
};

#[derive(Parser)]
#[command(name = "hackcheck")]
#[command(about = "Verify hackathon submissions against their repositories", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a JSON array of submissions
    submissions: PathBuf,

    /// Event start (RFC 3339, e.g. 2024-03-01T09:00:00Z)
    #[arg(long)]
    start: DateTime<Utc>,

    /// Event end (RFC 3339)
    #[arg(long)]
    end: DateTime<Utc>,

    /// Write the JSON reports here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write one markdown report per submission into this directory
    #[arg(long)]
    markdown: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; stdout carries the reports
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hackcheck_verifier=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    anyhow::ensure!(
        cli.start < cli.end,
        "event start {} is not before event end {}",
        cli.start,
        cli.end
    );
    let window = EventWindow {
        start: cli.start,
        end: cli.end,
    };

    let raw = std::fs::read_to_string(&cli.submissions)
        .with_context(|| format!("Failed to read {}", cli.submissions.display()))?;
    let records: Vec<SubmissionRecord> =
        serde_json::from_str(&raw).context("Failed to parse submissions JSON")?;
    tracing::info!(count = records.len(), "Loaded submissions");

    let providers = ProviderConfig::from_env();
    let config = VerifierConfig::from_env();
    let github = GithubClient::new(&providers)?;
    let gemini = GeminiClient::new(&providers)?;
    let pipeline = VerificationPipeline::new(Arc::new(github), Arc::new(gemini), config);

    let reports = pipeline.verify_batch(&records, &window).await;

    let count_of = |verdict: Verdict| reports.iter().filter(|r| r.verdict == verdict).count();
    tracing::info!(
        verified = count_of(Verdict::Verified),
        flagged = count_of(Verdict::Flagged),
        disqualified = count_of(Verdict::Disqualified),
        unverifiable = count_of(Verdict::Unverifiable),
        "Verification complete"
    );

    if let Some(dir) = &cli.markdown {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for report in &reports {
            let path = dir.join(format!("{}.md", sanitize_filename(&report.submission_id)));
            std::fs::write(&path, render_report(report))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        tracing::info!(dir = %dir.display(), "Wrote markdown reports");
    }

    let json = serde_json::to_string_pretty(&reports).context("Failed to serialize reports")?;
    match &cli.output {
        Some(path) => {
            write_output(path, &json)?;
            tracing::info!(path = %path.display(), "Wrote JSON reports");
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Submission ids come from external platforms; keep the file names tame
fn sanitize_filename(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
