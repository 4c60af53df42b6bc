use crate::api::elevenlabs::DEFAULT_BASE_URL;
use crate::error::ReportError;
use crate::time::TimeWindow;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

pub const API_KEY_VAR: &str = "ELEVEN_API_STATS";
pub const BASE_URL_VAR: &str = "ELEVEN_API_BASE_URL";

/// Retrieve detailed ElevenLabs credit usage information for a time window.
///
/// Timestamps may be given in seconds or milliseconds. A report is always
/// written to api_stats_<unix_seconds>.json in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "elevenstat", version)]
pub struct Cli {
    /// Start Unix timestamp (seconds or milliseconds)
    #[arg(allow_negative_numbers = true)]
    pub start_timestamp: i64,

    /// End Unix timestamp (seconds or milliseconds)
    #[arg(allow_negative_numbers = true)]
    pub end_timestamp: i64,

    /// Additional output file (the timestamped file is always created)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Leave individual calls out of the report
    #[arg(long)]
    pub summary_only: bool,
}

/// Everything one run needs, resolved up front so the pipeline never reads
/// the process environment or clock on its own.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub start_input: i64,
    pub end_input: i64,
    pub window: TimeWindow,
    pub output: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub pretty: bool,
    pub summary_only: bool,
    pub run_started_at: DateTime<Utc>,
}

impl Config {
    pub fn resolve<F>(cli: Cli, env: F, run_started_at: DateTime<Utc>) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ReportError::MissingCredential { var: API_KEY_VAR })?;
        let window = TimeWindow::from_inputs(cli.start_timestamp, cli.end_timestamp)?;
        let base_url = env(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            start_input: cli.start_timestamp,
            end_input: cli.end_timestamp,
            window,
            output: cli.output,
            output_dir: PathBuf::from("."),
            pretty: cli.pretty,
            summary_only: cli.summary_only,
            run_started_at,
        })
    }

    pub fn from_env(cli: Cli) -> Result<Self, ReportError> {
        Self::resolve(cli, |name| std::env::var(name).ok(), Utc::now())
    }

    /// Where the always-written report goes.
    pub fn auto_output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("api_stats_{}.json", self.run_started_at.timestamp()))
    }

    /// Last eight characters of the key, for the console banner.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(8)..].iter().collect();
        format!("...{}", tail)
    }
}
