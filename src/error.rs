use std::path::PathBuf;

/// Conditions that end the run with a non-zero exit code.
///
/// Remote failures are not in here: the fetchers degrade them into partial
/// results or placeholder objects before they can reach `main`.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{var} environment variable not set")]
    MissingCredential { var: &'static str },

    #[error("start timestamp must be before end timestamp (start={start_ms} ms, end={end_ms} ms)")]
    InvalidWindow { start_ms: i64, end_ms: i64 },

    #[error("could not connect to ElevenLabs: {0}")]
    Client(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
