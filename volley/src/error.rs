use thiserror::Error;

/// Errors that abort a benchmark run.
///
/// Individual request failures never surface here; they are folded into the scenario's
/// statistics as failed samples.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Health check failed: {0}")]
    HealthCheck(String),

    #[error("Unable to authenticate: none of the {attempted} configured credential pairs yielded a token")]
    Authentication { attempted: usize },

    #[error("Scenario worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl BenchError {
    /// Whether the error came from a preflight step against the target.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            BenchError::HealthCheck(_) | BenchError::Authentication { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON report error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unable to format report timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}
