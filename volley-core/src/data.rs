use std::time::Duration;

/// Outcome of a single request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A response with a 2xx status was received.
    Success { status: u16 },
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A response was received, but its status was outside of `[200, 300)`.
    Status(u16),
    /// No response was received (timeout, connection refused, DNS, body read).
    Transport(String),
}

/// One request attempt and its wall-clock duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl Sample {
    /// Classify a received status code.
    pub fn from_status(status: u16, elapsed: Duration) -> Self {
        let outcome = if (200..300).contains(&status) {
            Outcome::Success { status }
        } else {
            Outcome::Failure(Failure::Status(status))
        };
        Self { outcome, elapsed }
    }

    pub fn transport(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            outcome: Outcome::Failure(Failure::Transport(message.into())),
            elapsed,
        }
    }

    pub fn ok(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// Observed status code, `0` when no response was received.
    pub fn status(&self) -> u16 {
        match &self.outcome {
            Outcome::Success { status } | Outcome::Failure(Failure::Status(status)) => *status,
            Outcome::Failure(Failure::Transport(_)) => 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure(Failure::Transport(msg)) => Some(msg),
            _ => None,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1_000_000.
    }
}
