use std::num::NonZeroUsize;
use std::time::Duration;

/// Per-call timeout for measured and warmup scenario requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for the `GET /health` preflight probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for each `POST /api/auth/login` attempt.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(20);

pub const HEALTH_PATH: &str = "/health";
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Floor applied to a measured phase so throughput never divides by zero.
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

pub const DEFAULT_REQUESTS: usize = 40;
pub const DEFAULT_CONCURRENCY: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(8) };
pub const DEFAULT_WARMUP: usize = 3;
