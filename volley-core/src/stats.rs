use crate::HttpMethod;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Aggregated statistics for one scenario's measured batch.
///
/// `success + errors == requests` holds for every value produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub method: HttpMethod,
    pub requests: usize,
    pub concurrency: usize,
    pub success: usize,
    pub errors: usize,
    pub error_rate_pct: f64,
    pub rps: f64,
    pub avg_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub statuses: StatusBreakdown,
}

impl ScenarioResult {
    /// Serialized field names, in declaration order.
    pub const FIELDS: [&'static str; 15] = [
        "scenario",
        "method",
        "requests",
        "concurrency",
        "success",
        "errors",
        "error_rate_pct",
        "rps",
        "avg_ms",
        "p50_ms",
        "p95_ms",
        "p99_ms",
        "min_ms",
        "max_ms",
        "statuses",
    ];

    pub fn summary_line(&self) -> String {
        format!(
            "{}: avg={}ms p95={}ms rps={} err={}%",
            self.scenario, self.avg_ms, self.p95_ms, self.rps, self.error_rate_pct
        )
    }
}

/// Status code to occurrence count, ordered by status code. `0` stands for "no response".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBreakdown(BTreeMap<u16, usize>);

impl StatusBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: u16) {
        *self.0.entry(status).or_default() += 1;
    }

    pub fn count(&self, status: u16) -> usize {
        self.0.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, usize)> + '_ {
        self.0.iter().map(|(status, count)| (*status, *count))
    }
}

impl FromIterator<u16> for StatusBreakdown {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for status in iter {
            breakdown.record(status);
        }
        breakdown
    }
}

impl fmt::Display for StatusBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (status, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{status}:{count}")?;
        }
        Ok(())
    }
}

impl Serialize for StatusBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
