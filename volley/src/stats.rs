//! Reduction of a measured batch into a [`ScenarioResult`].
use crate::scenario::Batch;
use std::time::Duration;
use volley_core::{Sample, ScenarioDefinition, ScenarioResult, StatusBreakdown};

/// Lower bound for the measured duration used in the throughput division.
const MIN_ELAPSED_SECS: f64 = 0.001;

pub fn aggregate(definition: &ScenarioDefinition, batch: &Batch) -> ScenarioResult {
    summarize(definition, &batch.samples, batch.elapsed)
}

fn summarize(definition: &ScenarioDefinition, samples: &[Sample], elapsed: Duration) -> ScenarioResult {
    let requests = samples.len();
    let success = samples.iter().filter(|s| s.ok()).count();
    let errors = requests - success;

    let error_rate_pct = if requests == 0 {
        0.
    } else {
        round2(errors as f64 / requests as f64 * 100.)
    };
    let rps = round2(requests as f64 / elapsed.as_secs_f64().max(MIN_ELAPSED_SECS));

    // NOTE: Failed samples contribute their latency as well.
    let mut latencies: Vec<f64> = samples.iter().map(Sample::elapsed_ms).collect();
    latencies.sort_by(f64::total_cmp);

    let avg_ms = if latencies.is_empty() {
        0.
    } else {
        round2(statistical::mean(&latencies))
    };

    ScenarioResult {
        scenario: definition.name.clone(),
        method: definition.request.method,
        requests,
        concurrency: definition.concurrency.get(),
        success,
        errors,
        error_rate_pct,
        rps,
        avg_ms,
        p50_ms: nearest_rank(&latencies, 50.),
        p95_ms: nearest_rank(&latencies, 95.),
        p99_ms: nearest_rank(&latencies, 99.),
        min_ms: latencies.first().copied().map(round2).unwrap_or(0.),
        max_ms: latencies.last().copied().map(round2).unwrap_or(0.),
        statuses: samples.iter().map(Sample::status).collect::<StatusBreakdown>(),
    }
}

/// Nearest-rank percentile of `values`, rounded to two decimals. `0` for an empty slice.
///
/// The rank is `round(p / 100 * (n - 1))` over the ascending order; no interpolation
/// happens between neighbouring values.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    nearest_rank(&sorted, p)
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.;
    }
    let p = p.clamp(0., 100.);
    let rank = (p / 100. * (sorted.len() - 1) as f64).round_ties_even() as usize;
    round2(sorted[rank.min(sorted.len() - 1)])
}

/// Round to two decimals using the exact decimal expansion of `value`.
///
/// Scaling by 100 first can turn a value like `311.48500000000001` into an exact tie, so the
/// formatter does the rounding instead.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
