//! Warmup and measured execution of a single scenario.
use crate::error::BenchError;
use crate::executor::Executor;
use humantime::format_duration;
use metrics_util::AtomicBucket;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};
use volley_core::{RequestSpec, Sample, ScenarioDefinition, MIN_ELAPSED};

/// Samples of a measured phase and its wall-clock duration. Warmup is never included.
#[derive(Debug, Clone)]
pub struct Batch {
    pub samples: Vec<Sample>,
    pub elapsed: Duration,
}

/// Run the warmup calls, then the measured batch through a pool of `concurrency` workers.
#[instrument(name = "scenario", skip_all, fields(name = %definition.name))]
pub async fn run_scenario<E: Executor>(
    executor: Arc<E>,
    definition: &ScenarioDefinition,
) -> Result<Batch, BenchError> {
    debug!(
        "Running {} {} x{} (concurrency {}, warmup {})",
        definition.request.method,
        definition.request.url,
        definition.request_count,
        definition.concurrency,
        definition.warmup_count,
    );

    warmup(executor.as_ref(), definition).await;

    let workers = definition.concurrency.get().min(definition.request_count);
    let request = Arc::new(definition.request.clone());
    let atomics = TaskAtomics::new(definition.request_count);

    // NOTE: Timing starts after warmup so throughput covers the measured phase only.
    let start = Instant::now();
    let tasks: Vec<JoinHandle<()>> = (0..workers)
        .map(|_| {
            let worker = Worker {
                executor: executor.clone(),
                request: request.clone(),
                atomics: atomics.clone(),
                scenario: definition.name.clone(),
            };
            tokio::spawn(worker.run().in_current_span())
        })
        .collect();

    let mut tasks = tasks.into_iter();
    while let Some(task) = tasks.next() {
        if let Err(err) = task.await {
            error!("Worker failed, aborting remaining workers: {err}");
            tasks.for_each(|task| task.abort());
            return Err(BenchError::Worker(err));
        }
    }
    let elapsed = start.elapsed().max(MIN_ELAPSED);

    let samples = atomics.collect();
    debug!(
        "Measured {} samples in {}",
        samples.len(),
        format_duration(elapsed)
    );

    Ok(Batch { samples, elapsed })
}

async fn warmup<E: Executor>(executor: &E, definition: &ScenarioDefinition) {
    for i in 0..definition.warmup_count {
        let sample = executor.execute(&definition.request).await;
        trace!(
            "Warmup {}/{}: status {}",
            i + 1,
            definition.warmup_count,
            sample.status()
        );
    }
}

struct Worker<E> {
    executor: Arc<E>,
    request: Arc<RequestSpec>,
    atomics: TaskAtomics,
    #[cfg_attr(not(feature = "metrics"), allow(unused))]
    scenario: String,
}

impl<E: Executor> Worker<E> {
    async fn run(self) {
        while self.atomics.claim() {
            let sample = self.executor.execute(&self.request).await;

            #[cfg(feature = "metrics")]
            record_metrics(&self.scenario, &sample);

            self.atomics.push(sample);
        }
    }
}

/// State shared between the workers of one measured phase.
#[derive(Clone)]
struct TaskAtomics {
    remaining: Arc<AtomicUsize>,
    samples: Arc<AtomicBucket<Sample>>,
}

impl TaskAtomics {
    fn new(request_count: usize) -> Self {
        Self {
            remaining: Arc::new(AtomicUsize::new(request_count)),
            samples: Arc::new(AtomicBucket::new()),
        }
    }

    /// Reserve one request slot. Returns `false` once the batch is fully dispatched.
    fn claim(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    fn push(&self, sample: Sample) {
        self.samples.push(sample);
    }

    fn collect(&self) -> Vec<Sample> {
        let mut samples = vec![];
        self.samples
            .clear_with(|chunk| samples.extend_from_slice(chunk));
        samples
    }
}

#[cfg(feature = "metrics")]
fn record_metrics(scenario: &str, sample: &Sample) {
    metrics::histogram!("volley_request_latency_ms", "scenario" => scenario.to_string())
        .record(sample.elapsed_ms());

    if sample.ok() {
        metrics::counter!("volley_request_success", "scenario" => scenario.to_string())
            .increment(1);
    } else {
        metrics::counter!("volley_request_error", "scenario" => scenario.to_string())
            .increment(1);
    }
}
