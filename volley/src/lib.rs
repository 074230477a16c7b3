#![cfg_attr(docsrs, feature(doc_cfg))]
//! Volley drives an HTTP service through a sequence of named scenarios and reduces the
//! measured samples into throughput, latency percentiles, error rates and a status histogram.
//!
//! ```no_run
//! use volley::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BenchError> {
//!     let config = BenchConfig::new("http://localhost:5154")
//!         .credential(Credentials::new("bench@clinic.test", "secret"));
//!
//!     let results = Benchmark::new(config)?
//!         .run(&[ScenarioTemplate::get("Histories", "/api/clinical-histories")])
//!         .await?;
//!
//!     for result in &results {
//!         println!("{}", result.summary_line());
//!     }
//!     Ok(())
//! }
//! ```

pub mod benchmark;
pub mod error;
pub mod executor;
pub mod report;
pub mod scenario;
pub mod stats;
pub mod target;

pub use volley_core as core;

pub use benchmark::{BenchConfig, Benchmark};
pub use error::{BenchError, ReportError};

pub mod prelude {
    pub use crate::benchmark::{BenchConfig, Benchmark};
    pub use crate::error::BenchError;
    pub use crate::executor::{Executor, HttpExecutor};
    pub use crate::target::{HttpTarget, Session, TargetSystem};

    pub use volley_core::{
        Credentials, HttpMethod, RunSettings, Sample, ScenarioResult, ScenarioTemplate,
        TemplateBody,
    };
}
