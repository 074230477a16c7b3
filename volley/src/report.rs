//! JSON and CSV reports for a completed run.
use crate::error::ReportError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use time::{macros::format_description, OffsetDateTime};
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};
use volley_core::ScenarioResult;

const REPORT_PREFIX: &str = "api-performance";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Write `results` into `dir` as `api-performance-<stamp>.{json,csv}`, stamped with local time.
pub fn write_reports(dir: &Path, results: &[ScenarioResult]) -> Result<ReportPaths, ReportError> {
    write_reports_with_stamp(dir, &timestamp()?, results)
}

pub fn write_reports_with_stamp(
    dir: &Path,
    stamp: &str,
    results: &[ScenarioResult],
) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(dir)?;
    let paths = ReportPaths {
        json: dir.join(format!("{REPORT_PREFIX}-{stamp}.json")),
        csv: dir.join(format!("{REPORT_PREFIX}-{stamp}.csv")),
    };

    let mut json = BufWriter::new(File::create(&paths.json)?);
    serde_json::to_writer_pretty(&mut json, results)?;
    json.flush()?;

    // The header is written up front so an empty run still gets one.
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&paths.csv)?;
    csv.write_record(ScenarioResult::FIELDS)?;
    for result in results {
        csv.serialize(result)?;
    }
    csv.flush()?;

    debug!(
        "Wrote {} results to {} and {}",
        results.len(),
        paths.json.display(),
        paths.csv.display()
    );
    Ok(paths)
}

/// `YYYYMMDD-HHMMSS`, falling back to UTC when the local offset is unknown.
pub fn timestamp() -> Result<String, ReportError> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(format_description!(
        "[year][month][day]-[hour][minute][second]"
    ))?)
}
