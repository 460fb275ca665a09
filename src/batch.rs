use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use csv::{ReaderBuilder, Trim};
use glob::glob;
use log::{info, warn};
use serde::Serialize;
use crate::analytics::analyze;
use crate::config::ValidationParameters;
use crate::errors::BatchError;
use crate::models::analytics::Analytics;
use crate::models::forecast_series::Prediction;
use crate::service::{Forecaster, PredictionService};
use crate::validation::{check_file_type, validate, RawForecastInput};

/// Result of one CSV row
#[derive(Serialize, Debug)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RowOutcome {
    Ok { prediction: Prediction, analytics: Analytics },
    Error { message: String },
}

#[derive(Serialize, Debug)]
pub struct BatchRow {
    pub file: String,
    pub line: u64,
    pub outcome: RowOutcome,
}

impl BatchRow {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, RowOutcome::Ok { .. })
    }
}

/// Expands the given glob patterns into a sorted list of CSV files
///
/// Every pattern must match at least one file and every matched file must be a CSV file.
///
/// # Arguments
///
/// * 'patterns' - file paths or glob patterns
pub fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>, BatchError> {
    let mut files: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let mut matched = 0;
        for entry in glob(pattern)? {
            let path = entry?;
            if path.is_file() {
                check_file_type(&path)?;
                files.push(path);
                matched += 1;
            }
        }
        if matched == 0 {
            return Err(BatchError::NoFiles(pattern.to_string()));
        }
    }

    files.sort();
    files.dedup();

    Ok(files)
}

/// Reads forecast input rows from CSV data. Rows that can't be read are returned as
/// errors together with their line number, they don't stop the remaining rows.
///
/// # Arguments
///
/// * 'reader' - CSV data with a header row
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<(u64, Result<RawForecastInput, String>)>, BatchError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for record in rdr.records() {
        match record {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line());
                let row = record.deserialize::<RawForecastInput>(Some(&headers)).map_err(|e| e.to_string());
                rows.push((line, row));
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                rows.push((line, Err(e.to_string())));
            }
        }
    }

    Ok(rows)
}

/// Runs every row of every file through validation, the forecaster and analytics.
/// Each row is independent of the others.
///
/// # Arguments
///
/// * 'files' - CSV files to process
/// * 'bounds' - validation ranges
/// * 'service' - prediction service used to run the forecaster
pub fn run_batch<F: Forecaster>(files: &[PathBuf], bounds: &ValidationParameters, service: &PredictionService<F>)
    -> Result<Vec<BatchRow>, BatchError> {

    let mut result = Vec::new();
    for path in files {
        let file = File::open(path).map_err(|e| BatchError::Io(format!("{}: {}", path.display(), e)))?;
        let rows = process_rows(path, read_rows(file)?, bounds, service);

        let failed = rows.iter().filter(|r| !r.is_ok()).count();
        info!("Processed {} rows from {}, {} failed", rows.len(), path.display(), failed);
        result.extend(rows);
    }

    Ok(result)
}

fn process_rows<F: Forecaster>(path: &Path, rows: Vec<(u64, Result<RawForecastInput, String>)>,
                               bounds: &ValidationParameters, service: &PredictionService<F>) -> Vec<BatchRow> {
    rows.into_iter()
        .map(|(line, raw)| {
            let outcome = match process_row(raw, bounds, service) {
                Ok((prediction, analytics)) => RowOutcome::Ok { prediction, analytics },
                Err(message) => {
                    warn!("{} line {}: {}", path.display(), line, message);
                    RowOutcome::Error { message }
                }
            };
            BatchRow { file: path.display().to_string(), line, outcome }
        })
        .collect()
}

fn process_row<F: Forecaster>(raw: Result<RawForecastInput, String>, bounds: &ValidationParameters,
                              service: &PredictionService<F>) -> Result<(Prediction, Analytics), String> {
    let raw = raw?;
    let request = validate(&raw, bounds).map_err(|e| e.to_string())?;
    let series = service.run(&request).map_err(|e| e.to_string())?;
    let analytics = analyze(&series);

    Ok((Prediction { request, series }, analytics))
}
