use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Row};

/// Header names treated as filterable: `mod` followed by digits.
static FILTER_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^mod\d+$").expect("valid filter column pattern"));

/// The subset of `headers` that are filterable, in header order.
pub fn filter_columns_of(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .filter(|h| FILTER_COLUMN_RE.is_match(h))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by records
/// * `.json` – `[{ "number": 1, "mod3": 1, ... }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Load a dataset, substituting an empty one on any error.
pub fn load_dataset(path: &Path) -> Dataset {
    load_logged(path).unwrap_or_default()
}

/// [`load_file`] with the outcome logged.
fn load_logged(path: &Path) -> Result<Dataset> {
    let result = load_file(path);
    match &result {
        Ok(dataset) => log::info!(
            "Loaded {} rows from {} with filter columns {:?}",
            dataset.len(),
            path.display(),
            dataset.filter_columns
        ),
        Err(e) => log::error!("Failed to load {}: {e:#}", path.display()),
    }
    result
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

/// A dataset load running on a worker thread.
#[derive(Debug)]
pub struct PendingLoad {
    pub path: PathBuf,
    rx: Receiver<Result<Dataset>>,
}

/// Start loading `path` in the background.
pub fn spawn_load(path: PathBuf) -> PendingLoad {
    let (tx, rx) = mpsc::channel();
    let worker_path = path.clone();
    thread::spawn(move || {
        let result = load_logged(&worker_path);
        // The receiver is gone if the app shut down mid-load.
        let _ = tx.send(result);
    });
    PendingLoad { path, rx }
}

impl PendingLoad {
    /// The outcome of the load, once available.
    pub fn poll(&self) -> Option<Result<Dataset>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(anyhow!(
                "loader for {} exited without a result",
                self.path.display()
            ))),
        }
    }

    /// Block until the load finishes.
    pub fn wait(self) -> Result<Dataset> {
        self.rx
            .recv()
            .context("loader thread exited without a result")?
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per line.
/// Blank lines are skipped; short records leave trailing cells empty.
fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

fn read_csv<R: std::io::Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                let value = record.get(col_idx).map_or(CellValue::Empty, CellValue::parse);
                (name.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(Dataset::new(headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "number": 1, "mod3": 1, "mod4": 1 },
///   ...
/// ]
/// ```
///
/// Headers are the union of all record keys, first record's keys first.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Row> = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        rows.push(obj.iter().map(|(k, v)| (k.clone(), json_to_cell(v))).collect());
    }

    Ok(Dataset::new(headers, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .map_or_else(|| CellValue::Text(n.to_string()), CellValue::Number),
        JsonValue::String(s) => CellValue::parse(s),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
