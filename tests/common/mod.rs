pub mod fixtures;

use jsonsql::{Document, Error};
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Route `log` output through the test harness; safe to call repeatedly.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Run `query` against `data` and return the flattened values.
pub fn run_query(data: &Value, query: &str) -> Result<Vec<Value>, Error> {
    init_logger();
    Ok(Document::new(data.clone()).query(query)?.into_values())
}

/// Write `data` to a temporary `.json` file that lives as long as the handle.
pub fn write_json_file(data: &Value) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    serde_json::to_writer(&mut file, data)?;
    file.flush()?;
    Ok(file)
}
