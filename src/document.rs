use crate::error::Error;
use jsonsql_query::{Query, ResultSet, Selector, parse_query, parse_selector_path};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// A decoded JSON document that queries run against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        let root: Value = serde_json::from_str(text).inspect_err(|e| {
            log::error!("Failed to decode JSON document: {}", e);
        })?;
        Ok(Self::new(root))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let root: Value = serde_json::from_reader(reader).inspect_err(|e| {
            log::error!("Failed to decode JSON document: {}", e);
        })?;
        Ok(Self::new(root))
    }

    /// Reads and decodes the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        log::debug!("Loaded {} bytes from {}", text.len(), path.display());
        Self::from_json(&text)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The values `selector` matches in the document.
    pub fn from(&self, selector: &Selector) -> ResultSet {
        selector.select(&self.root)
    }

    pub fn from_path(&self, path: &str) -> Result<ResultSet, Error> {
        let selector = parse_selector_path(path)?;
        Ok(self.from(&selector))
    }

    pub fn query(&self, text: &str) -> Result<ResultSet, Error> {
        let query = parse_query(text)?;
        self.execute(&query)
    }

    pub fn execute(&self, query: &Query) -> Result<ResultSet, Error> {
        Ok(query.evaluate(&self.root)?)
    }
}
