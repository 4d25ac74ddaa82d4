// src/error.rs
use jsonsql_query::QueryError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`Document`](crate::Document) and the command line.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
