//! Query JSON documents with a small SQL-flavored language.
//!
//! The language itself lives in [`jsonsql_query`]; this crate adds the
//! [`Document`] wrapper, output formatting and the `jsonsql` command line.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;

pub use config::OutputFormat;
pub use document::Document;
pub use error::Error;

// Re-export the query language.
pub use jsonsql_query::{
    Filter, Operator, Query, QueryError, ResultSet, Segment, Selector, evaluate, parse_predicate,
    parse_query, parse_selector_path, parse_selectors,
};
