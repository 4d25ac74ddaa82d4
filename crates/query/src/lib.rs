//! A SQL-flavored query language over JSON trees.
//!
//! Queries take the form `SELECT <selectors> FROM <selector> WHERE <predicate>`.
//! Selectors are path expressions (`.items[1:]`, `['a b']`, `..name`) that
//! match zero or more values; predicates compare two selectors or test that a
//! selector matches anything at all.
//!
//! ```
//! use jsonsql_query::{evaluate, parse_query};
//! use serde_json::json;
//!
//! let data = json!({"items": [{"id": 1, "tag": "a"}, {"id": 2, "tag": "b"}]});
//! let query = parse_query("SELECT .tag FROM .items WHERE .id == 2").unwrap();
//! assert_eq!(evaluate(&data, &query).unwrap(), vec![json!("b")]);
//! ```

pub mod ast;
pub mod compare;
pub mod error;
mod filter;
pub mod lexer;
pub mod merge;
mod parser;
mod query;
pub mod result;
mod selector;
pub mod token;

// --- Public API ---
pub use ast::{Filter, Operator, Query, Segment, Selector};
pub use compare::compare;
pub use error::QueryError;
pub use merge::merge;
pub use parser::{parse_predicate, parse_query, parse_selector_path, parse_selectors};
pub use query::evaluate;
pub use result::ResultSet;
