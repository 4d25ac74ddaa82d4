//! The `jsonsql` command line.
use crate::config::OutputFormat;
use crate::document::Document;
use crate::error::Error;
use clap::Parser;
use jsonsql_query::parse_query;
use std::io::{Read, Write};

/// Query a JSON document with `SELECT ... FROM ... WHERE ...`.
#[derive(Parser, Debug)]
#[command(name = "jsonsql", version, about, long_about = None)]
pub struct Args {
    /// JSON file to query, or `-` to read standard input
    pub input: String,

    /// Selector for the values to query
    #[arg(short, long, default_value = "$")]
    pub from: String,

    /// Predicate the values must satisfy
    #[arg(short = 'w', long = "where", default_value = "$")]
    pub filter: String,

    /// Comma-separated selectors to output for each value
    #[arg(short, long, default_value = "$")]
    pub select: String,

    /// A full query; overrides --from, --where and --select
    #[arg(short, long)]
    pub query: Option<String>,

    /// Print the result on a single line
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

impl Args {
    /// The query text to run.
    pub fn query_text(&self) -> String {
        match &self.query {
            Some(query) => query.clone(),
            None => format!(
                "SELECT {} FROM {} WHERE {}",
                self.select, self.from, self.filter
            ),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.compact {
            OutputFormat::Compact
        } else {
            OutputFormat::Pretty
        }
    }
}

/// Loads the input, runs the query and writes the result array to `out`.
pub fn run<R: Read, W: Write>(args: &Args, stdin: R, mut out: W) -> Result<(), Error> {
    let document = match args.input.as_str() {
        "-" => Document::from_reader(stdin)?,
        path => Document::open(path)?,
    };

    let text = args.query_text();
    let query = parse_query(&text)?;
    log::debug!("Parsed '{}' as '{}'", text, query);

    let result = document.execute(&query)?;
    args.output_format().write(&mut out, &result.to_value())?;
    writeln!(out)?;
    Ok(())
}
