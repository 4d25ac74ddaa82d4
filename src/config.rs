use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;

/// How query results are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    /// Indented with four spaces, one value per line.
    Pretty,
    /// A single line with no whitespace.
    Compact,
}

impl OutputFormat {
    pub fn write<W: Write>(self, writer: W, value: &Value) -> Result<(), serde_json::Error> {
        match self {
            OutputFormat::Pretty => {
                let formatter = PrettyFormatter::with_indent(b"    ");
                let mut serializer = Serializer::with_formatter(writer, formatter);
                value.serialize(&mut serializer)
            }
            OutputFormat::Compact => serde_json::to_writer(writer, value),
        }
    }

    pub fn render(self, value: &Value) -> Result<String, serde_json::Error> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, value)?;
        // serde_json only emits UTF-8.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
