use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Lex error at offset {position}: {message}")]
    Lex { position: usize, message: String },

    #[error("Parse error at offset {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Merge error: {0}")]
    Merge(String),
}

impl QueryError {
    pub fn lex(position: usize, message: impl Into<String>) -> Self {
        Self::Lex {
            position,
            message: message.into(),
        }
    }

    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    pub fn merge(message: impl Into<String>) -> Self {
        Self::Merge(message.into())
    }
}
