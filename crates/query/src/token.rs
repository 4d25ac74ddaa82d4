//! Tokens produced by the [`Lexer`](crate::lexer::Lexer).
use std::fmt;

/// The kind of a token, carrying its payload where it has one.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare identifier (`name`, `SELECT`, `like`, `true`).
    Identifier(String),
    Integer(i64),
    /// An integer literal too large for `i64`.
    Unsigned(u64),
    Float(f64),
    /// A quoted string with its escapes already resolved.
    String(String),
    /// One of `==`, `!=`, `<`, `<=`, `>`, `>=`.
    Operator(String),
    /// `$` or `*`.
    Root,
    Dot,
    DotDot,
    BracketOpen,
    BracketClose,
    Comma,
    /// `:` inside a slice.
    RangeSeparator,
    /// A run of whitespace, only emitted while whitespace is significant.
    Separator,
    Eof,
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Returns the identifier text if this token is an identifier.
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// True if the token is the identifier `keyword`, ignoring ASCII case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.identifier()
            .is_some_and(|name| name.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Integer(n) => write!(f, "integer {}", n),
            TokenKind::Unsigned(n) => write!(f, "integer {}", n),
            TokenKind::Float(n) => write!(f, "float {}", n),
            TokenKind::String(s) => {
                let shown: String = s.chars().take(32).collect();
                write!(f, "string '{}'", shown)
            }
            TokenKind::Operator(op) => write!(f, "operator '{}'", op),
            TokenKind::Root => write!(f, "'$'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::DotDot => write!(f, "'..'"),
            TokenKind::BracketOpen => write!(f, "'['"),
            TokenKind::BracketClose => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::RangeSeparator => write!(f, "':'"),
            TokenKind::Separator => write!(f, "whitespace"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)
    }
}
