//! Defines the parsed structures of the query language: selector chains,
//! filters and the top-level query.
use serde_json::Value;
use std::fmt;
use std::ops::Add;

/// A single step in a selector chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Ignores the input and continues with a literal value.
    Constant(Value),
    /// An object key (`.name` or `['name']`).
    Field(String),
    /// An array element (`[0]`). Negative indices count from the end.
    Index(i64),
    /// An array slice (`[1:3]`, `[2:]`, `[]`), with Python slice bounds.
    Slice { start: Option<i64>, end: Option<i64> },
    /// Recursive descent (`..`): matches the rest of the chain at any depth.
    Explorer,
}

/// A chain of segments applied left to right.
///
/// The empty chain is the identity selector (`$`). Chains are built once by
/// the parser and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    segments: Vec<Segment>,
}

impl Selector {
    /// The identity selector, `$`.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::from_segments(vec![Segment::Constant(value.into())])
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::from_segments(vec![Segment::Field(name.into())])
    }

    /// Appends a segment to the tail of the chain.
    pub fn then(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_identity(&self) -> bool {
        self.segments.is_empty()
    }

    /// The field name this chain ends with, if its last segment is a field.
    pub fn label(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Field(name)) => Some(name),
            _ => None,
        }
    }
}

impl Add for Selector {
    type Output = Selector;

    /// Appends `rhs` to the tail of `self`. Appending the identity is a no-op.
    fn add(mut self, rhs: Selector) -> Selector {
        self.segments.extend(rhs.segments);
        self
    }
}

/// Comparison operators of the `WHERE` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Like,
}

impl Operator {
    /// Resolves an operator token or keyword (`in`/`like` are case-insensitive).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "==" => Operator::Equals,
            "!=" => Operator::NotEquals,
            "<" => Operator::LessThan,
            "<=" => Operator::LessThanOrEqual,
            ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterThanOrEqual,
            s if s.eq_ignore_ascii_case("in") => Operator::In,
            s if s.eq_ignore_ascii_case("like") => Operator::Like,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::In => "in",
            Operator::Like => "like",
        }
    }
}

/// A predicate over one element of a result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every element.
    #[default]
    Always,
    /// Compares what two selectors match on the element.
    Compare {
        lhs: Selector,
        op: Operator,
        rhs: Selector,
    },
    /// True if the selector matches at least one value.
    KeyExists(Selector),
}

/// A parsed `SELECT … FROM … WHERE …` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub select: Vec<Selector>,
    pub from: Selector,
    pub filter: Filter,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            select: vec![Selector::identity()],
            from: Selector::identity(),
            filter: Filter::Always,
        }
    }
}

// --- Display ---

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

fn write_constant(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) => write_quoted(f, s),
        Value::Number(n) if n.is_f64() => {
            // The lexer only reads an exponent after a fraction.
            let text = n.to_string();
            match text.find(['e', 'E']) {
                Some(at) if !text[..at].contains('.') => {
                    write!(f, "{}.0{}", &text[..at], &text[at..])
                }
                _ => f.write_str(&text),
            }
        }
        other => write!(f, "{}", other),
    }
}

fn write_bound(f: &mut fmt::Formatter<'_>, bound: Option<i64>) -> fmt::Result {
    match bound {
        Some(n) => write!(f, "{}", n),
        None => Ok(()),
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Constant(value) => write_constant(f, value),
            Segment::Field(name) if is_identifier(name) => write!(f, ".{}", name),
            Segment::Field(name) => {
                f.write_str("[")?;
                write_quoted(f, name)?;
                f.write_str("]")
            }
            Segment::Index(i) => write!(f, "[{}]", i),
            Segment::Slice {
                start: None,
                end: None,
            } => f.write_str("[]"),
            Segment::Slice { start, end } => {
                f.write_str("[")?;
                write_bound(f, *start)?;
                f.write_str(":")?;
                write_bound(f, *end)?;
                f.write_str("]")
            }
            Segment::Explorer => f.write_str(".."),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        let mut after_explorer = false;
        for segment in &self.segments {
            match segment {
                // `..name`, not `...name`
                Segment::Field(name) if after_explorer && is_identifier(name) => {
                    f.write_str(name)?
                }
                other => write!(f, "{}", other)?,
            }
            after_explorer = matches!(segment, Segment::Explorer);
        }
        Ok(())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Always => f.write_str("$"),
            Filter::Compare { lhs, op, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Filter::KeyExists(lhs) => write!(f, "{}", lhs),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        for (i, selector) in self.select.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", selector)?;
        }
        write!(f, " FROM {} WHERE {}", self.from, self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_appends_to_tail() {
        let chain = Selector::field("a") + Selector::field("b").then(Segment::Index(0));
        assert_eq!(
            chain.segments(),
            &[
                Segment::Field("a".into()),
                Segment::Field("b".into()),
                Segment::Index(0)
            ]
        );
    }

    #[test]
    fn test_add_identity_is_noop() {
        let chain = Selector::field("a") + Selector::identity();
        assert_eq!(chain, Selector::field("a"));
        let chain = Selector::identity() + Selector::field("a");
        assert_eq!(chain, Selector::field("a"));
    }

    #[test]
    fn test_label() {
        assert_eq!(Selector::field("a").then(Segment::Field("b".into())).label(), Some("b"));
        assert_eq!(Selector::field("a").then(Segment::Index(1)).label(), None);
        assert_eq!(Selector::identity().label(), None);
    }

    #[test]
    fn test_display_selectors() {
        let chain = Selector::field("items")
            .then(Segment::Slice { start: Some(1), end: None })
            .then(Segment::Explorer)
            .then(Segment::Field("id".into()))
            .then(Segment::Field("two words".into()))
            .then(Segment::Index(2));
        assert_eq!(chain.to_string(), ".items[1:]..id['two words'][2]");
        assert_eq!(Selector::identity().to_string(), "$");
        assert_eq!(
            Selector::from_segments(vec![Segment::Slice { start: None, end: None }]).to_string(),
            "[]"
        );
        assert_eq!(
            Selector::from_segments(vec![Segment::Explorer, Segment::Index(0)]).to_string(),
            "..[0]"
        );
    }

    #[test]
    fn test_display_constants() {
        assert_eq!(Selector::constant("it's").to_string(), r"'it\'s'");
        assert_eq!(Selector::constant(3).to_string(), "3");
        assert_eq!(Selector::constant(2.5).to_string(), "2.5");
        assert_eq!(Selector::constant(json!(null)).to_string(), "null");
        assert_eq!(Selector::constant(true).to_string(), "true");
    }

    #[test]
    fn test_operator_symbols() {
        for op in [
            Operator::Equals,
            Operator::NotEquals,
            Operator::LessThan,
            Operator::LessThanOrEqual,
            Operator::GreaterThan,
            Operator::GreaterThanOrEqual,
            Operator::In,
            Operator::Like,
        ] {
            assert_eq!(Operator::from_symbol(op.as_str()), Some(op));
        }
        assert_eq!(Operator::from_symbol("LIKE"), Some(Operator::Like));
        assert_eq!(Operator::from_symbol("="), None);
    }

    #[test]
    fn test_display_query() {
        let query = Query {
            select: vec![Selector::field("id"), Selector::field("tag")],
            from: Selector::field("items"),
            filter: Filter::Compare {
                lhs: Selector::field("tag"),
                op: Operator::Like,
                rhs: Selector::constant("a%"),
            },
        };
        assert_eq!(
            query.to_string(),
            "SELECT .id, .tag FROM .items WHERE .tag like 'a%'"
        );
        assert_eq!(Query::default().to_string(), "SELECT $ FROM $ WHERE $");
    }
}
