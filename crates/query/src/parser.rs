//! A recursive-descent parser over the [`Lexer`] token stream.
//!
//! Every entry point builds a fresh [`Parser`], so parsing holds no shared
//! state between calls.
use crate::ast::{Filter, Operator, Query, Segment, Selector};
use crate::error::QueryError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use serde_json::{Number, Value};

// --- Main Public Parsers ---

/// Parses a full `SELECT <selectors> [FROM <selector>] [WHERE <comparison>]`
/// query. Missing clauses default to `$`; an empty query selects the root.
pub fn parse_query(input: &str) -> Result<Query, QueryError> {
    let mut parser = Parser::new(input)?;
    let query = parser.query()?;
    parser.expect_end()?;
    Ok(query)
}

/// Parses a single selector path such as `.items[1:]..name`.
pub fn parse_selector_path(input: &str) -> Result<Selector, QueryError> {
    let mut parser = Parser::new(input)?;
    let selector = parser.selector()?;
    parser.expect_end()?;
    Ok(selector)
}

/// Parses a comma-separated list of selectors.
pub fn parse_selectors(input: &str) -> Result<Vec<Selector>, QueryError> {
    let mut parser = Parser::new(input)?;
    let selectors = parser.selectors()?;
    parser.expect_end()?;
    Ok(selectors)
}

/// Parses a predicate such as `.id == 2`, `.tag like 'a%'` or `.key`.
pub fn parse_predicate(input: &str) -> Result<Filter, QueryError> {
    let mut parser = Parser::new(input)?;
    let filter = parser.comparison()?;
    parser.expect_end()?;
    Ok(filter)
}

// --- Parser ---

struct Parser<'a> {
    lexer: Lexer<'a>,
    token: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, QueryError> {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token()?;
        Ok(Self { lexer, token })
    }

    fn advance(&mut self) -> Result<(), QueryError> {
        self.token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> QueryError {
        QueryError::parse(
            self.token.position,
            format!("{} expected, found {}", expected, self.token.kind),
        )
    }

    fn expect_end(&self) -> Result<(), QueryError> {
        match self.token.kind {
            TokenKind::Eof => Ok(()),
            _ => Err(QueryError::parse(
                self.token.position,
                format!("Unexpected token: {}", self.token.kind),
            )),
        }
    }

    fn query(&mut self) -> Result<Query, QueryError> {
        let mut query = Query::default();
        if !self.token.is_keyword("select") {
            return Ok(query);
        }
        self.advance()?;
        query.select = self.selectors()?;

        if self.token.is_keyword("from") {
            self.advance()?;
            query.from = self.selector()?;
        }
        if self.token.is_keyword("where") {
            self.advance()?;
            query.filter = self.comparison()?;
        }
        Ok(query)
    }

    fn selectors(&mut self) -> Result<Vec<Selector>, QueryError> {
        let mut selectors = vec![self.selector()?];
        while self.token.kind == TokenKind::Comma {
            self.advance()?;
            selectors.push(self.selector()?);
        }
        Ok(selectors)
    }

    fn comparison(&mut self) -> Result<Filter, QueryError> {
        let lhs = self.selector()?;
        let op = match &self.token.kind {
            TokenKind::Operator(symbol) => Some(Operator::from_symbol(symbol).ok_or_else(|| {
                QueryError::parse(self.token.position, format!("Invalid operator: {}", symbol))
            })?),
            TokenKind::Identifier(word) => Operator::from_symbol(word)
                .filter(|op| matches!(op, Operator::In | Operator::Like)),
            _ => None,
        };

        let Some(op) = op else {
            if lhs.is_identity() {
                return Ok(Filter::Always);
            }
            return Ok(Filter::KeyExists(lhs));
        };
        self.advance()?;
        let rhs = self.selector()?;
        Ok(Filter::Compare { lhs, op, rhs })
    }

    /// Whitespace is significant inside a bare selector, so `a . b` fails.
    fn selector(&mut self) -> Result<Selector, QueryError> {
        self.lexer.push_skip_whitespace(false);
        let selector = self.selector_head();
        self.lexer.pop_skip_whitespace();
        let selector = selector?;

        if self.token.kind == TokenKind::Separator {
            self.advance()?;
        }
        Ok(selector)
    }

    fn selector_head(&mut self) -> Result<Selector, QueryError> {
        let constant = match &self.token.kind {
            TokenKind::Root => {
                self.advance()?;
                return self.selector_rest();
            }
            TokenKind::Dot | TokenKind::DotDot | TokenKind::BracketOpen => {
                return self.selector_rest();
            }
            TokenKind::Identifier(name) => match keyword_literal(name) {
                Some(value) => value,
                None => {
                    let head = Selector::field(name.clone());
                    self.advance()?;
                    return Ok(head + self.selector_rest()?);
                }
            },
            TokenKind::String(s) => Value::String(s.clone()),
            TokenKind::Integer(n) => Value::from(*n),
            TokenKind::Unsigned(n) => Value::from(*n),
            TokenKind::Float(n) => Number::from_f64(*n).map(Value::Number).ok_or_else(|| {
                QueryError::parse(self.token.position, format!("Number out of range: {}", n))
            })?,
            _ => return Err(self.unexpected("Selector")),
        };
        self.advance()?;
        Ok(Selector::constant(constant))
    }

    fn selector_rest(&mut self) -> Result<Selector, QueryError> {
        let mut selector = Selector::identity();
        loop {
            match self.token.kind {
                TokenKind::Dot => {
                    self.advance()?;
                    let name = match &self.token.kind {
                        TokenKind::Identifier(name) => name.clone(),
                        _ => return Err(self.unexpected("Identifier")),
                    };
                    self.advance()?;
                    selector = selector.then(Segment::Field(name));
                }
                TokenKind::BracketOpen => {
                    selector = selector.then(self.bracket()?);
                }
                TokenKind::DotDot => {
                    self.advance()?;
                    selector = selector.then(Segment::Explorer);
                    match &self.token.kind {
                        TokenKind::Identifier(name) => {
                            let segment = Segment::Field(name.clone());
                            self.advance()?;
                            selector = selector.then(segment);
                        }
                        TokenKind::BracketOpen => {
                            selector = selector.then(self.bracket()?);
                        }
                        _ => return Err(self.unexpected("Identifier or '['")),
                    }
                }
                _ => return Ok(selector),
            }
        }
    }

    /// Parses `[ ... ]`. Whitespace is skipped inside the brackets; the token
    /// following `]` is read under the enclosing policy again.
    fn bracket(&mut self) -> Result<Segment, QueryError> {
        if self.token.kind != TokenKind::BracketOpen {
            return Err(self.unexpected("'['"));
        }
        self.lexer.push_skip_whitespace(true);
        let segment = self.bracket_contents();
        self.lexer.pop_skip_whitespace();
        let segment = segment?;
        self.advance()?;
        Ok(segment)
    }

    fn bracket_contents(&mut self) -> Result<Segment, QueryError> {
        self.advance()?;
        let segment = match &self.token.kind {
            TokenKind::String(name) => {
                let segment = Segment::Field(name.clone());
                self.advance()?;
                segment
            }
            TokenKind::Integer(_) | TokenKind::RangeSeparator | TokenKind::BracketClose => {
                self.index_or_slice()?
            }
            _ => return Err(self.unexpected("String, index or slice")),
        };

        if self.token.kind != TokenKind::BracketClose {
            return Err(self.unexpected("']'"));
        }
        Ok(segment)
    }

    fn index_or_slice(&mut self) -> Result<Segment, QueryError> {
        let start = match self.token.kind {
            TokenKind::Integer(n) => {
                self.advance()?;
                Some(n)
            }
            _ => None,
        };

        if self.token.kind != TokenKind::RangeSeparator {
            return Ok(match start {
                Some(index) => Segment::Index(index),
                None => Segment::Slice {
                    start: None,
                    end: None,
                },
            });
        }

        self.advance()?;
        let end = match self.token.kind {
            TokenKind::Integer(n) => {
                self.advance()?;
                Some(n)
            }
            _ => None,
        };
        Ok(Segment::Slice { start, end })
    }
}

fn keyword_literal(name: &str) -> Option<Value> {
    match name {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str) -> Segment {
        Segment::Field(name.to_string())
    }

    #[test]
    fn test_parse_simple_path() {
        let selector = parse_selector_path(".customer.name").unwrap();
        assert_eq!(selector.segments(), &[field("customer"), field("name")]);

        let selector = parse_selector_path("customer.name").unwrap();
        assert_eq!(selector.segments(), &[field("customer"), field("name")]);

        let selector = parse_selector_path("$.customer").unwrap();
        assert_eq!(selector.segments(), &[field("customer")]);
    }

    #[test]
    fn test_parse_root_is_identity() {
        assert!(parse_selector_path("$").unwrap().is_identity());
        assert!(parse_selector_path("*").unwrap().is_identity());
    }

    #[test]
    fn test_parse_brackets() {
        let selector = parse_selector_path("orders[1]['the id'][2:][:3][1:2][:][]").unwrap();
        assert_eq!(
            selector.segments(),
            &[
                field("orders"),
                Segment::Index(1),
                field("the id"),
                Segment::Slice { start: Some(2), end: None },
                Segment::Slice { start: None, end: Some(3) },
                Segment::Slice { start: Some(1), end: Some(2) },
                Segment::Slice { start: None, end: None },
                Segment::Slice { start: None, end: None },
            ]
        );
    }

    #[test]
    fn test_whitespace_allowed_inside_brackets() {
        let selector = parse_selector_path("a[ 1 : 2 ]").unwrap();
        assert_eq!(
            selector.segments(),
            &[field("a"), Segment::Slice { start: Some(1), end: Some(2) }]
        );
    }

    #[test]
    fn test_whitespace_rejected_inside_path() {
        assert!(parse_selector_path("a . b").is_err());
        assert!(parse_selector_path("a .b").is_err());
        assert!(parse_selector_path("a[0] .b").is_err());
    }

    #[test]
    fn test_parse_explorer() {
        let selector = parse_selector_path("..name").unwrap();
        assert_eq!(selector.segments(), &[Segment::Explorer, field("name")]);

        let selector = parse_selector_path("$.a..[0].b").unwrap();
        assert_eq!(
            selector.segments(),
            &[field("a"), Segment::Explorer, Segment::Index(0), field("b")]
        );

        assert!(parse_selector_path("..").is_err());
        assert!(parse_selector_path("a..").is_err());
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse_selector_path("'x'").unwrap(), Selector::constant("x"));
        assert_eq!(parse_selector_path("42").unwrap(), Selector::constant(42));
        assert_eq!(
            parse_selector_path("18446744073709551615").unwrap(),
            Selector::constant(u64::MAX)
        );
        assert_eq!(parse_selector_path("1.5").unwrap(), Selector::constant(1.5));
        assert_eq!(parse_selector_path("true").unwrap(), Selector::constant(true));
        assert_eq!(parse_selector_path("null").unwrap(), Selector::constant(json!(null)));
    }

    #[test]
    fn test_keyword_is_not_a_head_field() {
        let selector = parse_selector_path(".true").unwrap();
        assert_eq!(selector.segments(), &[field("true")]);
        assert!(parse_selector_path("true.x").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_selector_path("a[1"),
            Err(QueryError::Parse { .. })
        ));
        assert!(matches!(
            parse_selector_path("a.[1]"),
            Err(QueryError::Parse { position: 2, .. })
        ));
        assert!(matches!(
            parse_selector_path("a[.b]"),
            Err(QueryError::Parse { .. })
        ));
        assert!(matches!(parse_selector_path(""), Err(QueryError::Parse { .. })));
        assert!(matches!(parse_selector_path("a#"), Err(QueryError::Lex { .. })));
    }

    #[test]
    fn test_parse_selectors_list() {
        let selectors = parse_selectors(".id, .tag,name").unwrap();
        assert_eq!(
            selectors,
            vec![Selector::field("id"), Selector::field("tag"), Selector::field("name")]
        );
    }

    #[test]
    fn test_parse_predicate_compare() {
        let filter = parse_predicate(".id==2").unwrap();
        assert_eq!(
            filter,
            Filter::Compare {
                lhs: Selector::field("id"),
                op: Operator::Equals,
                rhs: Selector::constant(2),
            }
        );

        let filter = parse_predicate(".tag LIKE 'a%'").unwrap();
        assert!(matches!(filter, Filter::Compare { op: Operator::Like, .. }));

        let filter = parse_predicate(".tags in .allowed").unwrap();
        assert!(matches!(filter, Filter::Compare { op: Operator::In, .. }));

        let filter = parse_predicate(".price >= 10.5").unwrap();
        assert!(matches!(
            filter,
            Filter::Compare { op: Operator::GreaterThanOrEqual, .. }
        ));
    }

    #[test]
    fn test_parse_predicate_key_exists() {
        assert_eq!(
            parse_predicate(".name").unwrap(),
            Filter::KeyExists(Selector::field("name"))
        );
        assert_eq!(parse_predicate("$").unwrap(), Filter::Always);
    }

    #[test]
    fn test_parse_predicate_errors() {
        assert!(parse_predicate(".a = 1").is_err());
        assert!(parse_predicate(".a == ").is_err());
        assert!(parse_predicate(".a == 1 2").is_err());
    }

    #[test]
    fn test_parse_full_query() {
        let query = parse_query("SELECT .tag FROM .items WHERE .id==2").unwrap();
        assert_eq!(query.select, vec![Selector::field("tag")]);
        assert_eq!(query.from, Selector::field("items"));
        assert_eq!(
            query.filter,
            Filter::Compare {
                lhs: Selector::field("id"),
                op: Operator::Equals,
                rhs: Selector::constant(2),
            }
        );
    }

    #[test]
    fn test_parse_query_keywords_are_case_insensitive() {
        let query = parse_query("select .id, .tag from items where .tag like 'a%'").unwrap();
        assert_eq!(query.select.len(), 2);
        assert_eq!(query.from, Selector::field("items"));
    }

    #[test]
    fn test_parse_query_defaults() {
        assert_eq!(parse_query("").unwrap(), Query::default());
        assert_eq!(parse_query("SELECT *").unwrap(), Query::default());
        let query = parse_query("SELECT * WHERE .a").unwrap();
        assert_eq!(query.from, Selector::identity());
        assert_eq!(query.filter, Filter::KeyExists(Selector::field("a")));
    }

    #[test]
    fn test_parse_query_trailing_tokens() {
        let err = parse_query("SELECT .a FROM .b .c").unwrap_err();
        assert!(matches!(err, QueryError::Parse { position: 18, .. }));
        assert!(parse_query(".a").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for text in [
            "$",
            ".a.b",
            "..name",
            ".items[1:3].id",
            ".a['x y'][0]",
            ".a..[2][:]",
            "'it\\'s'",
            "3.25",
        ] {
            let selector = parse_selector_path(text).unwrap();
            let reparsed = parse_selector_path(&selector.to_string()).unwrap();
            assert_eq!(selector, reparsed, "round trip of {}", text);
        }

        let query = parse_query("SELECT .id, .tag FROM .items WHERE .tag like 'a%'").unwrap();
        assert_eq!(parse_query(&query.to_string()).unwrap(), query);
    }
}
