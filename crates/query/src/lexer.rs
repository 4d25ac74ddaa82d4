//! A hand-driven lexer for the query language.
//!
//! The lexer is stateful about whitespace: the parser pushes and pops
//! "skip whitespace" flags around sub-grammars. While the top flag is false a
//! run of whitespace is reported as a [`TokenKind::Separator`], which is how
//! `a . b` gets rejected while `[ 1 : 2 ]` is accepted. Multi-character tokens
//! are recognized with small `nom` combinators.
use crate::error::QueryError;
use crate::token::{Token, TokenKind};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{opt, recognize},
    sequence::{pair, preceded},
};

pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    skip_whitespace: Vec<bool>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            skip_whitespace: Vec::new(),
        }
    }

    /// Pushes a whitespace policy and returns the one that was in effect.
    pub fn push_skip_whitespace(&mut self, skip: bool) -> bool {
        let previous = self.skips_whitespace();
        self.skip_whitespace.push(skip);
        previous
    }

    /// Pops the current whitespace policy. An empty stack behaves as `true`.
    pub fn pop_skip_whitespace(&mut self) -> bool {
        self.skip_whitespace.pop().unwrap_or(true)
    }

    pub fn skips_whitespace(&self) -> bool {
        self.skip_whitespace.last().copied().unwrap_or(true)
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    pub fn next_token(&mut self) -> Result<Token, QueryError> {
        if self.skips_whitespace() {
            let rest = self.rest();
            self.offset += rest.len() - rest.trim_start().len();
        }

        let start = self.offset;
        let rest = self.rest();
        let Some(c) = rest.chars().next() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        let single = match c {
            '$' | '*' => Some(TokenKind::Root),
            '[' => Some(TokenKind::BracketOpen),
            ']' => Some(TokenKind::BracketClose),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::RangeSeparator),
            '.' if rest.starts_with("..") => Some(TokenKind::DotDot),
            '.' => Some(TokenKind::Dot),
            _ => None,
        };
        if let Some(kind) = single {
            self.offset += if kind == TokenKind::DotDot { 2 } else { 1 };
            return Ok(Token::new(kind, start));
        }

        let (kind, consumed) = match c {
            '<' | '>' | '=' | '!' => lex_operator(rest, start)?,
            c if c.is_whitespace() => {
                let run = whitespace(rest).map_or(c.len_utf8(), |(_, run)| run.len());
                (TokenKind::Separator, run)
            }
            '\'' | '"' => lex_quoted_string(rest, start)?,
            c if c.is_ascii_digit() => lex_number(rest, start)?,
            c if c.is_alphabetic() || c == '_' => {
                let (_, name) = identifier(rest)
                    .map_err(|_| QueryError::lex(start, "Invalid identifier"))?;
                (TokenKind::Identifier(name.to_string()), name.len())
            }
            other => {
                return Err(QueryError::lex(
                    start,
                    format!("Invalid character: '{}'", other),
                ));
            }
        };

        self.offset += consumed;
        Ok(Token::new(kind, start))
    }
}

// --- Recognizers ---

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_whitespace).parse(input)
}

fn operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag("=="),
        tag("!="),
        tag("<="),
        tag(">="),
        tag("<"),
        tag(">"),
    ))
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn fraction(input: &str) -> IResult<&str, &str> {
    recognize(preceded(char('.'), digit1)).parse(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize((one_of("eE"), opt(one_of("+-")), digit1)).parse(input)
}

fn lex_operator(input: &str, position: usize) -> Result<(TokenKind, usize), QueryError> {
    match operator(input) {
        Ok((_, op)) => Ok((TokenKind::Operator(op.to_string()), op.len())),
        Err(_) => {
            let shown: String = input.chars().take(1).collect();
            Err(QueryError::lex(
                position,
                format!("Invalid operator: '{}'", shown),
            ))
        }
    }
}

/// Numbers are a digit run, optionally followed by a fraction (`.` and at
/// least one digit) and then an exponent. `1.` and `1.5e+` are errors.
fn lex_number(input: &str, position: usize) -> Result<(TokenKind, usize), QueryError> {
    let expected = |_| QueryError::lex(position, "Number expected");

    let (mut rest, _) = digit1::<_, nom::error::Error<&str>>(input).map_err(expected)?;
    let is_float = rest.starts_with('.');
    if is_float {
        (rest, _) = fraction(rest).map_err(expected)?;
        if rest.starts_with(['e', 'E']) {
            (rest, _) = exponent(rest).map_err(expected)?;
        }
    }

    let text = &input[..input.len() - rest.len()];
    let kind = if is_float {
        let value = text
            .parse::<f64>()
            .map_err(|e| QueryError::lex(position, format!("Invalid number '{}': {}", text, e)))?;
        TokenKind::Float(value)
    } else if let Ok(value) = text.parse::<i64>() {
        TokenKind::Integer(value)
    } else {
        // Above i64::MAX: still a valid literal while it fits in a u64.
        let value = text
            .parse::<u64>()
            .map_err(|e| QueryError::lex(position, format!("Invalid number '{}': {}", text, e)))?;
        TokenKind::Unsigned(value)
    };
    Ok((kind, text.len()))
}

/// A string quoted with `'` or `"`. A backslash escapes the next character.
fn lex_quoted_string(input: &str, position: usize) -> Result<(TokenKind, usize), QueryError> {
    let mut chars = input.char_indices();
    let Some((_, quote)) = chars.next() else {
        return Err(QueryError::lex(position, "Quote expected"));
    };

    let mut value = String::new();
    while let Some((index, c)) = chars.next() {
        if c == quote {
            return Ok((TokenKind::String(value), index + c.len_utf8()));
        }
        if c == '\\' {
            match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, escaped)) => value.push(escaped),
                None => break,
            }
        } else {
            value.push(c);
        }
    }

    Err(QueryError::lex(position, "Closing quote expected"))
}
