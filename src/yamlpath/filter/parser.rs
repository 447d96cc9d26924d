//! Recursive-descent parser for filter expressions.
//!
//! Operates on the run of lexemes collected between a filter's opening
//! `[?(` and its matching `)]`. Precedence, lowest first: `||`, `&&`, `!`,
//! comparison, primary. Sub-paths after `@`/`$` are compiled with the
//! ordinary path compiler; regexes compile here, so a bad pattern is a
//! compile-time error.

use crate::yamlpath::error::PathError;
use crate::yamlpath::filter::ast::{CompareOp, FilterExpr, Literal, QueryOrigin};
use crate::yamlpath::lexer::{Lexeme, LexemeKind};
use crate::yamlpath::segment::Segment;
use regex::Regex;

/// Parses a collected filter lexeme run into an expression tree.
pub(crate) fn parse(lexemes: &[Lexeme]) -> Result<FilterExpr, PathError> {
    let mut parser = FilterParser { lexemes, pos: 0 };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(lexeme) => Err(unexpected(lexeme)),
    }
}

struct FilterParser<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
}

impl<'a> FilterParser<'a> {
    fn peek(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn peek_kind(&self) -> Option<LexemeKind> {
        self.peek().map(|lexeme| lexeme.kind)
    }

    fn bump(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.lexemes.get(self.pos);
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn parse_or(&mut self) -> Result<FilterExpr, PathError> {
        let mut left = self.parse_and()?;
        while self.peek_kind() == Some(LexemeKind::FilterOr) {
            self.bump();
            let right = self.parse_and()?;
            left = FilterExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<FilterExpr, PathError> {
        let mut left = self.parse_unary()?;
        while self.peek_kind() == Some(LexemeKind::FilterAnd) {
            self.bump();
            let right = self.parse_unary()?;
            left = FilterExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<FilterExpr, PathError> {
        if self.peek_kind() == Some(LexemeKind::FilterNot) {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(FilterExpr::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<FilterExpr, PathError> {
        if self.peek_kind() == Some(LexemeKind::FilterOpenParen) {
            self.bump();
            let inner = self.parse_or()?;
            match self.peek_kind() {
                Some(LexemeKind::FilterCloseParen) => {
                    self.bump();
                    return Ok(FilterExpr::Group(Box::new(inner)));
                }
                _ => {
                    return Err(PathError::InvalidFilter {
                        message: "missing ')' in filter".to_string(),
                    })
                }
            }
        }
        let left = self.parse_term()?;
        let op = match self.peek_kind() {
            Some(LexemeKind::FilterEq) => CompareOp::Eq,
            Some(LexemeKind::FilterNe) => CompareOp::Ne,
            Some(LexemeKind::FilterLt) => CompareOp::Lt,
            Some(LexemeKind::FilterLe) => CompareOp::Le,
            Some(LexemeKind::FilterGt) => CompareOp::Gt,
            Some(LexemeKind::FilterGe) => CompareOp::Ge,
            Some(LexemeKind::FilterMatch) => {
                self.bump();
                let regex = self.parse_regex()?;
                return Ok(FilterExpr::Comparison {
                    op: CompareOp::Matches,
                    left: Box::new(left),
                    right: Box::new(FilterExpr::Literal(Literal::Regex(regex))),
                });
            }
            _ => return Ok(left),
        };
        self.bump();
        let right = self.parse_term()?;
        Ok(FilterExpr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_term(&mut self) -> Result<FilterExpr, PathError> {
        let Some(lexeme) = self.bump() else {
            return Err(PathError::InvalidFilter {
                message: "expected a term".to_string(),
            });
        };
        match lexeme.kind {
            LexemeKind::FilterInt => {
                let value = lexeme.text.parse::<i64>().map_err(|_| PathError::InvalidFilter {
                    message: format!("integer literal '{}' out of range", lexeme.text),
                })?;
                Ok(FilterExpr::Literal(Literal::Int(value)))
            }
            LexemeKind::FilterFloat => {
                let value = lexeme.text.parse::<f64>().map_err(|_| PathError::InvalidFilter {
                    message: format!("invalid float literal '{}'", lexeme.text),
                })?;
                Ok(FilterExpr::Literal(Literal::Float(value)))
            }
            LexemeKind::FilterString => Ok(FilterExpr::Literal(Literal::Str(unquote(&lexeme.text)))),
            LexemeKind::FilterBool => Ok(FilterExpr::Literal(Literal::Bool(lexeme.text == "true"))),
            LexemeKind::FilterNull => Ok(FilterExpr::Literal(Literal::Null)),
            LexemeKind::FilterRegex => Err(PathError::InvalidFilter {
                message: "regular expression may only appear on the right of '=~'".to_string(),
            }),
            LexemeKind::FilterAt => self.parse_path_query(QueryOrigin::Context),
            LexemeKind::FilterRoot => self.parse_path_query(QueryOrigin::Root),
            _ => Err(unexpected(lexeme)),
        }
    }

    /// Collects the sub-path lexemes following `@`/`$` and compiles them.
    fn parse_path_query(&mut self, origin: QueryOrigin) -> Result<FilterExpr, PathError> {
        let mut sub = Vec::new();
        loop {
            match self.peek_kind() {
                Some(
                    LexemeKind::DotChild
                    | LexemeKind::UndottedChild
                    | LexemeKind::BracketChild
                    | LexemeKind::ArraySubscript
                    | LexemeKind::RecursiveDescent
                    | LexemeKind::PropertyName
                    | LexemeKind::BracketPropertyName
                    | LexemeKind::ArraySubscriptPropertyName,
                ) => {
                    if let Some(lexeme) = self.bump() {
                        sub.push(lexeme.clone());
                    }
                }
                Some(LexemeKind::FilterBegin | LexemeKind::RecursiveFilterBegin) => {
                    self.collect_nested_filter(&mut sub)?;
                }
                _ => break,
            }
        }
        let mut segments = crate::yamlpath::compile(&sub)?;
        if origin == QueryOrigin::Root {
            segments.insert(0, Segment::Root);
        }
        Ok(FilterExpr::PathQuery { origin, segments })
    }

    /// Copies a nested `[?( ... )]` run, begin and end included.
    fn collect_nested_filter(&mut self, sub: &mut Vec<Lexeme>) -> Result<(), PathError> {
        let mut depth = 0usize;
        loop {
            let Some(lexeme) = self.bump() else {
                return Err(PathError::InvalidFilter {
                    message: "missing end of filter".to_string(),
                });
            };
            match lexeme.kind {
                LexemeKind::FilterBegin | LexemeKind::RecursiveFilterBegin => depth += 1,
                LexemeKind::FilterEnd => depth -= 1,
                _ => {}
            }
            sub.push(lexeme.clone());
            if depth == 0 {
                return Ok(());
            }
        }
    }

    fn parse_regex(&mut self) -> Result<Regex, PathError> {
        let Some(lexeme) = self.bump() else {
            return Err(PathError::InvalidFilter {
                message: "expected a regular expression after '=~'".to_string(),
            });
        };
        if lexeme.kind != LexemeKind::FilterRegex {
            return Err(PathError::InvalidFilter {
                message: format!("expected a regular expression after '=~', found '{}'", lexeme.text),
            });
        }
        let pattern = lexeme.text[1..lexeme.text.len() - 1].replace("\\/", "/");
        Regex::new(&pattern).map_err(|err| PathError::InvalidRegex {
            pattern: pattern.clone(),
            message: err.to_string(),
        })
    }
}

fn unexpected(lexeme: &Lexeme) -> PathError {
    PathError::UnexpectedLexeme {
        position: lexeme.offset,
        found: lexeme.text.clone(),
    }
}

/// Strips the quotes from a single-quoted string lexeme and unescapes
/// `\'`, `\"`, and `\\`; other backslashes pass through.
fn unquote(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&escaped @ ('\'' | '"' | '\\')) => {
                    chars.next();
                    out.push(escaped);
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
