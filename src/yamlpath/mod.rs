//! Path expression compiler and evaluator.
//!
//! A path expression is compiled once into a [`Path`] and can then be
//! evaluated any number of times against document trees. Compilation is
//! the only place errors can surface; evaluation is total and yields an
//! empty result when nothing matches.
//!
//! # Supported syntax
//!
//! - `$` — document root
//! - `.child`, `['child']`, `['a','b']` — mapping children
//! - `.*`, `[*]` — all children
//! - `[0]`, `[-1]`, `[0:2]`, `[::2]`, `[0,2]` — sequence subscripts
//! - `..`, `..child`, `..*` — recursive descent
//! - `[?(@.price < 10)]` — filters, with `@`/`$` sub-paths, literals,
//!   comparisons, `=~` regex matching, `&&`, `||`, `!`, grouping
//! - `.child~`, `['a','b']~`, `[*]~` — key nodes, final step only
//!
//! # Example
//!
//! ```
//! use yamlscout::document::parser::from_str;
//! use yamlscout::yamlpath::Path;
//!
//! let doc = from_str("spec:\n  replicas: 3\n").unwrap();
//! let path = Path::parse("$.spec.replicas").unwrap();
//! let found = path.find(&doc);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].value(), "3");
//! ```

pub mod error;
pub mod filter;
pub mod lexer;
pub mod segment;
pub mod slice;

mod evaluator;

pub use error::PathError;
pub use segment::Segment;

use crate::document::node::Node;
use crate::yamlpath::lexer::{parse_bracket_names, Lexeme, LexemeKind, Lexer};
use crate::yamlpath::slice::Subscript;

/// A compiled path expression.
///
/// Immutable after construction; sharing one across threads for read-only
/// evaluation is safe.
#[derive(Debug, Clone)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Compiles a path expression.
    pub fn parse(expr: &str) -> Result<Path, PathError> {
        let mut lexer = Lexer::new(expr);
        let mut lexemes = Vec::new();
        loop {
            let lexeme = lexer.next_lexeme();
            match lexeme.kind {
                LexemeKind::Eof => break,
                LexemeKind::Error => {
                    return Err(PathError::Lex {
                        position: lexeme.offset,
                        message: lexeme.text,
                    })
                }
                _ => lexemes.push(lexeme),
            }
        }
        let segments = compile(&lexemes)?;
        log::debug!("compiled '{}' into {} steps", expr, segments.len());
        Ok(Path { segments })
    }

    /// Evaluates the path and returns the matching nodes in match order.
    ///
    /// Never fails; a node may appear more than once when several chains
    /// reach it.
    pub fn find<'a>(&self, node: &'a Node) -> Vec<&'a Node> {
        log::trace!("evaluating path with {} steps", self.segments.len());
        evaluator::select(&self.segments, node, node)
            .into_iter()
            .map(|(_, found)| found)
            .collect()
    }

    /// Evaluates the path and returns each match as a route of content
    /// indices from `node`, resolvable with [`Node::descend`] or
    /// [`Node::descend_mut`] for in-place edits.
    pub fn find_routes(&self, node: &Node) -> Vec<Vec<usize>> {
        evaluator::select(&self.segments, node, node)
            .into_iter()
            .map(|(route, _)| route)
            .collect()
    }

    /// The compiled steps, mainly useful for diagnostics.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Folds a lexeme run into a segment chain. Also used for `@`/`$`
/// sub-paths collected inside filters.
pub(crate) fn compile(lexemes: &[Lexeme]) -> Result<Vec<Segment>, PathError> {
    let mut segments = Vec::new();
    let mut i = 0;
    while i < lexemes.len() {
        let lexeme = &lexemes[i];
        if matches!(
            lexeme.kind,
            LexemeKind::PropertyName
                | LexemeKind::BracketPropertyName
                | LexemeKind::ArraySubscriptPropertyName
        ) && i + 1 < lexemes.len()
        {
            return Err(PathError::UnexpectedLexeme {
                position: lexemes[i + 1].offset,
                found: lexemes[i + 1].text.clone(),
            });
        }
        match lexeme.kind {
            LexemeKind::Identity => {}
            LexemeKind::Root => segments.push(Segment::Root),
            LexemeKind::DotChild | LexemeKind::UndottedChild => {
                let name = lexeme.text.strip_prefix('.').unwrap_or(&lexeme.text);
                if name == "*" {
                    segments.push(Segment::AllChildren);
                } else {
                    segments.push(Segment::Child(name.to_string()));
                }
            }
            LexemeKind::BracketChild => {
                let names = bracket_names(&lexeme.text, lexeme.offset)?;
                segments.push(Segment::BracketChildren(names));
            }
            LexemeKind::ArraySubscript => {
                segments.push(Segment::Subscript(subscript(bracket_inner(&lexeme.text))?));
            }
            LexemeKind::RecursiveDescent => {
                segments.push(Segment::Recurse);
                match lexeme.text.trim_start_matches('.') {
                    // a bare `..` continues with a bracket construct;
                    // `..*` selects the recursion set itself
                    "" | "*" => {}
                    name => segments.push(Segment::Child(name.to_string())),
                }
            }
            LexemeKind::FilterBegin | LexemeKind::RecursiveFilterBegin => {
                let (inner, rest) = collect_filter(lexemes, i)?;
                let expr = filter::parse(inner)?;
                if lexeme.kind == LexemeKind::RecursiveFilterBegin {
                    segments.push(Segment::RecursiveFilter(expr));
                } else {
                    segments.push(Segment::Filter(expr));
                }
                i = rest;
                continue;
            }
            LexemeKind::PropertyName => {
                let name = lexeme.text.strip_prefix('.').unwrap_or(&lexeme.text);
                let name = name.strip_suffix('~').unwrap_or(name);
                segments.push(Segment::Key(name.to_string()));
            }
            LexemeKind::BracketPropertyName => {
                let base = lexeme.text.strip_suffix('~').unwrap_or(&lexeme.text);
                let names = bracket_names(base, lexeme.offset)?;
                segments.push(Segment::Keys(names));
            }
            LexemeKind::ArraySubscriptPropertyName => {
                let base = lexeme.text.strip_suffix('~').unwrap_or(&lexeme.text);
                segments.push(Segment::KeySubscript(subscript(bracket_inner(base))?));
            }
            _ => {
                return Err(PathError::UnexpectedLexeme {
                    position: lexeme.offset,
                    found: lexeme.text.clone(),
                })
            }
        }
        i += 1;
    }
    Ok(segments)
}

/// Returns the lexemes between a filter begin at `start` and its matching
/// end, plus the index just past that end.
fn collect_filter(lexemes: &[Lexeme], start: usize) -> Result<(&[Lexeme], usize), PathError> {
    let mut depth = 1;
    let mut i = start + 1;
    while i < lexemes.len() {
        match lexemes[i].kind {
            LexemeKind::FilterBegin | LexemeKind::RecursiveFilterBegin => depth += 1,
            LexemeKind::FilterEnd => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&lexemes[start + 1..i], i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(PathError::InvalidFilter {
        message: "missing end of filter".to_string(),
    })
}

fn bracket_inner(text: &str) -> &str {
    text.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(text)
}

fn bracket_names(text: &str, offset: usize) -> Result<Vec<String>, PathError> {
    parse_bracket_names(bracket_inner(text)).map_err(|message| PathError::Lex {
        position: offset,
        message,
    })
}

fn subscript(inner: &str) -> Result<Subscript, PathError> {
    Subscript::parse(inner).map_err(|message| PathError::InvalidSubscript { message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_path() {
        let path = Path::parse("").unwrap();
        assert!(path.segments().is_empty());
    }

    #[test]
    fn test_parse_root_only() {
        let path = Path::parse("$").unwrap();
        assert_eq!(path.segments().len(), 1);
        assert!(matches!(path.segments()[0], Segment::Root));
    }

    #[test]
    fn test_parse_dot_children() {
        let path = Path::parse("$.spec.containers").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert!(matches!(path.segments()[1], Segment::Child(ref n) if n == "spec"));
    }

    #[test]
    fn test_parse_star_children() {
        let path = Path::parse("$.*").unwrap();
        assert!(matches!(path.segments()[1], Segment::AllChildren));
    }

    #[test]
    fn test_parse_undotted_start() {
        let path = Path::parse("spec.replicas").unwrap();
        assert!(matches!(path.segments()[0], Segment::Child(ref n) if n == "spec"));
    }

    #[test]
    fn test_parse_bracket_children() {
        let path = Path::parse("$['a','b,c']").unwrap();
        match &path.segments()[1] {
            Segment::BracketChildren(names) => assert_eq!(names, &vec!["a".to_string(), "b,c".to_string()]),
            other => panic!("expected bracket children, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_recursive_descent() {
        let path = Path::parse("$..name").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert!(matches!(path.segments()[1], Segment::Recurse));
        assert!(matches!(path.segments()[2], Segment::Child(ref n) if n == "name"));

        let path = Path::parse("$..*").unwrap();
        assert_eq!(path.segments().len(), 2);
        assert!(matches!(path.segments()[1], Segment::Recurse));

        let path = Path::parse("$..[1]").unwrap();
        assert!(matches!(path.segments()[1], Segment::Recurse));
        assert!(matches!(path.segments()[2], Segment::Subscript(_)));
    }

    #[test]
    fn test_parse_filter() {
        let path = Path::parse("$.items[?(@.price < 10)]").unwrap();
        assert!(matches!(path.segments()[2], Segment::Filter(_)));
    }

    #[test]
    fn test_parse_recursive_filter() {
        let path = Path::parse("$..[?(@.price)]").unwrap();
        assert!(matches!(path.segments()[1], Segment::Recurse));
        assert!(matches!(path.segments()[2], Segment::RecursiveFilter(_)));
    }

    #[test]
    fn test_parse_property_names() {
        let path = Path::parse("$.spec~").unwrap();
        assert!(matches!(path.segments()[1], Segment::Key(ref n) if n == "spec"));

        let path = Path::parse("$['a','b']~").unwrap();
        assert!(matches!(path.segments()[1], Segment::Keys(_)));

        let path = Path::parse("$[*]~").unwrap();
        assert!(matches!(path.segments()[1], Segment::KeySubscript(_)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Path::parse("$.[").is_err());
        assert!(Path::parse("$.a~.b").is_err());
        assert!(Path::parse("$[1:2:0]").is_err());
        assert!(Path::parse("$[").is_err());
        assert!(Path::parse("$[]").is_err());
        assert!(Path::parse("$..").is_err());
        assert!(Path::parse("$[?(@.a").is_err());
        assert!(Path::parse("$[?(@.a =~ /(/)]").is_err());
        assert!(Path::parse("x$").is_err());
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = Path::parse("$[1:2:0]").unwrap_err();
        assert!(err.to_string().contains("1:2:0"), "got: {}", err);

        let err = Path::parse("$.[").unwrap_err();
        assert!(err.to_string().contains("child name"), "got: {}", err);
    }

    #[test]
    fn test_parse_never_panics_on_junk() {
        for junk in [
            "$$$", "...", "[[[", "]]]", "~", "$~", "$..~", "$[?]", "$[?(]", "$[?())]",
            "$[?(@@)]", "$[?(@.a==)]", "$[?(&&)]", "a b", "$.a\u{7}", "🦀", "$.🦀",
        ] {
            let _ = Path::parse(junk);
        }
    }
}
