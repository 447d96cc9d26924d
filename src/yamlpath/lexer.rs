//! Lexer for path expressions.
//!
//! The lexer is a stateful scanner over the expression string. It tracks
//! the current byte offset, the start of the lexeme being scanned, and the
//! last lexeme it emitted; the lookahead decides how a `[` is classified
//! (bracket child, array subscript, or filter) and whether a filter
//! directly follows a bare `..`. Filter bodies switch the scanner into a
//! second mode that understands operators, literals, and `@`/`$` sub-path
//! anchors; a stack of open-paren depths lets nested filters terminate at
//! the right `)]`.
//!
//! `next_lexeme` always returns a lexeme. After the end of input it keeps
//! returning `Eof`; after an error it keeps returning that `Error` lexeme,
//! whose text is the human-readable message.

/// The kind of a scanned lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    /// Scanning failed; the lexeme text carries the message.
    Error,
    /// End of input.
    Eof,
    /// The empty path.
    Identity,
    /// Leading `$`.
    Root,
    /// `.name` or `.*`.
    DotChild,
    /// A bare name at the very start of the path.
    UndottedChild,
    /// `['name', ...]`.
    BracketChild,
    /// `[0]`, `[1:2]`, `[*]`, or a union of those.
    ArraySubscript,
    /// `..`, `..name`, or `..*`.
    RecursiveDescent,
    /// `[?(` opening a filter.
    FilterBegin,
    /// `[?(` directly after a bare `..`.
    RecursiveFilterBegin,
    /// `)]` closing a filter.
    FilterEnd,
    /// `.name~`, or `name~` at the start.
    PropertyName,
    /// `['name', ...]~`.
    BracketPropertyName,
    /// `[...]~` with subscript content.
    ArraySubscriptPropertyName,
    /// `@` anchoring a filter sub-path at the context node.
    FilterAt,
    /// `$` anchoring a filter sub-path at the document root.
    FilterRoot,
    /// Signed decimal integer literal.
    FilterInt,
    /// Float literal with optional exponent.
    FilterFloat,
    /// Single-quoted string literal, quotes included in the text.
    FilterString,
    /// `true` or `false`.
    FilterBool,
    /// `null`.
    FilterNull,
    /// `/pattern/`, slashes included in the text.
    FilterRegex,
    /// `==`
    FilterEq,
    /// `!=`
    FilterNe,
    /// `<`
    FilterLt,
    /// `<=`
    FilterLe,
    /// `>`
    FilterGt,
    /// `>=`
    FilterGe,
    /// `=~`
    FilterMatch,
    /// `!`
    FilterNot,
    /// `&&`
    FilterAnd,
    /// `||`
    FilterOr,
    /// Grouping `(` inside a filter.
    FilterOpenParen,
    /// Grouping `)` inside a filter.
    FilterCloseParen,
}

/// One scanned lexeme: its kind, matched text (or error message), and the
/// byte offset where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub text: String,
    pub offset: usize,
}

/// Stateful scanner over a path expression.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Grouping depth inside filters; zero means path mode.
    paren_depth: usize,
    /// Paren depth at which each open filter began.
    filter_opens: Vec<usize>,
    /// Last emitted lexeme.
    last: Option<Lexeme>,
    /// Latched Error/Eof result.
    terminal: Option<Lexeme>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            paren_depth: 0,
            filter_opens: Vec::new(),
            last: None,
            terminal: None,
        }
    }

    /// Returns the next lexeme, advancing the scanner.
    pub fn next_lexeme(&mut self) -> Lexeme {
        if let Some(terminal) = &self.terminal {
            return terminal.clone();
        }
        let lexeme = if self.paren_depth > 0 {
            self.filter_lexeme()
        } else {
            self.path_lexeme()
        };
        if matches!(lexeme.kind, LexemeKind::Error | LexemeKind::Eof) {
            self.terminal = Some(lexeme.clone());
        }
        self.last = Some(lexeme.clone());
        lexeme
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn make(&self, kind: LexemeKind, start: usize) -> Lexeme {
        Lexeme {
            kind,
            text: self.input[start..self.pos].to_string(),
            offset: start,
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> Lexeme {
        Lexeme {
            kind: LexemeKind::Error,
            text: message.into(),
            offset,
        }
    }

    fn last_kind(&self) -> Option<LexemeKind> {
        self.last.as_ref().map(|lexeme| lexeme.kind)
    }

    /// True when the previous lexeme was a bare `..`, which makes a
    /// directly following filter recursive.
    fn after_bare_recurse(&self) -> bool {
        matches!(
            &self.last,
            Some(lexeme) if lexeme.kind == LexemeKind::RecursiveDescent && lexeme.text == ".."
        )
    }

    fn path_lexeme(&mut self) -> Lexeme {
        if matches!(
            self.last_kind(),
            Some(
                LexemeKind::PropertyName
                    | LexemeKind::BracketPropertyName
                    | LexemeKind::ArraySubscriptPropertyName
            )
        ) && self.pos < self.input.len()
        {
            return self.error(
                self.pos,
                "property name '~' may only be used on the last step of the path",
            );
        }
        if self.input.is_empty() && self.last.is_none() {
            return Lexeme {
                kind: LexemeKind::Identity,
                text: String::new(),
                offset: 0,
            };
        }
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.make(LexemeKind::Eof, start);
        };
        match c {
            '$' if self.pos == 0 => {
                self.bump();
                self.make(LexemeKind::Root, start)
            }
            '$' => self.error(start, "'$' may only appear at the start of the path"),
            '.' => self.dot_step(),
            '[' => self.bracket_step(),
            _ if self.pos == 0 && (is_ident_start(c) || c == '*') => {
                self.scan_name();
                self.child_lexeme(start, LexemeKind::UndottedChild)
            }
            _ => self.error(start, format!("invalid character '{}' in path", c)),
        }
    }

    /// Scans `.name`, `.*`, `..name`, `..*`, or a bare `..`.
    fn dot_step(&mut self) -> Lexeme {
        let start = self.pos;
        self.bump();
        if self.peek() == Some('.') {
            self.bump();
            return match self.peek() {
                Some(c) if is_ident_start(c) || c == '*' => {
                    self.scan_name();
                    self.make(LexemeKind::RecursiveDescent, start)
                }
                // the bracket construct is scanned as its own lexeme
                Some('[') => self.make(LexemeKind::RecursiveDescent, start),
                _ => self.error(
                    start,
                    "recursive descent '..' must be followed by a child name, bracket child, subscript, or filter",
                ),
            };
        }
        match self.peek() {
            Some(c) if is_ident_start(c) || c == '*' => {
                self.scan_name();
                self.child_lexeme(start, LexemeKind::DotChild)
            }
            _ => self.error(start, "child name missing after '.'"),
        }
    }

    /// Consumes an identifier or a single `*`.
    fn scan_name(&mut self) {
        if self.peek() == Some('*') {
            self.bump();
            return;
        }
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.bump();
        }
    }

    /// Finishes a child lexeme, converting it to a property-name lexeme
    /// when a `~` follows.
    fn child_lexeme(&mut self, start: usize, kind: LexemeKind) -> Lexeme {
        if self.peek() == Some('~') {
            self.bump();
            return self.make(LexemeKind::PropertyName, start);
        }
        self.make(kind, start)
    }

    /// Scans a bracket construct, classifying it by content.
    fn bracket_step(&mut self) -> Lexeme {
        let start = self.pos;
        if self.rest().starts_with("[?(") {
            let kind = if self.after_bare_recurse() {
                LexemeKind::RecursiveFilterBegin
            } else {
                LexemeKind::FilterBegin
            };
            self.pos += 3;
            self.paren_depth += 1;
            self.filter_opens.push(self.paren_depth);
            return self.make(kind, start);
        }
        let Some(close) = self.find_bracket_close() else {
            return self.error(start, "unmatched '['");
        };
        let content = &self.input[start + 1..close];
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return self.error(start, "empty bracket expression");
        }
        let kind = if trimmed.starts_with('\'') || trimmed.starts_with('"') {
            if let Err(message) = parse_bracket_names(content) {
                return self.error(start, message);
            }
            LexemeKind::BracketChild
        } else {
            if let Some(bad) = trimmed
                .chars()
                .find(|&c| !c.is_ascii_digit() && !matches!(c, '-' | '+' | ':' | ',' | '*' | ' '))
            {
                return self.error(start, format!("invalid character '{}' in array subscript", bad));
            }
            LexemeKind::ArraySubscript
        };
        self.pos = close + 1;
        if self.peek() == Some('~') {
            self.bump();
            let kind = match kind {
                LexemeKind::BracketChild => LexemeKind::BracketPropertyName,
                _ => LexemeKind::ArraySubscriptPropertyName,
            };
            return self.make(kind, start);
        }
        self.make(kind, start)
    }

    /// Finds the `]` closing the bracket at the current position, skipping
    /// over quoted spans.
    fn find_bracket_close(&self) -> Option<usize> {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (i, c) in self.input[self.pos + 1..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' if quote.is_some() => escaped = true,
                '\'' | '"' => match quote {
                    None => quote = Some(c),
                    Some(q) if q == c => quote = None,
                    Some(_) => {}
                },
                ']' if quote.is_none() => return Some(self.pos + 1 + i),
                _ => {}
            }
        }
        None
    }

    fn filter_lexeme(&mut self) -> Lexeme {
        while self.peek() == Some(' ') || self.peek() == Some('\t') {
            self.bump();
        }
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.error(start, "unterminated filter");
        };
        match c {
            '(' => {
                self.bump();
                self.paren_depth += 1;
                self.make(LexemeKind::FilterOpenParen, start)
            }
            ')' => self.close_paren(start),
            '!' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    self.make(LexemeKind::FilterNe, start)
                } else {
                    self.make(LexemeKind::FilterNot, start)
                }
            }
            '=' => {
                self.bump();
                match self.peek() {
                    Some('=') => {
                        self.bump();
                        self.make(LexemeKind::FilterEq, start)
                    }
                    Some('~') => {
                        self.bump();
                        self.make(LexemeKind::FilterMatch, start)
                    }
                    _ => self.error(start, "unknown operator '='"),
                }
            }
            '>' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    self.make(LexemeKind::FilterGe, start)
                } else {
                    self.make(LexemeKind::FilterGt, start)
                }
            }
            '<' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    self.make(LexemeKind::FilterLe, start)
                } else {
                    self.make(LexemeKind::FilterLt, start)
                }
            }
            '&' => {
                self.bump();
                if self.peek() == Some('&') {
                    self.bump();
                    self.make(LexemeKind::FilterAnd, start)
                } else {
                    self.error(start, "unknown operator '&'")
                }
            }
            '|' => {
                self.bump();
                if self.peek() == Some('|') {
                    self.bump();
                    self.make(LexemeKind::FilterOr, start)
                } else {
                    self.error(start, "unknown operator '|'")
                }
            }
            '@' => {
                self.bump();
                self.make(LexemeKind::FilterAt, start)
            }
            '$' => {
                self.bump();
                self.make(LexemeKind::FilterRoot, start)
            }
            '.' => self.dot_step(),
            '[' => self.bracket_step(),
            '\'' => self.string_literal(),
            '/' if self.last_kind() == Some(LexemeKind::FilterMatch) => self.regex_literal(),
            '/' => self.error(start, "regular expression may only follow '=~'"),
            c if c.is_ascii_digit() || c == '-' || c == '+' => self.number_literal(),
            c if c.is_ascii_alphabetic() => self.word_literal(),
            c => self.error(start, format!("unexpected '{}' in filter", c)),
        }
    }

    /// Handles `)` in filter mode: either the end of the current filter
    /// (when followed by `]`) or a grouping close paren.
    fn close_paren(&mut self, start: usize) -> Lexeme {
        match self.filter_opens.last().copied() {
            Some(open) if self.paren_depth == open => {
                self.bump();
                if self.peek() == Some(']') {
                    self.bump();
                    self.paren_depth -= 1;
                    self.filter_opens.pop();
                    self.make(LexemeKind::FilterEnd, start)
                } else {
                    self.error(start, "missing ']' after filter")
                }
            }
            Some(_) => {
                self.bump();
                self.paren_depth -= 1;
                self.make(LexemeKind::FilterCloseParen, start)
            }
            None => self.error(start, "unbalanced ')' in filter"),
        }
    }

    fn string_literal(&mut self) -> Lexeme {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                None => return self.error(start, "unterminated string literal"),
                Some('\\') => {
                    if self.bump().is_none() {
                        return self.error(start, "unterminated string literal");
                    }
                }
                Some('\'') => break,
                Some(_) => {}
            }
        }
        self.make(LexemeKind::FilterString, start)
    }

    fn regex_literal(&mut self) -> Lexeme {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                None => return self.error(start, "unterminated regular expression"),
                Some('\\') => {
                    if self.bump().is_none() {
                        return self.error(start, "unterminated regular expression");
                    }
                }
                Some('/') => break,
                Some(_) => {}
            }
        }
        self.make(LexemeKind::FilterRegex, start)
    }

    fn number_literal(&mut self) -> Lexeme {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        let mut digits = 0;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
            digits += 1;
        }
        if digits == 0 {
            return self.error(start, format!("invalid number '{}'", &self.input[start..self.pos]));
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.second_char_is_digit() {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
            is_float = true;
        }
        if matches!(self.peek(), Some('e') | Some('E')) && self.exponent_follows() {
            self.bump();
            if matches!(self.peek(), Some('-') | Some('+')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
            is_float = true;
        }
        let kind = if is_float {
            LexemeKind::FilterFloat
        } else {
            LexemeKind::FilterInt
        };
        self.make(kind, start)
    }

    /// True when the character after the current one is an ASCII digit.
    fn second_char_is_digit(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next();
        matches!(chars.next(), Some(c) if c.is_ascii_digit())
    }

    /// True when an `e`/`E` at the cursor begins a valid exponent.
    fn exponent_follows(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next();
        match chars.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('-') | Some('+') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
            _ => false,
        }
    }

    fn word_literal(&mut self) -> Lexeme {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.bump();
        }
        let word = &self.input[start..self.pos];
        match word {
            "true" | "false" => self.make(LexemeKind::FilterBool, start),
            "null" => self.make(LexemeKind::FilterNull, start),
            _ => self.error(start, format!("unknown token '{}'", word)),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Splits the content of a bracket child into unescaped names.
///
/// Names are quoted with `'` or `"`, separated by commas; commas inside
/// quotes are literal. `\'`, `\"`, and `\\` unescape; any other backslash
/// passes through unchanged.
pub(crate) fn parse_bracket_names(content: &str) -> Result<Vec<String>, String> {
    let mut names = Vec::new();
    let mut chars = content.chars().peekable();
    loop {
        while matches!(chars.peek(), Some(' ') | Some('\t')) {
            chars.next();
        }
        let quote = match chars.next() {
            Some(c @ ('\'' | '"')) => c,
            Some(c) => return Err(format!("expected a quoted child name, found '{}'", c)),
            None => return Err("expected a quoted child name".to_string()),
        };
        let mut name = String::new();
        loop {
            match chars.next() {
                None => return Err("unterminated string in bracket child".to_string()),
                Some('\\') => match chars.peek() {
                    Some(&escaped @ ('\'' | '"' | '\\')) => {
                        chars.next();
                        name.push(escaped);
                    }
                    _ => name.push('\\'),
                },
                Some(c) if c == quote => break,
                Some(c) => name.push(c),
            }
        }
        names.push(name);
        while matches!(chars.peek(), Some(' ') | Some('\t')) {
            chars.next();
        }
        match chars.next() {
            None => return Ok(names),
            Some(',') => continue,
            Some(c) => return Err(format!("expected ',' between child names, found '{}'", c)),
        }
    }
}
