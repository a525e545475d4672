//! Lexer for the state-transition DSL.
//!
//! Scans left to right, one character at a time, tracking line and column.
//! Comments and whitespace never produce tokens. The output always ends with
//! a single [`TokenKind::Eof`] token.

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use serde::{Deserialize, Serialize};

/// How to treat characters that start no token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexMode {
    /// Skip them, recording a warning for each
    #[default]
    Lenient,
    /// Fail on the first one
    Strict,
}

/// A skipped character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexWarning {
    /// The skipped character
    pub character: char,
    /// Line of the character
    pub line: u32,
    /// Column of the character
    pub column: u32,
}

/// Tokens plus any skipped-character warnings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOutput {
    /// Tokens in source order, ending with `Eof`
    pub tokens: Vec<Token>,
    /// Characters skipped in lenient mode
    pub warnings: Vec<LexWarning>,
}

/// Tokenize in lenient mode, discarding warnings
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    // lenient mode never errors
    Lexer::new(source)
        .run()
        .map(|output| output.tokens)
        .unwrap_or_default()
}

/// Character-level scanner
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    mode: LexMode,
    warnings: Vec<LexWarning>,
    error: Option<LexError>,
}

impl Lexer {
    /// Create a lenient lexer over source text
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            mode: LexMode::default(),
            warnings: Vec::new(),
            error: None,
        }
    }

    /// Set the unrecognized-character mode
    #[must_use]
    pub fn with_mode(mut self, mode: LexMode) -> Self {
        self.mode = mode;
        self
    }

    /// Tokenize the whole input
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first unrecognized character
    pub fn run(mut self) -> Result<LexOutput, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        if let Some(err) = self.error {
            return Err(err);
        }
        tokens.push(Token::eof(self.line, self.column));
        tracing::trace!(tokens = tokens.len(), warnings = self.warnings.len(), "tokenized source");
        Ok(LexOutput {
            tokens,
            warnings: self.warnings,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, buf: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek().filter(|c| pred(*c)) {
            buf.push(c);
            self.bump();
        }
    }

    /// Next token, or `None` at end of input or after a strict-mode error
    fn next_token(&mut self) -> Option<Token> {
        loop {
            let c = self.peek()?;
            let (line, column) = (self.line, self.column);

            if c.is_whitespace() {
                self.bump();
                continue;
            }

            if c == '/' && self.peek_next() == Some('/') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
                continue;
            }

            if c == '-' && self.peek_next() == Some('>') {
                self.bump();
                self.bump();
                return Some(Token::new(TokenKind::Arrow, "->", line, column));
            }

            let signed = c == '-' && self.peek_next().is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_digit() || signed {
                return Some(self.number(line, column));
            }

            if c.is_alphabetic() || c == '_' {
                return Some(self.word(line, column));
            }

            if let Some(kind) = TokenKind::delimiter(c) {
                self.bump();
                return Some(Token::new(kind, c, line, column));
            }

            self.bump();
            match self.mode {
                LexMode::Strict => {
                    self.error = Some(LexError::UnexpectedCharacter {
                        character: c,
                        line,
                        column,
                    });
                    return None;
                }
                LexMode::Lenient => {
                    tracing::warn!(character = ?c, line, column, "skipping unrecognized character");
                    self.warnings.push(LexWarning {
                        character: c,
                        line,
                        column,
                    });
                }
            }
        }
    }

    fn number(&mut self, line: u32, column: u32) -> Token {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        self.bump_while(&mut text, |c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.bump();
            self.bump_while(&mut text, |c| c.is_ascii_digit());
        }
        Token::new(TokenKind::Number, text, line, column)
    }

    fn word(&mut self, line: u32, column: u32) -> Token {
        let mut text = String::new();
        self.bump_while(&mut text, |c| c.is_alphanumeric() || c == '_');
        let lower = text.to_lowercase();
        match TokenKind::keyword(&lower) {
            Some(kind) => Token::new(kind, lower, line, column),
            None => Token::new(TokenKind::Identifier, text, line, column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_transition_declaration() {
        assert_eq!(
            kinds("transition go : A -> B"),
            vec![
                TokenKind::Transition,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let tokens = tokenize("STATE Foo");
        assert_eq!(tokens[0].kind, TokenKind::State);
        assert_eq!(tokens[0].value, "state");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].value, "Foo");
    }

    #[test]
    fn test_comments_and_positions() {
        let tokens = tokenize("// header\nstate A { x = 1 }");
        assert_eq!(tokens[0].kind, TokenKind::State);
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
        let x = &tokens[3];
        assert_eq!(x.value, "x");
        assert_eq!((x.line, x.column), (2, 11));
    }

    #[test]
    fn test_tokenize_matches_lenient_run() {
        let source = "state A { x = 1 @ }\n# y";
        let output = Lexer::new(source).run().unwrap();
        assert_eq!(output.warnings.len(), 2);
        assert_eq!(tokenize(source), output.tokens);
    }

    #[test]
    fn test_signed_numbers() {
        let tokens = tokenize("-3 - 4 2.50 7.");
        let values: Vec<(TokenKind, &str)> =
            tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::Number, "-3"),
                (TokenKind::Number, "4"),
                (TokenKind::Number, "2.50"),
                (TokenKind::Number, "7"),
                (TokenKind::Dot, "."),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_qualified_reference() {
        assert_eq!(
            kinds("A.x"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_lenient_skips_with_warning() {
        let output = Lexer::new("state A @ {}").run().unwrap();
        assert_eq!(output.tokens.len(), 5);
        assert_eq!(
            output.warnings,
            vec![LexWarning {
                character: '@',
                line: 1,
                column: 9,
            }]
        );
    }

    #[test]
    fn test_strict_rejects_unknown_character() {
        let err = Lexer::new("state A {\n  x = 1 # note\n}")
            .with_mode(LexMode::Strict)
            .run()
            .unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '#',
                line: 2,
                column: 9,
            }
        );
    }

    #[test]
    fn test_eof_position_follows_last_line() {
        let tokens = tokenize("state A {}\n");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.line, 2);
    }
}
