//! Token types produced by the lexer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved words, matched case-insensitively
pub const KEYWORDS: [&str; 10] = [
    "state",
    "transition",
    "constraint",
    "field",
    "micronaut",
    "proof",
    "arbitration",
    "meta",
    "hash",
    "update",
];

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `state`
    State,
    /// `transition`
    Transition,
    /// `constraint`
    Constraint,
    /// `field`
    Field,
    /// `micronaut`
    Micronaut,
    /// `proof`
    Proof,
    /// `arbitration`
    Arbitration,
    /// `meta`
    Meta,
    /// `hash`
    Hash,
    /// `update`
    Update,

    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Equals,
    /// `.`
    Dot,
    /// `->`
    Arrow,

    /// Decimal literal, optionally signed
    Number,
    /// Name that is not a keyword
    Identifier,

    /// End of input sentinel
    Eof,
}

impl TokenKind {
    /// Keyword kind for an already-lowercased word
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "state" => Some(Self::State),
            "transition" => Some(Self::Transition),
            "constraint" => Some(Self::Constraint),
            "field" => Some(Self::Field),
            "micronaut" => Some(Self::Micronaut),
            "proof" => Some(Self::Proof),
            "arbitration" => Some(Self::Arbitration),
            "meta" => Some(Self::Meta),
            "hash" => Some(Self::Hash),
            "update" => Some(Self::Update),
            _ => None,
        }
    }

    /// Kind for a single-character delimiter
    #[must_use]
    pub const fn delimiter(c: char) -> Option<Self> {
        match c {
            '{' => Some(Self::LBrace),
            '}' => Some(Self::RBrace),
            '(' => Some(Self::LParen),
            ')' => Some(Self::RParen),
            '[' => Some(Self::LBracket),
            ']' => Some(Self::RBracket),
            ':' => Some(Self::Colon),
            ',' => Some(Self::Comma),
            ';' => Some(Self::Semicolon),
            '=' => Some(Self::Equals),
            '.' => Some(Self::Dot),
            _ => None,
        }
    }

    /// Whether this kind is a reserved word
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::State
                | Self::Transition
                | Self::Constraint
                | Self::Field
                | Self::Micronaut
                | Self::Proof
                | Self::Arbitration
                | Self::Meta
                | Self::Hash
                | Self::Update
        )
    }

    /// Human-readable description used in error messages
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::State => "'state'",
            Self::Transition => "'transition'",
            Self::Constraint => "'constraint'",
            Self::Field => "'field'",
            Self::Micronaut => "'micronaut'",
            Self::Proof => "'proof'",
            Self::Arbitration => "'arbitration'",
            Self::Meta => "'meta'",
            Self::Hash => "'hash'",
            Self::Update => "'update'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Equals => "'='",
            Self::Dot => "'.'",
            Self::Arrow => "'->'",
            Self::Number => "number",
            Self::Identifier => "identifier",
            Self::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexical token with its source position (1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Literal text; keywords are lowercased, identifiers keep their case
    pub value: String,
    /// Line of the first character
    pub line: u32,
    /// Column of the first character
    pub column: u32,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            column,
        }
    }

    /// Create the end-of-input sentinel
    #[must_use]
    pub fn eof(line: u32, column: u32) -> Self {
        Self::new(TokenKind::Eof, "", line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_has_a_kind() {
        for word in KEYWORDS {
            let kind = TokenKind::keyword(word).unwrap();
            assert!(kind.is_keyword());
        }
        assert_eq!(TokenKind::keyword("State"), None);
        assert_eq!(TokenKind::keyword("states"), None);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(TokenKind::delimiter('{'), Some(TokenKind::LBrace));
        assert_eq!(TokenKind::delimiter('='), Some(TokenKind::Equals));
        assert_eq!(TokenKind::delimiter('-'), None);
        assert!(!TokenKind::Comma.is_keyword());
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::RBrace.to_string(), "'}'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
