//! Lexing and parsing errors.

use crate::token::TokenKind;
use causeway_core::CoreError;
use thiserror::Error;

/// Lexer error, only raised in strict mode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that starts no token
    #[error("unexpected character {character:?} at line {line}, column {column}")]
    UnexpectedCharacter {
        /// Offending character
        character: char,
        /// Line of the character
        line: u32,
        /// Column of the character
        column: u32,
    },
}

/// Parser error: the token at the reported position was not what the grammar needs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found} {text:?} at line {line}, column {column}")]
pub struct SyntaxError {
    /// What the parser was looking for
    pub expected: String,
    /// Kind of the offending token
    pub found: TokenKind,
    /// Literal text of the offending token
    pub text: String,
    /// Line of the offending token
    pub line: u32,
    /// Column of the offending token
    pub column: u32,
}

/// Either stage of turning source text into a program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LangError {
    /// Lexing failed
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Parsing failed
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl LangError {
    /// Line of the failure
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Self::Lex(LexError::UnexpectedCharacter { line, .. }) => *line,
            Self::Syntax(err) => err.line,
        }
    }
}

impl From<LangError> for CoreError {
    fn from(err: LangError) -> Self {
        CoreError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<SyntaxError> for CoreError {
    fn from(err: SyntaxError) -> Self {
        LangError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError {
            expected: "expression".to_string(),
            found: TokenKind::RBrace,
            text: "}".to_string(),
            line: 2,
            column: 1,
        };
        assert_eq!(
            err.to_string(),
            "expected expression, found '}' \"}\" at line 2, column 1"
        );
    }

    #[test]
    fn test_lang_error_line() {
        let err = LangError::Lex(LexError::UnexpectedCharacter {
            character: '@',
            line: 4,
            column: 7,
        });
        assert_eq!(err.line(), 4);
        assert!(CoreError::from(err).to_string().contains("'@'"));
    }
}
