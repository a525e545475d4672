//! Causeway Language
//!
//! Lexer and recursive-descent parser for the state-transition DSL.
//! Source text becomes tokens, tokens become a [`Program`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod validate;

pub use ast::{
    ArbitrationDecl, Declaration, Expr, Identifier, NamedExpr, Program, Property, StateDecl,
    TransitionDecl,
};
pub use error::{LangError, LexError, SyntaxError};
pub use lexer::{tokenize, LexMode, LexOutput, LexWarning, Lexer};
pub use parser::{parse, Parser};
pub use token::{Token, TokenKind, KEYWORDS};
pub use validate::{validate_source, validate_source_with, SourceValidation};

/// Tokenize and parse source text in one step
///
/// # Errors
///
/// Returns error if lexing (in strict mode) or parsing fails
pub fn parse_source(source: &str, mode: LexMode) -> Result<Program, LangError> {
    let output = Lexer::new(source).with_mode(mode).run()?;
    Ok(parse(&output.tokens)?)
}
