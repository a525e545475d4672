//! Recursive-descent parser.
//!
//! Single pass, one token of lookahead, no backtracking. The first token the
//! grammar cannot accept ends the parse with a [`SyntaxError`].

use crate::ast::{
    ArbitrationDecl, Declaration, Expr, Identifier, NamedExpr, Program, Property, StateDecl,
    TransitionDecl,
};
use crate::error::SyntaxError;
use crate::token::{Token, TokenKind};

/// Parse a token sequence into a program
///
/// # Errors
///
/// Returns the first token the grammar does not accept
pub fn parse(tokens: &[Token]) -> Result<Program, SyntaxError> {
    Parser::new(tokens).parse_program()
}

/// Parser over a borrowed token slice
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Create a parser; a missing trailing `Eof` is implied
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        let eof = tokens
            .last()
            .map_or_else(|| Token::eof(1, 1), |t| Token::eof(t.line, t.column));
        Self {
            tokens,
            pos: 0,
            eof,
        }
    }

    /// Parse declarations until end of input
    ///
    /// # Errors
    ///
    /// Returns the first token the grammar does not accept
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut program = Program::new();
        loop {
            let token = self.peek();
            let declaration = match token.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.advance();
                    continue;
                }
                TokenKind::State => Declaration::State(self.state()?),
                TokenKind::Transition => Declaration::Transition(self.transition()?),
                TokenKind::Constraint => Declaration::Constraint(self.named()?),
                TokenKind::Field => Declaration::Field(self.named()?),
                TokenKind::Micronaut => Declaration::Operator(self.named()?),
                TokenKind::Proof => Declaration::Proof(self.named()?),
                TokenKind::Meta => Declaration::Meta(self.named()?),
                TokenKind::Arbitration => Declaration::Arbitration(self.arbitration()?),
                _ => return Err(self.error("declaration")),
            };
            program.push(declaration);
        }
        tracing::debug!(declarations = program.len(), "parsed program");
        Ok(program)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> &Token {
        let token = self.tokens.get(self.pos).unwrap_or(&self.eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(kind.describe()))
        }
    }

    fn ident(&mut self) -> Result<String, SyntaxError> {
        Ok(self.expect(TokenKind::Identifier)?.value.clone())
    }

    fn error(&self, expected: &str) -> SyntaxError {
        let token = self.peek();
        SyntaxError {
            expected: expected.to_string(),
            found: token.kind,
            text: token.value.clone(),
            line: token.line,
            column: token.column,
        }
    }

    /// `"state" ident "{" (ident "=" Expr)* "}"`
    fn state(&mut self) -> Result<StateDecl, SyntaxError> {
        let line = self.expect(TokenKind::State)?.line;
        let name = self.ident()?;
        self.expect(TokenKind::LBrace)?;
        let properties = self.assignments()?;
        Ok(StateDecl {
            name,
            properties,
            line,
        })
    }

    /// `"transition" ident ":" ident "->" ident`
    fn transition(&mut self) -> Result<TransitionDecl, SyntaxError> {
        let line = self.expect(TokenKind::Transition)?.line;
        let name = self.ident()?;
        self.expect(TokenKind::Colon)?;
        let from = self.ident()?;
        self.expect(TokenKind::Arrow)?;
        let to = self.ident()?;
        Ok(TransitionDecl {
            name,
            from,
            to,
            line,
        })
    }

    /// `keyword ident ":" Expr`
    fn named(&mut self) -> Result<NamedExpr, SyntaxError> {
        let line = self.advance().line;
        let name = self.ident()?;
        self.expect(TokenKind::Colon)?;
        let expr = self.expr()?;
        Ok(NamedExpr { name, expr, line })
    }

    /// `"arbitration" "{" (ident "=" Expr ("," | ";")?)* "}"`
    fn arbitration(&mut self) -> Result<ArbitrationDecl, SyntaxError> {
        let line = self.expect(TokenKind::Arbitration)?.line;
        self.expect(TokenKind::LBrace)?;
        let rules = self.assignments()?;
        Ok(ArbitrationDecl { rules, line })
    }

    /// Assignments up to and including the closing brace
    fn assignments(&mut self) -> Result<Vec<Property>, SyntaxError> {
        let mut properties = Vec::new();
        while !self.eat(TokenKind::RBrace) {
            let line = self.peek().line;
            let name = self.ident()?;
            self.expect(TokenKind::Equals)?;
            let value = self.expr()?;
            properties.push(Property { name, value, line });
            // Separators are optional
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
            }
        }
        Ok(properties)
    }

    fn expr(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek().kind {
            TokenKind::Number => {
                let token = self.peek();
                match token.value.parse::<f64>() {
                    Ok(n) => {
                        self.advance();
                        Ok(Expr::Number(n))
                    }
                    Err(_) => Err(self.error("number")),
                }
            }
            TokenKind::LBracket => {
                self.advance();
                Ok(Expr::Vector(self.list(TokenKind::RBracket)?))
            }
            TokenKind::Hash => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let inner = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Hash(Box::new(inner)))
            }
            TokenKind::Update => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let target = self.ident()?;
                self.expect(TokenKind::Comma)?;
                let value = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Update {
                    target,
                    value: Box::new(value),
                })
            }
            TokenKind::Identifier => {
                let name = self.ident()?;
                if self.eat(TokenKind::Dot) {
                    let property = self.ident()?;
                    return Ok(Expr::Identifier(Identifier::qualified(name, property)));
                }
                if self.eat(TokenKind::LParen) {
                    let args = self.list(TokenKind::RParen)?;
                    return Ok(Expr::Call {
                        function: name,
                        args,
                    });
                }
                Ok(Expr::Identifier(Identifier::bare(name)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.error("expression")),
        }
    }

    /// `(Expr ("," Expr)*)? close`, after the opening delimiter
    fn list(&mut self, close: TokenKind) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }
}
