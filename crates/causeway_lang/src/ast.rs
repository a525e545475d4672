//! Abstract syntax tree for the state-transition DSL.

use serde::{Deserialize, Serialize};

/// A parsed program: top-level declarations in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Declarations in the program
    pub declarations: Vec<Declaration>,
}

impl Program {
    /// Create a new empty program
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration to the program
    pub fn push(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// Number of declarations
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if the program declares nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// `state Name { prop = expr ... }`
    State(StateDecl),
    /// `transition name : From -> To`
    Transition(TransitionDecl),
    /// `constraint name : expr`
    Constraint(NamedExpr),
    /// `field name : expr`
    Field(NamedExpr),
    /// `micronaut name : expr`
    Operator(NamedExpr),
    /// `proof name : expr`
    Proof(NamedExpr),
    /// `meta name : expr`
    Meta(NamedExpr),
    /// `arbitration { rule = expr, ... }`
    Arbitration(ArbitrationDecl),
}

impl Declaration {
    /// Declared name; arbitration blocks are anonymous
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::State(decl) => Some(&decl.name),
            Self::Transition(decl) => Some(&decl.name),
            Self::Constraint(decl)
            | Self::Field(decl)
            | Self::Operator(decl)
            | Self::Proof(decl)
            | Self::Meta(decl) => Some(&decl.name),
            Self::Arbitration(_) => None,
        }
    }

    /// Line of the leading keyword
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Self::State(decl) => decl.line,
            Self::Transition(decl) => decl.line,
            Self::Constraint(decl)
            | Self::Field(decl)
            | Self::Operator(decl)
            | Self::Proof(decl)
            | Self::Meta(decl) => decl.line,
            Self::Arbitration(decl) => decl.line,
        }
    }
}

/// State declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDecl {
    /// State name
    pub name: String,
    /// Property assignments in source order
    pub properties: Vec<Property>,
    /// Line of the `state` keyword
    pub line: u32,
}

/// `name = expr` inside a state or arbitration block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Assigned expression
    pub value: Expr,
    /// Line of the property name
    pub line: u32,
}

/// Transition declaration between two symbolic state names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDecl {
    /// Transition name
    pub name: String,
    /// Source state name
    pub from: String,
    /// Target state name
    pub to: String,
    /// Line of the `transition` keyword
    pub line: u32,
}

/// `keyword name : expr` for constraints, fields, operators, proofs and meta rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedExpr {
    /// Declared name
    pub name: String,
    /// Declared expression
    pub expr: Expr,
    /// Line of the leading keyword
    pub line: u32,
}

/// Arbitration rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrationDecl {
    /// Rules in source order
    pub rules: Vec<Property>,
    /// Line of the `arbitration` keyword
    pub line: u32,
}

/// Identifier reference, optionally qualified by a state name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// `S` in `S.p`
    pub qualifier: Option<String>,
    /// `p` in `S.p`, or the bare name
    pub name: String,
}

impl Identifier {
    /// Bare identifier
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    /// `state.property` identifier
    #[must_use]
    pub fn qualified(state: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(state.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(state) => write!(f, "{}.{}", state, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Name reference
    Identifier(Identifier),
    /// `[a, b, ...]`
    Vector(Vec<Expr>),
    /// `f(a, b, ...)`
    Call {
        /// Function name
        function: String,
        /// Arguments
        args: Vec<Expr>,
    },
    /// `hash(expr)`
    Hash(Box<Expr>),
    /// `update(target, expr)`
    Update {
        /// Target name
        target: String,
        /// New value expression
        value: Box<Expr>,
    },
}

impl Expr {
    /// Bare identifier expression
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(Identifier::bare(name))
    }

    /// Call expression
    #[must_use]
    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            function: function.into(),
            args,
        }
    }
}
