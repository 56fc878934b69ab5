//! A small expression language for selecting records.
//!
//! ```text
//! level > 200 or channel in ['app', 'doctrine']
//! message matches '/timeout/i' and not (context.retry === true)
//! ```
//!
//! Expressions compile once against a fixed set of variable names, so typos
//! in variable names fail at startup rather than on the first record.

mod eval;
mod lexer;
mod parser;

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("cannot apply '{op}' to {left} and {right}")]
    Type {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("cannot apply unary '{op}' to {operand}")]
    UnaryType {
        op: &'static str,
        operand: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{op}'")]
    Overflow { op: &'static str },
}

/// A compiled expression.
#[derive(Debug, Clone)]
pub struct Program {
    root: parser::Expr,
}

impl Program {
    pub fn compile(source: &str, variables: &[&str]) -> Result<Self, ParseError> {
        Ok(Self {
            root: parser::parse(source, variables)?,
        })
    }

    pub fn evaluate(&self, vars: &Map<String, Value>) -> Result<Value, EvalError> {
        eval::evaluate(&self.root, vars)
    }

    /// Evaluate and reduce the result to a boolean.
    pub fn test(&self, vars: &Map<String, Value>) -> Result<bool, EvalError> {
        self.evaluate(vars).map(|value| eval::truthy(&value))
    }
}
