use crate::filter::expr::ParseError;
use crate::filter::expr::lexer::{Spanned, Token, tokenize};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Identical,
    NotIdentical,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Identical => "===",
            BinaryOp::NotIdentical => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::NotIn => "not in",
            BinaryOp::Contains => "contains",
            BinaryOp::StartsWith => "starts with",
            BinaryOp::EndsWith => "ends with",
            BinaryOp::Concat => "~",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Expr {
    Literal(Value),
    Array(Vec<Expr>),
    Variable(String),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Matches(Box<Expr>, Regex),
}

const PREC_OR: u8 = 10;
const PREC_AND: u8 = 15;
const PREC_COMPARE: u8 = 20;
const PREC_ADD: u8 = 30;
const PREC_CONCAT: u8 = 40;
const PREC_NOT: u8 = 50;
const PREC_MUL: u8 = 60;

enum Infix {
    Binary(BinaryOp),
    Matches,
}

pub(crate) fn parse(source: &str, variables: &[&str]) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        variables,
    };

    let expr = parser.expression(0)?;
    match parser.peek() {
        Token::Eof => Ok(expr),
        other => Err(parser.error(format!("unexpected {}", describe(other)))),
    }
}

struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    variables: &'a [&'a str],
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        self.tokens
            .get(self.pos + ahead)
            .map_or(&Token::Eof, |t| &t.token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |t| t.offset)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.offset())
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ParseError> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected {what}, found {}", describe(self.peek()))))
        }
    }

    fn expression(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;

        while let Some((infix, prec, width)) = self.peek_infix() {
            if prec < min_prec {
                break;
            }
            for _ in 0..width {
                self.advance();
            }

            lhs = match infix {
                Infix::Binary(op) => {
                    let rhs = self.expression(prec + 1)?;
                    Expr::Binary(op, Box::new(lhs), Box::new(rhs))
                }
                Infix::Matches => Expr::Matches(Box::new(lhs), self.pattern()?),
            };
        }

        Ok(lhs)
    }

    /// Current infix operator, its precedence and how many tokens it spans.
    fn peek_infix(&self) -> Option<(Infix, u8, usize)> {
        let binary = |op, prec| Some((Infix::Binary(op), prec, 1));

        match self.peek() {
            Token::Symbol(symbol) => match *symbol {
                "||" => binary(BinaryOp::Or, PREC_OR),
                "&&" => binary(BinaryOp::And, PREC_AND),
                "==" => binary(BinaryOp::Eq, PREC_COMPARE),
                "!=" => binary(BinaryOp::NotEq, PREC_COMPARE),
                "===" => binary(BinaryOp::Identical, PREC_COMPARE),
                "!==" => binary(BinaryOp::NotIdentical, PREC_COMPARE),
                "<" => binary(BinaryOp::Lt, PREC_COMPARE),
                "<=" => binary(BinaryOp::Le, PREC_COMPARE),
                ">" => binary(BinaryOp::Gt, PREC_COMPARE),
                ">=" => binary(BinaryOp::Ge, PREC_COMPARE),
                "+" => binary(BinaryOp::Add, PREC_ADD),
                "-" => binary(BinaryOp::Sub, PREC_ADD),
                "~" => binary(BinaryOp::Concat, PREC_CONCAT),
                "*" => binary(BinaryOp::Mul, PREC_MUL),
                "/" => binary(BinaryOp::Div, PREC_MUL),
                "%" => binary(BinaryOp::Rem, PREC_MUL),
                _ => None,
            },
            Token::Name(name) => match (name.as_str(), self.peek_at(1)) {
                ("or", _) => binary(BinaryOp::Or, PREC_OR),
                ("and", _) => binary(BinaryOp::And, PREC_AND),
                ("in", _) => binary(BinaryOp::In, PREC_COMPARE),
                ("contains", _) => binary(BinaryOp::Contains, PREC_COMPARE),
                ("matches", _) => Some((Infix::Matches, PREC_COMPARE, 1)),
                ("not", Token::Name(next)) if next == "in" => {
                    Some((Infix::Binary(BinaryOp::NotIn), PREC_COMPARE, 2))
                }
                ("starts", Token::Name(next)) if next == "with" => {
                    Some((Infix::Binary(BinaryOp::StartsWith), PREC_COMPARE, 2))
                }
                ("ends", Token::Name(next)) if next == "with" => {
                    Some((Infix::Binary(BinaryOp::EndsWith), PREC_COMPARE, 2))
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Symbol("!") => {
                self.advance();
                let operand = self.expression(PREC_NOT)?;
                Ok(Expr::Unary(UnaryOp::Not, Box::new(operand)))
            }
            Token::Name(name) if name == "not" => {
                self.advance();
                let operand = self.expression(PREC_NOT)?;
                Ok(Expr::Unary(UnaryOp::Not, Box::new(operand)))
            }
            Token::Symbol("-") => {
                self.advance();
                let operand = self.unary()?;
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand)))
            }
            Token::Symbol("+") => {
                self.advance();
                self.unary()
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;

        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    match self.advance() {
                        Token::Name(member) => expr = Expr::Member(Box::new(expr), member),
                        other => {
                            return Err(self.error(format!(
                                "expected a member name after '.', found {}",
                                describe(&other)
                            )));
                        }
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.expression(0)?;
                    self.expect(Token::RBracket, "']'")?;
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let offset = self.offset();

        match self.advance() {
            Token::Int(i) => Ok(Expr::Literal(Value::from(i))),
            Token::Float(f) => Ok(Expr::Literal(Value::from(f))),
            Token::Str(s) => Ok(Expr::Literal(Value::from(s))),
            Token::Name(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                _ if self.variables.contains(&name.as_str()) => Ok(Expr::Variable(name)),
                _ => Err(ParseError::new(
                    format!(
                        "unknown variable '{name}' (available: {})",
                        self.variables.join(", ")
                    ),
                    offset,
                )),
            },
            Token::LParen => {
                let expr = self.expression(0)?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            Token::LBracket => {
                let mut items = Vec::new();
                if *self.peek() != Token::RBracket {
                    loop {
                        items.push(self.expression(0)?);
                        if *self.peek() == Token::Comma {
                            self.advance();
                            // trailing comma
                            if *self.peek() == Token::RBracket {
                                break;
                            }
                        } else {
                            break;
                        }
                    }
                }
                self.expect(Token::RBracket, "']'")?;
                Ok(Expr::Array(items))
            }
            other => Err(ParseError::new(
                format!("unexpected {}", describe(&other)),
                offset,
            )),
        }
    }

    /// The right-hand side of `matches` must be a literal so that it compiles
    /// once, here.
    fn pattern(&mut self) -> Result<Regex, ParseError> {
        let offset = self.offset();

        let (pattern, flags) = match self.advance() {
            Token::Regex(literal) => split_delimited(&literal),
            Token::Str(s) if s.starts_with('/') => split_delimited(&s),
            Token::Str(s) => (s, String::new()),
            other => {
                return Err(ParseError::new(
                    format!(
                        "'matches' expects a regular expression literal, found {}",
                        describe(&other)
                    ),
                    offset,
                ));
            }
        };

        let mut builder = RegexBuilder::new(&pattern);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                'u' => builder.unicode(true),
                other => {
                    return Err(ParseError::new(
                        format!("unsupported regular expression flag '{other}'"),
                        offset,
                    ));
                }
            };
        }

        builder
            .build()
            .map_err(|e| ParseError::new(format!("invalid regular expression: {e}"), offset))
    }
}

/// `/body/flags` into `(body, flags)`; the escaped delimiter is unescaped.
fn split_delimited(literal: &str) -> (String, String) {
    let inner = &literal[1..];
    match inner.rfind('/') {
        Some(end) => (inner[..end].replace("\\/", "/"), inner[end + 1..].to_string()),
        None => (inner.to_string(), String::new()),
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Int(i) => format!("number {i}"),
        Token::Float(f) => format!("number {f}"),
        Token::Str(s) => format!("string '{s}'"),
        Token::Name(n) => format!("'{n}'"),
        Token::Symbol(s) => format!("'{s}'"),
        Token::Regex(r) => format!("regular expression {r}"),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::LBracket => "'['".into(),
        Token::RBracket => "']'".into(),
        Token::Comma => "','".into(),
        Token::Dot => "'.'".into(),
        Token::Eof => "end of expression".into(),
    }
}
