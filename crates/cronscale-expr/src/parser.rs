//! Recursive-descent parser producing an [`Expr`] tree.
//!
//! Precedence, lowest first:
//!
//! ```text
//! ?:          (right-associative)
//! ||
//! &&
//! == != < <= > >=   (non-associative)
//! + -
//! * / %
//! unary - !
//! ```

use crate::error::{ExprError, ExprResult};
use crate::lexer::{Spanned, Token, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Short-circuiting boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Bool(bool),
    Var(String),
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// Maximum nesting of a formula, counted both as parser recursion
/// (parentheses, unary operators, conditionals) and as tree height.
pub const MAX_DEPTH: usize = 128;

/// Parse a formula into an expression tree.
///
/// The resulting tree is at most [`MAX_DEPTH`] levels deep.
pub fn parse(input: &str) -> ExprResult<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let (expr, _) = parser.ternary()?;
    match parser.peek() {
        None => Ok(expr),
        Some((token, pos)) => Err(ExprError::UnexpectedToken {
            found: token.to_string(),
            pos: *pos,
            expected: "end of formula",
        }),
    }
}

/// An expression and its height.
type Node = (Expr, usize);

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Current recursion depth.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek_token() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> ExprResult<()> {
        match self.advance() {
            Some((token, _)) if token == expected => Ok(()),
            Some((token, pos)) => Err(ExprError::UnexpectedToken {
                found: token.to_string(),
                pos,
                expected: what,
            }),
            None => Err(ExprError::UnexpectedEnd(what)),
        }
    }

    fn enter(&mut self) -> ExprResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn ternary(&mut self) -> ExprResult<Node> {
        self.enter()?;
        let node = self.conditional()?;
        self.depth -= 1;
        Ok(node)
    }

    fn conditional(&mut self) -> ExprResult<Node> {
        let (cond, cond_height) = self.or()?;
        if !self.eat(&Token::Question) {
            return Ok((cond, cond_height));
        }
        let (then, then_height) = self.ternary()?;
        self.expect(Token::Colon, "':'")?;
        let (otherwise, otherwise_height) = self.ternary()?;
        let height = parent(cond_height.max(then_height).max(otherwise_height))?;
        Ok((
            Expr::Conditional {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            height,
        ))
    }

    fn or(&mut self) -> ExprResult<Node> {
        let (mut lhs, mut height) = self.and()?;
        while self.eat(&Token::OrOr) {
            let (rhs, rhs_height) = self.and()?;
            height = parent(height.max(rhs_height))?;
            lhs = logical(LogicalOp::Or, lhs, rhs);
        }
        Ok((lhs, height))
    }

    fn and(&mut self) -> ExprResult<Node> {
        let (mut lhs, mut height) = self.compare()?;
        while self.eat(&Token::AndAnd) {
            let (rhs, rhs_height) = self.compare()?;
            height = parent(height.max(rhs_height))?;
            lhs = logical(LogicalOp::And, lhs, rhs);
        }
        Ok((lhs, height))
    }

    fn compare(&mut self) -> ExprResult<Node> {
        let (lhs, lhs_height) = self.additive()?;
        let op = match self.peek_token() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::Ne,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            _ => return Ok((lhs, lhs_height)),
        };
        self.pos += 1;
        let (rhs, rhs_height) = self.additive()?;
        let height = parent(lhs_height.max(rhs_height))?;
        Ok((binary(op, lhs, rhs), height))
    }

    fn additive(&mut self) -> ExprResult<Node> {
        let (mut lhs, mut height) = self.term()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok((lhs, height)),
            };
            self.pos += 1;
            let (rhs, rhs_height) = self.term()?;
            height = parent(height.max(rhs_height))?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> ExprResult<Node> {
        let (mut lhs, mut height) = self.unary()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok((lhs, height)),
            };
            self.pos += 1;
            let (rhs, rhs_height) = self.unary()?;
            height = parent(height.max(rhs_height))?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> ExprResult<Node> {
        let op = match self.peek_token() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Bang) => UnaryOp::Not,
            _ => return self.primary(),
        };
        self.pos += 1;
        self.enter()?;
        let (expr, height) = self.unary()?;
        self.depth -= 1;
        Ok((
            Expr::Unary {
                op,
                expr: Box::new(expr),
            },
            parent(height)?,
        ))
    }

    fn primary(&mut self) -> ExprResult<Node> {
        match self.advance() {
            Some((Token::Number(n), _)) => Ok((Expr::Number(n), 1)),
            Some((Token::Ident(name), _)) => {
                if name == "true" {
                    Ok((Expr::Bool(true), 1))
                } else if name == "false" {
                    Ok((Expr::Bool(false), 1))
                } else if self.eat(&Token::LParen) {
                    let (args, height) = self.arguments()?;
                    Ok((Expr::Call { name, args }, parent(height)?))
                } else {
                    Ok((Expr::Var(name), 1))
                }
            }
            Some((Token::LParen, _)) => {
                let node = self.ternary()?;
                self.expect(Token::RParen, "')'")?;
                Ok(node)
            }
            Some((token, pos)) => Err(ExprError::UnexpectedToken {
                found: token.to_string(),
                pos,
                expected: "a value",
            }),
            None => Err(ExprError::UnexpectedEnd("a value")),
        }
    }

    /// Arguments after an opening parenthesis, through the closing one,
    /// with the height of the tallest.
    fn arguments(&mut self) -> ExprResult<(Vec<Expr>, usize)> {
        let mut args = Vec::new();
        let mut height = 0;
        if self.eat(&Token::RParen) {
            return Ok((args, height));
        }
        loop {
            let (arg, arg_height) = self.ternary()?;
            args.push(arg);
            height = height.max(arg_height);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen, "',' or ')'")?;
            return Ok((args, height));
        }
    }
}

/// Height of a node whose tallest child is `child` levels high.
fn parent(child: usize) -> ExprResult<usize> {
    let height = child + 1;
    if height > MAX_DEPTH {
        return Err(ExprError::TooDeep(MAX_DEPTH));
    }
    Ok(height)
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn logical(op: LogicalOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Logical {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
