//! AST for compiled match expressions.
//!
//! Deliberately limited to comparison and boolean nodes over the two fixed
//! record maps — there is nothing here that can loop, call, or compute.

/// Which record an attribute reference reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

/// `source.attr` or `target.attr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrRef {
    pub side: Side,
    pub attribute: String,
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Attr(AttrRef),
    Literal(String),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Contains,
    StartsWith,
    EndsWith,
}

/// A boolean expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Cmp {
        op: CmpOp,
        lhs: Operand,
        rhs: Operand,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}
