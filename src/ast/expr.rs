#![allow(clippy::missing_const_for_fn, clippy::should_implement_trait)]
// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};

use super::literals::Literal;
use super::span::Span;
use crate::promotion::{ArithmeticOp, ComparisonOp, LogicalOp};
use crate::schema::Schema;

/// Expression node
///
/// Trees are built by the parser (or by hand with the builder methods below)
/// and are never mutated by type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Literal(LiteralExpr),
    Column(ColumnRef),
    Arithmetic(BinaryExpr<ArithmeticOp>),
    Comparison(BinaryExpr<ComparisonOp>),
    Like(LikeExpr),
    NotLike(LikeExpr),
    Logical(LogicalExpr),
    FunctionCall(FunctionCall),
    FieldAccess(FieldAccess),
    Subscript(Subscript),
    Subquery(Subquery),
}

/// Constant value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub value: Literal,
}

/// Reference to a column of the row schema, optionally qualified by the
/// relation or alias it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    /// The dotted name used to look the column up in a schema.
    pub fn qualified_name(&self) -> String {
        match &self.qualifier {
            Some(qualifier) => format!("{qualifier}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Binary operator applied to two operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr<Op> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub op: Op,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// `value LIKE pattern`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub value: Box<Expr>,
    pub pattern: Box<Expr>,
}

/// AND/OR over two operands, NOT over one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub op: LogicalOp,
    pub operands: Vec<Expr>,
}

/// Scalar function call (e.g. SUBSTRING(col1, 1, 3))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

/// Struct member access (e.g. address->zipcode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub base: Box<Expr>,
    pub field: String,
}

/// Array element or map value (e.g. arraycol[0])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub base: Box<Expr>,
    pub index: Box<Expr>,
}

/// Scalar subquery, represented by the schema of its output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subquery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub schema: Schema,
}

impl Expr {
    pub fn literal(value: impl Into<Literal>) -> Self {
        Expr::Literal(LiteralExpr {
            span: None,
            value: value.into(),
        })
    }

    /// Integer literal, `INT32` when the value fits and `INT64` otherwise.
    pub fn int(value: i64) -> Self {
        Self::literal(Literal::int(value))
    }

    pub fn long(value: i64) -> Self {
        Self::literal(Literal::Long(value))
    }

    pub fn double(value: f64) -> Self {
        Self::literal(Literal::Double(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::literal(Literal::Boolean(value))
    }

    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(ColumnRef {
            span: None,
            qualifier: None,
            name: name.into(),
        })
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Expr::Column(ColumnRef {
            span: None,
            qualifier: Some(qualifier.into()),
            name: name.into(),
        })
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FunctionCall(FunctionCall {
            span: None,
            name: name.into(),
            args,
        })
    }

    pub fn subquery(schema: Schema) -> Self {
        Expr::Subquery(Subquery { span: None, schema })
    }

    pub fn arithmetic(op: ArithmeticOp, left: Expr, right: Expr) -> Self {
        Expr::Arithmetic(BinaryExpr {
            span: None,
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn comparison(op: ComparisonOp, left: Expr, right: Expr) -> Self {
        Expr::Comparison(BinaryExpr {
            span: None,
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logical(op: LogicalOp, operands: Vec<Expr>) -> Self {
        Expr::Logical(LogicalExpr {
            span: None,
            op,
            operands,
        })
    }

    pub fn not(operand: Expr) -> Self {
        Self::logical(LogicalOp::Not, vec![operand])
    }

    pub fn add(self, rhs: Expr) -> Self {
        Self::arithmetic(ArithmeticOp::Add, self, rhs)
    }

    pub fn sub(self, rhs: Expr) -> Self {
        Self::arithmetic(ArithmeticOp::Sub, self, rhs)
    }

    pub fn mul(self, rhs: Expr) -> Self {
        Self::arithmetic(ArithmeticOp::Mul, self, rhs)
    }

    pub fn div(self, rhs: Expr) -> Self {
        Self::arithmetic(ArithmeticOp::Div, self, rhs)
    }

    pub fn rem(self, rhs: Expr) -> Self {
        Self::arithmetic(ArithmeticOp::Mod, self, rhs)
    }

    pub fn eq(self, rhs: Expr) -> Self {
        Self::comparison(ComparisonOp::Eq, self, rhs)
    }

    pub fn ne(self, rhs: Expr) -> Self {
        Self::comparison(ComparisonOp::Ne, self, rhs)
    }

    pub fn lt(self, rhs: Expr) -> Self {
        Self::comparison(ComparisonOp::Lt, self, rhs)
    }

    pub fn le(self, rhs: Expr) -> Self {
        Self::comparison(ComparisonOp::Le, self, rhs)
    }

    pub fn gt(self, rhs: Expr) -> Self {
        Self::comparison(ComparisonOp::Gt, self, rhs)
    }

    pub fn ge(self, rhs: Expr) -> Self {
        Self::comparison(ComparisonOp::Ge, self, rhs)
    }

    pub fn like(self, pattern: Expr) -> Self {
        Expr::Like(LikeExpr {
            span: None,
            value: Box::new(self),
            pattern: Box::new(pattern),
        })
    }

    pub fn not_like(self, pattern: Expr) -> Self {
        Expr::NotLike(LikeExpr {
            span: None,
            value: Box::new(self),
            pattern: Box::new(pattern),
        })
    }

    pub fn and(self, rhs: Expr) -> Self {
        Self::logical(LogicalOp::And, vec![self, rhs])
    }

    pub fn or(self, rhs: Expr) -> Self {
        Self::logical(LogicalOp::Or, vec![self, rhs])
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::FieldAccess(FieldAccess {
            span: None,
            base: Box::new(self),
            field: name.into(),
        })
    }

    pub fn subscript(self, index: Expr) -> Self {
        Expr::Subscript(Subscript {
            span: None,
            base: Box::new(self),
            index: Box::new(index),
        })
    }

    /// Attach a source position to this node.
    pub fn at(mut self, span: Span) -> Self {
        *self.span_mut() = Some(span);
        self
    }

    pub fn span(&self) -> Option<&Span> {
        match self {
            Expr::Literal(e) => e.span.as_ref(),
            Expr::Column(e) => e.span.as_ref(),
            Expr::Arithmetic(e) => e.span.as_ref(),
            Expr::Comparison(e) => e.span.as_ref(),
            Expr::Like(e) | Expr::NotLike(e) => e.span.as_ref(),
            Expr::Logical(e) => e.span.as_ref(),
            Expr::FunctionCall(e) => e.span.as_ref(),
            Expr::FieldAccess(e) => e.span.as_ref(),
            Expr::Subscript(e) => e.span.as_ref(),
            Expr::Subquery(e) => e.span.as_ref(),
        }
    }

    fn span_mut(&mut self) -> &mut Option<Span> {
        match self {
            Expr::Literal(e) => &mut e.span,
            Expr::Column(e) => &mut e.span,
            Expr::Arithmetic(e) => &mut e.span,
            Expr::Comparison(e) => &mut e.span,
            Expr::Like(e) | Expr::NotLike(e) => &mut e.span,
            Expr::Logical(e) => &mut e.span,
            Expr::FunctionCall(e) => &mut e.span,
            Expr::FieldAccess(e) => &mut e.span,
            Expr::Subscript(e) => &mut e.span,
            Expr::Subquery(e) => &mut e.span,
        }
    }
}
