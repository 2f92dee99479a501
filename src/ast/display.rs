// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;

use super::expr::*;
use super::literals::Literal;
use crate::schema::CaseSensitivity;

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(v) => write!(f, "{v}"),
            Literal::Long(v) => write!(f, "{v}"),
            Literal::Double(v) => write!(f, "{v:?}"),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Boolean(true) => f.write_str("true"),
            Literal::Boolean(false) => f.write_str("false"),
        }
    }
}

/// Renders an expression with its identifiers folded the way a schema folds
/// them, so diagnostics name columns and fields consistently.
pub struct CanonicalExpr<'a> {
    expr: &'a Expr,
    case: CaseSensitivity,
}

impl Expr {
    pub fn canonical(&self, case: CaseSensitivity) -> CanonicalExpr<'_> {
        CanonicalExpr { expr: self, case }
    }
}

impl fmt::Display for CanonicalExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.expr, Some(self.case))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, None)
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str, case: Option<CaseSensitivity>) -> fmt::Result {
    match case {
        Some(case) => f.write_str(&case.canonical(name)),
        None => f.write_str(name),
    }
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    items: &[Expr],
    case: Option<CaseSensitivity>,
) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write_expr(f, item, case)?;
    }
    Ok(())
}

fn write_binary<Op: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    left: &Expr,
    op: Op,
    right: &Expr,
    case: Option<CaseSensitivity>,
) -> fmt::Result {
    f.write_str("(")?;
    write_expr(f, left, case)?;
    write!(f, " {op} ")?;
    write_expr(f, right, case)?;
    f.write_str(")")
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, case: Option<CaseSensitivity>) -> fmt::Result {
    match expr {
        Expr::Literal(e) => write!(f, "{}", e.value),
        Expr::Column(c) => {
            if let Some(qualifier) = &c.qualifier {
                write_name(f, qualifier, case)?;
                f.write_str(".")?;
            }
            write_name(f, &c.name, case)
        }
        Expr::Arithmetic(e) => write_binary(f, &e.left, e.op, &e.right, case),
        Expr::Comparison(e) => write_binary(f, &e.left, e.op, &e.right, case),
        Expr::Like(e) => write_binary(f, &e.value, "LIKE", &e.pattern, case),
        Expr::NotLike(e) => write_binary(f, &e.value, "NOT LIKE", &e.pattern, case),
        Expr::Logical(e) => match e.operands.as_slice() {
            [operand] => {
                write!(f, "({} ", e.op)?;
                write_expr(f, operand, case)?;
                f.write_str(")")
            }
            operands => {
                f.write_str("(")?;
                for (idx, operand) in operands.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " {} ", e.op)?;
                    }
                    write_expr(f, operand, case)?;
                }
                f.write_str(")")
            }
        },
        Expr::FunctionCall(c) => {
            // Function names are case-insensitive under every schema policy.
            match case {
                Some(_) => f.write_str(&c.name.to_ascii_uppercase())?,
                None => f.write_str(&c.name)?,
            }
            f.write_str("(")?;
            write_list(f, &c.args, case)?;
            f.write_str(")")
        }
        Expr::FieldAccess(a) => {
            write_expr(f, &a.base, case)?;
            f.write_str("->")?;
            write_name(f, &a.field, case)
        }
        Expr::Subscript(s) => {
            write_expr(f, &s.base, case)?;
            f.write_str("[")?;
            write_expr(f, &s.index, case)?;
            f.write_str("]")
        }
        Expr::Subquery(q) => {
            f.write_str("(SELECT ")?;
            for (idx, field) in q.schema.fields().iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&field.name)?;
            }
            if let Some(name) = q.schema.name() {
                write!(f, " FROM {name}")?;
            }
            f.write_str(")")
        }
    }
}
