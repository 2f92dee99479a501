// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Result types of operators.
//!
//! Numeric types form a chain `INT32 < INT64 < FLOAT64`. A binary numeric
//! operation produces the wider of its two operand types.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypeError};
use crate::schema::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Not => "NOT",
        }
    }

    /// Number of operands the connective takes.
    pub fn arity(self) -> usize {
        match self {
            LogicalOp::Not => 1,
            LogicalOp::And | LogicalOp::Or => 2,
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Position of a numeric type in the widening chain.
///
/// This is the only place that knows the numeric lattice; new numeric types
/// are added here.
pub fn numeric_rank(ty: &Type) -> Option<u8> {
    match ty {
        Type::Int32 => Some(0),
        Type::Int64 => Some(1),
        Type::Float64 => Some(2),
        _ => None,
    }
}

/// The wider of two numeric types. `None` if either side is not numeric.
pub fn widen(lhs: &Type, rhs: &Type) -> Option<Type> {
    let (l, r) = (numeric_rank(lhs)?, numeric_rank(rhs)?);
    Some(if l >= r { lhs.clone() } else { rhs.clone() })
}

/// Whether a value of type `from` is accepted where `to` is expected.
pub fn can_promote(from: &Type, to: &Type) -> bool {
    if from == to {
        return true;
    }
    match (numeric_rank(from), numeric_rank(to)) {
        (Some(f), Some(t)) => f <= t,
        _ => false,
    }
}

fn operator_mismatch(op: impl fmt::Display, lhs: &Type, rhs: &Type) -> TypeError {
    TypeError::mismatch(format!(
        "Operator {op} cannot be applied to {lhs} and {rhs}."
    ))
}

pub fn arithmetic_result(op: ArithmeticOp, lhs: &Type, rhs: &Type) -> Result<Type> {
    widen(lhs, rhs).ok_or_else(|| operator_mismatch(op, lhs, rhs))
}

pub fn comparison_result(op: ComparisonOp, lhs: &Type, rhs: &Type) -> Result<Type> {
    let comparable = match (lhs, rhs) {
        (l, r) if l.is_numeric() && r.is_numeric() => true,
        (Type::String, Type::String) => true,
        (Type::Boolean, Type::Boolean) => op.is_equality(),
        _ => false,
    };
    if comparable {
        Ok(Type::Boolean)
    } else {
        Err(operator_mismatch(op, lhs, rhs))
    }
}

pub fn like_result(negated: bool, value: &Type, pattern: &Type) -> Result<Type> {
    if value.is_string() && pattern.is_string() {
        Ok(Type::Boolean)
    } else {
        let op = if negated { "NOT LIKE" } else { "LIKE" };
        Err(operator_mismatch(op, value, pattern))
    }
}

pub fn logical_result(op: LogicalOp, operands: &[Type]) -> Result<Type> {
    if let Some(bad) = operands.iter().find(|t| !t.is_boolean()) {
        return Err(TypeError::mismatch(format!(
            "Operator {op} requires BOOLEAN operands but found {bad}."
        )));
    }
    Ok(Type::Boolean)
}
