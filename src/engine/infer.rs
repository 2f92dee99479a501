// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::{BinaryExpr, ColumnRef, Expr, FunctionCall, LikeExpr, LogicalExpr, Subquery};
use crate::error::{Result, TypeError};
use crate::functions::{self, FunctionCatalog};
use crate::promotion::{
    arithmetic_result, comparison_result, like_result, logical_result, ArithmeticOp,
    ComparisonOp,
};
use crate::schema::{Schema, Type};

pub(super) struct Inferrer<'a> {
    pub(super) schema: &'a Schema,
    functions: &'a dyn FunctionCatalog,
    max_depth: usize,
}

impl<'a> Inferrer<'a> {
    pub(super) fn new(
        schema: &'a Schema,
        functions: &'a dyn FunctionCatalog,
        max_depth: usize,
    ) -> Self {
        Self {
            schema,
            functions,
            max_depth,
        }
    }

    /// Run `f` for a node at nesting level `depth`, attaching the node's span
    /// to any error that does not carry a more precise one.
    pub(super) fn guarded<T>(
        &self,
        expr: &Expr,
        depth: usize,
        f: impl FnOnce(usize) -> Result<T>,
    ) -> Result<T> {
        if depth > self.max_depth {
            return Err(TypeError::NestingTooDeep {
                limit: self.max_depth,
                span: expr.span().copied(),
            });
        }
        f(depth + 1).map_err(|err| err.located(expr.span()))
    }

    /// `depth` is the nesting level of `expr`, starting at 1 for the root.
    pub(super) fn infer(&self, expr: &Expr, depth: usize) -> Result<Type> {
        self.guarded(expr, depth, |depth| match *expr {
            Expr::Literal(ref literal) => Ok(literal.value.data_type()),
            Expr::Column(ref column) => self.infer_column(column),
            Expr::Arithmetic(ref arithmetic) => self.infer_arithmetic(arithmetic, depth),
            Expr::Comparison(ref comparison) => self.infer_comparison(comparison, depth),
            Expr::Like(ref like) => self.infer_like(like, false, depth),
            Expr::NotLike(ref like) => self.infer_like(like, true, depth),
            Expr::Logical(ref logical) => self.infer_logical(logical, depth),
            Expr::FunctionCall(ref call) => self.infer_call(call, depth),
            Expr::FieldAccess(ref access) => {
                self.infer_field_access(access, depth).map(|nav| nav.ty)
            }
            Expr::Subscript(ref subscript) => {
                self.infer_subscript(subscript, depth).map(|nav| nav.ty)
            }
            Expr::Subquery(ref subquery) => self.infer_subquery(subquery),
        })
    }

    fn infer_column(&self, column: &ColumnRef) -> Result<Type> {
        let resolved = self.schema.resolve_column(&column.qualified_name())?;
        Ok(resolved.ty.clone())
    }

    fn infer_arithmetic(&self, expr: &BinaryExpr<ArithmeticOp>, depth: usize) -> Result<Type> {
        let lhs = self.infer(&expr.left, depth)?;
        let rhs = self.infer(&expr.right, depth)?;
        arithmetic_result(expr.op, &lhs, &rhs)
    }

    fn infer_comparison(&self, expr: &BinaryExpr<ComparisonOp>, depth: usize) -> Result<Type> {
        let lhs = self.infer(&expr.left, depth)?;
        let rhs = self.infer(&expr.right, depth)?;
        comparison_result(expr.op, &lhs, &rhs)
    }

    fn infer_like(&self, expr: &LikeExpr, negated: bool, depth: usize) -> Result<Type> {
        let value = self.infer(&expr.value, depth)?;
        let pattern = self.infer(&expr.pattern, depth)?;
        like_result(negated, &value, &pattern)
    }

    fn infer_logical(&self, expr: &LogicalExpr, depth: usize) -> Result<Type> {
        if expr.operands.len() != expr.op.arity() {
            return Err(TypeError::unsupported(format!(
                "Operator {} expects {} operand(s) but found {}.",
                expr.op,
                expr.op.arity(),
                expr.operands.len()
            )));
        }
        let operands = expr
            .operands
            .iter()
            .map(|operand| self.infer(operand, depth))
            .collect::<Result<Vec<_>>>()?;
        logical_result(expr.op, &operands)
    }

    fn infer_call(&self, call: &FunctionCall, depth: usize) -> Result<Type> {
        let arg_types = call
            .args
            .iter()
            .map(|arg| self.infer(arg, depth))
            .collect::<Result<Vec<_>>>()?;
        functions::resolve(self.functions, &call.name, &arg_types)
    }

    fn infer_subquery(&self, subquery: &Subquery) -> Result<Type> {
        match subquery.schema.fields() {
            [column] => Ok(column.ty.clone()),
            columns => Err(TypeError::unsupported(format!(
                "Subquery must return exactly one column but returns {}.",
                columns.len()
            ))),
        }
    }
}
