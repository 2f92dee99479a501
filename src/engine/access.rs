// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use log::trace;

use crate::ast::{Expr, FieldAccess, Subscript};
use crate::error::{Result, TypeError};
use crate::promotion::can_promote;
use crate::schema::{resolve_element_type, Type};

use super::infer::Inferrer;

/// Type reached by navigating into a column, with the canonical path of the
/// navigation for diagnostics (e.g. `NESTED_STREAM.ARRAYCOL[0].CATEGORY`).
pub(super) struct Navigated {
    pub(super) ty: Type,
    pub(super) path: String,
}

impl Inferrer<'_> {
    /// Infer the base of a field access or subscript, keeping track of its
    /// path.
    fn navigate(&self, expr: &Expr, depth: usize) -> Result<Navigated> {
        match *expr {
            Expr::Column(ref column) => self.guarded(expr, depth, |_| {
                let resolved = self.schema.resolve_column(&column.qualified_name())?;
                Ok(Navigated {
                    ty: resolved.ty.clone(),
                    path: resolved.path,
                })
            }),
            Expr::FieldAccess(ref access) => {
                self.guarded(expr, depth, |depth| self.infer_field_access(access, depth))
            }
            Expr::Subscript(ref subscript) => {
                self.guarded(expr, depth, |depth| self.infer_subscript(subscript, depth))
            }
            _ => Ok(Navigated {
                ty: self.infer(expr, depth)?,
                path: expr.canonical(self.schema.case_sensitivity()).to_string(),
            }),
        }
    }

    pub(super) fn infer_field_access(
        &self,
        access: &FieldAccess,
        depth: usize,
    ) -> Result<Navigated> {
        let base = self.navigate(&access.base, depth)?;
        let ty = self
            .schema
            .resolve_struct_field(&base.ty, &access.field, &base.path)?
            .clone();
        let path = format!("{}.{}", base.path, self.schema.canonical(&access.field));
        trace!("field {path} : {ty}");
        Ok(Navigated { ty, path })
    }

    pub(super) fn infer_subscript(&self, subscript: &Subscript, depth: usize) -> Result<Navigated> {
        let base = self.navigate(&subscript.base, depth)?;
        let index = self.infer(&subscript.index, depth)?;
        let ty = resolve_element_type(&base.ty, &base.path)?.clone();

        match base.ty {
            Type::Array { .. } if !index.is_integral() => {
                return Err(TypeError::mismatch(format!(
                    "Array index of {} must be INT32 or INT64 but found {index}.",
                    base.path
                ))
                .located(subscript.index.span()));
            }
            Type::Map { ref key, .. } if !can_promote(&index, key) => {
                return Err(TypeError::mismatch(format!(
                    "Map key of {} must be {key} but found {index}.",
                    base.path
                ))
                .located(subscript.index.span()));
            }
            _ => {}
        }

        let path = format!(
            "{}[{}]",
            base.path,
            subscript.index.canonical(self.schema.case_sensitivity())
        );
        trace!("element {path} : {ty}");
        Ok(Navigated { ty, path })
    }
}
