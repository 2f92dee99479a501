// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bottom-up type inference over expression trees.
//!
//! Inference is a pure function of a schema, a function catalog and an
//! expression. Neither input is mutated, so one schema and one catalog can
//! serve any number of concurrent inference calls.

mod access;
mod infer;


use serde::{Deserialize, Serialize};

use crate::ast::Expr;
use crate::error::Result;
use crate::functions::FunctionCatalog;
use crate::schema::{Schema, Type};
use infer::Inferrer;

/// Tunables for a [`TypeInferrer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct InferenceOptions {
    /// Deepest expression nesting accepted before inference gives up with
    /// `NestingTooDeep`.
    pub max_depth: usize,
}

/// Nesting that still fits in the 2 MiB stack of a spawned thread in an
/// unoptimized build.
const DEFAULT_MAX_DEPTH: usize = 1000;

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Computes the result type of expressions evaluated against one row schema.
///
/// # Usage
///
/// ```rust
/// let registry = FunctionRegistry::builtin();
/// let inferrer = TypeInferrer::new(&schema, &registry);
///
/// let expr = Expr::column("COL0").add(Expr::column("COL3"));
/// assert_eq!(inferrer.infer(&expr)?, Type::Float64);
/// ```
#[derive(Clone, Copy)]
pub struct TypeInferrer<'a> {
    schema: &'a Schema,
    functions: &'a dyn FunctionCatalog,
    options: InferenceOptions,
}

impl<'a> TypeInferrer<'a> {
    pub fn new(schema: &'a Schema, functions: &'a dyn FunctionCatalog) -> Self {
        Self {
            schema,
            functions,
            options: InferenceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Type of `expr`, or the first error found in it.
    pub fn infer(&self, expr: &Expr) -> Result<Type> {
        Inferrer::new(self.schema, self.functions, self.options.max_depth).infer(expr, 1)
    }
}

/// Type of `expr` evaluated against `schema`, with default options.
pub fn get_expression_type(
    schema: &Schema,
    functions: &dyn FunctionCatalog,
    expr: &Expr,
) -> Result<Type> {
    TypeInferrer::new(schema, functions).infer(expr)
}
