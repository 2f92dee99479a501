// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod ast;
mod engine;
pub mod error;
pub mod functions;
pub mod promotion;
pub mod schema;

pub use ast::{Expr, Literal, Span};
pub use engine::{get_expression_type, InferenceOptions, TypeInferrer};
pub use error::{ErrorKind, TypeError};
pub use functions::{
    resolve, CatalogError, FunctionCatalog, FunctionRegistry, FunctionSignature, ParamType,
    ReturnRule,
};
pub use schema::{CaseSensitivity, Field, Schema, SchemaBuilder, SchemaError, Type};

#[cfg(test)]
mod tests;
