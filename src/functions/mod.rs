// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scalar function signatures and overload resolution.

mod catalog;
mod matching;
mod registry;
mod spec;

#[cfg(test)]
mod tests;

use log::trace;

use crate::error::{Result, TypeError};
use crate::schema::Type;

pub use matching::{matches_param, matches_signature};
pub use registry::{FunctionCatalog, FunctionRegistry};
pub use spec::{CatalogError, FunctionSignature, ParamType, ReturnFn, ReturnRule};

/// Result type of calling `name` with arguments of `arg_types`.
pub fn resolve(catalog: &dyn FunctionCatalog, name: &str, arg_types: &[Type]) -> Result<Type> {
    let name = name.to_ascii_uppercase();
    if !catalog.contains(&name) {
        return Err(TypeError::UnknownFunction { name, span: None });
    }

    let Some(signature) = catalog.lookup(&name, arg_types) else {
        return Err(TypeError::NoMatchingSignature {
            name,
            arg_types: arg_types.to_vec(),
            span: None,
        });
    };

    let ty = signature.return_type(arg_types)?;
    trace!("resolved {signature} -> {ty}");
    Ok(ty)
}
