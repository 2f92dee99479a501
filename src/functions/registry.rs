// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;

use crate::error::Result;
use crate::schema::Type;

use super::catalog::{FunctionCatalogConfig, FunctionGroupConfig};
use super::matching::matches_signature;
use super::spec::{CatalogError, FunctionSignature, ParamType, ReturnRule};

const BUILTIN_FUNCTIONS_JSON: &str = include_str!("./functions.json");

/// Read-only view of the scalar functions available to an expression.
///
/// Names are compared case-insensitively.
pub trait FunctionCatalog {
    fn contains(&self, name: &str) -> bool;

    /// The first overload of `name` accepting `arg_types`.
    fn lookup(&self, name: &str, arg_types: &[Type]) -> Option<&FunctionSignature>;
}

/// Overloads of scalar functions keyed by upper-cased name.
///
/// Overloads of one name are tried in registration order. A registry is
/// mutated while it is being assembled and then shared read-only, typically
/// behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    entries: BTreeMap<String, Vec<FunctionSignature>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in scalar functions.
    pub fn builtin() -> Arc<FunctionRegistry> {
        BUILTIN_REGISTRY.clone()
    }

    /// A mutable copy of the built-in functions, for adding user functions.
    pub fn with_builtins() -> Self {
        FunctionRegistry::clone(&BUILTIN_REGISTRY)
    }

    pub fn from_json(json: &str) -> core::result::Result<Self, CatalogError> {
        let mut registry = FunctionRegistry::new();
        registry.extend_from_json(json)?;
        Ok(registry)
    }

    /// Register every signature of a JSON catalog document.
    ///
    /// Either every signature is registered or, on error, the registry is left
    /// untouched.
    pub fn extend_from_json(&mut self, json: &str) -> core::result::Result<(), CatalogError> {
        let mut staged = self.clone();
        staged.register_catalog(json)?;
        *self = staged;
        Ok(())
    }

    fn register_catalog(&mut self, json: &str) -> core::result::Result<(), CatalogError> {
        let mut catalog: FunctionCatalogConfig = serde_json::from_str(json)?;

        if !catalog.functions.is_empty() {
            catalog.groups.push(FunctionGroupConfig {
                name: "default".to_owned(),
                functions: core::mem::take(&mut catalog.functions),
            });
        }

        for group in catalog.groups {
            debug!(
                "registering {} functions from group `{}`",
                group.functions.len(),
                group.name
            );
            for function in group.functions {
                for cfg in function.signatures {
                    let params = cfg.params.into_iter().map(|p| p.into_param()).collect();
                    let mut signature = FunctionSignature::build(
                        &function.name,
                        params,
                        cfg.variadic,
                        cfg.returns.into_rule(),
                    )?;
                    if let Some(description) = &function.description {
                        signature = signature.with_description(description.clone());
                    }
                    self.register(signature)?;
                }
            }
        }

        Ok(())
    }

    /// Add an overload. Fails if an overload with the same parameters exists.
    pub fn register(&mut self, signature: FunctionSignature) -> core::result::Result<(), CatalogError> {
        let overloads = self.entries.entry(signature.name().to_owned()).or_default();
        if overloads.iter().any(|s| s.same_parameters(&signature)) {
            return Err(CatalogError::DuplicateSignature {
                name: signature.name().to_owned(),
                signature: signature.to_string(),
            });
        }
        overloads.push(signature);
        Ok(())
    }

    /// Register a fixed-arity overload whose return type is computed by `f`.
    pub fn register_fn<F>(
        &mut self,
        name: &str,
        params: Vec<ParamType>,
        f: F,
    ) -> core::result::Result<(), CatalogError>
    where
        F: Fn(&[Type]) -> Result<Type> + Send + Sync + 'static,
    {
        let signature = FunctionSignature::new(name, params, ReturnRule::Custom(Arc::new(f)))?;
        self.register(signature)
    }

    /// Registered overloads of `name`, in resolution order.
    pub fn signatures(&self, name: &str) -> &[FunctionSignature] {
        self.entries
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FunctionCatalog for FunctionRegistry {
    fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_uppercase())
    }

    fn lookup(&self, name: &str, arg_types: &[Type]) -> Option<&FunctionSignature> {
        self.signatures(name)
            .iter()
            .find(|signature| matches_signature(signature, arg_types))
    }
}

impl<C: FunctionCatalog + ?Sized> FunctionCatalog for Arc<C> {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }

    fn lookup(&self, name: &str, arg_types: &[Type]) -> Option<&FunctionSignature> {
        (**self).lookup(name, arg_types)
    }
}

lazy_static! {
    static ref BUILTIN_REGISTRY: Arc<FunctionRegistry> = Arc::new(
        FunctionRegistry::from_json(BUILTIN_FUNCTIONS_JSON)
            .expect("failed to load builtin function catalog")
    );
}
