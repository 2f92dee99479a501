// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::sync::Arc;

use crate::error::{Result, TypeError};
use crate::promotion::widen;
use crate::schema::Type;

/// Accepted argument type at one parameter position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// The type itself, or any type promotable to it.
    Exact(Type),
    Numeric,
    AnyArray,
    AnyMap,
    AnyStruct,
    Any,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Exact(ty) => write!(f, "{ty}"),
            ParamType::Numeric => f.write_str("NUMERIC"),
            ParamType::AnyArray => f.write_str("ARRAY<ANY>"),
            ParamType::AnyMap => f.write_str("MAP<ANY, ANY>"),
            ParamType::AnyStruct => f.write_str("STRUCT<ANY>"),
            ParamType::Any => f.write_str("ANY"),
        }
    }
}

/// Computes a return type from resolved argument types.
pub type ReturnFn = Arc<dyn Fn(&[Type]) -> Result<Type> + Send + Sync>;

/// How the return type of a signature is derived.
#[derive(Clone)]
pub enum ReturnRule {
    Fixed(Type),
    SameAsArgument(usize),
    /// The widest numeric type among the arguments.
    WidestNumeric,
    /// Element type of an array argument, or value type of a map argument.
    ElementOf(usize),
    Custom(ReturnFn),
}

impl fmt::Debug for ReturnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnRule::Fixed(ty) => f.debug_tuple("Fixed").field(ty).finish(),
            ReturnRule::SameAsArgument(idx) => f.debug_tuple("SameAsArgument").field(idx).finish(),
            ReturnRule::WidestNumeric => f.write_str("WidestNumeric"),
            ReturnRule::ElementOf(idx) => f.debug_tuple("ElementOf").field(idx).finish(),
            ReturnRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl ReturnRule {
    fn argument_index(&self) -> Option<usize> {
        match self {
            ReturnRule::SameAsArgument(idx) | ReturnRule::ElementOf(idx) => Some(*idx),
            _ => None,
        }
    }
}

/// One overload of a scalar function.
#[derive(Clone, Debug)]
pub struct FunctionSignature {
    name: String,
    params: Box<[ParamType]>,
    variadic: bool,
    returns: ReturnRule,
    description: Option<String>,
}

impl FunctionSignature {
    pub fn new(
        name: &str,
        params: Vec<ParamType>,
        returns: ReturnRule,
    ) -> core::result::Result<Self, CatalogError> {
        Self::build(name, params, false, returns)
    }

    /// A signature whose last parameter accepts one or more arguments.
    pub fn variadic(
        name: &str,
        params: Vec<ParamType>,
        returns: ReturnRule,
    ) -> core::result::Result<Self, CatalogError> {
        Self::build(name, params, true, returns)
    }

    pub(super) fn build(
        name: &str,
        params: Vec<ParamType>,
        variadic: bool,
        returns: ReturnRule,
    ) -> core::result::Result<Self, CatalogError> {
        let name = name.trim().to_ascii_uppercase();
        if name.is_empty() {
            return Err(CatalogError::InvalidSignature {
                name,
                detail: "function name is empty".to_owned(),
            });
        }

        if variadic && params.is_empty() {
            return Err(CatalogError::InvalidSignature {
                name,
                detail: "variadic signature declares no parameters".to_owned(),
            });
        }

        if let Some(idx) = returns.argument_index() {
            if idx >= params.len() {
                return Err(CatalogError::InvalidSignature {
                    detail: format!(
                        "return rule references argument {idx} but only {} parameters defined",
                        params.len()
                    ),
                    name,
                });
            }
        }

        Ok(FunctionSignature {
            name,
            params: params.into_boxed_slice(),
            variadic,
            returns,
            description: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn returns(&self) -> &ReturnRule {
        &self.returns
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether two overloads accept exactly the same parameter lists.
    pub fn same_parameters(&self, other: &FunctionSignature) -> bool {
        self.variadic == other.variadic && self.params == other.params
    }

    /// Derive the return type for arguments already accepted by this signature.
    pub fn return_type(&self, args: &[Type]) -> Result<Type> {
        match &self.returns {
            ReturnRule::Fixed(ty) => Ok(ty.clone()),
            ReturnRule::SameAsArgument(idx) => args
                .get(*idx)
                .cloned()
                .ok_or_else(|| self.missing_argument(*idx)),
            ReturnRule::WidestNumeric => args
                .iter()
                .filter(|ty| ty.is_numeric())
                .cloned()
                .reduce(|widest, ty| widen(&widest, &ty).unwrap_or(widest))
                .ok_or_else(|| {
                    TypeError::mismatch(format!(
                        "Function '{}' requires at least one numeric argument.",
                        self.name
                    ))
                }),
            ReturnRule::ElementOf(idx) => {
                let arg = args.get(*idx).ok_or_else(|| self.missing_argument(*idx))?;
                arg.element_type().cloned().ok_or_else(|| {
                    TypeError::mismatch(format!(
                        "Function '{}' expects an ARRAY or MAP at argument {} but found {arg}.",
                        self.name,
                        idx + 1
                    ))
                })
            }
            ReturnRule::Custom(f) => f(args),
        }
    }

    fn missing_argument(&self, idx: usize) -> TypeError {
        TypeError::unsupported(format!(
            "Function '{}' has no argument at position {}.",
            self.name,
            idx + 1
        ))
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

/// Errors raised while building a function catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse function catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate signature {signature} for function `{name}`")]
    DuplicateSignature { name: String, signature: String },

    #[error("function `{name}` has invalid signature: {detail}")]
    InvalidSignature { name: String, detail: String },
}
