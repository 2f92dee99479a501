// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Errors raised while inferring the type of an expression.
//!
//! Every variant renders exactly the message that the query analyzer surfaces
//! to the end user when it rejects a query, so the `Display` output must stay
//! stable. Source positions are kept beside the message and never embedded in
//! it.

use core::fmt;

use crate::ast::Span;
use crate::schema::Type;

pub use crate::functions::CatalogError;
pub use crate::schema::SchemaError;

/// The kind of a [`TypeError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FieldNotFound,
    AmbiguousField,
    NotStructType,
    NotArrayType,
    TypeMismatch,
    UnknownFunction,
    NoMatchingSignature,
    UnsupportedExpression,
    NestingTooDeep,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::FieldNotFound => "FieldNotFound",
            ErrorKind::AmbiguousField => "AmbiguousField",
            ErrorKind::NotStructType => "NotStructType",
            ErrorKind::NotArrayType => "NotArrayType",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::UnknownFunction => "UnknownFunction",
            ErrorKind::NoMatchingSignature => "NoMatchingSignature",
            ErrorKind::UnsupportedExpression => "UnsupportedExpression",
            ErrorKind::NestingTooDeep => "NestingTooDeep",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Could not find field {field} in {path}.")]
    FieldNotFound {
        field: String,
        path: String,
        span: Option<Span>,
    },

    #[error("Field {field} is ambiguous in {path}. Candidates are {}.", .candidates.join(", "))]
    AmbiguousField {
        field: String,
        path: String,
        candidates: Vec<String>,
        span: Option<Span>,
    },

    #[error("Cannot access field {field} of {path}: expected a STRUCT but found {found}.")]
    NotStructType {
        field: String,
        path: String,
        found: Type,
        span: Option<Span>,
    },

    #[error("Cannot subscript {path}: expected an ARRAY or MAP but found {found}.")]
    NotArrayType {
        path: String,
        found: Type,
        span: Option<Span>,
    },

    #[error("{message}")]
    TypeMismatch {
        message: String,
        span: Option<Span>,
    },

    #[error("Can't find any functions with the name '{name}'.")]
    UnknownFunction { name: String, span: Option<Span> },

    #[error("Function '{name}' does not accept parameters of types ({}).", type_list(.arg_types))]
    NoMatchingSignature {
        name: String,
        arg_types: Vec<Type>,
        span: Option<Span>,
    },

    #[error("{message}")]
    UnsupportedExpression {
        message: String,
        span: Option<Span>,
    },

    #[error("Expression nesting exceeds the maximum depth of {limit}.")]
    NestingTooDeep { limit: usize, span: Option<Span> },
}

pub type Result<T> = core::result::Result<T, TypeError>;

fn type_list(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TypeError {
    pub(crate) fn mismatch(message: impl Into<String>) -> Self {
        TypeError::TypeMismatch {
            message: message.into(),
            span: None,
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        TypeError::UnsupportedExpression {
            message: message.into(),
            span: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeError::FieldNotFound { .. } => ErrorKind::FieldNotFound,
            TypeError::AmbiguousField { .. } => ErrorKind::AmbiguousField,
            TypeError::NotStructType { .. } => ErrorKind::NotStructType,
            TypeError::NotArrayType { .. } => ErrorKind::NotArrayType,
            TypeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            TypeError::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            TypeError::NoMatchingSignature { .. } => ErrorKind::NoMatchingSignature,
            TypeError::UnsupportedExpression { .. } => ErrorKind::UnsupportedExpression,
            TypeError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
        }
    }

    /// Location of the innermost node that reported the error, when known.
    pub fn span(&self) -> Option<&Span> {
        self.span_slot().as_ref()
    }

    /// Attach `span` unless a more precise location was already recorded.
    pub(crate) fn located(mut self, span: Option<&Span>) -> Self {
        let slot = self.span_slot_mut();
        if slot.is_none() {
            *slot = span.copied();
        }
        self
    }

    fn span_slot(&self) -> &Option<Span> {
        match self {
            TypeError::FieldNotFound { span, .. }
            | TypeError::AmbiguousField { span, .. }
            | TypeError::NotStructType { span, .. }
            | TypeError::NotArrayType { span, .. }
            | TypeError::TypeMismatch { span, .. }
            | TypeError::UnknownFunction { span, .. }
            | TypeError::NoMatchingSignature { span, .. }
            | TypeError::UnsupportedExpression { span, .. }
            | TypeError::NestingTooDeep { span, .. } => span,
        }
    }

    fn span_slot_mut(&mut self) -> &mut Option<Span> {
        match self {
            TypeError::FieldNotFound { span, .. }
            | TypeError::AmbiguousField { span, .. }
            | TypeError::NotStructType { span, .. }
            | TypeError::NotArrayType { span, .. }
            | TypeError::TypeMismatch { span, .. }
            | TypeError::UnknownFunction { span, .. }
            | TypeError::NoMatchingSignature { span, .. }
            | TypeError::UnsupportedExpression { span, .. }
            | TypeError::NestingTooDeep { span, .. } => span,
        }
    }
}
