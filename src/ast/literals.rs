// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};

use crate::schema::Type;

/// Constant value appearing in an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Literal {
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
    Boolean(bool),
}

impl Literal {
    /// Integer literal in the narrowest integral type that holds `value`.
    pub fn int(value: i64) -> Self {
        match i32::try_from(value) {
            Ok(v) => Literal::Integer(v),
            Err(_) => Literal::Long(value),
        }
    }

    pub fn data_type(&self) -> Type {
        match self {
            Literal::Integer(_) => Type::Int32,
            Literal::Long(_) => Type::Int64,
            Literal::Double(_) => Type::Float64,
            Literal::String(_) => Type::String,
            Literal::Boolean(_) => Type::Boolean,
        }
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Long(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}
