// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::Deserialize;

use crate::schema::Type;

use super::spec::{ParamType, ReturnRule};

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct FunctionCatalogConfig {
    #[serde(default)]
    pub(super) groups: Vec<FunctionGroupConfig>,
    #[serde(default)]
    pub(super) functions: Vec<FunctionConfig>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct FunctionGroupConfig {
    pub(super) name: String,
    #[serde(default)]
    pub(super) functions: Vec<FunctionConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FunctionConfig {
    pub(super) name: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    pub(super) signatures: Vec<SignatureConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct SignatureConfig {
    #[serde(default)]
    pub(super) params: Vec<ParamConfig>,
    #[serde(default)]
    pub(super) variadic: bool,
    #[serde(rename = "return")]
    pub(super) returns: ReturnConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(super) enum ParamConfig {
    Int32,
    Int64,
    Float64,
    String,
    Boolean,
    Numeric,
    AnyArray,
    AnyMap,
    AnyStruct,
    Any,
    Exact {
        #[serde(rename = "type")]
        ty: Type,
    },
}

impl ParamConfig {
    pub(super) fn into_param(self) -> ParamType {
        match self {
            ParamConfig::Int32 => ParamType::Exact(Type::Int32),
            ParamConfig::Int64 => ParamType::Exact(Type::Int64),
            ParamConfig::Float64 => ParamType::Exact(Type::Float64),
            ParamConfig::String => ParamType::Exact(Type::String),
            ParamConfig::Boolean => ParamType::Exact(Type::Boolean),
            ParamConfig::Numeric => ParamType::Numeric,
            ParamConfig::AnyArray => ParamType::AnyArray,
            ParamConfig::AnyMap => ParamType::AnyMap,
            ParamConfig::AnyStruct => ParamType::AnyStruct,
            ParamConfig::Any => ParamType::Any,
            ParamConfig::Exact { ty } => ParamType::Exact(ty),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(super) enum ReturnConfig {
    Int32,
    Int64,
    Float64,
    String,
    Boolean,
    Fixed {
        #[serde(rename = "type")]
        ty: Type,
    },
    SameAsArgument {
        index: usize,
    },
    WidestNumeric,
    ElementOf {
        index: usize,
    },
}

impl ReturnConfig {
    pub(super) fn into_rule(self) -> ReturnRule {
        match self {
            ReturnConfig::Int32 => ReturnRule::Fixed(Type::Int32),
            ReturnConfig::Int64 => ReturnRule::Fixed(Type::Int64),
            ReturnConfig::Float64 => ReturnRule::Fixed(Type::Float64),
            ReturnConfig::String => ReturnRule::Fixed(Type::String),
            ReturnConfig::Boolean => ReturnRule::Fixed(Type::Boolean),
            ReturnConfig::Fixed { ty } => ReturnRule::Fixed(ty),
            ReturnConfig::SameAsArgument { index } => ReturnRule::SameAsArgument(index),
            ReturnConfig::WidestNumeric => ReturnRule::WidestNumeric,
            ReturnConfig::ElementOf { index } => ReturnRule::ElementOf(index),
        }
    }
}
