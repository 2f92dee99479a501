// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Errors raised while constructing a [`Schema`](super::Schema).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate field {field} in {path}.")]
    DuplicateField { field: String, path: String },

    #[error("Empty field name in {path}.")]
    EmptyFieldName { path: String },
}
