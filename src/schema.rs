// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Row schemas and the type system they are written in.
//!
//! A row is described by a tree of types: scalar leaves (`INT32`, `INT64`,
//! `FLOAT64`, `STRING`, `BOOLEAN`) and three composite shapes (`ARRAY`, `MAP`,
//! `STRUCT`). The type system is implemented with the following principles:
//! - Types are immutable values compared structurally. Composite types share
//!   their children, so cloning a deeply nested `STRUCT` is cheap and the
//!   same schema can be read by many threads at once.
//! - Identifier case handling is decided once, when the schema is built, and
//!   every lookup afterwards goes through the same policy.
//! - Invalid schemas (duplicate or empty field names at any nesting level)
//!   are rejected at construction instead of surfacing later as confusing
//!   lookup failures.
//! - Leverage serde for loading schemas from JSON, avoiding a hand-written
//!   format.
//!
//! A schema in JSON looks like:
//! ```json
//! {
//!   "name": "ORDERS",
//!   "fields": [
//!     { "name": "ITEMID", "type": "string" },
//!     { "name": "ADDRESS", "type": "struct", "fields": [
//!         { "name": "ZIPCODE", "type": "int64" },
//!         { "name": "STATE", "type": "string" }
//!     ] },
//!     { "name": "TAGS", "type": "array", "items": { "type": "string" } }
//!   ]
//! }
//! ```

use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;

pub mod error;

pub use error::SchemaError;

/// Data types understood by the inference engine.
///
/// # Example
/// ```json
/// { "type": "map", "key": { "type": "string" }, "value": { "type": "float64" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
// Use `type` when deserializing to discriminate between different types.
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
#[serde(deny_unknown_fields)]
pub enum Type {
    Int32,
    Int64,
    Float64,
    String,
    Boolean,
    Array { items: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    Struct { fields: Arc<[Field]> },
}

impl Type {
    pub fn array(items: Type) -> Self {
        Type::Array {
            items: Box::new(items),
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn structure(fields: impl IntoIterator<Item = Field>) -> Self {
        Type::Struct {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int32 | Type::Int64 | Type::Float64)
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Int32 | Type::Int64)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Boolean)
    }

    /// Fields of a `STRUCT`, in declaration order.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Type::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    /// Type selected by subscripting: the element of an `ARRAY` or the value
    /// of a `MAP`.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array { items } => Some(items),
            Type::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Upper-case name of the type's kind, without any element types.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Int32 => "INT32",
            Type::Int64 => "INT64",
            Type::Float64 => "FLOAT64",
            Type::String => "STRING",
            Type::Boolean => "BOOLEAN",
            Type::Array { .. } => "ARRAY",
            Type::Map { .. } => "MAP",
            Type::Struct { .. } => "STRUCT",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Array { items } => write!(f, "ARRAY<{items}>"),
            Type::Map { key, value } => write!(f, "MAP<{key}, {value}>"),
            Type::Struct { fields } => {
                f.write_str("STRUCT<")?;
                for (idx, field) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                f.write_str(">")
            }
            _ => f.write_str(self.kind_name()),
        }
    }
}

fn default_nullable() -> bool {
    true
}

/// A named member of a `STRUCT` or of a row.
///
/// Columns are nullable unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub ty: Type,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
        }
    }

    pub fn required(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }
}

/// How identifiers are compared.
///
/// `Insensitive` follows the SQL convention for unquoted identifiers: names
/// are folded to upper case, both when the schema is built and when a name is
/// looked up or reported in a diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

impl CaseSensitivity {
    pub fn matches(self, lhs: &str, rhs: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => lhs == rhs,
            CaseSensitivity::Insensitive => lhs.eq_ignore_ascii_case(rhs),
        }
    }

    pub fn canonical(self, name: &str) -> Cow<'_, str> {
        match self {
            CaseSensitivity::Insensitive if name.bytes().any(|b| b.is_ascii_lowercase()) => {
                Cow::Owned(name.to_ascii_uppercase())
            }
            _ => Cow::Borrowed(name),
        }
    }
}

/// The shape of a relation's row.
///
/// `Schema` owns the root fields of the row together with an optional relation
/// name and the identifier case policy. It is immutable once built and cheap to
/// clone, so one instance can back every inference call of a query
/// compilation, across threads.
///
/// # Usage
///
/// ```rust
/// let schema = Schema::builder()
///     .name("ORDERS")
///     .field("ITEMID", Type::String)
///     .field(
///         "ADDRESS",
///         Type::structure([
///             Field::new("ZIPCODE", Type::Int64),
///             Field::new("STATE", Type::String),
///         ]),
///     )
///     .build()?;
///
/// assert_eq!(schema.resolve_field("ADDRESS.ZIPCODE")?, &Type::Int64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    fields: Arc<[Field]>,
    case_sensitivity: CaseSensitivity,
}

/// A root column resolved by name, with its canonical path for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn<'a> {
    pub path: String,
    pub ty: &'a Type,
}

impl Schema {
    /// Build an unnamed, case-insensitive schema from root fields.
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        Self::build(None, fields, CaseSensitivity::default())
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    fn build(
        name: Option<String>,
        fields: Vec<Field>,
        case_sensitivity: CaseSensitivity,
    ) -> Result<Self, SchemaError> {
        let name = name.map(|n| case_sensitivity.canonical(&n).into_owned());
        let fields = normalize_fields(fields, case_sensitivity);
        let root = name.as_deref().unwrap_or("schema");
        validate_fields(&fields, case_sensitivity, root)?;

        Ok(Schema {
            name,
            fields: fields.into(),
            case_sensitivity,
        })
    }

    /// Parse a schema document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str::<Schema>(json)?.loaded())
    }

    /// Parse a schema document from an already-parsed JSON value.
    pub fn from_serde_json_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value::<Schema>(value)?.loaded())
    }

    fn loaded(self) -> Self {
        debug!(
            "loaded schema {} with {} root fields",
            self.relation_label(),
            self.fields.len()
        );
        self
    }

    /// Relation name, e.g. `ORDERS`, when the schema belongs to a named source.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    /// The row as a single `STRUCT` type.
    pub fn row_type(&self) -> Type {
        Type::Struct {
            fields: self.fields.clone(),
        }
    }

    /// Apply the schema's case policy to an identifier.
    pub fn canonical<'n>(&self, name: &'n str) -> Cow<'n, str> {
        self.case_sensitivity.canonical(name)
    }

    /// Look up a top-level or dotted-qualified column and return its type.
    ///
    /// Root field names may themselves be qualified (`TEST1.COL0`); an
    /// unqualified name matches the unique root field whose last segment is
    /// that name. Remaining dotted segments navigate into nested structs.
    pub fn resolve_field(&self, name: &str) -> Result<&Type, TypeError> {
        self.resolve_column(name).map(|column| column.ty)
    }

    /// Like [`Schema::resolve_field`], also returning the canonical path of the
    /// resolved column.
    pub fn resolve_column(&self, name: &str) -> Result<ResolvedColumn<'_>, TypeError> {
        if let Some(field) = self.find_root(name)? {
            return Ok(ResolvedColumn {
                path: self.column_path(field),
                ty: &field.ty,
            });
        }

        // Longest dotted prefix naming a root column, then struct navigation.
        let segments: Vec<&str> = name.split('.').collect();
        for split in (1..segments.len()).rev() {
            let prefix = segments[..split].join(".");
            let Some(field) = self.find_root(&prefix)? else {
                continue;
            };

            let mut path = self.column_path(field);
            let mut ty = &field.ty;
            for segment in &segments[split..] {
                ty = self.resolve_struct_field(ty, segment, &path)?;
                path.push('.');
                path.push_str(&self.canonical(segment));
            }
            return Ok(ResolvedColumn { path, ty });
        }

        Err(TypeError::FieldNotFound {
            field: self.canonical(name).into_owned(),
            path: self.relation_label().to_owned(),
            span: None,
        })
    }

    /// Navigate into `parent`, which must be a `STRUCT`, by field name.
    ///
    /// `path` is the canonical path of `parent` and is only used to build the
    /// diagnostic.
    pub fn resolve_struct_field<'t>(
        &self,
        parent: &'t Type,
        field: &str,
        path: &str,
    ) -> Result<&'t Type, TypeError> {
        let Some(fields) = parent.fields() else {
            return Err(TypeError::NotStructType {
                field: self.canonical(field).into_owned(),
                path: path.to_owned(),
                found: parent.clone(),
                span: None,
            });
        };

        fields
            .iter()
            .find(|f| self.case_sensitivity.matches(&f.name, field))
            .map(|f| &f.ty)
            .ok_or_else(|| TypeError::FieldNotFound {
                field: self.canonical(field).into_owned(),
                path: path.to_owned(),
                span: None,
            })
    }

    fn find_root(&self, name: &str) -> Result<Option<&Field>, TypeError> {
        let cs = self.case_sensitivity;

        if let Some(field) = self.fields.iter().find(|f| cs.matches(&f.name, name)) {
            return Ok(Some(field));
        }

        if !name.contains('.') {
            let candidates: Vec<&Field> = self
                .fields
                .iter()
                .filter(|f| {
                    f.name
                        .rsplit_once('.')
                        .is_some_and(|(_, last)| cs.matches(last, name))
                })
                .collect();
            match candidates.as_slice() {
                [] => {}
                [field] => return Ok(Some(*field)),
                _ => {
                    return Err(TypeError::AmbiguousField {
                        field: self.canonical(name).into_owned(),
                        path: self.relation_label().to_owned(),
                        candidates: candidates.iter().map(|f| f.name.clone()).collect(),
                        span: None,
                    })
                }
            }
        }

        if let (Some(relation), Some((qualifier, rest))) = (&self.name, name.split_once('.')) {
            if cs.matches(relation, qualifier) {
                return Ok(self.fields.iter().find(|f| cs.matches(&f.name, rest)));
            }
        }

        Ok(None)
    }

    fn column_path(&self, field: &Field) -> String {
        match &self.name {
            Some(relation) if !field.name.contains('.') => format!("{relation}.{}", field.name),
            _ => field.name.clone(),
        }
    }

    fn relation_label(&self) -> &str {
        self.name.as_deref().unwrap_or("schema")
    }
}

/// Select the element type of an `ARRAY`, or the value type of a `MAP`.
pub fn resolve_element_type<'t>(parent: &'t Type, path: &str) -> Result<&'t Type, TypeError> {
    parent
        .element_type()
        .ok_or_else(|| TypeError::NotArrayType {
            path: path.to_owned(),
            found: parent.clone(),
            span: None,
        })
}

impl<'de> Deserialize<'de> for Schema {
    /// Deserializes a schema document and validates it the same way
    /// [`SchemaBuilder::build`] does, so a loaded schema upholds the same
    /// invariants as one built in code.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        #[serde(rename_all = "camelCase")]
        struct RawSchema {
            #[serde(default)]
            name: Option<String>,
            fields: Vec<Field>,
            #[serde(default)]
            case_sensitivity: CaseSensitivity,
        }

        let raw = RawSchema::deserialize(deserializer)?;
        Schema::build(raw.name, raw.fields, raw.case_sensitivity)
            .map_err(|e| serde::de::Error::custom(format!("{e}")))
    }
}

/// Incremental construction of a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: Option<String>,
    fields: Vec<Field>,
    case_sensitivity: CaseSensitivity,
}

impl SchemaBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn case_sensitivity(mut self, case_sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = case_sensitivity;
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::build(self.name, self.fields, self.case_sensitivity)
    }
}

fn normalize_fields(fields: Vec<Field>, cs: CaseSensitivity) -> Vec<Field> {
    if cs == CaseSensitivity::Sensitive {
        return fields;
    }
    fields
        .into_iter()
        .map(|field| Field {
            name: cs.canonical(&field.name).into_owned(),
            ty: normalize_type(field.ty, cs),
            nullable: field.nullable,
        })
        .collect()
}

fn normalize_type(ty: Type, cs: CaseSensitivity) -> Type {
    match ty {
        Type::Array { items } => Type::array(normalize_type(*items, cs)),
        Type::Map { key, value } => Type::map(normalize_type(*key, cs), normalize_type(*value, cs)),
        Type::Struct { fields } => Type::Struct {
            fields: normalize_fields(fields.to_vec(), cs).into(),
        },
        scalar => scalar,
    }
}

fn validate_fields(fields: &[Field], cs: CaseSensitivity, path: &str) -> Result<(), SchemaError> {
    for (idx, field) in fields.iter().enumerate() {
        if field.name.trim().is_empty() {
            return Err(SchemaError::EmptyFieldName {
                path: path.to_owned(),
            });
        }
        if fields[..idx].iter().any(|f| cs.matches(&f.name, &field.name)) {
            return Err(SchemaError::DuplicateField {
                field: field.name.clone(),
                path: path.to_owned(),
            });
        }
        validate_type(&field.ty, cs, &format!("{path}.{}", field.name))?;
    }
    Ok(())
}

fn validate_type(ty: &Type, cs: CaseSensitivity, path: &str) -> Result<(), SchemaError> {
    match ty {
        Type::Struct { fields } => validate_fields(fields, cs, path),
        Type::Array { items } => validate_type(items, cs, path),
        Type::Map { key, value } => {
            validate_type(key, cs, path)?;
            validate_type(value, cs, path)
        }
        _ => Ok(()),
    }
}
