// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::error::ErrorKind;

fn call(name: &str, args: &[Type]) -> crate::error::Result<Type> {
    resolve(&FunctionRegistry::builtin(), name, args)
}

#[test]
fn test_builtin_catalog_loads() {
    let registry = FunctionRegistry::builtin();
    for name in [
        "ABS",
        "CEIL",
        "FLOOR",
        "ROUND",
        "RANDOM",
        "LCASE",
        "UCASE",
        "TRIM",
        "CONCAT",
        "SUBSTRING",
        "LEN",
        "EXTRACTJSONFIELD",
        "IFNULL",
        "ARRAYCONTAINS",
        "STRINGTOTIMESTAMP",
        "TIMESTAMPTOSTRING",
        "GEO_DISTANCE",
    ] {
        assert!(registry.contains(name), "missing builtin {name}");
    }
    assert!(registry.contains("lcase"));
    assert!(registry.signatures("abs")[0].description().is_some());
}

#[test]
fn test_numeric_builtins() {
    assert_eq!(call("floor", &[Type::Float64]).unwrap(), Type::Float64);
    assert_eq!(call("CEIL", &[Type::Int64]).unwrap(), Type::Float64);
    assert_eq!(call("ABS", &[Type::Float64]).unwrap(), Type::Float64);
    assert_eq!(call("ABS", &[Type::Int32]).unwrap(), Type::Int32);
    assert_eq!(call("RANDOM", &[]).unwrap(), Type::Float64);
}

#[test]
fn test_round_overloads() {
    assert_eq!(call("ROUND", &[Type::Int32]).unwrap(), Type::Int32);
    assert_eq!(call("ROUND", &[Type::Int64]).unwrap(), Type::Int64);
    assert_eq!(call("ROUND", &[Type::Float64]).unwrap(), Type::Int64);
}

#[test]
fn test_variadic_concat() {
    assert_eq!(call("CONCAT", &[Type::String]).unwrap(), Type::String);
    assert_eq!(
        call("CONCAT", &[Type::String, Type::String, Type::String]).unwrap(),
        Type::String
    );
    let err = call("CONCAT", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatchingSignature);
    assert!(call("CONCAT", &[Type::String, Type::Int64]).is_err());
}

#[test]
fn test_promoted_arguments() {
    // INT32 is promoted to INT64 for the position argument.
    assert_eq!(
        call("SUBSTRING", &[Type::String, Type::Int32]).unwrap(),
        Type::String
    );
    assert_eq!(
        call("GEO_DISTANCE", &[Type::Int32, Type::Int64, Type::Float64, Type::Float64]).unwrap(),
        Type::Float64
    );
}

#[test]
fn test_unknown_function() {
    let err = call("nope", &[Type::Int32]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);
    assert_eq!(
        err.to_string(),
        "Can't find any functions with the name 'NOPE'."
    );
}

#[test]
fn test_no_matching_signature() {
    let err = call("LCASE", &[Type::Int64, Type::String]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Function 'LCASE' does not accept parameters of types (INT64, STRING)."
    );
}

#[test]
fn test_collection_builtins() {
    assert_eq!(
        call("ARRAYCONTAINS", &[Type::array(Type::Int32), Type::Int32]).unwrap(),
        Type::Boolean
    );
    assert!(call("ARRAYCONTAINS", &[Type::String, Type::Int32]).is_err());
    assert_eq!(
        call("IFNULL", &[Type::map(Type::String, Type::Int32), Type::Int32]).unwrap(),
        Type::map(Type::String, Type::Int32)
    );
}

#[test]
fn test_catalog_from_json() {
    let registry = FunctionRegistry::from_json(
        r#"{
            "functions": [
                {
                    "name": "greatest",
                    "signatures": [
                        { "params": [{ "kind": "numeric" }], "variadic": true,
                          "return": { "kind": "widest_numeric" } }
                    ]
                },
                {
                    "name": "first",
                    "signatures": [
                        { "params": [{ "kind": "any_array" }], "return": { "kind": "element_of", "index": 0 } },
                        { "params": [{ "kind": "any_map" }], "return": { "kind": "element_of", "index": 0 } }
                    ]
                },
                {
                    "name": "tags",
                    "signatures": [
                        { "params": [], "return": { "kind": "fixed", "type": { "type": "array", "items": { "type": "string" } } } }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        resolve(&registry, "GREATEST", &[Type::Int32, Type::Float64, Type::Int64]).unwrap(),
        Type::Float64
    );
    assert_eq!(
        resolve(&registry, "first", &[Type::array(Type::Boolean)]).unwrap(),
        Type::Boolean
    );
    assert_eq!(
        resolve(&registry, "first", &[Type::map(Type::String, Type::Int64)]).unwrap(),
        Type::Int64
    );
    assert_eq!(
        resolve(&registry, "tags", &[]).unwrap(),
        Type::array(Type::String)
    );
}

#[test]
fn test_catalog_rejects_bad_index() {
    let err = FunctionRegistry::from_json(
        r#"{"functions":[{"name":"f","signatures":[{"params":[],"return":{"kind":"same_as_argument","index":0}}]}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidSignature { ref name, .. } if name == "F"));
}

#[test]
fn test_catalog_rejects_unknown_kind() {
    let err = FunctionRegistry::from_json(
        r#"{"functions":[{"name":"f","signatures":[{"params":[{"kind":"decimal"}],"return":{"kind":"string"}}]}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[test]
fn test_duplicate_signature() {
    let mut registry = FunctionRegistry::new();
    let sig = FunctionSignature::new(
        "f",
        vec![ParamType::Exact(Type::Int64)],
        ReturnRule::Fixed(Type::Int64),
    )
    .unwrap();
    registry.register(sig.clone()).unwrap();
    let err = registry.register(sig).unwrap_err();
    assert_eq!(
        err.to_string(),
        "duplicate signature F(INT64) for function `F`"
    );

    // Same parameters but variadic is a distinct overload.
    registry
        .register(
            FunctionSignature::variadic(
                "F",
                vec![ParamType::Exact(Type::Int64)],
                ReturnRule::Fixed(Type::Int64),
            )
            .unwrap(),
        )
        .unwrap();
    assert_eq!(registry.signatures("f").len(), 2);
}

#[test]
fn test_failed_extend_leaves_registry_unchanged() {
    let mut registry = FunctionRegistry::with_builtins();
    let before = registry.len();
    let err = registry
        .extend_from_json(
            r#"{
                "functions": [
                    { "name": "NEWFN", "signatures": [
                        { "params": [{ "kind": "string" }], "return": { "kind": "string" } }
                    ] },
                    { "name": "LCASE", "signatures": [
                        { "params": [{ "kind": "string" }], "return": { "kind": "string" } }
                    ] }
                ]
            }"#,
        )
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateSignature { .. }));
    assert!(!registry.contains("NEWFN"));
    assert_eq!(registry.len(), before);
    assert_eq!(registry.signatures("LCASE").len(), 1);

    registry
        .extend_from_json(
            r#"{ "functions": [ { "name": "NEWFN", "signatures": [
                { "params": [{ "kind": "string" }], "return": { "kind": "string" } }
            ] } ] }"#,
        )
        .unwrap();
    assert_eq!(
        resolve(&registry, "newfn", &[Type::String]).unwrap(),
        Type::String
    );
}

#[test]
fn test_first_overload_wins() {
    let mut registry = FunctionRegistry::new();
    registry
        .register(
            FunctionSignature::new("pick", vec![ParamType::Any], ReturnRule::Fixed(Type::String))
                .unwrap(),
        )
        .unwrap();
    registry
        .register(
            FunctionSignature::new(
                "pick",
                vec![ParamType::Exact(Type::Int32)],
                ReturnRule::Fixed(Type::Int32),
            )
            .unwrap(),
        )
        .unwrap();
    assert_eq!(resolve(&registry, "pick", &[Type::Int32]).unwrap(), Type::String);
}

#[test]
fn test_custom_return_rule() {
    let mut registry = FunctionRegistry::with_builtins();
    registry
        .register_fn("as_array", vec![ParamType::Any], |args| {
            Ok(Type::array(args[0].clone()))
        })
        .unwrap();
    assert_eq!(
        resolve(&registry, "AS_ARRAY", &[Type::Int64]).unwrap(),
        Type::array(Type::Int64)
    );
    assert!(registry.contains("LCASE"));
    assert!(!FunctionRegistry::builtin().contains("AS_ARRAY"));
}

#[test]
fn test_invalid_signatures() {
    assert!(FunctionSignature::variadic("f", vec![], ReturnRule::Fixed(Type::Int32)).is_err());
    assert!(FunctionSignature::new(" ", vec![], ReturnRule::Fixed(Type::Int32)).is_err());
    assert!(FunctionSignature::new("f", vec![ParamType::Any], ReturnRule::ElementOf(1)).is_err());
}

#[test]
fn test_widest_numeric_requires_numeric() {
    let sig = FunctionSignature::new("g", vec![ParamType::Any], ReturnRule::WidestNumeric).unwrap();
    assert_eq!(
        sig.return_type(&[Type::String]).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
}
