// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use serde_json::json;
use sqlinfer::*;

fn orders() -> Result<Schema> {
    Ok(Schema::from_serde_json_value(json!({
        "name": "ORDERS",
        "fields": [
            { "name": "ORDERTIME", "type": "int64" },
            { "name": "ORDERID", "type": "int64" },
            { "name": "ITEMID", "type": "string" },
            { "name": "ORDERUNITS", "type": "float64" },
            { "name": "ARRAYCOL", "type": "array", "items": { "type": "float64" } },
            { "name": "MAPCOL", "type": "map", "key": { "type": "string" }, "value": { "type": "float64" } },
            { "name": "ADDRESS", "type": "struct", "fields": [
                { "name": "NUMBER", "type": "int64" },
                { "name": "STREET", "type": "string" },
                { "name": "CITY", "type": "string" },
                { "name": "STATE", "type": "string" },
                { "name": "ZIPCODE", "type": "int64" }
            ] }
        ]
    }))?)
}

#[test]
fn struct_fields_resolve() -> Result<()> {
    let schema = orders()?;
    let registry = FunctionRegistry::builtin();

    let itemid = Expr::column("itemid");
    assert_eq!(get_expression_type(&schema, &registry, &itemid)?, Type::String);

    let zipcode = Expr::column("address").field("zipcode");
    assert_eq!(get_expression_type(&schema, &registry, &zipcode)?, Type::Int64);

    let state = Expr::qualified("orders", "address").field("state");
    assert_eq!(get_expression_type(&schema, &registry, &state)?, Type::String);
    Ok(())
}

#[test]
fn missing_struct_field_reports_path() -> Result<()> {
    let schema = orders()?;
    let registry = FunctionRegistry::builtin();
    let expr = Expr::column("address").field("zip");

    let err = match get_expression_type(&schema, &registry, &expr) {
        Ok(ty) => anyhow::bail!("expected an error but inferred {ty}"),
        Err(err) => err,
    };
    assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    assert_eq!(err.to_string(), "Could not find field ZIP in ORDERS.ADDRESS.");
    Ok(())
}

#[test]
fn collection_columns() -> Result<()> {
    let schema = orders()?;
    let registry = FunctionRegistry::builtin();
    let inferrer = TypeInferrer::new(&schema, &registry);

    let element = Expr::column("arraycol").subscript(Expr::int(0));
    assert_eq!(inferrer.infer(&element)?, Type::Float64);

    let value = Expr::column("mapcol").subscript(Expr::string("key1"));
    assert_eq!(inferrer.infer(&value)?, Type::Float64);

    let contains = Expr::call("arraycontains", vec![Expr::column("arraycol"), Expr::double(1.0)]);
    assert_eq!(inferrer.infer(&contains)?, Type::Boolean);
    Ok(())
}

#[test]
fn expressions_from_json() -> Result<()> {
    let schema = orders()?;
    let registry = FunctionRegistry::builtin();

    let expr: Expr = serde_json::from_value(json!({
        "kind": "comparison",
        "op": "ge",
        "left": {
            "kind": "function_call",
            "name": "GEO_DISTANCE",
            "args": [
                { "kind": "column", "name": "ORDERUNITS" },
                { "kind": "literal", "value": { "type": "double", "value": 37.4 } },
                { "kind": "literal", "value": { "type": "integer", "value": 122 } },
                { "kind": "literal", "value": { "type": "double", "value": -122.1 } },
                { "kind": "literal", "value": { "type": "string", "value": "KM" } }
            ]
        },
        "right": { "kind": "literal", "value": { "type": "long", "value": 5 } }
    }))?;

    assert_eq!(get_expression_type(&schema, &registry, &expr)?, Type::Boolean);
    Ok(())
}

#[test]
fn user_functions_extend_builtins() -> Result<()> {
    let schema = orders()?;
    let mut registry = FunctionRegistry::with_builtins();
    registry.register(
        FunctionSignature::new(
            "mask",
            vec![ParamType::Exact(Type::String)],
            ReturnRule::Fixed(Type::String),
        )?
        .with_description("Masks every character of a string."),
    )?;

    let expr = Expr::call("MASK", vec![Expr::call("lcase", vec![Expr::column("itemid")])]);
    assert_eq!(get_expression_type(&schema, &registry, &expr)?, Type::String);
    Ok(())
}

#[test]
fn error_spans_point_at_innermost_node() -> Result<()> {
    let schema = orders()?;
    let registry = FunctionRegistry::builtin();
    let expr = Expr::call(
        "UCASE",
        vec![Expr::column("address").field("country").at(Span::new(1, 14))],
    )
    .at(Span::new(1, 8));

    let err = match get_expression_type(&schema, &registry, &expr) {
        Ok(ty) => anyhow::bail!("expected an error but inferred {ty}"),
        Err(err) => err,
    };
    assert_eq!(err.span(), Some(&Span::new(1, 14)));
    Ok(())
}
