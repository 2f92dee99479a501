// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::thread;

use sqlinfer::*;

fn schema() -> Schema {
    Schema::builder()
        .name("TEST1")
        .field("COL0", Type::Int64)
        .field("COL1", Type::String)
        .field("COL3", Type::Float64)
        .field(
            "ADDRESS",
            Type::structure([
                Field::new("ZIPCODE", Type::Int64),
                Field::new("STATE", Type::String),
            ]),
        )
        .build()
        .expect("valid schema")
}

fn expressions() -> Vec<(Expr, Type)> {
    vec![
        (Expr::column("col0").add(Expr::column("col3")), Type::Float64),
        (Expr::column("col0").mul(Expr::int(25)), Type::Int64),
        (
            Expr::call("ROUND", vec![Expr::column("col3")]).add(Expr::int(12)),
            Type::Int64,
        ),
        (
            Expr::call("CONCAT", vec![Expr::column("col1"), Expr::string("_test")]),
            Type::String,
        ),
        (Expr::column("address").field("zipcode"), Type::Int64),
        (Expr::column("col1").like(Expr::string("a%")), Type::Boolean),
    ]
}

#[test]
fn concurrent_inference_over_shared_inputs() {
    let schema = Arc::new(schema());
    let registry = FunctionRegistry::builtin();
    let cases = Arc::new(expressions());
    let workers = num_cpus::get().clamp(2, 16);

    thread::scope(|scope| {
        for worker in 0..workers {
            let schema = Arc::clone(&schema);
            let registry = Arc::clone(&registry);
            let cases = Arc::clone(&cases);
            scope.spawn(move || {
                let inferrer = TypeInferrer::new(&schema, &registry);
                for round in 0..200 {
                    let (expr, expected) = &cases[(worker + round) % cases.len()];
                    assert_eq!(&inferrer.infer(expr).expect("inference failed"), expected);
                }
            });
        }
    });
}

#[test]
fn inference_does_not_mutate_inputs() {
    let schema = schema();
    let registry = FunctionRegistry::builtin();
    let before_schema = schema.clone();
    let before_names: Vec<String> = registry.names().map(str::to_owned).collect();

    for (expr, expected) in expressions() {
        let snapshot = expr.clone();
        assert_eq!(
            get_expression_type(&schema, &registry, &expr).expect("inference failed"),
            expected
        );
        assert_eq!(get_expression_type(&schema, &registry, &expr).ok(), Some(expected));
        assert_eq!(expr, snapshot);
    }

    assert_eq!(schema, before_schema);
    assert_eq!(
        registry.names().map(str::to_owned).collect::<Vec<_>>(),
        before_names
    );
}

#[test]
fn registry_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FunctionRegistry>();
    assert_send_sync::<Schema>();
    assert_send_sync::<Expr>();
}
