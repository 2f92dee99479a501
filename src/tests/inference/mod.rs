// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::Expr;
use crate::engine::{InferenceOptions, TypeInferrer};
use crate::functions::FunctionRegistry;
use crate::schema::Schema;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use test_generator::test_resources;

#[derive(Debug, Deserialize)]
struct InferenceYamlTest {
    schema: Schema,
    #[serde(default)]
    functions: Option<serde_json::Value>,
    #[serde(default)]
    options: Option<InferenceOptions>,
    cases: Vec<InferenceCase>,
}

#[derive(Debug, Deserialize)]
struct InferenceCase {
    note: String,
    expr: Expr,
    #[serde(default, rename = "type")]
    r#type: Option<String>,
    #[serde(default)]
    error: Option<ErrorExpectation>,
}

#[derive(Debug, Deserialize)]
struct ErrorExpectation {
    kind: String,
    #[serde(default)]
    message: Option<String>,
}

fn yaml_test_impl(path: &str) -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read yaml test file {path}"))?;
    let test: InferenceYamlTest = serde_yaml::from_str(&yaml)
        .with_context(|| format!("failed to parse yaml test file {path}"))?;

    let mut registry = FunctionRegistry::with_builtins();
    if let Some(functions) = &test.functions {
        registry
            .extend_from_json(&functions.to_string())
            .context("failed to load extra functions")?;
    }

    let inferrer = TypeInferrer::new(&test.schema, &registry)
        .with_options(test.options.unwrap_or_default());

    for case in test.cases.iter() {
        run_case(&inferrer, case).with_context(|| format!("case `{}`", case.note))?;
    }

    Ok(())
}

fn run_case(inferrer: &TypeInferrer<'_>, case: &InferenceCase) -> Result<()> {
    let result = inferrer.infer(&case.expr);

    match (&case.r#type, &case.error, result) {
        (Some(expected), None, Ok(actual)) => {
            if actual.to_string() != *expected {
                bail!("expected {expected} but inferred {actual} for {}", case.expr);
            }
        }
        (None, Some(expected), Err(err)) => {
            if err.kind().to_string() != expected.kind {
                bail!("expected {} error but got {}: {err}", expected.kind, err.kind());
            }
            if let Some(message) = &expected.message {
                if err.to_string() != *message {
                    bail!("expected message `{message}` but got `{err}`");
                }
            }
        }
        (Some(expected), None, Err(err)) => {
            bail!("expected {expected} but inference failed: {err}");
        }
        (None, Some(expected), Ok(actual)) => {
            bail!("expected {} error but inferred {actual}", expected.kind);
        }
        _ => bail!("case must specify exactly one of `type` or `error`"),
    }

    Ok(())
}

#[test_resources("tests/inference/*.yaml")]
fn run(path: &str) {
    yaml_test_impl(path).unwrap();
}
