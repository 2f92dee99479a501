// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::promotion::can_promote;
use crate::schema::Type;

use super::spec::{FunctionSignature, ParamType};

pub fn matches_param(param: &ParamType, arg: &Type) -> bool {
    match param {
        ParamType::Exact(expected) => can_promote(arg, expected),
        ParamType::Numeric => arg.is_numeric(),
        ParamType::AnyArray => matches!(arg, Type::Array { .. }),
        ParamType::AnyMap => matches!(arg, Type::Map { .. }),
        ParamType::AnyStruct => matches!(arg, Type::Struct { .. }),
        ParamType::Any => true,
    }
}

/// Arity and per-position compatibility of `args` against `signature`.
pub fn matches_signature(signature: &FunctionSignature, args: &[Type]) -> bool {
    let params = signature.params();

    if signature.is_variadic() {
        let Some((repeated, fixed)) = params.split_last() else {
            return false;
        };
        args.len() > fixed.len()
            && fixed.iter().zip(args).all(|(p, a)| matches_param(p, a))
            && args
                .iter()
                .skip(fixed.len())
                .all(|a| matches_param(repeated, a))
    } else {
        params.len() == args.len() && params.iter().zip(args).all(|(p, a)| matches_param(p, a))
    }
}
