// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Expression trees handed over by the parser.

mod display;
mod expr;
mod literals;
mod span;

pub use display::CanonicalExpr;
pub use expr::*;
pub use literals::*;
pub use span::*;
