#![deny(clippy::all)]

//! Vue JSX Compiler CLI
//!
//! Batch driver around the lowering pass: reads serialized element trees, compiles each one
//! and renders the result as a JavaScript module or as the raw output tree.

pub use vue_jsx_compiler as compiler;

pub mod compile;
pub mod logging;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
