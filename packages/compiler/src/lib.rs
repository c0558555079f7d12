#![deny(clippy::all)]

//! Vue JSX Compiler
//!
//! Lowers JSX-style element trees into Vue vnode creation calls annotated with patch
//! flags, dynamic prop lists and slot flags.

// Core modules
pub mod config;
pub mod error;

// Input and output trees
pub mod jsx;
pub mod output;

// Lowering pass
pub mod transform;

pub use config::TransformOptions;
pub use error::{CompileError, Result};
pub use jsx::ast::{Attribute, AttributeValue, ChildNode, Element, TagRef};
pub use output::js_emitter::{emit_expression, emit_module};
pub use output::output_ast::Expression;
pub use transform::directives::{DirectiveDecomposer, VueDirectiveDecomposer};
pub use transform::scope::{ProgramScope, ScopeService};
pub use transform::{transform_element, PatchFlags, SlotFlag, TransformOutput, Transformer};

/// Lower `element` with a fresh program scope binding `bindings`, and print the module.
pub fn compile_to_js(element: &Element, options: &TransformOptions, bindings: &[String]) -> Result<String> {
    let mut scope = ProgramScope::with_bindings(bindings.iter().cloned());
    let output = transform_element(element, options, &mut scope)?;
    Ok(emit_module(&output))
}
