//! Output Module
//!
//! Expression tree and JavaScript printing.

pub mod js_emitter;
pub mod output_ast;
