//! Markup Input
//!
//! Element tree types consumed by the lowering pass, plus tag classification.

pub mod ast;
pub mod tags;

pub use ast::{is_directive, is_on, Attribute, AttributeValue, ChildNode, Element, TagRef};
