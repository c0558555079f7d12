//! Lowering Utilities for Tests
//!
//! Element builders and one-call compile helpers shared by the integration tests.

#![allow(dead_code)]

use vue_jsx_compiler::output::output_ast::{self as o, Expression, FnParam, LiteralMapEntry, Span};
use vue_jsx_compiler::{
    emit_expression, emit_module, Attribute, ChildNode, Element, ProgramScope, Result, TransformOptions,
    TransformOutput, Transformer,
};

pub fn el(tag: &str) -> Element {
    Element::new(tag)
}

pub fn var(name: &str) -> Expression {
    o::variable(name)
}

pub fn text(value: &str) -> ChildNode {
    ChildNode::Text(value.to_string())
}

pub fn expr(value: Expression) -> ChildNode {
    ChildNode::Expression(value)
}

pub fn child(element: Element) -> ChildNode {
    ChildNode::Element(element)
}

pub fn markup(element: Element) -> Expression {
    Expression::Markup(Box::new(element))
}

/// `() => body`
pub fn thunk(body: Expression) -> Expression {
    o::arrow_fn(vec![], body)
}

pub fn arrow(params: &[&str], body: Expression) -> Expression {
    o::arrow_fn(
        params.iter().map(|p| FnParam::Identifier(p.to_string())).collect(),
        body,
    )
}

pub fn object(entries: Vec<(&str, Expression)>) -> Expression {
    o::literal_map(
        entries
            .into_iter()
            .map(|(key, value)| LiteralMapEntry::named(key, value))
            .collect(),
    )
}

/// A call written in source, as opposed to one produced by the lowering pass.
pub fn authored_call(callee: &str, args: Vec<Expression>) -> Expression {
    o::variable(callee).call_fn(args).with_span(Span::new(0, 1))
}

pub fn attr(name: &str, value: Expression) -> Attribute {
    Attribute::expr(name, value)
}

pub fn optimized() -> TransformOptions {
    TransformOptions::optimized()
}

pub fn try_compile(element: &Element, options: &TransformOptions, bindings: &[&str]) -> Result<TransformOutput> {
    let mut scope = ProgramScope::with_bindings(bindings.iter().copied());
    Transformer::new(options).transform_element(element, &mut scope)
}

pub fn compile(element: &Element, options: &TransformOptions, bindings: &[&str]) -> TransformOutput {
    try_compile(element, options, bindings).expect("compilation failed")
}

/// Printed expression only, without imports or hoisted declarations.
pub fn compile_js(element: &Element, options: &TransformOptions, bindings: &[&str]) -> String {
    emit_expression(&compile(element, options, bindings).expression)
}

pub fn compile_module(element: &Element, options: &TransformOptions, bindings: &[&str]) -> String {
    emit_module(&compile(element, options, bindings))
}
