//! JavaScript Emitter
//!
//! Prints output expressions as JavaScript source, and whole compilation units as a
//! module with imports, the `_isSlot` helper and hoisted declarations ahead of the
//! compiled expression.

use std::collections::HashMap;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::jsx::ast::Element;
use crate::output::output_ast::{
    self as o, DeclarationKind, Expression, FnParam, HoistedDeclaration, LiteralMapEntry, LiteralValue, PropertyKey,
};
use crate::transform::identifiers::IS_SLOT_SOURCE;
use crate::transform::TransformOutput;

lazy_static! {
    static ref LEGAL_IDENTIFIER_RE: Regex = Regex::new(r"^[a-zA-Z_$][0-9a-zA-Z_$]*$").unwrap();
    pub static ref BINARY_OPERATORS: HashMap<o::BinaryOperator, &'static str> = {
        let mut m = HashMap::new();
        m.insert(o::BinaryOperator::Plus, "+");
        m.insert(o::BinaryOperator::Minus, "-");
        m.insert(o::BinaryOperator::Identical, "===");
        m.insert(o::BinaryOperator::NotIdentical, "!==");
        m.insert(o::BinaryOperator::And, "&&");
        m.insert(o::BinaryOperator::Or, "||");
        m.insert(o::BinaryOperator::NullishCoalesce, "??");
        m
    };
}

/// Output buffer, one entry per emitted line.
#[derive(Debug, Default)]
pub struct EmitterContext {
    lines: Vec<String>,
    current: String,
}

impl EmitterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, part: &str) {
        self.current.push_str(part);
    }

    pub fn println(&mut self, last_part: &str) {
        self.current.push_str(last_part);
        self.lines.push(std::mem::take(&mut self.current));
    }

    pub fn to_source(&self) -> String {
        let mut lines = self.lines.clone();
        if !self.current.is_empty() {
            lines.push(self.current.clone());
        }
        lines.join("\n")
    }
}

/// Quote `input` as a double-quoted string unless it is a legal identifier and
/// `always_quote` is off.
pub fn escape_identifier(input: &str, always_quote: bool) -> String {
    if !always_quote && LEGAL_IDENTIFIER_RE.is_match(input) {
        return input.to_string();
    }

    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('"');
    for c in input.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c if (c as u32) < 0x20 => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Callee of a call, receiver of a member read.
    Callee,
    Operand,
    Test,
    Any,
}

fn needs_parens(expr: &Expression, position: Position) -> bool {
    match position {
        Position::Callee => matches!(
            expr,
            Expression::Conditional(_)
                | Expression::Assign(_)
                | Expression::ArrowFn(_)
                | Expression::Fn(_)
                | Expression::BinaryOp(_)
                | Expression::Void(_)
        ),
        Position::Operand => matches!(
            expr,
            Expression::Conditional(_) | Expression::Assign(_) | Expression::ArrowFn(_) | Expression::BinaryOp(_)
        ),
        Position::Test => matches!(
            expr,
            Expression::Conditional(_) | Expression::Assign(_) | Expression::ArrowFn(_)
        ),
        Position::Any => false,
    }
}

#[derive(Debug, Default)]
pub struct JsEmitter;

impl JsEmitter {
    pub fn new() -> Self {
        JsEmitter
    }

    pub fn visit_expression(&self, expr: &Expression, ctx: &mut EmitterContext) {
        match expr {
            Expression::ReadVar(var) => ctx.print(&var.name),
            Expression::Literal(lit) => self.visit_literal(&lit.value, ctx),
            Expression::LiteralArray(array) => {
                ctx.print("[");
                self.visit_all(&array.entries, ctx);
                ctx.print("]");
            }
            Expression::LiteralMap(map) => self.visit_literal_map(&map.entries, ctx),
            Expression::Spread(spread) => {
                ctx.print("...");
                self.visit_expression(&spread.argument, ctx);
            }
            Expression::InvokeFn(call) => {
                self.visit_in(&call.fn_, Position::Callee, ctx);
                ctx.print("(");
                self.visit_all(&call.args, ctx);
                ctx.print(")");
            }
            Expression::External(ext) => ctx.print(&ext.helper.local_name()),
            Expression::Conditional(cond) => {
                self.visit_in(&cond.condition, Position::Test, ctx);
                ctx.print(" ? ");
                self.visit_expression(&cond.true_case, ctx);
                ctx.print(" : ");
                self.visit_expression(&cond.false_case, ctx);
            }
            Expression::ArrowFn(arrow) => {
                self.visit_params(&arrow.params, ctx);
                ctx.print(" => ");
                if !arrow.declarations.is_empty() {
                    self.visit_block_body(&arrow.declarations, &arrow.body, ctx);
                } else if matches!(arrow.body.as_ref(), Expression::LiteralMap(_)) {
                    ctx.print("(");
                    self.visit_expression(&arrow.body, ctx);
                    ctx.print(")");
                } else {
                    self.visit_expression(&arrow.body, ctx);
                }
            }
            Expression::Fn(func) => {
                ctx.print("function ");
                if let Some(name) = &func.name {
                    ctx.print(name);
                }
                self.visit_params(&func.params, ctx);
                ctx.print(" ");
                self.visit_block_body(&func.declarations, &func.body, ctx);
            }
            Expression::BinaryOp(op) => {
                self.visit_in(&op.lhs, Position::Operand, ctx);
                if let Some(op_str) = BINARY_OPERATORS.get(&op.operator) {
                    ctx.print(" ");
                    ctx.print(op_str);
                    ctx.print(" ");
                }
                self.visit_in(&op.rhs, Position::Operand, ctx);
            }
            Expression::Assign(assign) => {
                self.visit_expression(&assign.target, ctx);
                ctx.print(" = ");
                self.visit_expression(&assign.value, ctx);
            }
            Expression::ReadProp(read) => {
                self.visit_in(&read.receiver, Position::Callee, ctx);
                ctx.print(".");
                ctx.print(&read.name);
            }
            Expression::ReadKey(read) => {
                self.visit_in(&read.receiver, Position::Callee, ctx);
                ctx.print("[");
                self.visit_expression(&read.index, ctx);
                ctx.print("]");
            }
            Expression::Void(void) => {
                ctx.print("void ");
                self.visit_in(&void.expr, Position::Operand, ctx);
            }
            Expression::Empty(_) => {}
            Expression::Markup(element) => self.visit_markup(element, ctx),
        }
    }

    fn visit_in(&self, expr: &Expression, position: Position, ctx: &mut EmitterContext) {
        if needs_parens(expr, position) {
            ctx.print("(");
            self.visit_expression(expr, ctx);
            ctx.print(")");
        } else {
            self.visit_expression(expr, ctx);
        }
    }

    fn visit_all(&self, exprs: &[Expression], ctx: &mut EmitterContext) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                ctx.print(", ");
            }
            self.visit_expression(expr, ctx);
        }
    }

    fn visit_literal(&self, value: &LiteralValue, ctx: &mut EmitterContext) {
        let value_str = match value {
            LiteralValue::Null => "null".to_string(),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Number(n) => format_number(*n),
            LiteralValue::String(s) => escape_identifier(s, true),
        };
        ctx.print(&value_str);
    }

    fn visit_literal_map(&self, entries: &[LiteralMapEntry], ctx: &mut EmitterContext) {
        ctx.print("{");
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                ctx.print(", ");
            }
            match entry {
                LiteralMapEntry::Property(property) => {
                    match &property.key {
                        PropertyKey::Identifier(name) => ctx.print(&escape_identifier(name, false)),
                        PropertyKey::String(name) => ctx.print(&escape_identifier(name, true)),
                        PropertyKey::Computed(key) => {
                            ctx.print("[");
                            self.visit_expression(key, ctx);
                            ctx.print("]");
                        }
                    }
                    ctx.print(": ");
                    self.visit_expression(&property.value, ctx);
                }
                LiteralMapEntry::Spread(spread) => {
                    ctx.print("...");
                    self.visit_expression(&spread.argument, ctx);
                }
            }
        }
        ctx.print("}");
    }

    fn visit_params(&self, params: &[FnParam], ctx: &mut EmitterContext) {
        ctx.print("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                ctx.print(", ");
            }
            match param {
                FnParam::Identifier(name) => ctx.print(name),
                FnParam::Object(names) => {
                    ctx.print("{ ");
                    ctx.print(&names.join(", "));
                    ctx.print(" }");
                }
            }
        }
        ctx.print(")");
    }

    /// `{ let _a; return body; }`
    fn visit_block_body(&self, declarations: &[HoistedDeclaration], body: &Expression, ctx: &mut EmitterContext) {
        ctx.print("{ ");
        for declaration in declarations {
            self.visit_declaration(declaration, ctx);
            ctx.print(" ");
        }
        ctx.print("return ");
        self.visit_expression(body, ctx);
        ctx.print("; }");
    }

    fn visit_declaration(&self, declaration: &HoistedDeclaration, ctx: &mut EmitterContext) {
        ctx.print(match declaration.kind {
            DeclarationKind::Let => "let ",
            DeclarationKind::Const => "const ",
        });
        ctx.print(&declaration.name);
        if let Some(init) = &declaration.init {
            ctx.print(" = ");
            self.visit_expression(init, ctx);
        }
        ctx.print(";");
    }

    /// Unlowered markup only appears when printing input trees.
    fn visit_markup(&self, element: &Element, ctx: &mut EmitterContext) {
        ctx.print("<");
        ctx.print(&element.tag.name());
        ctx.print(" />");
    }
}

pub fn emit_expression(expr: &Expression) -> String {
    let mut ctx = EmitterContext::new();
    JsEmitter::new().visit_expression(expr, &mut ctx);
    ctx.to_source()
}

/// Imports, the `_isSlot` helper and hoisted declarations, followed by the expression
/// as a statement.
pub fn emit_module(output: &TransformOutput) -> String {
    let emitter = JsEmitter::new();
    let mut ctx = EmitterContext::new();

    let mut named: IndexMap<&str, Vec<String>> = IndexMap::new();
    let mut defaults = Vec::new();
    for import in &output.imports {
        match import.imported {
            Some(imported) => named
                .entry(import.module)
                .or_default()
                .push(format!("{} as {}", imported, import.local)),
            None => defaults.push(format!(
                "import {} from {};",
                import.local,
                escape_identifier(import.module, true)
            )),
        }
    }
    for (module, specifiers) in &named {
        ctx.println(&format!(
            "import {{ {} }} from {};",
            specifiers.join(", "),
            escape_identifier(module, true)
        ));
    }
    for line in &defaults {
        ctx.println(line);
    }

    if output.needs_is_slot {
        ctx.println(IS_SLOT_SOURCE);
    }

    for declaration in &output.hoisted {
        emitter.visit_declaration(declaration, &mut ctx);
        ctx.println("");
    }

    emitter.visit_expression(&output.expression, &mut ctx);
    ctx.println(";");
    ctx.to_source()
}
