//! Output AST Module
//!
//! Expression tree shared by the input (expressions embedded in markup) and the output
//! (vnode creation calls). The pass only reads source-level nodes and builds new ones in
//! the same representation.

use serde::{Deserialize, Serialize};

use crate::jsx::ast::Element;
use crate::transform::identifiers::Helper;

/// Byte range of a node in the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Identical,
    NotIdentical,
    And,
    Or,
    NullishCoalesce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    ReadVar(ReadVarExpr),
    Literal(LiteralExpr),
    LiteralArray(LiteralArrayExpr),
    LiteralMap(LiteralMapExpr),
    Spread(SpreadExpr),
    InvokeFn(InvokeFunctionExpr),
    External(ExternalExpr),
    Conditional(ConditionalExpr),
    ArrowFn(ArrowFunctionExpr),
    Fn(FunctionExpr),
    BinaryOp(BinaryOperatorExpr),
    Assign(AssignExpr),
    ReadProp(ReadPropExpr),
    ReadKey(ReadKeyExpr),
    Void(VoidExpr),
    /// `{}` or `{/* comment */}` in child position.
    Empty(EmptyExpr),
    /// Markup that has not been lowered yet.
    Markup(Box<Element>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadVarExpr {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<u32> for LiteralValue {
    fn from(value: u32) -> Self {
        LiteralValue::Number(f64::from(value))
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralArrayExpr {
    /// May contain `Expression::Spread` entries.
    pub entries: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralMapExpr {
    pub entries: Vec<LiteralMapEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LiteralMapEntry {
    Property(LiteralMapProperty),
    Spread(SpreadExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralMapProperty {
    pub key: PropertyKey,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyKey {
    /// `{ foo: … }`
    Identifier(String),
    /// `{ "foo": … }`
    String(String),
    /// `{ [foo]: … }`
    Computed(Box<Expression>),
}

impl PropertyKey {
    /// Name of a quoted string key; identifier and computed keys return `None`.
    pub fn string_name(&self) -> Option<&str> {
        match self {
            PropertyKey::String(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadExpr {
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeFunctionExpr {
    pub fn_: Box<Expression>,
    pub args: Vec<Expression>,
    /// Present on calls written in source; generated calls carry none.
    pub source_span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalExpr {
    pub helper: Helper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpr {
    pub condition: Box<Expression>,
    pub true_case: Box<Expression>,
    pub false_case: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FnParam {
    Identifier(String),
    /// `({ a, b }) => …`
    Object(Vec<String>),
}

impl FnParam {
    pub fn bound_names(&self) -> Vec<&str> {
        match self {
            FnParam::Identifier(name) => vec![name.as_str()],
            FnParam::Object(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowFunctionExpr {
    pub params: Vec<FnParam>,
    pub body: Box<Expression>,
    /// Temporaries declared at the top of the body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<HoistedDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpr {
    pub name: Option<String>,
    pub params: Vec<FnParam>,
    /// Returned value of the function body.
    pub body: Box<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<HoistedDeclaration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Let,
    Const,
}

/// A declaration the lowering pass places ahead of the code that uses it: at the top of
/// the nearest enclosing function, or at module level when there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoistedDeclaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub init: Option<Expression>,
}

impl HoistedDeclaration {
    pub fn uninitialized_let(name: impl Into<String>) -> Self {
        HoistedDeclaration {
            kind: DeclarationKind::Let,
            name: name.into(),
            init: None,
        }
    }

    pub fn constant(name: impl Into<String>, init: Expression) -> Self {
        HoistedDeclaration {
            kind: DeclarationKind::Const,
            name: name.into(),
            init: Some(init),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperatorExpr {
    pub operator: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignExpr {
    pub target: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidExpr {
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyExpr {}

// Builders

pub fn variable(name: impl Into<String>) -> Expression {
    Expression::ReadVar(ReadVarExpr { name: name.into() })
}

pub fn literal(value: impl Into<LiteralValue>) -> Expression {
    Expression::Literal(LiteralExpr {
        value: value.into(),
    })
}

pub fn null_expr() -> Expression {
    Expression::Literal(LiteralExpr {
        value: LiteralValue::Null,
    })
}

pub fn void_zero() -> Expression {
    Expression::Void(VoidExpr {
        expr: Box::new(literal(0u32)),
    })
}

pub fn literal_arr(entries: Vec<Expression>) -> Expression {
    Expression::LiteralArray(LiteralArrayExpr { entries })
}

pub fn literal_map(entries: Vec<LiteralMapEntry>) -> Expression {
    Expression::LiteralMap(LiteralMapExpr { entries })
}

pub fn spread(argument: Expression) -> Expression {
    Expression::Spread(SpreadExpr {
        argument: Box::new(argument),
    })
}

pub fn import_ref(helper: Helper) -> Expression {
    Expression::External(ExternalExpr { helper })
}

pub fn arrow_fn(params: Vec<FnParam>, body: Expression) -> Expression {
    Expression::ArrowFn(ArrowFunctionExpr {
        params,
        body: Box::new(body),
        declarations: Vec::new(),
    })
}

pub fn fn_expr(params: Vec<FnParam>, body: Expression) -> Expression {
    Expression::Fn(FunctionExpr {
        name: None,
        params,
        body: Box::new(body),
        declarations: Vec::new(),
    })
}

pub fn conditional(condition: Expression, true_case: Expression, false_case: Expression) -> Expression {
    Expression::Conditional(ConditionalExpr {
        condition: Box::new(condition),
        true_case: Box::new(true_case),
        false_case: Box::new(false_case),
    })
}

pub fn assign(target: Expression, value: Expression) -> Expression {
    Expression::Assign(AssignExpr {
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn binary(operator: BinaryOperator, lhs: Expression, rhs: Expression) -> Expression {
    Expression::BinaryOp(BinaryOperatorExpr {
        operator,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

impl LiteralMapEntry {
    pub fn property(key: PropertyKey, value: Expression) -> Self {
        LiteralMapEntry::Property(LiteralMapProperty {
            key,
            value: Box::new(value),
        })
    }

    /// `{ "name": value }`
    pub fn quoted(name: impl Into<String>, value: Expression) -> Self {
        Self::property(PropertyKey::String(name.into()), value)
    }

    /// `{ name: value }`
    pub fn named(name: impl Into<String>, value: Expression) -> Self {
        Self::property(PropertyKey::Identifier(name.into()), value)
    }

    pub fn spread(argument: Expression) -> Self {
        LiteralMapEntry::Spread(SpreadExpr {
            argument: Box::new(argument),
        })
    }
}

impl Expression {
    pub fn call_fn(self, args: Vec<Expression>) -> Expression {
        Expression::InvokeFn(InvokeFunctionExpr {
            fn_: Box::new(self),
            args,
            source_span: None,
        })
    }

    pub fn prop(self, name: impl Into<String>) -> Expression {
        Expression::ReadProp(ReadPropExpr {
            receiver: Box::new(self),
            name: name.into(),
        })
    }

    pub fn key(self, index: Expression) -> Expression {
        Expression::ReadKey(ReadKeyExpr {
            receiver: Box::new(self),
            index: Box::new(index),
        })
    }

    /// Attach a source span to a call so it counts as authored rather than generated.
    pub fn with_span(self, span: Span) -> Expression {
        match self {
            Expression::InvokeFn(mut call) => {
                call.source_span = Some(span);
                Expression::InvokeFn(call)
            }
            other => other,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expression::ReadVar(var) => Some(&var.name),
            _ => None,
        }
    }

    pub fn is_identifier_named(&self, name: &str) -> bool {
        self.as_identifier() == Some(name)
    }

    pub fn is_string_literal(&self) -> bool {
        matches!(
            self,
            Expression::Literal(LiteralExpr {
                value: LiteralValue::String(_)
            })
        )
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Expression::Literal(LiteralExpr {
                value: LiteralValue::String(value),
            }) => Some(value),
            _ => None,
        }
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(
            self,
            Expression::Literal(LiteralExpr {
                value: LiteralValue::Null
            })
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Expression::ArrowFn(_) | Expression::Fn(_))
    }

    /// `receiver.name` where the receiver is the identifier `object`.
    pub fn is_member_of(&self, object: &str) -> bool {
        match self {
            Expression::ReadProp(read) => read.receiver.is_identifier_named(object),
            Expression::ReadKey(read) => read.receiver.is_identifier_named(object),
            _ => false,
        }
    }

    /// Values known at compile time: literals, `undefined`, and array / object literals
    /// built only from such values.
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::ReadVar(var) => var.name == "undefined",
            Expression::Literal(_) => true,
            Expression::LiteralArray(array) => array.entries.iter().all(Expression::is_constant),
            Expression::LiteralMap(map) => map.entries.iter().all(|entry| match entry {
                LiteralMapEntry::Property(property) => property.value.is_constant(),
                LiteralMapEntry::Spread(_) => false,
            }),
            _ => false,
        }
    }
}
