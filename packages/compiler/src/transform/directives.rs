//! Directive Decomposition
//!
//! Splits a directive attribute such as `v-model:title_trim={[value, "arg", ["lazy"]]}`
//! into its kind and one or more `(value, argument, modifiers)` bindings, and builds the
//! runtime descriptor arrays passed to `withDirectives`.

use indexmap::IndexSet;
use smallvec::{smallvec, SmallVec};

use super::identifiers::Helper;
use super::TransformContext;
use crate::error::{CompileError, Result};
use crate::jsx::ast::{AttributeValue, Element};
use crate::output::output_ast::{self as o, Expression, LiteralMapEntry};

/// Kinds compiled into properties instead of runtime directives.
const BUILT_IN_KINDS: [&str; 5] = ["html", "text", "model", "slots", "models"];

/// Raw directive attribute handed to a [`DirectiveDecomposer`].
#[derive(Debug, Clone, Copy)]
pub struct DirectiveInput<'a> {
    pub raw_name: &'a str,
    /// Value after nested markup has been lowered.
    pub value: Option<&'a Expression>,
    /// The value was written inside `{}`.
    pub braced: bool,
    pub is_component: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveBinding {
    pub value: Option<Expression>,
    pub argument: Option<Expression>,
    pub modifiers: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecomposedDirective {
    /// Normalized name: `v-model` and `vModel` are both `model`.
    pub kind: String,
    /// One entry for every directive but `v-models`.
    pub bindings: SmallVec<[DirectiveBinding; 1]>,
}

impl DecomposedDirective {
    pub fn first_value(&self) -> Option<&Expression> {
        self.bindings.first().and_then(|binding| binding.value.as_ref())
    }
}

pub trait DirectiveDecomposer {
    fn decompose(&self, input: DirectiveInput<'_>) -> Result<DecomposedDirective>;
}

/// Vue's directive syntax: `_` separated modifiers, `:` for a static argument, and array
/// values for dynamic arguments and modifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct VueDirectiveDecomposer;

impl DirectiveDecomposer for VueDirectiveDecomposer {
    fn decompose(&self, input: DirectiveInput<'_>) -> Result<DecomposedDirective> {
        let raw_name = input.raw_name;
        let (directive_name, name_modifiers, namespace_arg) = match raw_name.split_once(':') {
            Some((name, arg)) => {
                let mut parts = arg.split('_');
                let argument = parts.next().filter(|arg| !arg.is_empty()).map(str::to_string);
                (name, parts.map(str::to_string).collect::<IndexSet<_>>(), argument)
            }
            None => {
                let mut parts = raw_name.split('_');
                let name = parts.next().unwrap_or(raw_name);
                (name, parts.map(str::to_string).collect(), None)
            }
        };
        let kind = normalize_kind(directive_name);
        let is_model = kind == "model";
        let is_models = kind == "models";

        if is_model && !input.braced {
            return Err(CompileError::malformed_directive(
                raw_name,
                "You have to use JSX Expression inside your v-model",
            ));
        }
        if is_models && !input.is_component {
            return Err(CompileError::malformed_directive(
                raw_name,
                "v-models can only use in custom components",
            ));
        }

        let mut bindings: SmallVec<[DirectiveBinding; 1]> = match input.value {
            Some(Expression::LiteralArray(array)) => {
                let groups: Vec<&[Expression]> = if is_models {
                    array
                        .entries
                        .iter()
                        .map(|entry| match entry {
                            Expression::LiteralArray(group) => Ok(group.entries.as_slice()),
                            _ => Err(CompileError::malformed_directive(
                                raw_name,
                                "You should pass a Two-dimensional Arrays to v-models",
                            )),
                        })
                        .collect::<Result<_>>()?
                } else {
                    vec![array.entries.as_slice()]
                };
                groups
                    .into_iter()
                    .map(|group| binding_from_array(group, &name_modifiers))
                    .collect()
            }
            value => smallvec![DirectiveBinding {
                value: value.cloned(),
                argument: None,
                modifiers: name_modifiers.clone(),
            }],
        };

        if let (Some(argument), Some(first)) = (namespace_arg, bindings.first_mut()) {
            first.argument = Some(o::literal(argument));
        }

        Ok(DecomposedDirective { kind, bindings })
    }
}

/// `[value]`, `[value, arg]`, `[value, arg, [mods]]` or `[value, [mods]]`.
fn binding_from_array(group: &[Expression], name_modifiers: &IndexSet<String>) -> DirectiveBinding {
    let value = group.first().cloned();
    let (argument, modifiers) = match (group.get(1), group.get(2)) {
        (Some(Expression::LiteralArray(_)), _) => (None, parse_modifiers(group.get(1))),
        (Some(Expression::Spread(_)), _) | (None, _) => (None, name_modifiers.clone()),
        (Some(argument), third) => (Some(argument.clone()), parse_modifiers(third)),
    };
    DirectiveBinding {
        value,
        argument,
        modifiers,
    }
}

fn parse_modifiers(value: Option<&Expression>) -> IndexSet<String> {
    match value {
        Some(Expression::LiteralArray(array)) => array
            .entries
            .iter()
            .filter_map(|entry| entry.as_string_literal().map(str::to_string))
            .collect(),
        _ => IndexSet::new(),
    }
}

/// `v-custom-thing` → `custom-thing`, `vCustom` → `custom`.
pub fn normalize_kind(name: &str) -> String {
    let name = name.strip_prefix('v').unwrap_or(name);
    let name = name.strip_prefix('-').unwrap_or(name);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Built-in kinds never reach the runtime, except `v-model` on a native element.
pub fn should_resolve(kind: &str, is_component: bool) -> bool {
    !BUILT_IN_KINDS.contains(&kind) || (kind == "model" && !is_component)
}

/// Reference to a directive definition.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DirectiveRef {
    /// A runtime helper or an in-scope identifier.
    Static(Expression),
    /// `resolveDirective("name")`; the definition is only known at render time.
    Runtime(Expression),
}

impl DirectiveRef {
    fn into_expression(self) -> Expression {
        match self {
            DirectiveRef::Static(expr) | DirectiveRef::Runtime(expr) => expr,
        }
    }
}

/// One entry of the `withDirectives` descriptor array.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDescriptor {
    pub expression: Expression,
    pub runtime_resolved: bool,
}

pub(crate) fn resolve_directive(
    ctx: &mut TransformContext<'_>,
    kind: &str,
    element: &Element,
    native_tag: Option<&str>,
) -> DirectiveRef {
    if kind == "show" {
        return DirectiveRef::Static(ctx.helpers.helper(Helper::VShow));
    }
    if kind == "model" {
        let helper = match native_tag {
            Some("select") => Helper::VModelSelect,
            Some("textarea") => Helper::VModelText,
            _ => match element.type_attribute() {
                None | Some(None) => Helper::VModelText,
                Some(Some(AttributeValue::Text(ty))) => match ty.as_str() {
                    "checkbox" => Helper::VModelCheckbox,
                    "radio" => Helper::VModelRadio,
                    _ => Helper::VModelText,
                },
                Some(Some(_)) => Helper::VModelDynamic,
            },
        };
        return DirectiveRef::Static(ctx.helpers.helper(helper));
    }

    let local = format!("v{}", capitalize(kind));
    if ctx.scope.has_reference(&local) {
        DirectiveRef::Static(o::variable(local))
    } else {
        let resolve = ctx.helpers.helper(Helper::ResolveDirective);
        DirectiveRef::Runtime(resolve.call_fn(vec![o::literal(kind)]))
    }
}

/// `[dir, value, arg, { mod: true }]` with absent trailing members dropped. The argument
/// becomes `void 0` when modifiers follow it.
pub(crate) fn directive_descriptor(reference: DirectiveRef, directive: &DecomposedDirective) -> DirectiveDescriptor {
    let runtime_resolved = matches!(reference, DirectiveRef::Runtime(_));
    let mut entries = vec![reference.into_expression()];

    if let Some(binding) = directive.bindings.first() {
        entries.extend(binding.value.clone());
        if binding.modifiers.is_empty() {
            entries.extend(binding.argument.clone());
        } else {
            entries.push(binding.argument.clone().unwrap_or_else(o::void_zero));
            entries.push(o::literal_map(
                binding
                    .modifiers
                    .iter()
                    .map(|modifier| LiteralMapEntry::named(modifier.clone(), o::literal(true)))
                    .collect(),
            ));
        }
    }

    DirectiveDescriptor {
        expression: o::literal_arr(entries),
        runtime_resolved,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
