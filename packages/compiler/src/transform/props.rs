//! Props Builder
//!
//! Turns an element's attribute list into the props argument of its creation call,
//! collecting runtime directives and the patch-flag bookkeeping along the way.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::dedupe::dedupe_properties;
use super::directives::{self, DecomposedDirective, DirectiveBinding, DirectiveDescriptor, DirectiveInput};
use super::element::{lower_element, lower_expression, ResolvedTag};
use super::flags::PatchFlags;
use super::identifiers::Helper;
use super::TransformContext;
use crate::error::{CompileError, Result};
use crate::jsx::ast::{is_directive, is_on, Attribute, AttributeValue, Element};
use crate::output::output_ast::{self as o, BinaryOperator, Expression, FnParam, LiteralMapEntry, PropertyKey};

lazy_static! {
    static ref XLINK_RE: Regex = Regex::new(r"^xlink([A-Z])").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltProps {
    /// Object literal, merge call, single spread argument or `null`.
    pub props: Expression,
    pub directives: Vec<DirectiveDescriptor>,
    pub patch_flag: PatchFlags,
    pub dynamic_prop_names: IndexSet<String>,
    /// Value of a `v-slots` directive.
    pub slots: Option<Expression>,
}

impl BuiltProps {
    fn empty() -> Self {
        BuiltProps {
            props: o::null_expr(),
            directives: Vec::new(),
            patch_flag: PatchFlags::empty(),
            dynamic_prop_names: IndexSet::new(),
            slots: None,
        }
    }

    /// Some directive could only be resolved by name at render time.
    pub fn has_runtime_directive(&self) -> bool {
        self.directives.iter().any(|directive| directive.runtime_resolved)
    }
}

#[derive(Default)]
struct PropsBuilder {
    is_component: bool,
    properties: Vec<LiteralMapEntry>,
    merge_args: Vec<Expression>,
    directives: Vec<DirectiveDescriptor>,
    dynamic_prop_names: IndexSet<String>,
    slots: Option<Expression>,
    has_ref: bool,
    has_class_binding: bool,
    has_style_binding: bool,
    has_hydration_event_binding: bool,
    has_dynamic_keys: bool,
}

pub fn build_props(ctx: &mut TransformContext<'_>, element: &Element, tag: &ResolvedTag) -> Result<BuiltProps> {
    if element.attributes.is_empty() {
        return Ok(BuiltProps::empty());
    }

    let mut builder = PropsBuilder {
        is_component: tag.is_component,
        ..Default::default()
    };
    for attribute in &element.attributes {
        match attribute {
            Attribute::Plain { name, value } => {
                let value = lower_attribute_value(ctx, name, value.as_ref())?;
                builder.add_plain(ctx, name, value);
            }
            Attribute::Directive { raw_name, value } => {
                let braced = matches!(value, Some(AttributeValue::Expression(_)));
                let value = lower_attribute_value(ctx, raw_name, value.as_ref())?;
                let directive = ctx.directives.decompose(DirectiveInput {
                    raw_name,
                    value: value.as_ref(),
                    braced,
                    is_component: tag.is_component,
                })?;
                builder.add_directive(ctx, element, tag, raw_name, directive, value)?;
            }
            Attribute::Spread { argument } => {
                let argument = lower_expression(ctx, argument)?;
                builder.add_spread(ctx, argument);
            }
        }
    }

    Ok(builder.finish(ctx))
}

fn lower_attribute_value(
    ctx: &mut TransformContext<'_>,
    name: &str,
    value: Option<&AttributeValue>,
) -> Result<Option<Expression>> {
    Ok(match value {
        None => None,
        Some(AttributeValue::Text(text)) => Some(o::literal(text.as_str())),
        Some(AttributeValue::Expression(Expression::Empty(_))) => {
            return Err(CompileError::EmptyAttribute { name: name.to_string() })
        }
        Some(AttributeValue::Expression(expr)) => Some(lower_expression(ctx, expr)?),
        Some(AttributeValue::Element(element)) => Some(lower_element(ctx, element)?.expression),
    })
}

/// `xlinkHref` → `xlink:href`
fn rewrite_xlink(name: &str) -> String {
    XLINK_RE
        .replace(name, |caps: &regex::Captures<'_>| format!("xlink:{}", caps[1].to_lowercase()))
        .into_owned()
}

impl PropsBuilder {
    fn track_dynamic_binding(&mut self, name: &str) {
        if name == "ref" {
            self.has_ref = true;
        } else if name == "class" && !self.is_component {
            self.has_class_binding = true;
        } else if name == "style" && !self.is_component {
            self.has_style_binding = true;
        } else if name != "key" && !is_directive(name) && name != "on" {
            self.dynamic_prop_names.insert(name.to_string());
        }

        if !self.is_component
            && is_on(name)
            && name.to_lowercase() != "onclick"
            && name != "onUpdate:modelValue"
        {
            self.has_hydration_event_binding = true;
        }
    }

    fn add_plain(&mut self, ctx: &mut TransformContext<'_>, name: &str, value: Option<Expression>) {
        let is_constant = value.as_ref().is_some_and(Expression::is_constant);
        if !is_constant || name == "ref" {
            self.track_dynamic_binding(name);
        }

        if ctx.options.transform_on && (name == "on" || name == "nativeOn") {
            let transform_on = ctx.helpers.helper(Helper::TransformOn);
            self.merge_args
                .push(transform_on.call_fn(vec![value.unwrap_or_else(|| o::literal(true))]));
            return;
        }

        self.properties.push(LiteralMapEntry::quoted(
            rewrite_xlink(name),
            value.unwrap_or_else(|| o::literal(true)),
        ));
    }

    fn add_spread(&mut self, ctx: &TransformContext<'_>, argument: Expression) {
        let merge = ctx.options.merge_props;
        if merge && !self.properties.is_empty() {
            self.flush_properties(merge);
        }
        self.has_dynamic_keys = true;

        match argument {
            Expression::LiteralMap(map) if !merge => self.properties.extend(map.entries),
            Expression::LiteralMap(map) => self.merge_args.push(Expression::LiteralMap(map)),
            other if merge => self.merge_args.push(other),
            other => self.properties.push(LiteralMapEntry::spread(other)),
        }
    }

    fn add_directive(
        &mut self,
        ctx: &mut TransformContext<'_>,
        element: &Element,
        tag: &ResolvedTag,
        raw_name: &str,
        directive: DecomposedDirective,
        value: Option<Expression>,
    ) -> Result<()> {
        let kind = directive.kind.as_str();
        if kind == "slots" {
            self.slots = value;
            return Ok(());
        }

        let resolved = directives::should_resolve(kind, self.is_component);
        if resolved {
            let reference = directives::resolve_directive(ctx, kind, element, tag.native_name.as_deref());
            trace!(kind, ?reference, "resolved directive");
            self.directives.push(directives::directive_descriptor(reference, &directive));
        } else if kind == "html" || kind == "text" {
            let prop = if kind == "html" { "innerHTML" } else { "textContent" };
            let value = directive
                .first_value()
                .cloned()
                .ok_or_else(|| CompileError::malformed_directive(raw_name, format!("v-{} requires a value", kind)))?;
            self.dynamic_prop_names.insert(prop.to_string());
            self.properties.push(LiteralMapEntry::quoted(prop, value));
        }

        if kind == "model" || kind == "models" {
            for binding in directive.bindings {
                self.add_model_binding(raw_name, binding, !resolved)?;
            }
        }
        Ok(())
    }

    /// Component models become a value prop, an optional modifiers prop and an update
    /// handler; element models only need the handler next to their runtime directive.
    fn add_model_binding(&mut self, raw_name: &str, binding: DirectiveBinding, as_props: bool) -> Result<()> {
        let value = binding
            .value
            .ok_or_else(|| CompileError::malformed_directive(raw_name, "v-model requires a bound value"))?;
        let literal_name = binding.argument.as_ref().and_then(Expression::as_string_literal).map(str::to_string);
        let dynamic_arg = binding
            .argument
            .filter(|argument| !argument.is_string_literal() && !argument.is_null_literal());

        if as_props {
            let key = match &dynamic_arg {
                Some(argument) => PropertyKey::Computed(Box::new(argument.clone())),
                None => {
                    let name = literal_name.clone().unwrap_or_else(|| "modelValue".to_string());
                    self.dynamic_prop_names.insert(name.clone());
                    PropertyKey::String(name)
                }
            };
            self.properties.push(LiteralMapEntry::property(key, value.clone()));

            if !binding.modifiers.is_empty() {
                let key = match &dynamic_arg {
                    Some(argument) => PropertyKey::Computed(Box::new(o::binary(
                        BinaryOperator::Plus,
                        argument.clone(),
                        o::literal("Modifiers"),
                    ))),
                    None => PropertyKey::String(format!(
                        "{}Modifiers",
                        literal_name.as_deref().unwrap_or("model")
                    )),
                };
                let modifiers = binding
                    .modifiers
                    .iter()
                    .map(|modifier| LiteralMapEntry::quoted(modifier.clone(), o::literal(true)))
                    .collect();
                self.properties.push(LiteralMapEntry::property(key, o::literal_map(modifiers)));
            }
        }

        let update_key = match &dynamic_arg {
            Some(argument) => {
                self.has_dynamic_keys = true;
                PropertyKey::Computed(Box::new(o::binary(
                    BinaryOperator::Plus,
                    o::literal("onUpdate:"),
                    argument.clone(),
                )))
            }
            None => {
                let name = format!("onUpdate:{}", literal_name.as_deref().unwrap_or("modelValue"));
                self.dynamic_prop_names.insert(name.clone());
                PropertyKey::String(name)
            }
        };
        let handler = o::arrow_fn(
            vec![FnParam::Identifier("$event".to_string())],
            o::assign(value, o::variable("$event")),
        );
        self.properties.push(LiteralMapEntry::property(update_key, handler));
        Ok(())
    }

    fn flush_properties(&mut self, merge: bool) {
        let properties = std::mem::take(&mut self.properties);
        self.merge_args.push(o::literal_map(dedupe_properties(properties, merge)));
    }

    fn patch_flag(&self) -> PatchFlags {
        let mut flag = PatchFlags::empty();
        if self.has_dynamic_keys {
            flag |= PatchFlags::FULL_PROPS;
        } else {
            if self.has_class_binding {
                flag |= PatchFlags::CLASS;
            }
            if self.has_style_binding {
                flag |= PatchFlags::STYLE;
            }
            if !self.dynamic_prop_names.is_empty() {
                flag |= PatchFlags::PROPS;
            }
            if self.has_hydration_event_binding {
                flag |= PatchFlags::HYDRATE_EVENTS;
            }
        }
        if (flag.is_empty() || flag == PatchFlags::HYDRATE_EVENTS) && (self.has_ref || !self.directives.is_empty()) {
            flag |= PatchFlags::NEED_PATCH;
        }
        flag
    }

    fn finish(mut self, ctx: &mut TransformContext<'_>) -> BuiltProps {
        let patch_flag = self.patch_flag();
        let merge = ctx.options.merge_props;

        let props = if !self.merge_args.is_empty() {
            if !self.properties.is_empty() {
                self.flush_properties(merge);
            }
            if self.merge_args.len() > 1 {
                let merge_props = ctx.helpers.helper(Helper::MergeProps);
                merge_props.call_fn(std::mem::take(&mut self.merge_args))
            } else {
                let arg = self.merge_args.pop().unwrap_or_else(o::null_expr);
                if self.is_component {
                    arg
                } else {
                    let normalize = ctx.helpers.helper(Helper::NormalizeProps);
                    let guard = ctx.helpers.helper(Helper::GuardReactiveProps);
                    normalize.call_fn(vec![guard.call_fn(vec![arg])])
                }
            }
        } else if let Some(argument) = take_single_spread(&mut self.properties) {
            argument
        } else if !self.properties.is_empty() {
            let entries = dedupe_properties(std::mem::take(&mut self.properties), merge)
                .into_iter()
                .map(|entry| normalize_class_and_style(ctx, entry))
                .collect();
            o::literal_map(entries)
        } else {
            o::null_expr()
        };

        BuiltProps {
            props,
            directives: self.directives,
            patch_flag,
            dynamic_prop_names: self.dynamic_prop_names,
            slots: self.slots,
        }
    }
}

/// `{...props}` alone passes `props` straight through.
fn take_single_spread(properties: &mut Vec<LiteralMapEntry>) -> Option<Expression> {
    if !matches!(properties.as_slice(), [LiteralMapEntry::Spread(_)]) {
        return None;
    }
    match properties.pop() {
        Some(LiteralMapEntry::Spread(spread)) => Some(*spread.argument),
        _ => None,
    }
}

fn normalize_class_and_style(ctx: &mut TransformContext<'_>, entry: LiteralMapEntry) -> LiteralMapEntry {
    let LiteralMapEntry::Property(mut property) = entry else {
        return entry;
    };
    let helper = match property.key.string_name() {
        Some("class") if !property.value.is_string_literal() => Some(Helper::NormalizeClass),
        Some("style")
            if !property.value.is_string_literal() && !matches!(property.value.as_ref(), Expression::LiteralMap(_)) =>
        {
            Some(Helper::NormalizeStyle)
        }
        _ => None,
    };
    if let Some(helper) = helper {
        let value = std::mem::replace(property.value.as_mut(), o::null_expr());
        *property.value = ctx.helpers.helper(helper).call_fn(vec![value]);
    }
    LiteralMapEntry::Property(property)
}
