//! Element Compiler
//!
//! Lowers one element (children first, then props) into a vnode creation call, wrapping
//! it in `withDirectives` when runtime directives are present. Children of components
//! are packaged as slot objects carrying a slot flag.

use indexmap::IndexSet;
use tracing::debug;

use super::flags::{PatchFlags, SlotFlag};
use super::identifiers::Helper;
use super::props::build_props;
use super::scope::{element_key, HoistedDeclaration};
use super::slot_flags::{self, FORWARDED_SLOTS};
use super::TransformContext;
use crate::error::{CompileError, Result};
use crate::jsx::ast::{ChildNode, Element, TagRef};
use crate::jsx::tags::{self, FRAGMENT};
use crate::output::output_ast::{self as o, Expression, LiteralMapEntry, PropertyKey};

/// Creation call for one element, plus whether every strict ancestor must be
/// deoptimized because a runtime-resolved directive sits at or below it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredElement {
    pub expression: Expression,
    pub deoptimizes_ancestors: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTag {
    pub expression: Expression,
    pub is_component: bool,
    /// Set for native HTML / SVG tags.
    pub native_name: Option<String>,
}

pub fn resolve_tag(ctx: &mut TransformContext<'_>, tag: &TagRef) -> ResolvedTag {
    let is_component = tags::is_component(tag, &ctx.custom_elements);
    match tag {
        TagRef::Identifier(name) => {
            let (expression, native_name) = if tags::is_native_tag(name) {
                (o::literal(name.as_str()), Some(name.clone()))
            } else if name == FRAGMENT {
                (ctx.helpers.helper(Helper::Fragment), None)
            } else if ctx.scope.has_binding(name) {
                (o::variable(name.as_str()), None)
            } else if tags::is_custom_element(name, &ctx.custom_elements) {
                (o::literal(name.as_str()), None)
            } else {
                let resolve = ctx.helpers.helper(Helper::ResolveComponent);
                (resolve.call_fn(vec![o::literal(name.as_str())]), None)
            };
            ResolvedTag {
                expression,
                is_component,
                native_name,
            }
        }
        TagRef::Member { object, path } => ResolvedTag {
            expression: path
                .iter()
                .fold(o::variable(object.as_str()), |receiver, name| receiver.prop(name.as_str())),
            is_component,
            native_name: None,
        },
    }
}

pub fn lower_element(ctx: &mut TransformContext<'_>, element: &Element) -> Result<LoweredElement> {
    let (children, children_deoptimize) = lower_children(ctx, element)?;
    let tag = resolve_tag(ctx, &element.tag);
    let built = build_props(ctx, element, &tag)?;
    let has_runtime_directive = built.has_runtime_directive();
    let mut patch_flag = built.patch_flag;

    let prior = if children_deoptimize || ctx.analysis.is_forced_dynamic(element) {
        SlotFlag::Dynamic
    } else {
        SlotFlag::Stable
    };
    let (children, slot_flag) = package_children(ctx, element, &tag, children, built.slots, prior);
    if slot_flag == SlotFlag::Dynamic {
        patch_flag |= PatchFlags::DYNAMIC_SLOTS;
    }

    let create = ctx.helpers.create_vnode(tag.is_component);
    let mut args = vec![tag.expression, built.props, children.unwrap_or_else(o::null_expr)];
    if ctx.options.optimize {
        if !patch_flag.is_empty() {
            args.push(o::literal(patch_flag.bits()));
        }
        if !built.dynamic_prop_names.is_empty() {
            args.push(dynamic_names(&built.dynamic_prop_names));
        }
    }
    let call = create.call_fn(args);

    debug!(
        tag = %element.tag.name(),
        patch_flag = patch_flag.bits(),
        ?slot_flag,
        directives = built.directives.len(),
        "lowered element"
    );

    let expression = if built.directives.is_empty() {
        call
    } else {
        let with_directives = ctx.helpers.helper(Helper::WithDirectives);
        let descriptors = built.directives.into_iter().map(|d| d.expression).collect();
        with_directives.call_fn(vec![call, o::literal_arr(descriptors)])
    };

    Ok(LoweredElement {
        expression,
        deoptimizes_ancestors: has_runtime_directive || children_deoptimize,
    })
}

fn dynamic_names(names: &IndexSet<String>) -> Expression {
    o::literal_arr(names.iter().map(|name| o::literal(name.as_str())).collect())
}

fn lower_children(ctx: &mut TransformContext<'_>, element: &Element) -> Result<(Vec<Expression>, bool)> {
    let mut lowered = Vec::with_capacity(element.children.len());
    let mut deoptimize = false;

    for child in &element.children {
        match child {
            ChildNode::Text(text) if text.is_empty() => {}
            ChildNode::Text(text) => {
                let create_text = ctx.helpers.helper(Helper::CreateTextVNode);
                lowered.push(create_text.call_fn(vec![o::literal(text.as_str())]));
            }
            ChildNode::Expression(Expression::Empty(_)) => {}
            ChildNode::Expression(Expression::Spread(_)) => {
                return Err(CompileError::UnsupportedChild { kind: "SpreadElement" });
            }
            ChildNode::Expression(expr) => lowered.push(lower_expression(ctx, expr)?),
            ChildNode::Spread(expr) => lowered.push(o::spread(lower_expression(ctx, expr)?)),
            ChildNode::Element(child) => {
                let child = lower_element(ctx, child)?;
                deoptimize |= child.deoptimizes_ancestors;
                lowered.push(child.expression);
            }
        }
    }

    Ok((lowered, deoptimize))
}

/// Build the children argument and the final slot flag.
fn package_children(
    ctx: &mut TransformContext<'_>,
    element: &Element,
    tag: &ResolvedTag,
    mut children: Vec<Expression>,
    slots: Option<Expression>,
    mut slot_flag: SlotFlag,
) -> (Option<Expression>, SlotFlag) {
    let is_component = tag.is_component;

    if children.len() > 1 || slots.is_some() {
        if !is_component {
            return (Some(o::literal_arr(children)), slot_flag);
        }
        if children.is_empty() && !ctx.options.optimize {
            return (slots, slot_flag);
        }

        let mut entries = Vec::new();
        if !children.is_empty() {
            let children = snapshot_self_references(ctx, element, children);
            entries.push(default_slot(children));
        }
        match slots {
            Some(Expression::LiteralMap(map)) => {
                slot_flag = slot_flags::classify(&map.entries, slot_flag);
                entries.extend(map.entries);
            }
            Some(other) => {
                slot_flag = slot_flag.escalate(if other.is_identifier_named(FORWARDED_SLOTS) {
                    SlotFlag::Forwarded
                } else {
                    SlotFlag::Dynamic
                });
                entries.push(LiteralMapEntry::spread(other));
            }
            None => {}
        }
        push_slot_flag(ctx, &mut entries, slot_flag);
        return (Some(o::literal_map(entries)), slot_flag);
    }

    let Some(child) = children.pop() else {
        return (None, slot_flag);
    };

    let packaged = match child {
        Expression::ReadVar(_) if is_component => {
            let mut fallback = vec![default_slot(snapshot_self_references(ctx, element, vec![child.clone()]))];
            push_slot_flag(ctx, &mut fallback, slot_flag);
            if ctx.options.enable_object_slots {
                let is_slot = ctx.helpers.helper(Helper::IsSlot);
                let test = is_slot.call_fn(vec![child.clone()]);
                o::conditional(test, child, o::literal_map(fallback))
            } else {
                o::literal_map(fallback)
            }
        }
        Expression::InvokeFn(ref call) if call.source_span.is_some() && is_component => {
            if ctx.options.enable_object_slots {
                let slot_id = ctx.scope.fresh_identifier("slot");
                ctx.scope.register_binding(&slot_id);
                ctx.hoist(HoistedDeclaration::uninitialized_let(slot_id.as_str()));

                let mut fallback = vec![default_slot(vec![o::variable(slot_id.as_str())])];
                push_slot_flag(ctx, &mut fallback, slot_flag);
                let is_slot = ctx.helpers.helper(Helper::IsSlot);
                let test = is_slot.call_fn(vec![o::assign(o::variable(slot_id.as_str()), child)]);
                o::conditional(test, o::variable(slot_id.as_str()), o::literal_map(fallback))
            } else {
                let mut entries = vec![default_slot(snapshot_self_references(ctx, element, vec![child]))];
                push_slot_flag(ctx, &mut entries, slot_flag);
                o::literal_map(entries)
            }
        }
        child if child.is_function() => {
            let mut entries = vec![LiteralMapEntry::named("default", child)];
            push_slot_flag(ctx, &mut entries, slot_flag);
            o::literal_map(entries)
        }
        Expression::LiteralMap(map) => {
            slot_flag = slot_flags::classify(&map.entries, slot_flag);
            let mut entries = map.entries;
            push_slot_flag(ctx, &mut entries, slot_flag);
            o::literal_map(entries)
        }
        child if is_component => {
            let mut entries = vec![default_slot(vec![child])];
            push_slot_flag(ctx, &mut entries, slot_flag);
            o::literal_map(entries)
        }
        child => o::literal_arr(vec![child]),
    };
    (Some(packaged), slot_flag)
}

/// `default: () => [children]`
fn default_slot(children: Vec<Expression>) -> LiteralMapEntry {
    LiteralMapEntry::named("default", o::arrow_fn(vec![], o::literal_arr(children)))
}

/// `_: flag`, only written when optimizing.
fn push_slot_flag(ctx: &TransformContext<'_>, entries: &mut Vec<LiteralMapEntry>, flag: SlotFlag) {
    if ctx.options.optimize {
        entries.push(LiteralMapEntry::named("_", o::literal(flag.value())));
    }
}

/// Inside `const x = <A>{x}</A>` the slot closure would read `x` after it is reassigned;
/// replace such children with a snapshot taken before the assignment.
fn snapshot_self_references(
    ctx: &mut TransformContext<'_>,
    element: &Element,
    children: Vec<Expression>,
) -> Vec<Expression> {
    let target = match &ctx.assignment_target {
        Some((target, key)) if *key == element_key(element) => target.clone(),
        _ => return children,
    };

    children
        .into_iter()
        .map(|child| {
            if !child.is_identifier_named(&target) {
                return child;
            }
            let snapshot = ctx.scope.fresh_identifier(&target);
            ctx.scope.register_binding(&snapshot);
            let init = o::fn_expr(vec![], o::variable(target.as_str())).call_fn(vec![]);
            ctx.hoist(HoistedDeclaration::constant(snapshot.as_str(), init));
            o::variable(snapshot)
        })
        .collect()
}

/// Lower a function body inside its own declaration frame, so temporaries it needs are
/// declared per call rather than shared at module level.
fn lower_function_body(
    ctx: &mut TransformContext<'_>,
    body: &Expression,
    existing: &[HoistedDeclaration],
) -> Result<(Expression, Vec<HoistedDeclaration>)> {
    ctx.enter_function();
    let lowered = lower_expression(ctx, body);
    let mut declarations = existing.to_vec();
    declarations.extend(ctx.exit_function());
    Ok((lowered?, declarations))
}

/// Copy `expr`, lowering every piece of markup nested inside it.
pub fn lower_expression(ctx: &mut TransformContext<'_>, expr: &Expression) -> Result<Expression> {
    let lower_box = |ctx: &mut TransformContext<'_>, expr: &Expression| -> Result<Box<Expression>> {
        Ok(Box::new(lower_expression(ctx, expr)?))
    };

    Ok(match expr {
        Expression::Markup(element) => lower_element(ctx, element)?.expression,
        Expression::ReadVar(_) | Expression::Literal(_) | Expression::External(_) | Expression::Empty(_) => {
            expr.clone()
        }
        Expression::LiteralArray(array) => o::literal_arr(
            array
                .entries
                .iter()
                .map(|entry| lower_expression(ctx, entry))
                .collect::<Result<_>>()?,
        ),
        Expression::LiteralMap(map) => {
            let mut entries = Vec::with_capacity(map.entries.len());
            for entry in &map.entries {
                entries.push(match entry {
                    LiteralMapEntry::Property(property) => {
                        let key = match &property.key {
                            PropertyKey::Computed(key) => PropertyKey::Computed(lower_box(ctx, key)?),
                            key => key.clone(),
                        };
                        LiteralMapEntry::property(key, lower_expression(ctx, &property.value)?)
                    }
                    LiteralMapEntry::Spread(spread) => LiteralMapEntry::spread(lower_expression(ctx, &spread.argument)?),
                });
            }
            o::literal_map(entries)
        }
        Expression::Spread(spread) => o::spread(lower_expression(ctx, &spread.argument)?),
        Expression::InvokeFn(call) => {
            let mut lowered = call.clone();
            lowered.fn_ = lower_box(ctx, &call.fn_)?;
            lowered.args = call
                .args
                .iter()
                .map(|arg| lower_expression(ctx, arg))
                .collect::<Result<_>>()?;
            Expression::InvokeFn(lowered)
        }
        Expression::Conditional(cond) => o::conditional(
            lower_expression(ctx, &cond.condition)?,
            lower_expression(ctx, &cond.true_case)?,
            lower_expression(ctx, &cond.false_case)?,
        ),
        Expression::ArrowFn(arrow) => {
            let (body, declarations) = lower_function_body(ctx, &arrow.body, &arrow.declarations)?;
            Expression::ArrowFn(o::ArrowFunctionExpr {
                params: arrow.params.clone(),
                body: Box::new(body),
                declarations,
            })
        }
        Expression::Fn(func) => {
            let (body, declarations) = lower_function_body(ctx, &func.body, &func.declarations)?;
            Expression::Fn(o::FunctionExpr {
                name: func.name.clone(),
                params: func.params.clone(),
                body: Box::new(body),
                declarations,
            })
        }
        Expression::BinaryOp(op) => o::binary(
            op.operator,
            lower_expression(ctx, &op.lhs)?,
            lower_expression(ctx, &op.rhs)?,
        ),
        Expression::Assign(assign) => o::assign(
            lower_expression(ctx, &assign.target)?,
            lower_expression(ctx, &assign.value)?,
        ),
        Expression::ReadProp(read) => lower_expression(ctx, &read.receiver)?.prop(read.name.as_str()),
        Expression::ReadKey(read) => {
            let receiver = lower_expression(ctx, &read.receiver)?;
            receiver.key(lower_expression(ctx, &read.index)?)
        }
        Expression::Void(void) => Expression::Void(crate::output::output_ast::VoidExpr {
            expr: lower_box(ctx, &void.expr)?,
        }),
    })
}
