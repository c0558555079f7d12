//! Props Tests
//!
//! Attribute merging, normalization and the patch flags derived from attributes.

#[path = "util.rs"]
mod util;

use util::*;
use vue_jsx_compiler::output::output_ast as o;
use vue_jsx_compiler::{Attribute, AttributeValue, CompileError, TransformOptions};

fn unmerged() -> TransformOptions {
    TransformOptions {
        merge_props: false,
        ..optimized()
    }
}

mod static_attributes {
    use super::*;

    #[test]
    fn constant_attributes_have_no_patch_flag() {
        let root = el("div").with_attr(Attribute::text("id", "x")).with_attr(Attribute::text("class", "a"));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"id": "x", "class": "a"}, null)"#
        );
    }

    #[test]
    fn bare_attribute_is_true_and_counts_as_dynamic() {
        let root = el("input").with_attr(Attribute::bare("disabled"));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("input", {"disabled": true}, null, 8, ["disabled"])"#
        );
    }

    #[test]
    fn constant_expressions_are_static() {
        let root = el("div")
            .with_attr(attr("tabindex", o::literal(1u32)))
            .with_attr(attr("data", o::literal_arr(vec![o::literal("a"), o::literal(true)])));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"tabindex": 1, "data": ["a", true]}, null)"#
        );
    }

    #[test]
    fn xlink_attributes_are_namespaced() {
        let root = el("use").with_attr(Attribute::text("xlinkHref", "#icon"));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r##"_createElementVNode("use", {"xlink:href": "#icon"}, null)"##
        );
    }

    #[test]
    fn no_attributes_is_null_props() {
        assert_eq!(
            compile_js(&el("div"), &optimized(), &[]),
            r#"_createElementVNode("div", null, null)"#
        );
    }
}

mod dynamic_attributes {
    use super::*;

    #[test]
    fn class_binding() {
        let root = el("div").with_attr(attr("class", var("cls")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"class": _normalizeClass(cls)}, null, 2)"#
        );
    }

    #[test]
    fn style_binding() {
        let root = el("div").with_attr(attr("style", var("st")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"style": _normalizeStyle(st)}, null, 4)"#
        );
    }

    #[test]
    fn object_style_is_not_normalized() {
        let root = el("div").with_attr(attr("style", object(vec![("color", var("c"))])));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"style": {color: c}}, null, 4)"#
        );
    }

    #[test]
    fn component_class_is_a_regular_prop_name() {
        let root = el("A").with_attr(attr("class", var("cls")));
        assert_eq!(
            compile_js(&root, &optimized(), &["A"]),
            r#"_createVNode(A, {"class": _normalizeClass(cls)}, null, 8, ["class"])"#
        );
    }

    #[test]
    fn props_collect_dynamic_names() {
        let root = el("div").with_attr(attr("id", var("id"))).with_attr(attr("onClick", var("h")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"id": id, "onClick": h}, null, 8, ["id", "onClick"])"#
        );
    }

    #[test]
    fn non_click_handlers_need_hydration() {
        let root = el("input").with_attr(attr("onInput", var("h")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("input", {"onInput": h}, null, 40, ["onInput"])"#
        );
    }

    #[test]
    fn component_handlers_skip_hydration() {
        let root = el("A").with_attr(attr("onInput", var("h")));
        assert_eq!(
            compile_js(&root, &optimized(), &["A"]),
            r#"_createVNode(A, {"onInput": h}, null, 8, ["onInput"])"#
        );
    }

    #[test]
    fn key_is_never_a_dynamic_prop() {
        let root = el("div").with_attr(attr("key", var("k")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"key": k}, null)"#
        );
    }

    #[test]
    fn ref_needs_patch() {
        let root = el("div").with_attr(Attribute::text("ref", "r"));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"ref": "r"}, null, 512)"#
        );
    }

    #[test]
    fn ref_alongside_props_uses_the_props_flags() {
        let root = el("div").with_attr(attr("ref", var("r"))).with_attr(attr("onInput", var("h")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"ref": r, "onInput": h}, null, 40, ["onInput"])"#
        );
    }

    #[test]
    fn flags_are_omitted_without_optimize() {
        let root = el("div").with_attr(attr("id", var("id")));
        assert_eq!(
            compile_js(&root, &Default::default(), &[]),
            r#"_createElementVNode("div", {"id": id}, null)"#
        );
    }
}

mod merging {
    use super::*;

    #[test]
    fn repeated_class_becomes_an_array() {
        let root = el("div").with_attr(Attribute::text("class", "a")).with_attr(attr("class", var("b")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"class": _normalizeClass(["a", b])}, null, 2)"#
        );
    }

    #[test]
    fn repeated_handlers_are_merged() {
        let root = el("A").with_attr(attr("onClick", var("a"))).with_attr(attr("onClick", var("b")));
        assert_eq!(
            compile_js(&root, &optimized(), &["A"]),
            r#"_createVNode(A, {"onClick": [a, b]}, null, 8, ["onClick"])"#
        );
    }

    #[test]
    fn repeated_plain_props_keep_the_last_value() {
        let root = el("div")
            .with_attr(Attribute::text("id", "a"))
            .with_attr(Attribute::text("title", "t"))
            .with_attr(Attribute::text("id", "b"));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", {"title": "t", "id": "b"}, null)"#
        );
    }

    #[test]
    fn spread_between_props_merges() {
        let root = el("div")
            .with_attr(Attribute::text("id", "x"))
            .with_attr(Attribute::spread(var("attrs")))
            .with_attr(Attribute::text("class", "c"));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", _mergeProps({"id": "x"}, attrs, {"class": "c"}), null, 16)"#
        );
    }

    #[test]
    fn spread_drops_class_style_and_props_bits() {
        let root = el("div")
            .with_attr(attr("class", var("c")))
            .with_attr(attr("style", var("s")))
            .with_attr(attr("id", var("i")))
            .with_attr(Attribute::spread(var("rest")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", _mergeProps({"class": c, "style": s, "id": i}, rest), null, 16, ["id"])"#
        );
    }

    #[test]
    fn lone_spread_on_element_is_normalized() {
        let root = el("div").with_attr(Attribute::spread(var("attrs")));
        assert_eq!(
            compile_js(&root, &optimized(), &[]),
            r#"_createElementVNode("div", _normalizeProps(_guardReactiveProps(attrs)), null, 16)"#
        );
    }

    #[test]
    fn lone_spread_on_component_is_passed_through() {
        let root = el("A").with_attr(Attribute::spread(var("attrs")));
        assert_eq!(compile_js(&root, &optimized(), &["A"]), "_createVNode(A, attrs, null, 16)");
    }

    #[test]
    fn object_literal_spread_becomes_a_merge_argument() {
        let root = el("A")
            .with_attr(Attribute::spread(object(vec![("a", o::literal(1u32))])))
            .with_attr(Attribute::text("id", "x"));
        assert_eq!(
            compile_js(&root, &optimized(), &["A"]),
            r#"_createVNode(A, _mergeProps({a: 1}, {"id": "x"}), null, 16)"#
        );
    }
}

mod without_merging {
    use super::*;

    #[test]
    fn spreads_stay_inline() {
        let root = el("div")
            .with_attr(Attribute::spread(var("attrs")))
            .with_attr(Attribute::text("id", "x"));
        assert_eq!(
            compile_js(&root, &unmerged(), &[]),
            r#"_createElementVNode("div", {...attrs, "id": "x"}, null, 16)"#
        );
    }

    #[test]
    fn object_literal_spread_is_inlined() {
        let root = el("div").with_attr(Attribute::spread(object(vec![("a", o::literal(1u32))])));
        assert_eq!(
            compile_js(&root, &unmerged(), &[]),
            r#"_createElementVNode("div", {a: 1}, null, 16)"#
        );
    }

    #[test]
    fn lone_spread_collapses_to_its_argument() {
        let root = el("div").with_attr(Attribute::spread(var("attrs")));
        assert_eq!(
            compile_js(&root, &unmerged(), &[]),
            r#"_createElementVNode("div", attrs, null, 16)"#
        );
    }

    #[test]
    fn repeated_class_is_last_write_wins() {
        let root = el("div").with_attr(Attribute::text("class", "a")).with_attr(Attribute::text("class", "b"));
        assert_eq!(
            compile_js(&root, &unmerged(), &[]),
            r#"_createElementVNode("div", {"class": "b"}, null)"#
        );
    }
}

mod event_transform {
    use super::*;

    fn transform_on() -> TransformOptions {
        TransformOptions {
            transform_on: true,
            ..Default::default()
        }
    }

    #[test]
    fn on_is_routed_through_the_helper() {
        let root = el("A").with_attr(attr("on", object(vec![("click", var("h"))])));
        let output = compile(&root, &transform_on(), &["A"]);
        assert_eq!(
            vue_jsx_compiler::emit_expression(&output.expression),
            "_createVNode(A, _transformOn({click: h}), null)"
        );
        let import = output.imports.iter().find(|i| i.local == "_transformOn").expect("import");
        assert_eq!(import.imported, None);
        assert_eq!(import.module, "@vuetify/babel-helper-vue-transform-on");
    }

    #[test]
    fn on_merges_with_other_props() {
        let root = el("div")
            .with_attr(attr("nativeOn", var("handlers")))
            .with_attr(Attribute::text("id", "x"));
        assert_eq!(
            compile_js(&root, &transform_on(), &[]),
            r#"_createElementVNode("div", _mergeProps(_transformOn(handlers), {"id": "x"}), null)"#
        );
    }

    #[test]
    fn on_is_a_plain_prop_by_default() {
        let root = el("A").with_attr(attr("on", var("handlers")));
        assert_eq!(
            compile_js(&root, &Default::default(), &["A"]),
            r#"_createVNode(A, {"on": handlers}, null)"#
        );
    }
}

#[test]
fn nested_markup_in_attribute_value() {
    let root = el("A").with_attr(Attribute::from_jsx("icon", Some(AttributeValue::Element(Box::new(el("i"))))));
    assert_eq!(
        compile_js(&root, &Default::default(), &["A"]),
        r#"_createVNode(A, {"icon": _createElementVNode("i", null, null)}, null)"#
    );
}

#[test]
fn empty_attribute_expression_is_rejected() {
    let root = el("div").with_attr(attr("id", o::Expression::Empty(o::EmptyExpr {})));
    let err = try_compile(&root, &Default::default(), &[]).unwrap_err();
    assert!(matches!(err, CompileError::EmptyAttribute { ref name } if name == "id"));
}
