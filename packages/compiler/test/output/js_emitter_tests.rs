use vue_jsx_compiler::output::js_emitter::{emit_expression, emit_module, escape_identifier};
use vue_jsx_compiler::output::output_ast::{
    self as o, BinaryOperator, FnParam, HoistedDeclaration, LiteralMapEntry, PropertyKey,
};
use vue_jsx_compiler::transform::identifiers::{HelperImport, IS_SLOT_SOURCE};
use vue_jsx_compiler::TransformOutput;

#[cfg(test)]
mod tests {
    use super::*;

    fn output(expression: o::Expression) -> TransformOutput {
        TransformOutput {
            expression,
            imports: Vec::new(),
            hoisted: Vec::new(),
            needs_is_slot: false,
        }
    }

    fn runtime_import(name: &'static str) -> HelperImport {
        HelperImport {
            module: "vue",
            imported: Some(name),
            local: format!("_{}", name),
        }
    }

    #[test]
    fn should_escape_double_quotes() {
        assert_eq!(escape_identifier("\"", true), "\"\\\"\"");
    }

    #[test]
    fn should_escape_backslash() {
        assert_eq!(escape_identifier("\\", true), "\"\\\\\"");
    }

    #[test]
    fn should_escape_newlines() {
        assert_eq!(escape_identifier("a\nb", true), "\"a\\nb\"");
    }

    #[test]
    fn should_not_quote_legal_identifiers() {
        assert_eq!(escape_identifier("$event", false), "$event");
        assert_eq!(escape_identifier("_a1", false), "_a1");
    }

    #[test]
    fn should_quote_non_identifiers() {
        assert_eq!(escape_identifier("onUpdate:modelValue", false), "\"onUpdate:modelValue\"");
        assert_eq!(escape_identifier("1a", false), "\"1a\"");
    }

    #[test]
    fn should_print_literals() {
        assert_eq!(emit_expression(&o::literal(1u32)), "1");
        assert_eq!(emit_expression(&o::literal(1.5)), "1.5");
        assert_eq!(emit_expression(&o::literal(true)), "true");
        assert_eq!(emit_expression(&o::null_expr()), "null");
        assert_eq!(emit_expression(&o::void_zero()), "void 0");
        assert_eq!(emit_expression(&o::literal("it's")), "\"it's\"");
    }

    #[test]
    fn should_print_object_keys() {
        let map = o::literal_map(vec![
            LiteralMapEntry::named("a", o::literal(1u32)),
            LiteralMapEntry::named("data-x", o::literal(2u32)),
            LiteralMapEntry::quoted("class", o::variable("c")),
            LiteralMapEntry::property(PropertyKey::Computed(Box::new(o::variable("k"))), o::literal(3u32)),
            LiteralMapEntry::spread(o::variable("rest")),
        ]);
        assert_eq!(
            emit_expression(&map),
            r#"{a: 1, "data-x": 2, "class": c, [k]: 3, ...rest}"#
        );
    }

    #[test]
    fn should_print_arrow_functions() {
        let handler = o::arrow_fn(
            vec![FnParam::Identifier("$event".to_string())],
            o::assign(o::variable("x"), o::variable("$event")),
        );
        assert_eq!(emit_expression(&handler), "($event) => x = $event");

        let destructured = o::arrow_fn(
            vec![FnParam::Object(vec!["a".to_string(), "b".to_string()])],
            o::variable("a"),
        );
        assert_eq!(emit_expression(&destructured), "({ a, b }) => a");
    }

    #[test]
    fn should_wrap_object_bodies() {
        let arrow = o::arrow_fn(vec![], o::literal_map(vec![]));
        assert_eq!(emit_expression(&arrow), "() => ({})");
    }

    #[test]
    fn should_wrap_immediately_invoked_functions() {
        let iife = o::fn_expr(vec![], o::variable("a")).call_fn(vec![]);
        assert_eq!(emit_expression(&iife), "(function () { return a; })()");
    }

    #[test]
    fn should_print_function_declarations_as_block_bodies() {
        let mut arrow = o::arrow_fn(
            vec![FnParam::Identifier("i".to_string())],
            o::literal_map(vec![LiteralMapEntry::named("a", o::variable("_slot"))]),
        );
        if let o::Expression::ArrowFn(inner) = &mut arrow {
            inner.declarations.push(HoistedDeclaration::uninitialized_let("_slot"));
        }
        assert_eq!(emit_expression(&arrow), "(i) => { let _slot; return {a: _slot}; }");

        let mut func = o::fn_expr(vec![], o::variable("_b"));
        if let o::Expression::Fn(inner) = &mut func {
            inner.declarations = vec![
                HoistedDeclaration::uninitialized_let("_slot"),
                HoistedDeclaration::constant("_b", o::literal(1u32)),
            ];
        }
        assert_eq!(emit_expression(&func), "function () { let _slot; const _b = 1; return _b; }");
    }

    #[test]
    fn should_wrap_nested_conditionals_in_tests() {
        let inner = o::conditional(o::variable("a"), o::variable("b"), o::variable("c"));
        let outer = o::conditional(inner.clone(), o::variable("d"), o::variable("e"));
        assert_eq!(emit_expression(&outer), "(a ? b : c) ? d : e");

        let alternate = o::conditional(o::variable("x"), o::variable("y"), inner);
        assert_eq!(emit_expression(&alternate), "x ? y : a ? b : c");
    }

    #[test]
    fn should_wrap_assignments_used_as_arguments_only_when_needed() {
        let call = o::variable("_isSlot").call_fn(vec![o::assign(o::variable("_slot"), o::variable("s"))]);
        assert_eq!(emit_expression(&call), "_isSlot(_slot = s)");
    }

    #[test]
    fn should_print_binary_operators() {
        let sum = o::binary(BinaryOperator::Plus, o::literal("onUpdate:"), o::variable("name"));
        assert_eq!(emit_expression(&sum), "\"onUpdate:\" + name");

        let nested = o::binary(
            BinaryOperator::And,
            o::binary(BinaryOperator::Or, o::variable("a"), o::variable("b")),
            o::variable("c"),
        );
        assert_eq!(emit_expression(&nested), "(a || b) && c");
    }

    #[test]
    fn should_print_member_access() {
        let read = o::variable("slots").prop("default").call_fn(vec![]);
        assert_eq!(emit_expression(&read), "slots.default()");

        let keyed = o::variable("items").key(o::literal(0u32));
        assert_eq!(emit_expression(&keyed), "items[0]");
    }

    #[test]
    fn should_print_a_bare_module() {
        assert_eq!(emit_module(&output(o::variable("x"))), "x;");
    }

    #[test]
    fn should_group_runtime_imports() {
        let mut unit = output(o::variable("x"));
        unit.imports = vec![
            runtime_import("resolveComponent"),
            HelperImport {
                module: "@vuetify/babel-helper-vue-transform-on",
                imported: None,
                local: "_transformOn".to_string(),
            },
            runtime_import("createVNode"),
        ];
        assert_eq!(
            emit_module(&unit),
            concat!(
                "import { resolveComponent as _resolveComponent, createVNode as _createVNode } from \"vue\";\n",
                "import _transformOn from \"@vuetify/babel-helper-vue-transform-on\";\n",
                "x;"
            )
        );
    }

    #[test]
    fn should_emit_is_slot_and_hoisted_declarations() {
        let mut unit = output(o::variable("_slot"));
        unit.imports = vec![runtime_import("isVNode")];
        unit.needs_is_slot = true;
        unit.hoisted = vec![
            HoistedDeclaration::uninitialized_let("_slot"),
            HoistedDeclaration::constant("_a", o::fn_expr(vec![], o::variable("a")).call_fn(vec![])),
        ];
        let expected = format!(
            "import {{ isVNode as _isVNode }} from \"vue\";\n{}\nlet _slot;\nconst _a = (function () {{ return a; }})();\n_slot;",
            IS_SLOT_SOURCE
        );
        assert_eq!(emit_module(&unit), expected);
    }
}
