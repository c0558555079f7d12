//! Runtime Helper Identifiers
//!
//! Logical runtime helpers referenced by generated code. A helper is registered the first
//! time it is requested; the registry's insertion order is the import order.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::output::output_ast::{self as o, Expression};

const VUE: &str = "vue";
const TRANSFORM_ON: &str = "@vuetify/babel-helper-vue-transform-on";

/// Source of the local `_isSlot` helper emitted into modules that need it.
pub const IS_SLOT_SOURCE: &str = "function _isSlot(s) {\n  return typeof s === 'function' || Object.prototype.toString.call(s) === '[object Object]' && !_isVNode(s);\n}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Helper {
    CreateVNode,
    CreateElementVNode,
    CreateTextVNode,
    MergeProps,
    NormalizeProps,
    GuardReactiveProps,
    NormalizeClass,
    NormalizeStyle,
    WithDirectives,
    ResolveComponent,
    ResolveDirective,
    Fragment,
    VShow,
    VModelText,
    VModelSelect,
    VModelCheckbox,
    VModelRadio,
    VModelDynamic,
    IsVNode,
    /// Default export of the event-object transform package.
    TransformOn,
    /// Function defined in the generated module itself.
    IsSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperSource {
    /// `import { name as _name } from "vue"`
    Runtime,
    /// `import _name from "<package>"`
    DefaultImport(&'static str),
    /// Declared in the generated module.
    Local,
}

impl Helper {
    pub fn name(self) -> &'static str {
        match self {
            Helper::CreateVNode => "createVNode",
            Helper::CreateElementVNode => "createElementVNode",
            Helper::CreateTextVNode => "createTextVNode",
            Helper::MergeProps => "mergeProps",
            Helper::NormalizeProps => "normalizeProps",
            Helper::GuardReactiveProps => "guardReactiveProps",
            Helper::NormalizeClass => "normalizeClass",
            Helper::NormalizeStyle => "normalizeStyle",
            Helper::WithDirectives => "withDirectives",
            Helper::ResolveComponent => "resolveComponent",
            Helper::ResolveDirective => "resolveDirective",
            Helper::Fragment => "Fragment",
            Helper::VShow => "vShow",
            Helper::VModelText => "vModelText",
            Helper::VModelSelect => "vModelSelect",
            Helper::VModelCheckbox => "vModelCheckbox",
            Helper::VModelRadio => "vModelRadio",
            Helper::VModelDynamic => "vModelDynamic",
            Helper::IsVNode => "isVNode",
            Helper::TransformOn => "transformOn",
            Helper::IsSlot => "isSlot",
        }
    }

    /// Identifier the helper is bound to in generated code.
    pub fn local_name(self) -> String {
        format!("_{}", self.name())
    }

    pub fn source(self) -> HelperSource {
        match self {
            Helper::TransformOn => HelperSource::DefaultImport(TRANSFORM_ON),
            Helper::IsSlot => HelperSource::Local,
            _ => HelperSource::Runtime,
        }
    }
}

/// One import the generated module needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelperImport {
    pub module: &'static str,
    /// `None` for a default import.
    pub imported: Option<&'static str>,
    pub local: String,
}

#[derive(Debug, Default)]
pub struct HelperRegistry {
    used: IndexSet<Helper>,
    pragma: Option<String>,
}

impl HelperRegistry {
    pub fn new(pragma: Option<String>) -> Self {
        HelperRegistry {
            used: IndexSet::new(),
            pragma,
        }
    }

    pub fn helper(&mut self, helper: Helper) -> Expression {
        if helper == Helper::IsSlot {
            self.register(Helper::IsVNode);
        }
        self.register(helper);
        o::import_ref(helper)
    }

    /// `createVNode` for components, `createElementVNode` otherwise, unless a pragma
    /// replaces both.
    pub fn create_vnode(&mut self, is_component: bool) -> Expression {
        if let Some(pragma) = &self.pragma {
            return o::variable(pragma.clone());
        }
        self.helper(if is_component {
            Helper::CreateVNode
        } else {
            Helper::CreateElementVNode
        })
    }

    pub fn is_used(&self, helper: Helper) -> bool {
        self.used.contains(&helper)
    }

    pub fn imports(&self) -> Vec<HelperImport> {
        self.used
            .iter()
            .filter_map(|&helper| match helper.source() {
                HelperSource::Runtime => Some(HelperImport {
                    module: VUE,
                    imported: Some(helper.name()),
                    local: helper.local_name(),
                }),
                HelperSource::DefaultImport(module) => Some(HelperImport {
                    module,
                    imported: None,
                    local: helper.local_name(),
                }),
                HelperSource::Local => None,
            })
            .collect()
    }

    fn register(&mut self, helper: Helper) {
        if self.used.insert(helper) {
            trace!(helper = helper.name(), "registered runtime helper");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_follow_first_use() {
        let mut registry = HelperRegistry::default();
        registry.helper(Helper::MergeProps);
        registry.helper(Helper::CreateVNode);
        registry.helper(Helper::MergeProps);
        let locals: Vec<_> = registry.imports().into_iter().map(|i| i.local).collect();
        assert_eq!(locals, vec!["_mergeProps", "_createVNode"]);
    }

    #[test]
    fn is_slot_pulls_in_is_vnode() {
        let mut registry = HelperRegistry::default();
        registry.helper(Helper::IsSlot);
        assert!(registry.is_used(Helper::IsSlot));
        let imports = registry.imports();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].imported, Some("isVNode"));
    }

    #[test]
    fn transform_on_is_a_default_import() {
        let mut registry = HelperRegistry::default();
        registry.helper(Helper::TransformOn);
        let imports = registry.imports();
        assert_eq!(imports[0].module, TRANSFORM_ON);
        assert_eq!(imports[0].imported, None);
        assert_eq!(imports[0].local, "_transformOn");
    }

    #[test]
    fn pragma_replaces_creation_helpers() {
        let mut registry = HelperRegistry::new(Some("h".to_string()));
        assert_eq!(registry.create_vnode(true), o::variable("h"));
        assert_eq!(registry.create_vnode(false), o::variable("h"));
        assert!(registry.imports().is_empty());
    }
}
