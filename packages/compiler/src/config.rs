//! Transform Options
//!
//! Options recognised by the lowering pass. Field names follow the camelCase keys used in
//! JSON configuration files; every field has a default so partial configs are accepted.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Emit patch flags, dynamic prop lists and slot flags.
    pub optimize: bool,
    /// Deduplicate and merge `class`, `style` and `on*` properties.
    pub merge_props: bool,
    /// Allow the runtime `_isSlot` check for single identifier / call children.
    pub enable_object_slots: bool,
    /// Route `on` / `nativeOn` through the external event-object transform helper.
    pub transform_on: bool,
    /// Tag patterns that are custom elements rather than components.
    pub is_custom_element: Vec<String>,
    /// Identifier replacing the vnode creation helpers.
    pub pragma: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            optimize: false,
            merge_props: true,
            enable_object_slots: true,
            transform_on: false,
            is_custom_element: Vec::new(),
            pragma: None,
        }
    }
}

impl TransformOptions {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|err| CompileError::InvalidOption {
            option: "config",
            message: err.to_string(),
        })
    }

    pub fn optimized() -> Self {
        TransformOptions {
            optimize: true,
            ..Default::default()
        }
    }

    pub(crate) fn custom_element_matchers(&self) -> Result<Vec<Regex>> {
        self.is_custom_element
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| CompileError::InvalidOption {
                    option: "isCustomElement",
                    message: format!("`{}`: {}", pattern, err),
                })
            })
            .collect()
    }
}
