//! Compilation Units
//!
//! One input file holds one element tree together with the program bindings it is
//! compiled against.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use vue_jsx_compiler::{emit_module, Element, ProgramScope, TransformOptions, TransformOutput, Transformer};

/// ```json
/// { "element": { "tag": { "kind": "Identifier", "value": "div" } }, "bindings": ["Foo"] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationUnit {
    pub element: Element,
    /// Names declared in the surrounding program.
    #[serde(default)]
    pub bindings: Vec<String>,
    /// Free names the program reads without declaring them.
    #[serde(default)]
    pub references: Vec<String>,
    /// Set when the tree initializes `const <name> = …`.
    #[serde(default)]
    pub assign_to: Option<String>,
}

impl CompilationUnit {
    pub fn read(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&source).with_context(|| format!("{} is not a valid compilation unit", path.display()))
    }

    /// `extra_bindings` are added to the unit's own bindings.
    pub fn transform(
        &self,
        options: &TransformOptions,
        extra_bindings: &[String],
    ) -> vue_jsx_compiler::Result<TransformOutput> {
        let mut scope = ProgramScope::with_bindings(self.bindings.iter().chain(extra_bindings).cloned());
        for name in &self.references {
            scope.add_reference(name.as_str());
        }

        let transformer = Transformer::new(options);
        match &self.assign_to {
            Some(target) => transformer.transform_assignment(target, &self.element, &mut scope),
            None => transformer.transform_element(&self.element, &mut scope),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitKind {
    /// A complete module: imports, helpers, hoisted declarations and the expression.
    #[default]
    Js,
    /// The output tree, pretty-printed.
    Json,
}

impl EmitKind {
    pub fn render(self, output: &TransformOutput) -> Result<String> {
        match self {
            EmitKind::Js => Ok(emit_module(output)),
            EmitKind::Json => serde_json::to_string_pretty(output).context("failed to serialize output"),
        }
    }
}

impl FromStr for EmitKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "js" => Ok(EmitKind::Js),
            "json" => Ok(EmitKind::Json),
            other => bail!("unknown emit kind `{}` (expected `js` or `json`)", other),
        }
    }
}
