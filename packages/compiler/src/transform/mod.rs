//! Transform Module
//!
//! Lowers markup into vnode creation calls. A [`Transformer`] is configured once and then
//! applied to independent compilation units; each unit gets its own [`TransformContext`].

pub mod dedupe;
pub mod directives;
pub mod element;
pub mod flags;
pub mod identifiers;
pub mod props;
pub mod scope;
pub mod slot_flags;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::TransformOptions;
use crate::error::Result;
use crate::jsx::ast::Element;
use crate::output::output_ast::Expression;

use directives::{DirectiveDecomposer, VueDirectiveDecomposer};
use identifiers::{HelperImport, HelperRegistry};
use scope::{element_key, ElementKey, HoistedDeclaration, ScopeAnalysis, ScopeService};

pub use flags::{PatchFlags, SlotFlag};

/// State shared by every element of one compilation unit.
pub struct TransformContext<'a> {
    pub(crate) options: &'a TransformOptions,
    pub(crate) helpers: HelperRegistry,
    pub(crate) scope: &'a mut dyn ScopeService,
    pub(crate) directives: &'a dyn DirectiveDecomposer,
    pub(crate) custom_elements: Vec<Regex>,
    pub(crate) analysis: ScopeAnalysis,
    pub(crate) hoisted: Vec<HoistedDeclaration>,
    /// One frame per function being lowered, innermost last.
    pub(crate) function_frames: Vec<Vec<HoistedDeclaration>>,
    /// `const target = <El>…</El>`: identifier children of the root that read `target`
    /// are routed through a hoisted snapshot.
    pub(crate) assignment_target: Option<(String, ElementKey)>,
}

impl<'a> TransformContext<'a> {
    /// Declare `declaration` in the nearest enclosing function, or at module level.
    pub(crate) fn hoist(&mut self, declaration: HoistedDeclaration) {
        let depth = self.function_frames.len();
        match self.function_frames.last_mut() {
            Some(frame) => {
                debug!(name = %declaration.name, depth = depth, "declaring in function");
                frame.push(declaration);
            }
            None => {
                debug!(name = %declaration.name, "hoisting declaration");
                self.hoisted.push(declaration);
            }
        }
    }

    pub(crate) fn enter_function(&mut self) {
        self.function_frames.push(Vec::new());
    }

    pub(crate) fn exit_function(&mut self) -> Vec<HoistedDeclaration> {
        self.function_frames.pop().unwrap_or_default()
    }

    fn finish(self, expression: Expression) -> TransformOutput {
        TransformOutput {
            expression,
            imports: self.helpers.imports(),
            needs_is_slot: self.helpers.is_used(identifiers::Helper::IsSlot),
            hoisted: self.hoisted,
        }
    }
}

/// Result of lowering one compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformOutput {
    pub expression: Expression,
    /// In first-use order.
    pub imports: Vec<HelperImport>,
    pub hoisted: Vec<HoistedDeclaration>,
    /// The module must define the local `_isSlot` helper.
    pub needs_is_slot: bool,
}

pub struct Transformer<'a> {
    options: &'a TransformOptions,
    directives: &'a dyn DirectiveDecomposer,
}

impl<'a> Transformer<'a> {
    pub fn new(options: &'a TransformOptions) -> Self {
        Transformer {
            options,
            directives: &VueDirectiveDecomposer,
        }
    }

    pub fn with_directives(mut self, directives: &'a dyn DirectiveDecomposer) -> Self {
        self.directives = directives;
        self
    }

    fn context<'s>(&'s self, scope: &'s mut dyn ScopeService, analysis: ScopeAnalysis) -> Result<TransformContext<'s>> {
        Ok(TransformContext {
            options: self.options,
            helpers: HelperRegistry::new(self.options.pragma.clone()),
            custom_elements: self.options.custom_element_matchers()?,
            scope,
            directives: self.directives,
            analysis,
            hoisted: Vec::new(),
            function_frames: Vec::new(),
            assignment_target: None,
        })
    }

    /// Lower a root element.
    #[instrument(level = "debug", skip_all, fields(tag = %element.tag.name()))]
    pub fn transform_element(&self, element: &Element, scope: &mut dyn ScopeService) -> Result<TransformOutput> {
        let analysis = ScopeAnalysis::analyze_element(element, scope);
        let mut ctx = self.context(scope, analysis)?;
        let lowered = element::lower_element(&mut ctx, element)?;
        Ok(ctx.finish(lowered.expression))
    }

    /// Lower every piece of markup nested inside an arbitrary expression.
    #[instrument(level = "debug", skip_all)]
    pub fn transform_expression(&self, expression: &Expression, scope: &mut dyn ScopeService) -> Result<TransformOutput> {
        let analysis = ScopeAnalysis::analyze_expression(expression, scope);
        let mut ctx = self.context(scope, analysis)?;
        let lowered = element::lower_expression(&mut ctx, expression)?;
        Ok(ctx.finish(lowered))
    }

    /// Lower the initializer of `const target = <El>…</El>`.
    #[instrument(level = "debug", skip_all, fields(binding = target))]
    pub fn transform_assignment(
        &self,
        target: &str,
        element: &Element,
        scope: &mut dyn ScopeService,
    ) -> Result<TransformOutput> {
        let analysis = ScopeAnalysis::analyze_element(element, scope);
        let mut ctx = self.context(scope, analysis)?;
        ctx.assignment_target = Some((target.to_string(), element_key(element)));
        let lowered = element::lower_element(&mut ctx, element)?;
        Ok(ctx.finish(lowered.expression))
    }
}

/// Lower `element` with the default directive syntax.
pub fn transform_element(
    element: &Element,
    options: &TransformOptions,
    scope: &mut dyn ScopeService,
) -> Result<TransformOutput> {
    Transformer::new(options).transform_element(element, scope)
}
