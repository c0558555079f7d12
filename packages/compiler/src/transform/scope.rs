//! Lexical Scope
//!
//! The lowering pass asks the enclosing program three things: whether a name is bound,
//! whether a name is referenced, and for a fresh identifier that collides with neither.
//! [`ScopeAnalysis`] runs once before lowering and records which elements must treat
//! their slots as dynamic because a child reads a binding they enclose.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use tracing::trace;

use crate::jsx::ast::{Attribute, AttributeValue, ChildNode, Element};
use crate::output::output_ast::{Expression, LiteralMapEntry, PropertyKey};

pub use crate::output::output_ast::{DeclarationKind, HoistedDeclaration};

pub trait ScopeService {
    fn has_binding(&self, name: &str) -> bool;

    /// Whether `name` is read anywhere in the program. Directive identifiers are only
    /// used directly when this holds.
    fn has_reference(&self, name: &str) -> bool {
        self.has_binding(name)
    }

    /// A new identifier derived from `hint` that shadows nothing.
    fn fresh_identifier(&mut self, hint: &str) -> String;

    fn register_binding(&mut self, name: &str);
}

/// Flat program scope backed by explicit name sets.
#[derive(Debug, Default, Clone)]
pub struct ProgramScope {
    bindings: IndexSet<String>,
    references: IndexSet<String>,
    generated: IndexSet<String>,
}

impl ProgramScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProgramScope {
            bindings: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Record a free reference, e.g. a global the program reads but never declares.
    pub fn add_reference(&mut self, name: impl Into<String>) {
        self.references.insert(name.into());
    }

    fn is_taken(&self, name: &str) -> bool {
        self.bindings.contains(name) || self.references.contains(name) || self.generated.contains(name)
    }
}

impl ScopeService for ProgramScope {
    fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

    fn has_reference(&self, name: &str) -> bool {
        self.references.contains(name) || self.bindings.contains(name)
    }

    /// `_slot`, then `_slot2`, `_slot3`, …
    fn fresh_identifier(&mut self, hint: &str) -> String {
        let base = hint.trim_start_matches('_').trim_end_matches(|c: char| c.is_ascii_digit());
        let base = if base.is_empty() { "ref" } else { base };

        let mut counter = 1;
        let mut candidate = format!("_{}", base);
        while self.is_taken(&candidate) {
            counter += 1;
            candidate = format!("_{}{}", base, counter);
        }
        self.generated.insert(candidate.clone());
        candidate
    }

    fn register_binding(&mut self, name: &str) {
        self.bindings.insert(name.to_string());
    }
}

/// Elements are identified by address; the analyzed tree stays borrowed and unmoved for
/// the whole lowering pass.
pub(crate) type ElementKey = usize;

pub(crate) fn element_key(element: &Element) -> ElementKey {
    element as *const Element as usize
}

/// Scope id 0 is the program scope.
type BindingId = (usize, String);

#[derive(Debug, Default)]
pub struct ScopeAnalysis {
    forced_dynamic: HashSet<ElementKey>,
}

impl ScopeAnalysis {
    pub fn analyze_element(root: &Element, program: &dyn ScopeService) -> Self {
        let mut walker = ScopeWalker::new(program);
        walker.visit_element(root);
        walker.finish()
    }

    pub fn analyze_expression(root: &Expression, program: &dyn ScopeService) -> Self {
        let mut walker = ScopeWalker::new(program);
        walker.visit_expression(root);
        walker.finish()
    }

    /// The element encloses a read of a binding that some child renders directly, or of
    /// a binding spread into a descendant's attributes.
    pub fn is_forced_dynamic(&self, element: &Element) -> bool {
        self.forced_dynamic.contains(&element_key(element))
    }
}

struct ScopeWalker<'a> {
    program: &'a dyn ScopeService,
    /// Parameter scopes opened by functions, innermost last.
    scopes: Vec<(usize, Vec<String>)>,
    next_scope_id: usize,
    /// Open elements with the scope depth they were entered at.
    ancestors: Vec<(ElementKey, usize)>,
    /// Elements enclosing each read of a binding.
    enclosing: HashMap<BindingId, IndexSet<ElementKey>>,
    /// Bindings rendered as a bare identifier child.
    rendered: Vec<BindingId>,
    forced: HashSet<ElementKey>,
}

impl<'a> ScopeWalker<'a> {
    fn new(program: &'a dyn ScopeService) -> Self {
        ScopeWalker {
            program,
            scopes: Vec::new(),
            next_scope_id: 1,
            ancestors: Vec::new(),
            enclosing: HashMap::new(),
            rendered: Vec::new(),
            forced: HashSet::new(),
        }
    }

    fn resolve(&self, name: &str) -> Option<(BindingId, usize)> {
        for (depth, (id, names)) in self.scopes.iter().enumerate().rev() {
            if names.iter().any(|bound| bound == name) {
                return Some(((*id, name.to_string()), depth + 1));
            }
        }
        if self.program.has_binding(name) {
            return Some(((0, name.to_string()), 0));
        }
        None
    }

    /// Ancestors that sit inside the binding's scope.
    fn ancestors_within(&self, depth: usize, skip_innermost: bool) -> Vec<ElementKey> {
        let open = if skip_innermost {
            &self.ancestors[..self.ancestors.len().saturating_sub(1)]
        } else {
            &self.ancestors[..]
        };
        open.iter()
            .filter(|(_, entered_at)| *entered_at >= depth)
            .map(|(key, _)| *key)
            .collect()
    }

    fn record_reference(&mut self, name: &str) {
        if let Some((binding, depth)) = self.resolve(name) {
            let keys = self.ancestors_within(depth, false);
            self.enclosing.entry(binding).or_default().extend(keys);
        }
    }

    fn visit_element(&mut self, element: &Element) {
        self.ancestors.push((element_key(element), self.scopes.len()));

        for attribute in &element.attributes {
            match attribute {
                Attribute::Plain { value, .. } | Attribute::Directive { value, .. } => {
                    match value {
                        Some(AttributeValue::Expression(expr)) => self.visit_expression(expr),
                        Some(AttributeValue::Element(child)) => self.visit_element(child),
                        Some(AttributeValue::Text(_)) | None => {}
                    }
                }
                Attribute::Spread { argument } => {
                    if let Some((_, depth)) = argument.as_identifier().and_then(|name| self.resolve(name)) {
                        let keys = self.ancestors_within(depth, true);
                        self.forced.extend(keys);
                    }
                    self.visit_expression(argument);
                }
            }
        }

        for child in &element.children {
            match child {
                ChildNode::Text(_) => {}
                ChildNode::Expression(expr) => {
                    if let Some((binding, _)) = expr.as_identifier().and_then(|name| self.resolve(name)) {
                        self.rendered.push(binding);
                    }
                    self.visit_expression(expr);
                }
                ChildNode::Spread(expr) => self.visit_expression(expr),
                ChildNode::Element(child) => self.visit_element(child),
            }
        }

        self.ancestors.pop();
    }

    fn visit_scope(&mut self, names: Vec<String>, body: &Expression) {
        let id = self.next_scope_id;
        self.next_scope_id += 1;
        self.scopes.push((id, names));
        self.visit_expression(body);
        self.scopes.pop();
    }

    fn visit_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::ReadVar(var) => self.record_reference(&var.name),
            Expression::Literal(_) | Expression::External(_) | Expression::Empty(_) => {}
            Expression::LiteralArray(array) => {
                for entry in &array.entries {
                    self.visit_expression(entry);
                }
            }
            Expression::LiteralMap(map) => {
                for entry in &map.entries {
                    match entry {
                        LiteralMapEntry::Property(property) => {
                            if let PropertyKey::Computed(key) = &property.key {
                                self.visit_expression(key);
                            }
                            self.visit_expression(&property.value);
                        }
                        LiteralMapEntry::Spread(spread) => self.visit_expression(&spread.argument),
                    }
                }
            }
            Expression::Spread(spread) => self.visit_expression(&spread.argument),
            Expression::InvokeFn(call) => {
                self.visit_expression(&call.fn_);
                for arg in &call.args {
                    self.visit_expression(arg);
                }
            }
            Expression::Conditional(cond) => {
                self.visit_expression(&cond.condition);
                self.visit_expression(&cond.true_case);
                self.visit_expression(&cond.false_case);
            }
            Expression::ArrowFn(arrow) => {
                let names = arrow.params.iter().flat_map(|p| p.bound_names()).map(str::to_string).collect();
                self.visit_scope(names, &arrow.body);
            }
            Expression::Fn(func) => {
                let names = func.params.iter().flat_map(|p| p.bound_names()).map(str::to_string).collect();
                self.visit_scope(names, &func.body);
            }
            Expression::BinaryOp(op) => {
                self.visit_expression(&op.lhs);
                self.visit_expression(&op.rhs);
            }
            Expression::Assign(assign) => {
                // Writing to a binding is not a read of it.
                if assign.target.as_identifier().is_none() {
                    self.visit_expression(&assign.target);
                }
                self.visit_expression(&assign.value);
            }
            Expression::ReadProp(read) => self.visit_expression(&read.receiver),
            Expression::ReadKey(read) => {
                self.visit_expression(&read.receiver);
                self.visit_expression(&read.index);
            }
            Expression::Void(void) => self.visit_expression(&void.expr),
            Expression::Markup(element) => self.visit_element(element),
        }
    }

    fn finish(mut self) -> ScopeAnalysis {
        for binding in std::mem::take(&mut self.rendered) {
            if let Some(keys) = self.enclosing.get(&binding) {
                trace!(binding = %binding.1, elements = keys.len(), "binding rendered as child");
                self.forced.extend(keys.iter().copied());
            }
        }
        ScopeAnalysis {
            forced_dynamic: self.forced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsx::ast::{Attribute, ChildNode, Element};
    use crate::output::output_ast::{self as o, FnParam};

    #[test]
    fn fresh_identifiers_skip_taken_names() {
        let mut scope = ProgramScope::with_bindings(["_slot"]);
        assert_eq!(scope.fresh_identifier("slot"), "_slot2");
        assert_eq!(scope.fresh_identifier("slot"), "_slot3");
        assert_eq!(scope.fresh_identifier("_a1"), "_a");
    }

    #[test]
    fn unbound_children_force_nothing() {
        let root = Element::new("A").with_child(ChildNode::Expression(o::variable("a")));
        let analysis = ScopeAnalysis::analyze_element(&root, &ProgramScope::new());
        assert!(!analysis.is_forced_dynamic(&root));
    }

    #[test]
    fn program_binding_child_forces_all_ancestors() {
        let root = Element::new("A").with_child(ChildNode::Element(
            Element::new("B").with_child(ChildNode::Expression(o::variable("a"))),
        ));
        let analysis = ScopeAnalysis::analyze_element(&root, &ProgramScope::with_bindings(["a"]));
        assert!(analysis.is_forced_dynamic(&root));
        let ChildNode::Element(inner) = &root.children[0] else {
            panic!("expected element child");
        };
        assert!(analysis.is_forced_dynamic(inner));
    }

    #[test]
    fn parameter_binding_stops_at_its_function() {
        // <A>{(x) => <B>{x}</B>}</A>
        let inner = Element::new("B").with_child(ChildNode::Expression(o::variable("x")));
        let root = Element::new("A").with_child(ChildNode::Expression(o::arrow_fn(
            vec![FnParam::Identifier("x".to_string())],
            Expression::Markup(Box::new(inner)),
        )));
        let analysis = ScopeAnalysis::analyze_element(&root, &ProgramScope::new());
        assert!(!analysis.is_forced_dynamic(&root));
        let ChildNode::Expression(Expression::ArrowFn(arrow)) = &root.children[0] else {
            panic!("expected arrow child");
        };
        let Expression::Markup(inner) = arrow.body.as_ref() else {
            panic!("expected markup body");
        };
        assert!(analysis.is_forced_dynamic(inner));
    }

    #[test]
    fn bound_spread_forces_strict_ancestors() {
        let root = Element::new("A")
            .with_child(ChildNode::Element(Element::new("B").with_attr(Attribute::spread(o::variable("p")))));
        let analysis = ScopeAnalysis::analyze_element(&root, &ProgramScope::with_bindings(["p"]));
        assert!(analysis.is_forced_dynamic(&root));
        let ChildNode::Element(inner) = &root.children[0] else {
            panic!("expected element child");
        };
        assert!(!analysis.is_forced_dynamic(inner));
    }
}
