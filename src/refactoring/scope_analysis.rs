//! # Scope Analysis
//!
//! Lexical scopes of a single buffer: which names each scope declares, which
//! declaration an identifier resolves to, and how it is used. Enough to
//! extract and inline variables without changing what names refer to.

use crate::syntax::javascript::{FUNCTION_LIKE, SHORTHAND_PROPERTY};
use crate::syntax::{NodeId, SyntaxTree};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Nodes that open a lexical scope.
const SCOPE_KINDS: &[&str] = &[
    "program",
    "statement_block",
    "switch_body",
    "for_statement",
    "for_in_statement",
    "catch_clause",
    "class_static_block",
];

const PATTERN_TARGETS: &[&str] = &[
    "object_pattern",
    "array_pattern",
    "pair_pattern",
    "rest_pattern",
];

/// How an identifier is used at a given site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageType {
    Read,
    Write,
    ReadWrite,
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    /// The identifier node introducing the name.
    pub id: NodeId,
    /// The scope node the name is visible in.
    pub scope: NodeId,
}

/// A use of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub id: NodeId,
    pub usage: UsageType,
    /// `{ name }` in an object literal.
    pub shorthand: bool,
}

/// Bindings of a tree, grouped by scope.
#[derive(Debug, Default)]
pub struct Scopes {
    bindings: HashMap<NodeId, Vec<Binding>>,
    binding_ids: HashSet<NodeId>,
}

pub fn is_scope(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.is_kind(id, SCOPE_KINDS) || tree.is_kind(id, FUNCTION_LIKE)
}

/// Nearest strict ancestor opening a scope.
pub fn scope_of(tree: &SyntaxTree, id: NodeId) -> NodeId {
    tree.ancestors(id)
        .find(|&ancestor| is_scope(tree, ancestor))
        .unwrap_or_else(|| tree.root())
}

/// Nearest strict ancestor that is a function, or the program.
pub fn function_scope(tree: &SyntaxTree, id: NodeId) -> NodeId {
    tree.ancestors(id)
        .find(|&ancestor| tree.is_kind(ancestor, FUNCTION_LIKE))
        .unwrap_or_else(|| tree.root())
}

impl Scopes {
    pub fn analyze(tree: &SyntaxTree) -> Self {
        let mut scopes = Scopes::default();
        for id in 0..tree.len() {
            match tree.kind(id) {
                "variable_declarator" => {
                    let Some(declaration) = tree.parent(id) else {
                        continue;
                    };
                    let scope = if tree.kind(declaration) == "variable_declaration" {
                        function_scope(tree, id)
                    } else {
                        scope_of(tree, declaration)
                    };
                    if let Some(name) = tree.nth_significant(id, 0) {
                        scopes.declare_pattern(tree, name, scope);
                    }
                }
                "formal_parameters" => {
                    if let Some(function) = tree.parent(id) {
                        scopes.declare_pattern(tree, id, function);
                    }
                }
                "arrow_function" => {
                    // `x => ...` has a bare identifier instead of formal parameters
                    if let Some(parameter) = tree.nth_significant(id, 0) {
                        if tree.kind(parameter) == "identifier" {
                            scopes.declare(tree, parameter, id);
                        }
                    }
                }
                "function_declaration" | "generator_function_declaration" | "class_declaration" => {
                    if let Some(name) = declared_name(tree, id) {
                        scopes.declare(tree, name, scope_of(tree, id));
                    }
                }
                "function_expression" | "function" | "generator_function" | "class" => {
                    if let Some(name) = declared_name(tree, id) {
                        scopes.declare(tree, name, id);
                    }
                }
                "catch_clause" => {
                    if let Some(parameter) = tree.nth_significant(id, 0) {
                        if tree.kind(parameter) != "statement_block" {
                            scopes.declare_pattern(tree, parameter, id);
                        }
                    }
                }
                "for_in_statement" => {
                    let keyword = tree
                        .children(id)
                        .iter()
                        .map(|&child| tree.kind(child))
                        .find(|kind| matches!(*kind, "const" | "let" | "var"));
                    if let (Some(keyword), Some(left)) = (keyword, tree.nth_significant(id, 0)) {
                        let scope = if keyword == "var" {
                            function_scope(tree, id)
                        } else {
                            id
                        };
                        scopes.declare_pattern(tree, left, scope);
                    }
                }
                "import_specifier" => {
                    if let Some(&local) = tree.significant_children(id).last() {
                        scopes.declare(tree, local, tree.root());
                    }
                }
                "import_clause" | "namespace_import" => {
                    for child in tree.significant_children(id) {
                        if tree.kind(child) == "identifier" {
                            scopes.declare(tree, child, tree.root());
                        }
                    }
                }
                _ => {}
            }
        }
        debug!("Found {} bindings", scopes.binding_ids.len());
        scopes
    }

    fn declare(&mut self, tree: &SyntaxTree, id: NodeId, scope: NodeId) {
        self.binding_ids.insert(id);
        self.bindings.entry(scope).or_default().push(Binding {
            name: tree.text(id).to_string(),
            id,
            scope,
        });
    }

    fn declare_pattern(&mut self, tree: &SyntaxTree, pattern: NodeId, scope: NodeId) {
        for id in pattern_bindings(tree, pattern) {
            self.declare(tree, id, scope);
        }
    }

    pub fn declared_in(&self, scope: NodeId) -> &[Binding] {
        self.bindings.get(&scope).map_or(&[], Vec::as_slice)
    }

    /// Whether `id` is the identifier introducing a binding.
    pub fn is_binding(&self, id: NodeId) -> bool {
        self.binding_ids.contains(&id)
    }

    pub fn binding_at(&self, tree: &SyntaxTree, id: NodeId) -> Option<&Binding> {
        self.resolve(tree, id, tree.text(id))
            .filter(|binding| binding.id == id)
    }

    /// Declaration `name` refers to when used at `at`; `None` for globals.
    pub fn resolve(&self, tree: &SyntaxTree, at: NodeId, name: &str) -> Option<&Binding> {
        std::iter::once(at)
            .chain(tree.ancestors(at))
            .filter(|&scope| is_scope(tree, scope))
            .find_map(|scope| {
                self.declared_in(scope)
                    .iter()
                    .find(|binding| binding.name == name)
            })
    }

    /// Every use of `binding`, its own declaration excluded.
    pub fn references(&self, tree: &SyntaxTree, binding: &Binding) -> Vec<Reference> {
        tree.descendants(binding.scope)
            .into_iter()
            .filter(|&id| is_identifier_site(tree, id) && tree.text(id) == binding.name)
            .filter(|&id| !self.is_binding(id))
            .filter(|&id| {
                self.resolve(tree, id, &binding.name)
                    .is_some_and(|resolved| resolved.id == binding.id)
            })
            .map(|id| Reference {
                id,
                usage: usage(tree, id),
                shorthand: tree.kind(id) == SHORTHAND_PROPERTY,
            })
            .collect()
    }

    /// Identifiers used inside `expression` that are declared outside of it,
    /// with the binding each resolves to.
    pub fn free_identifiers(
        &self,
        tree: &SyntaxTree,
        expression: NodeId,
    ) -> Vec<(String, Option<NodeId>)> {
        let mut seen = BTreeSet::new();
        let mut result = Vec::new();
        for id in tree.descendants(expression) {
            if !is_identifier_site(tree, id) || self.is_binding(id) {
                continue;
            }
            let name = tree.text(id);
            let resolved = self.resolve(tree, id, name).map(|binding| binding.id);
            let declared_inside = resolved.is_some_and(|binding| tree.is_ancestor(expression, binding));
            if !declared_inside && seen.insert(name.to_string()) {
                result.push((name.to_string(), resolved));
            }
        }
        result
    }

    /// Names a new declaration at `at` could clash with: everything visible
    /// there plus every identifier written in the enclosing function.
    pub fn taken_names(&self, tree: &SyntaxTree, at: NodeId) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = std::iter::once(at)
            .chain(tree.ancestors(at))
            .filter(|&scope| is_scope(tree, scope))
            .flat_map(|scope| self.declared_in(scope).iter().map(|b| b.name.clone()))
            .collect();
        let function = function_scope(tree, at);
        names.extend(
            tree.descendants(function)
                .into_iter()
                .filter(|&id| is_identifier_site(tree, id))
                .map(|id| tree.text(id).to_string()),
        );
        names
    }
}

/// Identifier nodes bound by a declaration pattern.
pub fn pattern_bindings(tree: &SyntaxTree, pattern: NodeId) -> Vec<NodeId> {
    match tree.kind(pattern) {
        "identifier" | "shorthand_property_identifier_pattern" => vec![pattern],
        "object_pattern" | "array_pattern" | "formal_parameters" => tree
            .significant_children(pattern)
            .into_iter()
            .flat_map(|child| pattern_bindings(tree, child))
            .collect(),
        "pair_pattern" => tree
            .significant_children(pattern)
            .last()
            .map(|&value| pattern_bindings(tree, value))
            .unwrap_or_default(),
        "assignment_pattern" | "object_assignment_pattern" | "rest_pattern" => tree
            .nth_significant(pattern, 0)
            .map(|target| pattern_bindings(tree, target))
            .unwrap_or_default(),
        "required_parameter" | "optional_parameter" => tree
            .children(pattern)
            .iter()
            .copied()
            .take_while(|&child| tree.kind(child) != "=")
            .filter(|&child| tree.node(child).named)
            .flat_map(|child| pattern_bindings(tree, child))
            .collect(),
        _ => Vec::new(),
    }
}

fn declared_name(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    tree.nth_significant(id, 0)
        .filter(|&name| matches!(tree.kind(name), "identifier" | "type_identifier"))
}

fn is_identifier_site(tree: &SyntaxTree, id: NodeId) -> bool {
    if !matches!(
        tree.kind(id),
        "identifier" | "shorthand_property_identifier" | "shorthand_property_identifier_pattern"
    ) {
        return false;
    }
    // only one side of `a as b` names a local
    match tree.parent(id) {
        Some(parent) if tree.kind(parent) == "import_specifier" => {
            tree.significant_children(parent).last() == Some(&id)
        }
        Some(parent) if tree.kind(parent) == "export_specifier" => {
            tree.significant_children(parent).first() == Some(&id)
        }
        _ => true,
    }
}

fn usage(tree: &SyntaxTree, id: NodeId) -> UsageType {
    let Some(parent) = tree.parent(id) else {
        return UsageType::Read;
    };
    let is_first = tree.nth_significant(parent, 0) == Some(id);
    match tree.kind(parent) {
        "assignment_expression" | "for_in_statement" if is_first => UsageType::Write,
        "augmented_assignment_expression" if is_first => UsageType::ReadWrite,
        "update_expression" => UsageType::ReadWrite,
        "assignment_pattern" | "object_assignment_pattern" if is_first => UsageType::Write,
        kind if PATTERN_TARGETS.contains(&kind) => UsageType::Write,
        _ if tree.kind(id) == "shorthand_property_identifier_pattern" => UsageType::Write,
        _ => UsageType::Read,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast_grep_language::SupportLang as Language;

    fn parse(code: &str) -> SyntaxTree {
        SyntaxTree::parse(code, Language::JavaScript).unwrap()
    }

    fn identifiers(tree: &SyntaxTree, name: &str) -> Vec<NodeId> {
        tree.descendants(tree.root())
            .into_iter()
            .filter(|&id| tree.kind(id) == "identifier" && tree.text(id) == name)
            .collect()
    }

    #[test]
    fn test_references_respect_shadowing() {
        let tree = parse("const a = 1;\nlog(a);\nfunction f(a) {\n  return a;\n}\n{\n  let a = 2;\n  log(a);\n}");
        let scopes = Scopes::analyze(&tree);
        let declaration = identifiers(&tree, "a")[0];
        let binding = scopes.binding_at(&tree, declaration).unwrap().clone();

        let references = scopes.references(&tree, &binding);
        assert_eq!(references.len(), 1);
        assert_eq!(tree.span(references[0].id).start().line, 1);
    }

    #[test]
    fn test_var_is_hoisted_to_function() {
        let tree = parse("function f() {\n  if (x) {\n    var total = 1;\n  }\n  return total;\n}");
        let scopes = Scopes::analyze(&tree);
        let total = identifiers(&tree, "total");
        let resolved = scopes.resolve(&tree, total[1], "total").unwrap();
        assert_eq!(resolved.id, total[0]);
    }

    #[test]
    fn test_usage_types() {
        let tree = parse("let a = 1;\na = 2;\na += 3;\na++;\n({ a } = other);\nlog(a);");
        let scopes = Scopes::analyze(&tree);
        let declaration = identifiers(&tree, "a")[0];
        let binding = scopes.binding_at(&tree, declaration).unwrap().clone();
        let usages: Vec<UsageType> = scopes
            .references(&tree, &binding)
            .iter()
            .map(|reference| reference.usage)
            .collect();
        assert_eq!(
            usages,
            vec![
                UsageType::Write,
                UsageType::ReadWrite,
                UsageType::ReadWrite,
                UsageType::Write,
                UsageType::Read,
            ]
        );
    }

    #[test]
    fn test_destructured_parameters_are_bindings() {
        let tree = parse("function f({ a, b: [c, ...d] }, e = 1) {}");
        let scopes = Scopes::analyze(&tree);
        let function = tree.significant_children(tree.root())[0];
        let names: Vec<&str> = scopes
            .declared_in(function)
            .iter()
            .map(|binding| binding.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c", "d", "e"]);
    }

    #[test]
    fn test_free_identifiers_skip_inner_bindings() {
        let tree = parse("const y = items.map(x => x * factor);");
        let scopes = Scopes::analyze(&tree);
        let call = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&id| tree.kind(id) == "call_expression")
            .unwrap();
        let names: Vec<String> = scopes
            .free_identifiers(&tree, call)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["items".to_string(), "factor".to_string()]);
    }

    #[test]
    fn test_taken_names() {
        let tree = parse("const total = 1;\nfunction f(count) {\n  return count + extracted;\n}");
        let scopes = Scopes::analyze(&tree);
        let count = identifiers(&tree, "count")[1];
        let taken = scopes.taken_names(&tree, count);
        assert!(taken.contains("total"));
        assert!(taken.contains("count"));
        assert!(taken.contains("extracted"));
        assert!(taken.contains("f"));
    }
}
