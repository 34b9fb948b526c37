//! # Syntax Tree Adapter
//!
//! Parses source text with the tree-sitter grammars shipped by
//! `ast-grep-language` and copies the result into an arena. Nodes are
//! addressed by index; each node stores its parent index as a lookup-only
//! back-reference, so the tree has no ownership cycles and outlives the
//! tree-sitter document it was built from.

use super::text::LineIndex;
use crate::editor::Selection;
use crate::errors::ServiceError;
use ast_grep_core::{AstGrep, Node, tree_sitter::StrDoc};
use ast_grep_language::SupportLang as Language;
use std::ops::Range;
use std::str::FromStr;
use tracing::debug;

pub type NodeId = usize;

/// One node of the arena.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: String,
    pub range: Range<usize>,
    pub span: Selection,
    pub named: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Parsed snapshot of a buffer.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    language: Language,
    line_index: LineIndex,
    nodes: Vec<SyntaxNode>,
}

/// Resolve a language name such as `javascript`, `ts` or `tsx`.
pub fn parse_language(name: &str) -> Result<Language, ServiceError> {
    let language = Language::from_str(name)
        .map_err(|_| ServiceError::UnsupportedLanguage(name.to_string()))?;
    if is_supported(language) {
        Ok(language)
    } else {
        Err(ServiceError::UnsupportedLanguage(name.to_string()))
    }
}

/// Languages whose grammar shares the JavaScript node kinds the refactorings rely on.
pub fn is_supported(language: Language) -> bool {
    matches!(
        language,
        Language::JavaScript | Language::TypeScript | Language::Tsx
    )
}

impl SyntaxTree {
    /// Parse `code`. Syntax errors anywhere in the buffer are a failure: the
    /// refactorings only ever produce edits for well-formed input.
    pub fn parse(code: &str, language: Language) -> Result<Self, ServiceError> {
        if !is_supported(language) {
            return Err(ServiceError::UnsupportedLanguage(language.to_string()));
        }
        let tree = Self::parse_lossy(code, language);
        if let Some(error) = tree.first_error() {
            let at = tree.node(error).span.start();
            return Err(ServiceError::ParserError(format!(
                "syntax error near {at} ({} node)",
                tree.kind(error)
            )));
        }
        Ok(tree)
    }

    /// Parse without rejecting syntax errors. Used for debug dumps.
    pub fn parse_lossy(code: &str, language: Language) -> Self {
        let ast = AstGrep::new(code, language);
        let line_index = LineIndex::new(code);
        let mut nodes = Vec::new();
        collect(ast.root(), None, code, &line_index, &mut nodes);
        debug!("Parsed {} bytes into {} nodes", code.len(), nodes.len());

        Self {
            source: code.to_string(),
            language,
            line_index,
            nodes,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &str {
        &self.nodes[id].kind
    }

    pub fn is_kind(&self, id: NodeId, kinds: &[&str]) -> bool {
        kinds.contains(&self.kind(id))
    }

    pub fn range(&self, id: NodeId) -> Range<usize> {
        self.nodes[id].range.clone()
    }

    pub fn span(&self, id: NodeId) -> Selection {
        self.nodes[id].span
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.source[self.nodes[id].range.clone()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Named children, comments excluded: the structural operands of a node.
    pub fn significant_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.nodes[child].named && self.kind(child) != "comment")
            .collect()
    }

    pub fn nth_significant(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.significant_children(id).get(n).copied()
    }

    /// First child of the given kind, anonymous tokens included.
    pub fn child_of_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    /// Text of the first anonymous child, i.e. the operator of an expression.
    pub fn operator(&self, id: NodeId) -> Option<&str> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| !self.nodes[child].named)
            .map(|child| self.kind(child))
    }

    pub fn operator_node(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| !self.nodes[child].named)
    }

    /// Strict ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// `id` and all nodes below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    pub fn first_error(&self) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(id, node)| {
            let missing = id != 0 && node.children.is_empty() && node.range.is_empty();
            (node.kind == "ERROR" || missing).then_some(id)
        })
    }

    /// Indented dump of the tree, one node per line.
    pub fn to_debug_string(&self) -> String {
        let mut result = String::new();
        self.write_debug(self.root(), 0, &mut result);
        result
    }

    fn write_debug(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id];
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{}[{}]", node.kind, node.span));
        if node.named && node.children.is_empty() {
            let escaped = self.text(id).replace('\n', "\\n").replace('\r', "\\r");
            out.push_str(&format!(" \"{escaped}\""));
        }
        out.push('\n');
        for &child in &node.children {
            if self.nodes[child].named {
                self.write_debug(child, depth + 1, out);
            }
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

fn collect(
    node: Node<StrDoc<Language>>,
    parent: Option<NodeId>,
    source: &str,
    line_index: &LineIndex,
    nodes: &mut Vec<SyntaxNode>,
) -> NodeId {
    let id = nodes.len();
    let range = node.range();
    nodes.push(SyntaxNode {
        kind: node.kind().to_string(),
        span: line_index.selection(source, range.clone()),
        range,
        named: node.is_named(),
        parent,
        children: Vec::new(),
    });

    for child in node.children() {
        let child_id = collect(child, Some(id), source, line_index, nodes);
        nodes[id].children.push(child_id);
    }
    id
}
