//! # Node Locator
//!
//! Resolves a user selection to the node a refactoring should act on.

use super::tree::{NodeId, SyntaxTree};
use crate::editor::Selection;

/// Find the innermost node whose span contains `selection` and which
/// satisfies `predicate`.
///
/// Containment is inclusive, so a cursor just before or just after a node
/// still selects it. Only nodes containing the selection are descended into:
/// a broad selection touching several siblings matches the node that
/// structurally contains it, never the siblings. At equal depth the first
/// node in document order wins.
pub fn locate<P>(tree: &SyntaxTree, selection: Selection, predicate: P) -> Option<NodeId>
where
    P: Fn(&SyntaxTree, NodeId) -> bool,
{
    let root = tree.root();
    if !tree.span(root).contains(&selection) {
        return None;
    }

    let mut best: Option<(usize, NodeId)> = None;
    let mut stack = vec![(root, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        if predicate(tree, id) && best.is_none_or(|(best_depth, _)| depth > best_depth) {
            best = Some((depth, id));
        }
        for &child in tree.children(id).iter().rev() {
            if tree.span(child).contains(&selection) {
                stack.push((child, depth + 1));
            }
        }
    }
    best.map(|(_, id)| id)
}

/// [`locate`] restricted to nodes of the given kinds.
pub fn locate_kind(tree: &SyntaxTree, selection: Selection, kinds: &[&str]) -> Option<NodeId> {
    locate(tree, selection, |tree, id| tree.is_kind(id, kinds))
}
