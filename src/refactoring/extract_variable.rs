//! # Extract Variable
//!
//! Moves the selected expression into a `const` declared right before the
//! statement using it, and replaces every identical occurrence in that
//! statement with the new name.
//!
//! Runs in two phases. [`plan`] is pure: it finds the expression, the
//! occurrences and the insertion point, and flags whether the proposed name
//! is already taken. Only when flagged does [`extract_variable`] ask the host
//! for another name before rendering the edits.

use super::scope_analysis::Scopes;
use crate::editor::{
    ComputeEdits, DelegateAction, DelegateResult, Editor, ErrorReason, Selection,
};
use crate::errors::ServiceError;
use crate::syntax::javascript::{self, enclosing_listed_statement};
use crate::syntax::text::indentation_at;
use crate::syntax::{NodeId, SyntaxTree, TextEdit, locate};
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;
use tracing::{debug, info};

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_$][A-Za-z0-9_$]*$";

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const EXTRACTABLE_KINDS: &[&str] = &[
    "string",
    "template_string",
    "number",
    "true",
    "false",
    "null",
    "undefined",
    "regex",
    "call_expression",
    "member_expression",
    "subscript_expression",
    "binary_expression",
    "unary_expression",
    "ternary_expression",
    "new_expression",
    "await_expression",
    "array",
    "object",
    "arrow_function",
    "function_expression",
    "function",
    "parenthesized_expression",
];

/// Result of the first phase.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    /// The selected expression.
    pub expression: Range<usize>,
    /// Every occurrence to replace, the selected one included, in order.
    pub occurrences: Vec<Range<usize>>,
    /// Start of the statement the declaration goes before.
    pub insert_at: usize,
    pub indent: String,
    pub proposed_name: String,
    /// Names the new variable must not use.
    pub taken: BTreeSet<String>,
    /// The proposed name collides; ask for another before rendering.
    pub needs_disambiguation: bool,
}

impl ExtractionPlan {
    /// Edits introducing `name` initialised with `initializer`.
    pub fn render(&self, name: &str, initializer: &str) -> Vec<TextEdit> {
        let mut edits = vec![TextEdit::insert(
            self.insert_at,
            declaration(name, initializer, &self.indent),
        )];
        edits.extend(
            self.occurrences
                .iter()
                .map(|range| TextEdit::replace(range.clone(), name)),
        );
        edits
    }

    /// Check a name chosen by the user.
    pub fn validate_name(&self, name: &str, pattern: &Regex) -> Result<(), ErrorReason> {
        if !pattern.is_match(name) || RESERVED_WORDS.contains(&name) {
            return Err(ErrorReason::InvalidVariableName);
        }
        if self.taken.contains(name) {
            return Err(ErrorReason::VariableNameAlreadyInScope);
        }
        Ok(())
    }

    /// Second phase: the edits, computed from the freshly read expression text.
    fn compute_edits(&self, tree: &SyntaxTree, name: String) -> ComputeEdits {
        let plan = self.clone();
        let source = tree.source().to_string();
        let index = tree.line_index().clone();
        Box::new(move |initializer: &str| {
            plan.render(&name, initializer)
                .iter()
                .map(|edit| edit.to_edit(&source, &index))
                .collect()
        })
    }
}

fn declaration(name: &str, initializer: &str, indent: &str) -> String {
    format!("const {name} = {initializer};\n{indent}")
}

pub async fn extract_variable(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    let pattern = Regex::new(IDENTIFIER_PATTERN)?;

    let plan = match plan(&tree, selection, &editor.proposed_variable_name()) {
        Ok(plan) => plan,
        Err(reason) => {
            editor.show_error_message(reason).await;
            return Ok(());
        }
    };

    let name = if plan.needs_disambiguation || !pattern.is_match(&plan.proposed_name) {
        info!("'{}' cannot be used here, asking for another name", plan.proposed_name);
        let action = DelegateAction::ChooseVariableName {
            proposed: plan.proposed_name.clone(),
            taken: plan.taken.iter().cloned().collect(),
        };
        match editor.delegate(action).await? {
            DelegateResult::Named(name) => {
                if let Err(reason) = plan.validate_name(&name, &pattern) {
                    editor.show_error_message(reason).await;
                    return Ok(());
                }
                name
            }
            DelegateResult::Done | DelegateResult::Cancelled => {
                debug!("Variable naming cancelled");
                return Ok(());
            }
        }
    } else {
        plan.proposed_name.clone()
    };

    let expression = tree
        .line_index()
        .selection(tree.source(), plan.expression.clone());
    editor
        .read_then_write(expression, plan.compute_edits(&tree, name))
        .await
}

/// First phase: locate the expression and everything needed to extract it.
pub fn plan(
    tree: &SyntaxTree,
    selection: Selection,
    proposed_name: &str,
) -> Result<ExtractionPlan, ErrorReason> {
    let target = locate(tree, selection, is_extractable).ok_or(ErrorReason::DidNotFoundExtractableCode)?;
    let statement =
        enclosing_listed_statement(tree, target).ok_or(ErrorReason::DidNotFoundExtractableCode)?;

    let text = tree.text(target);
    let kind = tree.kind(target);
    let occurrences: Vec<Range<usize>> = tree
        .descendants(statement)
        .into_iter()
        .filter(|&id| tree.kind(id) == kind && tree.text(id) == text)
        .filter(|&id| is_extractable(tree, id))
        .filter(|&id| enclosing_listed_statement(tree, id) == Some(statement))
        .map(|id| tree.range(id))
        .collect();
    debug!("Extracting '{}' ({} occurrences)", text, occurrences.len());

    let scopes = Scopes::analyze(tree);
    let taken = scopes.taken_names(tree, statement);
    let insert_at = tree.range(statement).start;

    Ok(ExtractionPlan {
        expression: tree.range(target),
        occurrences,
        insert_at,
        indent: indentation_at(tree.source(), insert_at).to_string(),
        proposed_name: proposed_name.to_string(),
        needs_disambiguation: taken.contains(proposed_name),
        taken,
    })
}

fn is_extractable(tree: &SyntaxTree, id: NodeId) -> bool {
    if !tree.is_kind(id, EXTRACTABLE_KINDS) {
        return false;
    }
    let Some(parent) = tree.parent(id) else {
        return false;
    };
    let is_first = tree.nth_significant(parent, 0) == Some(id);
    let excluded = match tree.kind(parent) {
        // callee, constructor, assignment target or object key
        "call_expression" | "new_expression" | "pair" => is_first,
        kind if javascript::ASSIGNMENTS.contains(&kind) => is_first,
        "update_expression" => true,
        "import_statement" | "export_statement" => tree.kind(id) == "string",
        _ => false,
    };
    !excluded && enclosing_listed_statement(tree, id).is_some()
}
