use crate::config::ServiceConfig;
use crate::editor::{DelegateAction, DelegateResult, InMemoryEditor, Selection};
use crate::errors::ServiceError;
use crate::refactoring::{RefactoringCatalog, RefactoringKind, execute_safely};
use crate::syntax::{SyntaxTree, parse_language};
use crate::tool_router::ToolRouter;
use crate::tools::ToolService;
use crate::types::*;

use ast_grep_language::SupportLang as Language;
use rmcp::{
    ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorData, Implementation, InitializeResult,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities,
    },
    service::{RequestContext, RoleServer},
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Catalog name of a supported language.
fn language_name(language: Language) -> &'static str {
    match language {
        Language::TypeScript => "typescript",
        Language::Tsx => "tsx",
        _ => "javascript",
    }
}

#[derive(Clone)]
pub struct RefactoringService {
    config: ServiceConfig,
    catalog: Arc<RefactoringCatalog>,
}

impl RefactoringService {
    pub fn new() -> Result<Self, ServiceError> {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        // fail at startup rather than on the first call
        parse_language(&config.default_language)?;
        let catalog = Arc::new(RefactoringCatalog::embedded()?);
        Ok(Self { config, catalog })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RefactoringCatalog {
        &self.catalog
    }

    /// Run one refactoring on a private copy of the submitted code.
    #[tracing::instrument(skip(self, param), fields(refactoring = %param.refactoring))]
    pub async fn refactor(&self, param: RefactorParam) -> Result<RefactorResult, ServiceError> {
        let kind: RefactoringKind = param.refactoring.parse()?;
        let language = parse_language(
            param
                .language
                .as_deref()
                .unwrap_or(&self.config.default_language),
        )?;
        self.catalog.validate_request(kind, language_name(language))?;

        if param.code.len() > self.config.max_code_size {
            return Err(ServiceError::InvalidInput(format!(
                "Code is {} bytes, more than the {} bytes allowed",
                param.code.len(),
                self.config.max_code_size
            )));
        }

        // a requested name is proposed first, and given again if asked
        let editor = match &param.variable_name {
            Some(name) => InMemoryEditor::new(param.code.clone(), language)
                .with_proposed_variable_name(name)
                .with_variable_name_answer(name),
            None => InMemoryEditor::new(param.code.clone(), language)
                .with_proposed_variable_name(&self.config.extracted_variable_name),
        }
        // renames are carried out by the client from the returned action
        .with_rename_answer(DelegateResult::Done);

        let selection = Selection::from(param.selection);
        execute_safely(kind, &param.code, selection, &editor).await?;

        let applied = editor.write_count() > 0;
        let error_reason = editor.last_error_reason();
        let delegated = editor.delegated_actions();
        let message = match error_reason {
            Some(reason) => Some(reason.message().to_string()),
            None => delegated.iter().find_map(|action| match action {
                DelegateAction::ChooseVariableName { proposed, .. } if !applied => Some(format!(
                    "'{proposed}' cannot be used here; call again with another variable_name"
                )),
                DelegateAction::RenameSymbol { selection } => {
                    Some(format!("Rename the symbol at {selection} with your editor"))
                }
                _ => None,
            }),
        };
        info!(
            "{} at {}: applied={}, reason={:?}",
            kind, selection, applied, error_reason
        );

        Ok(RefactorResult {
            refactoring: kind.to_string(),
            applied,
            code: editor.code(),
            error_reason,
            message,
            delegated,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_refactorings(
        &self,
        param: ListRefactoringsParam,
    ) -> Result<ListRefactoringsResult, ServiceError> {
        let definitions = match &param.language {
            Some(language) => {
                let language = language_name(parse_language(language)?);
                self.catalog.for_language(language)
            }
            None => self.catalog.all(),
        };
        debug!("Listing {} refactorings", definitions.len());
        Ok(ListRefactoringsResult {
            refactorings: definitions.into_iter().cloned().collect(),
        })
    }

    pub async fn list_languages(&self) -> Result<ListLanguagesResult, ServiceError> {
        let languages = [Language::JavaScript, Language::TypeScript, Language::Tsx]
            .into_iter()
            .map(|language| language_name(language).to_string())
            .collect();
        Ok(ListLanguagesResult { languages })
    }

    /// Dump the tree a refactoring would see. Syntax errors are reported, not rejected.
    #[tracing::instrument(skip(self, param), fields(language = %param.language))]
    pub async fn generate_ast(
        &self,
        param: GenerateAstParam,
    ) -> Result<GenerateAstResult, ServiceError> {
        let language = parse_language(&param.language)?;
        let tree = SyntaxTree::parse_lossy(&param.code, language);

        let node_kinds: BTreeSet<String> = (0..tree.len())
            .filter(|&id| tree.node(id).named)
            .map(|id| tree.kind(id).to_string())
            .collect();

        Ok(GenerateAstResult {
            ast: tree.to_debug_string(),
            language: param.language,
            code_length: param.code.chars().count(),
            node_kinds: node_kinds.into_iter().collect(),
            error_at: tree.first_error().map(|id| tree.node(id).span.start()),
        })
    }
}

impl ServerHandler for RefactoringService {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "abracadabra-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability { list_changed: Some(true) }),
                ..Default::default()
            },
            instructions: Some("This MCP server refactors JavaScript and TypeScript code at a cursor or selection. Call list_refactorings to see what is available, then refactor with the whole code and a 0-based selection. Refactorings that do not apply return an error_reason instead of changing the code.".into()),
        }
    }

    #[tracing::instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ToolService::list_tools())
    }

    #[tracing::instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        ToolRouter::route_tool_call(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unsupported_default_language() {
        let config = ServiceConfig {
            default_language: "python".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            RefactoringService::with_config(config),
            Err(ServiceError::UnsupportedLanguage(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_ast_reports_syntax_errors() {
        let service = RefactoringService::new().unwrap();
        let result = service
            .generate_ast(GenerateAstParam {
                code: "if (a {".to_string(),
                language: "javascript".to_string(),
            })
            .await
            .unwrap();
        assert!(result.ast.starts_with("program"));
        assert!(result.error_at.is_some());
    }

    #[tokio::test]
    async fn test_list_languages() {
        let service = RefactoringService::new().unwrap();
        let result = service.list_languages().await.unwrap();
        assert_eq!(result.languages, vec!["javascript", "typescript", "tsx"]);
    }
}
