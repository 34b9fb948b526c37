//! # Tool Router Module
//!
//! Routes MCP tool calls to the matching [`RefactoringService`] method.

use crate::refactoring_service::RefactoringService;
use crate::tools::ToolService;
use crate::types::*;

use rmcp::model::{CallToolRequestParam, CallToolResult, Content, ErrorData};
use std::borrow::Cow;

/// Routes tool calls to appropriate service methods
pub struct ToolRouter;

impl ToolRouter {
    fn create_json_response<T: serde::Serialize>(result: T) -> Result<CallToolResult, ErrorData> {
        let json_value = serde_json::to_value(&result)
            .map_err(|e| ErrorData::internal_error(Cow::Owned(e.to_string()), None))?;
        Ok(CallToolResult::success(vec![Content::json(json_value)?]))
    }

    /// Route a tool call to the appropriate service method
    pub async fn route_tool_call(
        service: &RefactoringService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        match request.name.as_ref() {
            "refactor" => Self::handle_refactor(service, request).await,
            "list_refactorings" => Self::handle_list_refactorings(service, request).await,
            "list_languages" => Self::handle_list_languages(service).await,
            "generate_ast" => Self::handle_generate_ast(service, request).await,
            _ => Err(ErrorData::method_not_found::<
                rmcp::model::CallToolRequestMethod,
            >()),
        }
    }

    async fn handle_refactor(
        service: &RefactoringService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        let param: RefactorParam = ToolService::parse_param(&request)?;

        if param.refactoring.trim().is_empty() {
            return Err(ErrorData::invalid_params(
                Cow::Borrowed(
                    "The 'refactor' tool requires a 'refactoring' id. Call 'list_refactorings' to see the available ids.",
                ),
                None,
            ));
        }

        let result = service.refactor(param).await.map_err(ErrorData::from)?;
        Self::create_json_response(result)
    }

    async fn handle_list_refactorings(
        service: &RefactoringService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        let param: ListRefactoringsParam = ToolService::parse_param(&request)?;
        let result = service
            .list_refactorings(param)
            .await
            .map_err(ErrorData::from)?;
        Self::create_json_response(result)
    }

    async fn handle_list_languages(
        service: &RefactoringService,
    ) -> Result<CallToolResult, ErrorData> {
        let result = service.list_languages().await.map_err(ErrorData::from)?;
        Self::create_json_response(result)
    }

    async fn handle_generate_ast(
        service: &RefactoringService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        let param: GenerateAstParam = ToolService::parse_param(&request)?;
        let result = service.generate_ast(param).await.map_err(ErrorData::from)?;
        Self::create_json_response(result)
    }
}
