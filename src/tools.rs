use rmcp::model::{CallToolRequestParam, ErrorData, JsonObject, ListToolsResult, Tool};
use serde_json::{Value, json};
use std::borrow::Cow;
use std::sync::Arc;

pub struct ToolService;

fn schema(value: Value) -> Arc<JsonObject> {
    match value {
        Value::Object(object) => Arc::new(object),
        _ => Arc::new(JsonObject::new()),
    }
}

fn selection_schema() -> Value {
    let position = json!({
        "type": "object",
        "properties": {
            "line": { "type": "integer", "minimum": 0, "description": "0-based line" },
            "character": { "type": "integer", "minimum": 0, "description": "0-based character within the line" }
        },
        "required": ["line", "character"]
    });
    json!({
        "type": "object",
        "description": "Cursor (start only) or range to refactor at",
        "properties": {
            "start": position,
            "end": position
        },
        "required": ["start"]
    })
}

impl ToolService {
    pub fn list_tools() -> ListToolsResult {
        ListToolsResult {
            tools: vec![
                Tool::new(
                    "refactor",
                    "Apply a refactoring to JavaScript or TypeScript code at a cursor or selection. Returns the rewritten code, or the reason the refactoring does not apply there. Use list_refactorings for the available ids.",
                    schema(json!({
                        "type": "object",
                        "properties": {
                            "refactoring": { "type": "string", "description": "Refactoring id, e.g. flip_if_else or extract_variable" },
                            "code": { "type": "string", "description": "Whole source buffer" },
                            "language": { "type": "string", "description": "javascript, typescript or tsx (default from configuration)" },
                            "selection": selection_schema(),
                            "variable_name": { "type": "string", "description": "Name for extract_variable; used when the proposed name is already taken" }
                        },
                        "required": ["refactoring", "code", "selection"]
                    })),
                ),
                Tool::new(
                    "list_refactorings",
                    "List the available refactorings with descriptions and before/after examples.",
                    schema(json!({
                        "type": "object",
                        "properties": {
                            "language": { "type": "string", "description": "Only refactorings supporting this language" }
                        }
                    })),
                ),
                Tool::new(
                    "list_languages",
                    "List the languages the refactorings understand.",
                    schema(json!({ "type": "object", "properties": {} })),
                ),
                Tool::new(
                    "generate_ast",
                    "Generate a stringified syntax tree for code, with the selection coordinates of every node. Useful to see which node a selection lands on.",
                    schema(json!({
                        "type": "object",
                        "properties": {
                            "code": { "type": "string", "description": "Source code to parse" },
                            "language": { "type": "string", "description": "javascript, typescript or tsx" }
                        },
                        "required": ["code", "language"]
                    })),
                ),
            ],
            ..Default::default()
        }
    }

    pub fn parse_param<T>(request: &CallToolRequestParam) -> Result<T, ErrorData>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(Value::Object(request.arguments.clone().unwrap_or_default()))
            .map_err(|e| ErrorData::invalid_params(Cow::Owned(e.to_string()), None))
    }
}
