//! Tool handlers for MCP server.
//!
//! Each tool call goes through the same steps: decode the arguments into a
//! parameter struct, validate it into a typed request, make one call on the
//! [`AhaApi`], and render the result as a single text block.
//!
//! Errors come back as [`JsonRpcError`]. Validation failures are
//! `INVALID_PARAMS`; anything the API raises is logged and wrapped as
//! `INTERNAL_ERROR` with the operation name in front.

use std::fmt::Display;
use std::sync::Arc;

use aha_core::{
    is_note_reference, AhaApi, CreateFeatureInput, RecordReference, DEFAULT_SEARCHABLE_TYPE,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{JsonRpcError, ToolCallResult, ToolDefinition};
use crate::tools;

const FETCH_RECORD: &str = "Failed to fetch record";
const FETCH_PAGE: &str = "Failed to fetch page";
const SEARCH: &str = "Failed to search documents";
const CREATE: &str = "Failed to create feature";

type ToolResult = std::result::Result<ToolCallResult, JsonRpcError>;

/// Tool handler that executes tools against the Aha! API.
pub struct ToolHandler {
    api: Arc<dyn AhaApi>,
}

impl ToolHandler {
    /// Create a new tool handler.
    pub fn new(api: Arc<dyn AhaApi>) -> Self {
        Self { api }
    }

    /// Get available tool definitions.
    pub fn available_tools(&self) -> Vec<ToolDefinition> {
        tools::available_tools()
    }

    /// Execute a tool by name with arguments.
    pub async fn execute(&self, name: &str, arguments: Option<Value>) -> ToolResult {
        match name {
            tools::GET_RECORD => self.handle_get_record(parse_args(arguments)?).await,
            tools::GET_PAGE => self.handle_get_page(parse_args(arguments)?).await,
            tools::SEARCH_DOCUMENTS => self.handle_search_documents(parse_args(arguments)?).await,
            tools::CREATE_FEATURE => self.handle_create_feature(parse_args(arguments)?).await,
            _ => {
                tracing::warn!("Unknown tool: {}", name);
                Err(JsonRpcError::unknown_tool(name))
            }
        }
    }

    /// Handle get_record tool call.
    async fn handle_get_record(&self, params: GetRecordParams) -> ToolResult {
        let lookup = params.validate()?;

        let record = match lookup.kind {
            RecordReference::Feature => self.api.get_feature(&lookup.reference).await,
            RecordReference::Requirement => self.api.get_requirement(&lookup.reference).await,
            RecordReference::Invalid => return Err(invalid_record_reference()),
        }
        .map_err(|e| internal_failure(FETCH_RECORD, e))?;

        match record {
            Some(record) => render_json(FETCH_RECORD, &record),
            None => Ok(not_found("record", &lookup.reference)),
        }
    }

    /// Handle get_page tool call.
    async fn handle_get_page(&self, params: GetPageParams) -> ToolResult {
        let lookup = params.validate()?;

        let page = self
            .api
            .get_page(&lookup.reference, lookup.include_parent)
            .await
            .map_err(|e| internal_failure(FETCH_PAGE, e))?;

        match page {
            Some(page) => render_json(FETCH_PAGE, &page),
            None => Ok(not_found("page", &lookup.reference)),
        }
    }

    /// Handle search_documents tool call.
    async fn handle_search_documents(&self, params: SearchDocumentsParams) -> ToolResult {
        let search = params.validate()?;

        let result = self
            .api
            .search_documents(&search.query, &search.searchable_type)
            .await
            .map_err(|e| internal_failure(SEARCH, e))?;

        render_json(SEARCH, &result)
    }

    /// Handle create_feature tool call.
    async fn handle_create_feature(&self, params: CreateFeatureParams) -> ToolResult {
        let input = params.validate()?;

        let feature = self
            .api
            .create_feature(input)
            .await
            .map_err(|e| internal_failure(CREATE, e))?
            .ok_or_else(|| {
                tracing::error!("createFeature returned no feature");
                JsonRpcError::internal_error("Failed to create feature - no feature returned")
            })?;

        render_json(CREATE, &feature)
    }
}

// =============================================================================
// Arguments
// =============================================================================

/// Decode tool arguments. Missing arguments decode like an empty object.
fn parse_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T, JsonRpcError> {
    let arguments = match arguments {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value) => value,
    };

    serde_json::from_value(arguments)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid arguments: {}", e)))
}

/// A required string argument that must also be non-empty.
fn require(value: Option<String>, message: &str) -> Result<String, JsonRpcError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        tracing::debug!("Rejected tool call: {}", message);
        JsonRpcError::invalid_params(message)
    })
}

/// Parameters for get_record tool.
#[derive(Debug, Default, Deserialize)]
struct GetRecordParams {
    reference: Option<String>,
}

/// A record lookup whose reference passed classification.
#[derive(Debug, PartialEq)]
struct RecordLookup {
    reference: String,
    kind: RecordReference,
}

impl GetRecordParams {
    fn validate(self) -> Result<RecordLookup, JsonRpcError> {
        let reference = require(self.reference, "Reference number is required")?;

        match RecordReference::classify(&reference) {
            RecordReference::Invalid => Err(invalid_record_reference()),
            kind => Ok(RecordLookup { reference, kind }),
        }
    }
}

fn invalid_record_reference() -> JsonRpcError {
    JsonRpcError::invalid_params(
        "Invalid reference number format. Expected DEVELOP-123 or ADT-123-1",
    )
}

/// Parameters for get_page tool.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPageParams {
    reference: Option<String>,
    include_parent: Option<bool>,
}

#[derive(Debug, PartialEq)]
struct PageLookup {
    reference: String,
    include_parent: bool,
}

impl GetPageParams {
    fn validate(self) -> Result<PageLookup, JsonRpcError> {
        let reference = require(self.reference, "Reference number is required")?;

        if !is_note_reference(&reference) {
            return Err(JsonRpcError::invalid_params(
                "Invalid reference number format. Expected ABC-N-213",
            ));
        }

        Ok(PageLookup {
            reference,
            include_parent: self.include_parent.unwrap_or(false),
        })
    }
}

/// Parameters for search_documents tool.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchDocumentsParams {
    query: Option<String>,
    searchable_type: Option<String>,
}

#[derive(Debug, PartialEq)]
struct DocumentSearch {
    query: String,
    searchable_type: String,
}

impl SearchDocumentsParams {
    fn validate(self) -> Result<DocumentSearch, JsonRpcError> {
        let query = require(self.query, "Search query is required")?;
        let searchable_type = self
            .searchable_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_SEARCHABLE_TYPE.to_string());

        Ok(DocumentSearch {
            query,
            searchable_type,
        })
    }
}

/// Parameters for create_feature tool.
#[derive(Debug, Default, Deserialize)]
struct CreateFeatureParams {
    name: Option<String>,
    description: Option<String>,
    product_id: Option<String>,
    release_id: Option<String>,
    workflow_status_id: Option<String>,
    assigned_to_user_id: Option<String>,
    tags: Option<Vec<String>>,
}

impl CreateFeatureParams {
    fn validate(self) -> Result<CreateFeatureInput, JsonRpcError> {
        let name = require(self.name, "Feature name is required")?;

        Ok(CreateFeatureInput::new(name)
            .description(self.description)
            .product_id(self.product_id)
            .release_id(self.release_id)
            .workflow_status_id(self.workflow_status_id)
            .assigned_to_user_id(self.assigned_to_user_id)
            .tags(self.tags))
    }
}

// =============================================================================
// Output
// =============================================================================

fn render_json<T: Serialize>(operation: &str, value: &T) -> ToolResult {
    serde_json::to_string_pretty(value)
        .map(ToolCallResult::text)
        .map_err(|e| internal_failure(operation, e))
}

fn not_found(kind: &str, reference: &str) -> ToolCallResult {
    ToolCallResult::text(format!("No {} found for reference {}", kind, reference))
}

fn internal_failure(operation: &str, err: impl Display) -> JsonRpcError {
    tracing::error!(operation = operation, "API Error: {}", err);
    JsonRpcError::internal_error(format!("{}: {}", operation, err))
}
