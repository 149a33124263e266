//! MCP tool catalog.
//!
//! The schemas here describe exactly what the parameter structs in
//! `handlers` accept. Keep them in step; a mismatch does not fail loudly,
//! callers just send arguments that get ignored or rejected.

use serde_json::json;

use crate::protocol::ToolDefinition;

pub const GET_RECORD: &str = "get_record";
pub const GET_PAGE: &str = "get_page";
pub const SEARCH_DOCUMENTS: &str = "search_documents";
pub const CREATE_FEATURE: &str = "create_feature";

/// Tool definitions advertised on `tools/list`.
pub fn available_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: GET_RECORD.to_string(),
            description: "Get an Aha! feature or requirement by reference number".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "reference": {
                        "type": "string",
                        "description": "Reference number (e.g., DEVELOP-123 or ADT-123-1)"
                    }
                },
                "required": ["reference"]
            }),
        },
        ToolDefinition {
            name: GET_PAGE.to_string(),
            description: "Get an Aha! page by reference number with optional relationships"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "reference": {
                        "type": "string",
                        "description": "Reference number (e.g., ABC-N-213)"
                    },
                    "includeParent": {
                        "type": "boolean",
                        "description": "Include parent page in the response",
                        "default": false
                    }
                },
                "required": ["reference"]
            }),
        },
        ToolDefinition {
            name: SEARCH_DOCUMENTS.to_string(),
            description: "Search for Aha! documents".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query string"
                    },
                    "searchableType": {
                        "type": "string",
                        "description": "Type of document to search for (e.g., Page)",
                        "default": "Page"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: CREATE_FEATURE.to_string(),
            description: "Create a new feature in Aha!".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Name of the feature (required)"
                    },
                    "description": {
                        "type": "string",
                        "description": "Description of the feature"
                    },
                    "product_id": {
                        "type": "string",
                        "description": "ID of the product to create the feature in"
                    },
                    "release_id": {
                        "type": "string",
                        "description": "ID of the release to assign the feature to"
                    },
                    "workflow_status_id": {
                        "type": "string",
                        "description": "ID of the workflow status for the feature"
                    },
                    "assigned_to_user_id": {
                        "type": "string",
                        "description": "ID of the user to assign the feature to"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Array of tags to apply to the feature"
                    }
                },
                "required": ["name"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names() {
        let names: Vec<String> = available_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![GET_RECORD, GET_PAGE, SEARCH_DOCUMENTS, CREATE_FEATURE]
        );
    }

    #[test]
    fn test_every_required_field_is_declared() {
        for tool in available_tools() {
            let properties = tool.input_schema["properties"].as_object().unwrap();
            for required in tool.input_schema["required"].as_array().unwrap() {
                let field = required.as_str().unwrap();
                assert!(
                    properties.contains_key(field),
                    "{} requires undeclared field {}",
                    tool.name,
                    field
                );
            }
        }
    }

    #[test]
    fn test_defaults() {
        let tools = available_tools();
        let page = tools.iter().find(|t| t.name == GET_PAGE).unwrap();
        assert_eq!(
            page.input_schema["properties"]["includeParent"]["default"],
            false
        );

        let search = tools.iter().find(|t| t.name == SEARCH_DOCUMENTS).unwrap();
        assert_eq!(
            search.input_schema["properties"]["searchableType"]["default"],
            aha_core::DEFAULT_SEARCHABLE_TYPE
        );
    }
}
