//! GraphQL wire types for the Aha! API.
//!
//! These wrap the request/response envelopes and the per-operation `data`
//! objects. The record shapes themselves live in `aha-core`.

use aha_core::{CreatedFeature, Page, Record, SearchResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a GraphQL POST.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphQlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

/// A single entry of the GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureData {
    #[serde(default)]
    pub feature: Option<Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequirementData {
    #[serde(default)]
    pub requirement: Option<Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub page: Option<Page>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentsData {
    pub search_documents: SearchResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureData {
    #[serde(default)]
    pub create_feature: Option<CreateFeaturePayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeaturePayload {
    #[serde(default)]
    pub feature: Option<CreatedFeature>,
}
