//! Gateway trait for the Aha! GraphQL API.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CreateFeatureInput, CreatedFeature, Page, Record, SearchResult};

/// Operations the MCP tools need from Aha!.
///
/// Lookups return `Ok(None)` when the request succeeded but upstream had no
/// matching entity. Transport and response-shape failures are `Err`.
#[async_trait]
pub trait AhaApi: Send + Sync {
    /// Fetch a feature by reference number (`DEVELOP-123`).
    async fn get_feature(&self, id: &str) -> Result<Option<Record>>;

    /// Fetch a requirement by reference number (`ADT-123-1`).
    async fn get_requirement(&self, id: &str) -> Result<Option<Record>>;

    /// Fetch a note page by reference number (`ABC-N-213`).
    async fn get_page(&self, id: &str, include_parent: bool) -> Result<Option<Page>>;

    /// Search documents of a single type.
    async fn search_documents(&self, query: &str, searchable_type: &str) -> Result<SearchResult>;

    /// Create a feature. `Ok(None)` means the mutation returned no feature.
    async fn create_feature(&self, input: CreateFeatureInput) -> Result<Option<CreatedFeature>>;
}
