//! Aha! GraphQL client implementation.

use aha_core::{
    AhaApi, AhaConfig, CreateFeatureInput, CreatedFeature, Error, Page, Record, Result,
    SearchResult,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::queries::{
    Query, CREATE_FEATURE, GET_FEATURE, GET_PAGE, GET_REQUIREMENT, SEARCH_DOCUMENTS,
};
use crate::types::{
    CreateFeatureData, FeatureData, GraphQlRequest, GraphQlResponse, PageData, RequirementData,
    SearchDocumentsData,
};

/// Aha! GraphQL API client.
///
/// Holds one `reqwest::Client` for the life of the process. The endpoint and
/// token never change after construction.
pub struct AhaClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl AhaClient {
    /// Create a client for the configured Aha! account.
    pub fn new(config: &AhaConfig) -> Result<Self> {
        Self::with_endpoint(config.endpoint(), config.token.clone())
    }

    /// Create a client against an explicit GraphQL endpoint (for testing).
    pub fn with_endpoint(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("aha-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client,
        })
    }

    /// GraphQL endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a document with variables and decode its `data` object.
    ///
    /// Failures are logged here before they are returned.
    pub async fn execute<T: DeserializeOwned>(&self, query: Query, variables: Value) -> Result<T> {
        match self.send(query, variables).await {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(operation = query.name, error = %e, "Aha! API request failed");
                Err(e)
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, query: Query, variables: Value) -> Result<T> {
        debug!(operation = query.name, url = %self.endpoint, "Aha! GraphQL request");

        let body = GraphQlRequest {
            query: query.document,
            variables,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            warn!(
                operation = query.name,
                status = status.as_u16(),
                "Aha! API error response"
            );
            return Err(Error::from_status(status.as_u16(), text));
        }

        let parsed: GraphQlResponse<T> = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))?;

        if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GraphQl(messages.join("; ")));
        }

        parsed
            .data
            .ok_or_else(|| Error::InvalidData("Response contained no data".to_string()))
    }
}

#[async_trait]
impl AhaApi for AhaClient {
    async fn get_feature(&self, id: &str) -> Result<Option<Record>> {
        let data: FeatureData = self.execute(GET_FEATURE, json!({ "id": id })).await?;
        Ok(data.feature)
    }

    async fn get_requirement(&self, id: &str) -> Result<Option<Record>> {
        let data: RequirementData = self.execute(GET_REQUIREMENT, json!({ "id": id })).await?;
        Ok(data.requirement)
    }

    async fn get_page(&self, id: &str, include_parent: bool) -> Result<Option<Page>> {
        let data: PageData = self
            .execute(
                GET_PAGE,
                json!({ "id": id, "includeParent": include_parent }),
            )
            .await?;
        Ok(data.page)
    }

    async fn search_documents(&self, query: &str, searchable_type: &str) -> Result<SearchResult> {
        let data: SearchDocumentsData = self
            .execute(
                SEARCH_DOCUMENTS,
                json!({ "query": query, "searchableType": [searchable_type] }),
            )
            .await?;
        Ok(data.search_documents)
    }

    async fn create_feature(&self, input: CreateFeatureInput) -> Result<Option<CreatedFeature>> {
        let data: CreateFeatureData = self
            .execute(CREATE_FEATURE, json!({ "input": input }))
            .await?;
        Ok(data.create_feature.and_then(|payload| payload.feature))
    }
}

// =============================================================================
// Tests
// =============================================================================
