//! Aha! record shapes returned by the GraphQL API.
//!
//! Field names follow the upstream schema so that the pretty-printed JSON
//! handed back to the caller reads the same as the Aha! response.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Records and pages
// =============================================================================

/// Rich-text body of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
}

/// A feature or requirement. Both project to the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    #[serde(default)]
    pub description: Option<Description>,
}

/// Link to another page by name and reference number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    pub name: String,
    pub reference_num: String,
}

/// An Aha! note page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub children: Vec<PageLink>,
    /// `None` when the parent was not requested, `Some(None)` when it was
    /// requested and upstream returned `null`.
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<Option<PageLink>>,
}

/// Marks a field that appeared in the input, even as `null`.
fn present_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Search
// =============================================================================

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNode {
    pub name: Option<String>,
    pub url: String,
    pub searchable_id: String,
    pub searchable_type: String,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub nodes: Vec<SearchNode>,
    pub current_page: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub is_last_page: bool,
}

/// Document type searched when the caller does not name one.
pub const DEFAULT_SEARCHABLE_TYPE: &str = "Page";

// =============================================================================
// Feature creation
// =============================================================================

/// Input for the `createFeature` mutation.
///
/// Only fields that were actually supplied are serialized. Upstream treats an
/// explicit `null` as "clear this field", so absent values must stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateFeatureInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_status_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Keep a value only if it is present and non-empty.
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CreateFeatureInput {
    /// Start an input with only the required name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, value: Option<String>) -> Self {
        self.description = supplied(value);
        self
    }

    pub fn product_id(mut self, value: Option<String>) -> Self {
        self.product_id = supplied(value);
        self
    }

    pub fn release_id(mut self, value: Option<String>) -> Self {
        self.release_id = supplied(value);
        self
    }

    pub fn workflow_status_id(mut self, value: Option<String>) -> Self {
        self.workflow_status_id = supplied(value);
        self
    }

    pub fn assigned_to_user_id(mut self, value: Option<String>) -> Self {
        self.assigned_to_user_id = supplied(value);
        self
    }

    /// Tags are kept only when at least one is given.
    pub fn tags(mut self, value: Option<Vec<String>>) -> Self {
        self.tags = value.filter(|tags| !tags.is_empty());
        self
    }
}

/// `{id, name}` projection used for the nested feature relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// Feature returned by the `createFeature` mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedFeature {
    pub id: String,
    pub reference_num: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_status: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_user: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<NamedRef>,
}
