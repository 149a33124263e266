//! Fixed GraphQL documents sent to Aha!.
//!
//! Callers only ever supply variables; the documents themselves never change
//! at runtime.

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    /// Operation name, used for logging.
    pub name: &'static str,
    pub document: &'static str,
}

pub const GET_FEATURE: Query = Query {
    name: "GetFeature",
    document: r#"
  query GetFeature($id: ID!) {
    feature(id: $id) {
      name
      description {
        markdownBody
      }
    }
  }
"#,
};

pub const GET_REQUIREMENT: Query = Query {
    name: "GetRequirement",
    document: r#"
  query GetRequirement($id: ID!) {
    requirement(id: $id) {
      name
      description {
        markdownBody
      }
    }
  }
"#,
};

/// `parent` is only selected when `$includeParent` is true.
pub const GET_PAGE: Query = Query {
    name: "GetPage",
    document: r#"
  query GetPage($id: ID!, $includeParent: Boolean!) {
    page(id: $id) {
      name
      description {
        markdownBody
      }
      children {
        name
        referenceNum
      }
      parent @include(if: $includeParent) {
        name
        referenceNum
      }
    }
  }
"#,
};

pub const SEARCH_DOCUMENTS: Query = Query {
    name: "SearchDocuments",
    document: r#"
  query SearchDocuments($query: String!, $searchableType: [String!]!) {
    searchDocuments(filters: {query: $query, searchableType: $searchableType}) {
      nodes {
        name
        url
        searchableId
        searchableType
      }
      currentPage
      totalCount
      totalPages
      isLastPage
    }
  }
"#,
};

pub const CREATE_FEATURE: Query = Query {
    name: "CreateFeature",
    document: r#"
  mutation CreateFeature($input: CreateFeatureInput!) {
    createFeature(input: $input) {
      feature {
        id
        reference_num
        name
        description {
          markdownBody
        }
        workflow_status {
          id
          name
        }
        assigned_to_user {
          id
          name
        }
        product {
          id
          name
        }
        release {
          id
          name
        }
      }
    }
  }
"#,
};
