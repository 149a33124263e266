//! Aha! GraphQL API client for the Aha! MCP server.
//!
//! This crate owns the single outbound connection to
//! `https://{domain}.aha.io/api/v2/graphql` and the fixed query documents
//! sent over it.

mod client;
pub mod queries;
mod types;

pub use client::AhaClient;
pub use queries::Query;
pub use types::*;
