//! Core traits, types, and error handling for the Aha! MCP server.
//!
//! This crate holds everything the gateway and the MCP front-end share:
//! the error type, environment configuration, the Aha! record shapes,
//! reference-number classification, and the [`AhaApi`] trait.

pub mod api;
pub mod config;
pub mod error;
pub mod reference;
pub mod types;

pub use api::AhaApi;
pub use config::AhaConfig;
pub use error::{Error, Result};
pub use reference::{is_note_reference, RecordReference};
pub use types::*;
