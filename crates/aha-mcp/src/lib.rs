//! MCP (Model Context Protocol) server for Aha!.
//!
//! Exposes Aha! features, requirements, note pages and document search as
//! MCP tools over newline-delimited JSON-RPC on stdin/stdout.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use handlers::ToolHandler;
pub use server::McpServer;
pub use transport::StdioTransport;
