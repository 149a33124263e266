//! MCP server implementation.
//!
//! The server handles the MCP protocol lifecycle:
//! 1. Initialize - exchange capabilities
//! 2. Handle tool calls - one at a time, in arrival order
//! 3. Shutdown - on EOF or Ctrl-C, flush and close the transport

use std::sync::Arc;

use aha_core::AhaApi;
use serde_json::Value;

use crate::handlers::ToolHandler;
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, ToolsListResult, MCP_VERSION,
};
use crate::transport::{IncomingMessage, StdioTransport};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "aha-mcp";

/// MCP server exposing Aha! tools.
pub struct McpServer {
    handler: ToolHandler,
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server backed by the given API.
    pub fn new(api: Arc<dyn AhaApi>) -> Self {
        Self {
            handler: ToolHandler::new(api),
            initialized: false,
        }
    }

    /// Serve over stdin/stdout until EOF or an interrupt signal.
    pub async fn run(&mut self) -> aha_core::Result<()> {
        let mut transport = StdioTransport::stdio();
        tracing::info!("Aha! MCP server running on stdio");

        tokio::select! {
            result = self.serve(&mut transport) => result?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, shutting down");
            }
        }

        transport.close().await?;
        tracing::info!("MCP server stopped");
        Ok(())
    }

    /// Process messages from `transport` until EOF.
    pub async fn serve(&mut self, transport: &mut StdioTransport) -> aha_core::Result<()> {
        loop {
            match transport.read_message().await {
                Ok(Some(msg)) => {
                    if let Some(resp) = self.handle_message(msg).await {
                        transport.write_response(&resp).await.map_err(|e| {
                            tracing::error!("Failed to write response: {}", e);
                            e
                        })?;
                    }
                }
                Ok(None) => {
                    tracing::info!("EOF received, shutting down");
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    tracing::warn!("Transport error: {}", e);
                    let error_resp = JsonRpcResponse::error(
                        RequestId::Null,
                        JsonRpcError::parse_error(&e.to_string()),
                    );
                    transport.write_response(&error_resp).await?;
                }
                Err(e) => {
                    tracing::error!("Transport error: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    /// Handle an incoming message.
    async fn handle_message(&mut self, msg: IncomingMessage) -> Option<JsonRpcResponse> {
        match msg {
            IncomingMessage::Request(req) => Some(self.handle_request(req).await),
            IncomingMessage::Notification(notif) => {
                self.handle_notification(&notif.method);
                None // Notifications don't get responses
            }
            IncomingMessage::Invalid { id, reason } => Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(&reason),
            )),
        }
    }

    /// Handle a JSON-RPC request.
    async fn handle_request(&mut self, req: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!("Handling request: {} (id: {:?})", req.method, req.id);

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req.id, req.params),
            "tools/list" => self.handle_tools_list(req.id),
            "tools/call" => self.handle_tools_call(req.id, req.params).await,
            "ping" => self.handle_ping(req.id),
            method => {
                tracing::warn!("Unknown method: {}", method);
                JsonRpcResponse::error(req.id, JsonRpcError::method_not_found(method))
            }
        }
    }

    /// Handle notifications (no response).
    fn handle_notification(&self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                tracing::info!("Client initialized");
            }
            "notifications/cancelled" => {
                tracing::debug!("Cancellation requested; calls always run to completion");
            }
            _ => {
                tracing::debug!("Ignoring notification: {}", method);
            }
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&mut self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        if self.initialized {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("Server already initialized"),
            );
        }

        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(init_params) => {
                    tracing::info!(
                        "Client: {} v{} (protocol: {})",
                        init_params.client_info.name,
                        init_params.client_info.version,
                        init_params.protocol_version
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to parse initialize params: {}", e);
                }
            }
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        success_or_internal(id, serde_json::to_value(result))
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: RequestId) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.handler.available_tools(),
        };
        success_or_internal(id, serde_json::to_value(result))
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        tracing::info!("Calling tool: {}", params.name);

        match self.handler.execute(&params.name, params.arguments).await {
            Ok(result) => success_or_internal(id, serde_json::to_value(result)),
            Err(error) => JsonRpcResponse::error(id, error),
        }
    }

    /// Handle ping request.
    fn handle_ping(&self, id: RequestId) -> JsonRpcResponse {
        JsonRpcResponse::success(id, serde_json::json!({}))
    }
}

fn success_or_internal(id: RequestId, result: serde_json::Result<Value>) -> JsonRpcResponse {
    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::JSONRPC_VERSION;
    use aha_core::{CreateFeatureInput, CreatedFeature, Page, Record, SearchResult};
    use async_trait::async_trait;

    /// API that answers every lookup with "not found".
    struct EmptyApi;

    #[async_trait]
    impl AhaApi for EmptyApi {
        async fn get_feature(&self, _id: &str) -> aha_core::Result<Option<Record>> {
            Ok(None)
        }
        async fn get_requirement(&self, _id: &str) -> aha_core::Result<Option<Record>> {
            Ok(None)
        }
        async fn get_page(&self, _id: &str, _parent: bool) -> aha_core::Result<Option<Page>> {
            Ok(None)
        }
        async fn search_documents(
            &self,
            _query: &str,
            _searchable_type: &str,
        ) -> aha_core::Result<SearchResult> {
            Ok(SearchResult {
                nodes: vec![],
                current_page: 1,
                total_count: 0,
                total_pages: 0,
                is_last_page: true,
            })
        }
        async fn create_feature(
            &self,
            _input: CreateFeatureInput,
        ) -> aha_core::Result<Option<CreatedFeature>> {
            Ok(None)
        }
    }

    fn server() -> McpServer {
        McpServer::new(Arc::new(EmptyApi))
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId::Number(1),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_response() {
        let mut server = server();

        let resp = server
            .handle_request(request(
                "initialize",
                Some(serde_json::json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "1.0.0"}
                })),
            ))
            .await;

        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
        assert!(server.initialized);
    }

    #[test]
    fn test_double_initialize_error() {
        let mut server = server();
        server.initialized = true;

        let resp = server.handle_initialize(RequestId::Number(1), None);
        assert_eq!(resp.error.unwrap().code, JsonRpcError::INVALID_REQUEST);
    }

    #[test]
    fn test_initialize_with_invalid_params() {
        let mut server = server();

        // Unparseable client info is logged, not rejected
        let resp = server.handle_initialize(
            RequestId::Number(1),
            Some(serde_json::json!({"invalid": true})),
        );

        assert!(resp.result.is_some());
        assert!(server.initialized);
    }

    #[test]
    fn test_tools_list() {
        let server = server();
        let resp = server.handle_tools_list(RequestId::Number(1));

        let result: ToolsListResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        let names: Vec<&str> = result.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["get_record", "get_page", "search_documents", "create_feature"]
        );
    }

    #[test]
    fn test_ping() {
        let server = server();
        let resp = server.handle_ping(RequestId::String("ping-1".to_string()));
        assert_eq!(resp.result, Some(serde_json::json!({})));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mut server = server();
        let resp = server.handle_request(request("resources/list", None)).await;
        assert_eq!(resp.error.unwrap().code, JsonRpcError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let mut server = server();
        let resp = server
            .handle_request(request(
                "tools/call",
                Some(serde_json::json!({"name": "get_feature", "arguments": {}})),
            ))
            .await;

        let error = resp.error.unwrap();
        assert_eq!(error.code, JsonRpcError::METHOD_NOT_FOUND);
        assert!(error.message.contains("get_feature"));
    }

    #[tokio::test]
    async fn test_tools_call_not_found_is_success() {
        let mut server = server();
        let resp = server
            .handle_request(request(
                "tools/call",
                Some(serde_json::json!({
                    "name": "get_page",
                    "arguments": {"reference": "ABC-N-213"}
                })),
            ))
            .await;

        assert!(resp.error.is_none());
        assert_eq!(
            resp.result.unwrap()["content"][0]["text"],
            "No page found for reference ABC-N-213"
        );
    }

    #[tokio::test]
    async fn test_tools_call_validation_error() {
        let mut server = server();
        let resp = server
            .handle_request(request(
                "tools/call",
                Some(serde_json::json!({"name": "get_record", "arguments": {}})),
            ))
            .await;

        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let mut server = server();
        let resp = server.handle_request(request("tools/call", None)).await;
        assert_eq!(resp.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_invalid_params() {
        let mut server = server();
        let resp = server
            .handle_request(request(
                "tools/call",
                Some(serde_json::json!("not an object")),
            ))
            .await;
        assert!(resp.error.is_some());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let mut server = server();

        for method in [
            "notifications/initialized",
            "notifications/cancelled",
            "some/unknown/notification",
        ] {
            let msg = IncomingMessage::Notification(crate::protocol::JsonRpcNotification {
                jsonrpc: JSONRPC_VERSION.to_string(),
                method: method.to_string(),
                params: None,
            });
            assert!(server.handle_message(msg).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_invalid_message_gets_invalid_request() {
        let mut server = server();
        let msg = IncomingMessage::Invalid {
            id: RequestId::Number(3),
            reason: "missing field `method`".to_string(),
        };

        let resp = server.handle_message(msg).await.unwrap();
        assert_eq!(resp.id, RequestId::Number(3));
        assert_eq!(resp.error.unwrap().code, JsonRpcError::INVALID_REQUEST);
    }
}
