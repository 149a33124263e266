//! Transport layer for MCP JSON-RPC communication.
//!
//! MCP uses newline-delimited JSON over stdin/stdout.

use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use serde_json::Value;

use crate::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId};

/// Message that can be received from the client.
#[derive(Debug)]
pub enum IncomingMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    /// Well-formed JSON that is not a JSON-RPC request or notification.
    Invalid { id: RequestId, reason: String },
}

/// Transport for reading/writing JSON-RPC messages.
pub struct StdioTransport {
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    writer: Box<dyn AsyncWrite + Unpin + Send>,
}

impl StdioTransport {
    /// Create a transport using stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }

    /// Create a transport over any reader/writer pair.
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
        }
    }

    /// Read the next JSON-RPC message, skipping blank lines.
    ///
    /// Returns `Ok(None)` on EOF.
    pub async fn read_message(&mut self) -> io::Result<Option<IncomingMessage>> {
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            tracing::debug!("Received: {}", trimmed);

            let value: Value = serde_json::from_str(trimmed).map_err(|e| {
                tracing::warn!("Failed to parse message: {}", trimmed);
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid JSON: {}", e))
            })?;

            return Ok(Some(classify(value)));
        }
    }

    /// Write a JSON-RPC response to the transport.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Serialization error: {}", e))
        })?;

        tracing::debug!("Sending: {}", json);

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Flush and shut down the write half.
    pub async fn close(&mut self) -> io::Result<()> {
        self.writer.flush().await?;
        self.writer.shutdown().await
    }
}

/// Sort a parsed JSON value into a request, a notification, or neither.
fn classify(value: Value) -> IncomingMessage {
    // A request carries an id; a notification does not
    if value.get("id").is_some() {
        return match serde_json::from_value::<JsonRpcRequest>(value.clone()) {
            Ok(request) => IncomingMessage::Request(request),
            Err(e) => invalid(&value, e.to_string()),
        };
    }

    match serde_json::from_value::<JsonRpcNotification>(value.clone()) {
        Ok(notification) => IncomingMessage::Notification(notification),
        Err(e) => invalid(&value, e.to_string()),
    }
}

fn invalid(value: &Value, reason: String) -> IncomingMessage {
    tracing::warn!("Not a JSON-RPC message: {}", reason);
    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
        .unwrap_or(RequestId::Null);
    IncomingMessage::Invalid { id, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestId;
    use std::io::Cursor;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    /// Writer that keeps everything written in a shared buffer.
    #[derive(Clone, Default)]
    struct SharedWriter(Arc<Mutex<Vec<u8>>>);

    impl SharedWriter {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl AsyncWrite for SharedWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn transport_with_input(input: &str) -> StdioTransport {
        StdioTransport::new(Cursor::new(input.as_bytes().to_vec()), SharedWriter::default())
    }

    #[tokio::test]
    async fn test_read_request() {
        let mut transport =
            transport_with_input("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n");

        match transport.read_message().await.unwrap() {
            Some(IncomingMessage::Request(req)) => {
                assert_eq!(req.method, "tools/list");
                assert_eq!(req.id, RequestId::Number(1));
            }
            _ => panic!("Expected request"),
        }
    }

    #[tokio::test]
    async fn test_read_notification() {
        let mut transport =
            transport_with_input("{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n");

        match transport.read_message().await.unwrap() {
            Some(IncomingMessage::Notification(notif)) => {
                assert_eq!(notif.method, "notifications/initialized");
            }
            _ => panic!("Expected notification"),
        }
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let mut transport =
            transport_with_input("\n   \n{\"jsonrpc\":\"2.0\",\"id\":\"a\",\"method\":\"ping\"}\n");

        match transport.read_message().await.unwrap() {
            Some(IncomingMessage::Request(req)) => assert_eq!(req.method, "ping"),
            _ => panic!("Expected request"),
        }
        assert!(transport.read_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut transport = transport_with_input("{not json}\n");
        let err = transport.read_message().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_message_without_method_is_invalid() {
        let mut transport = transport_with_input("{\"jsonrpc\":\"2.0\",\"id\":9}\n");

        match transport.read_message().await.unwrap() {
            Some(IncomingMessage::Invalid { id, .. }) => assert_eq!(id, RequestId::Number(9)),
            _ => panic!("Expected invalid message"),
        }
    }

    #[tokio::test]
    async fn test_non_object_json_is_invalid() {
        let mut transport = transport_with_input("[1, 2, 3]\n");

        match transport.read_message().await.unwrap() {
            Some(IncomingMessage::Invalid { id, .. }) => assert_eq!(id, RequestId::Null),
            _ => panic!("Expected invalid message"),
        }
    }

    #[tokio::test]
    async fn test_read_eof() {
        let mut transport = transport_with_input("");
        assert!(transport.read_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_response() {
        let writer = SharedWriter::default();
        let mut transport = StdioTransport::new(Cursor::new(Vec::new()), writer.clone());

        let response =
            JsonRpcResponse::success(RequestId::Number(1), serde_json::json!({"ok": true}));
        transport.write_response(&response).await.unwrap();
        transport.close().await.unwrap();

        let output = writer.contents();
        assert!(output.ends_with('\n'));
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"jsonrpc\":\"2.0\""));
        assert!(output.contains("\"id\":1"));
    }
}
