use thiserror::Error;

/// Errors reported by the market-data client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level WebSocket failure.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The connect attempt exceeded its deadline.
    #[error("connect attempt timed out")]
    ConnectTimeout,

    /// `connect()` called while a connection is already being driven.
    #[error("already connected")]
    AlreadyConnected,

    /// `send()` called outside the Connected state; the message was dropped.
    #[error("not connected")]
    NotConnected,

    /// The client was closed manually and will not reconnect.
    #[error("client closed")]
    Closed,

    /// A request failed to serialize.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
