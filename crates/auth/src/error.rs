use thiserror::Error;

/// Errors that can occur during broker authentication.
///
/// Unlike feed hiccups, these are surfaced to the user: a failed
/// authorization blocks the logged-in experience.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The broker rejected the token.
    #[error("authorization rejected: {0}")]
    Api(model::ApiError),

    /// Transport failure while talking to the broker.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The authorize exchange exceeded its deadline.
    #[error("authorization timed out")]
    Timeout,

    /// The connection ended before an authorize response arrived.
    #[error("connection closed before authorization completed")]
    ConnectionClosed,

    /// None of the candidate tokens validated.
    #[error("no valid session token")]
    NoValidToken,

    /// The OAuth redirect URL could not be parsed.
    #[error("invalid redirect URL: {0}")]
    InvalidRedirect(String),

    /// A request failed to serialize.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
