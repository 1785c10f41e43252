//! The WebSocket `authorize` exchange.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use common::KeyValueStore;
use market_client::protocol::{decode_message, ApiMessage, AuthorizeRequest, Request};
use model::AccountInfo;

use crate::error::AuthError;
use crate::store::persist_session;

/// Deadline for the whole authorize exchange (connect + request + reply).
const AUTHORIZE_TIMEOUT: Duration = Duration::from_secs(10);

/// Validate a session token against the broker.
///
/// Opens a short-lived connection to `ws_url`, sends `{authorize: token}`
/// and resolves the account details, or [`AuthError::Api`] when the broker
/// rejects the token. The connection is dropped either way.
pub async fn authorize(ws_url: &str, token: &str) -> Result<AccountInfo, AuthError> {
    tokio::time::timeout(AUTHORIZE_TIMEOUT, authorize_exchange(ws_url, token))
        .await
        .map_err(|_| AuthError::Timeout)?
}

async fn authorize_exchange(ws_url: &str, token: &str) -> Result<AccountInfo, AuthError> {
    let (stream, _) = connect_async(ws_url)
        .await
        .map_err(|e| AuthError::WebSocket(e.to_string()))?;
    let (mut write, mut read) = stream.split();

    let request = Request::from(AuthorizeRequest { authorize: token.to_string() });
    write
        .send(Message::Text(serde_json::to_string(&request)?))
        .await
        .map_err(|e| AuthError::WebSocket(e.to_string()))?;

    while let Some(frame) = read.next().await {
        let frame = frame.map_err(|e| AuthError::WebSocket(e.to_string()))?;
        let Message::Text(text) = frame else {
            continue;
        };

        match decode_message(&text) {
            Ok(ApiMessage::Authorize(account)) => {
                info!(loginid = %account.loginid, "authorization successful");
                return Ok(account);
            }
            Ok(ApiMessage::Error(error)) => {
                warn!(code = %error.code, "authorization rejected");
                return Err(AuthError::Api(error));
            }
            // Anything else on this connection is noise
            Ok(_) => {}
            Err(e) => debug!(error = %e, "ignoring malformed frame"),
        }
    }

    Err(AuthError::ConnectionClosed)
}

/// Try candidate tokens in priority order until one authorizes.
///
/// The first valid token is persisted as the session token and returned
/// with its account details. Invalid candidates are skipped; an empty or
/// fully invalid candidate list yields [`AuthError::NoValidToken`].
pub async fn validate_session(
    ws_url: &str,
    candidates: &[String],
    store: &mut dyn KeyValueStore,
) -> Result<(String, AccountInfo), AuthError> {
    for token in candidates {
        match authorize(ws_url, token).await {
            Ok(account) => {
                persist_session(store, token);
                return Ok((token.clone(), account));
            }
            Err(error) => {
                warn!(error = %error, "candidate token invalid");
            }
        }
    }

    Err(AuthError::NoValidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SESSION_TOKEN_KEY;
    use common::MemoryStore;
    use rust_decimal_macros::dec;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    const ACCOUNT_FRAME: &str = r#"{
        "msg_type": "authorize",
        "authorize": {
            "loginid": "CR123456",
            "balance": "1250.50",
            "currency": "USD",
            "is_virtual": 0,
            "email": "trader@example.com"
        }
    }"#;

    const REJECT_FRAME: &str = r#"{
        "msg_type": "authorize",
        "error": {"code": "InvalidToken", "message": "The token is invalid."}
    }"#;

    /// Serve one connection: authorize requests carrying `valid_token`
    /// succeed, everything else is rejected.
    async fn serve_once(listener: TcpListener, valid_token: &'static str) {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(socket).await.unwrap();

        while let Some(Ok(frame)) = ws.next().await {
            if let Message::Text(text) = frame {
                let reply = if text.contains(valid_token) {
                    ACCOUNT_FRAME
                } else {
                    REJECT_FRAME
                };
                ws.send(Message::Text(reply.to_string())).await.unwrap();
            }
        }
    }

    async fn bind_server() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        (listener, url)
    }

    #[tokio::test]
    async fn test_authorize_resolves_account_details() {
        let (listener, url) = bind_server().await;
        let server = tokio::spawn(serve_once(listener, "a1-good"));

        let account = authorize(&url, "a1-good").await.unwrap();
        assert_eq!(account.loginid, "CR123456");
        assert_eq!(account.balance, dec!(1250.50));
        assert_eq!(account.currency, "USD");
        assert!(!account.is_demo());
        assert_eq!(account.email, "trader@example.com");

        server.abort();
    }

    #[tokio::test]
    async fn test_authorize_surfaces_broker_rejection() {
        let (listener, url) = bind_server().await;
        let server = tokio::spawn(serve_once(listener, "a1-good"));

        let result = authorize(&url, "a1-bad").await;
        match result {
            Err(AuthError::Api(error)) => assert_eq!(error.code, "InvalidToken"),
            other => panic!("expected Api error, got {:?}", other),
        }

        server.abort();
    }

    #[tokio::test]
    async fn test_authorize_fails_without_server() {
        let (listener, url) = bind_server().await;
        drop(listener);

        let result = authorize(&url, "a1-any").await;
        assert!(matches!(result, Err(AuthError::WebSocket(_))));
    }

    #[tokio::test]
    async fn test_validate_session_takes_first_valid_and_persists() {
        let (listener, url) = bind_server().await;

        // Each candidate opens its own connection
        let server = tokio::spawn(async move {
            for _ in 0..2 {
                let (socket, _) = listener.accept().await.unwrap();
                let mut ws = accept_async(socket).await.unwrap();
                if let Some(Ok(Message::Text(text))) = ws.next().await {
                    let reply = if text.contains("a1-second") {
                        ACCOUNT_FRAME
                    } else {
                        REJECT_FRAME
                    };
                    ws.send(Message::Text(reply.to_string())).await.unwrap();
                }
            }
        });

        let mut store = MemoryStore::new();
        let candidates = vec!["a1-first".to_string(), "a1-second".to_string()];

        let (token, account) = validate_session(&url, &candidates, &mut store)
            .await
            .unwrap();

        assert_eq!(token, "a1-second");
        assert_eq!(account.loginid, "CR123456");
        assert_eq!(store.get(SESSION_TOKEN_KEY).as_deref(), Some("a1-second"));

        server.abort();
    }

    #[tokio::test]
    async fn test_validate_session_with_no_candidates() {
        let mut store = MemoryStore::new();
        let result = validate_session("ws://127.0.0.1:1", &[], &mut store).await;
        assert!(matches!(result, Err(AuthError::NoValidToken)));
        assert!(store.get(SESSION_TOKEN_KEY).is_none());
    }
}
