//! The reconnecting market-data client.
//!
//! One driver task owns the underlying connection and runs the state
//! machine; the [`MarketClient`] handle feeds it requests and exposes
//! state through a watch channel. Decoded messages fan out through the
//! subscriber registry.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

use common::{DerivEndpoint, RetryPolicy, APP_ID};

use crate::error::ClientError;
use crate::protocol::{decode_message, ApiMessage, PingRequest, Request};
use crate::registry::{create_registry, FeedPayload, SharedRegistry, SubscriptionId, Topic};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No connection and no driver running.
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// Live connection; keep-alive running, requests flow.
    Connected,
    /// Connection lost; waiting out the delay before the next attempt.
    Reconnecting,
    /// Reconnect budget spent. Terminal until `connect()` is called again.
    Failed,
    /// Closed manually. Terminal until `connect()` is called again.
    Closed,
}

impl std::fmt::Display for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Failed => "failed",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Market-data client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Broker endpoint to dial.
    pub endpoint: DerivEndpoint,
    /// Application id appended to the endpoint URL.
    pub app_id: u32,
    /// Explicit URL override; wins over `endpoint` when set.
    pub url: Option<String>,
    /// Keep-alive `{ping:1}` cadence.
    pub ping_interval: Duration,
    /// Deadline for a single connect attempt.
    pub connect_timeout: Duration,
    /// Reconnect schedule after a non-manual disconnect.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DerivEndpoint::default(),
            app_id: APP_ID,
            url: None,
            ping_interval: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    fn effective_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| self.endpoint.ws_url(self.app_id))
    }
}

/// Channels into a running driver task.
struct Link {
    outbound_tx: mpsc::UnboundedSender<String>,
    close_tx: watch::Sender<bool>,
}

/// Handle to the reconnecting market-data connection.
///
/// `subscribe`/`unsubscribe` work in any state; `send` only while
/// Connected (messages are never queued). After `close()` or reconnect
/// exhaustion the handle can be revived with another `connect()`.
pub struct MarketClient {
    config: ClientConfig,
    registry: SharedRegistry,
    state_rx: watch::Receiver<ClientState>,
    link: Option<Link>,
}

impl MarketClient {
    /// Create a client in the Disconnected state.
    pub fn new(config: ClientConfig) -> Self {
        let (_, state_rx) = watch::channel(ClientState::Disconnected);
        Self {
            config,
            registry: create_registry(),
            state_rx,
            link: None,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ClientState {
        *self.state_rx.borrow()
    }

    /// A watch over the connection state.
    pub fn state_watch(&self) -> watch::Receiver<ClientState> {
        self.state_rx.clone()
    }

    /// Register a callback for one message topic.
    pub fn subscribe<F>(&self, topic: Topic, callback: F) -> SubscriptionId
    where
        F: Fn(&FeedPayload) + Send + Sync + 'static,
    {
        self.registry.subscribe(topic, callback)
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&self, topic: Topic, id: SubscriptionId) -> bool {
        self.registry.unsubscribe(topic, id)
    }

    /// Dial the feed and resolve once the connection is open.
    ///
    /// Errors with [`ClientError::AlreadyConnected`] while a driver is
    /// active; a first-attempt failure is reported here and does not
    /// retry. Once connected, later disconnects reconnect automatically
    /// per the configured retry policy.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        match self.state() {
            ClientState::Connecting | ClientState::Connected | ClientState::Reconnecting => {
                return Err(ClientError::AlreadyConnected);
            }
            _ => {}
        }

        let (state_tx, state_rx) = watch::channel(ClientState::Connecting);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = watch::channel(false);
        let (ready_tx, ready_rx) = oneshot::channel();

        tokio::spawn(run_driver(
            self.config.clone(),
            self.registry.clone(),
            state_tx,
            outbound_rx,
            close_rx,
            ready_tx,
        ));

        self.state_rx = state_rx;
        self.link = Some(Link { outbound_tx, close_tx });

        ready_rx
            .await
            .map_err(|_| ClientError::WebSocket("connection task aborted".to_string()))?
    }

    /// Serialize and transmit a request, only while Connected.
    ///
    /// Outside Connected the message is dropped and the failure logged;
    /// nothing is queued for later.
    pub fn send(&self, request: impl Into<Request>) -> Result<(), ClientError> {
        let request = request.into();

        if self.state() != ClientState::Connected {
            warn!(state = %self.state(), "dropping request, not connected");
            return Err(ClientError::NotConnected);
        }

        let text = serde_json::to_string(&request)?;
        match &self.link {
            Some(link) if link.outbound_tx.send(text).is_ok() => Ok(()),
            _ => {
                warn!("dropping request, connection task gone");
                Err(ClientError::NotConnected)
            }
        }
    }

    /// Tear the connection down for good. Idempotent.
    ///
    /// Sets the manual-close flag so no reconnect is attempted, stops the
    /// keep-alive, and closes the socket.
    pub fn close(&self) {
        if let Some(link) = &self.link {
            let _ = link.close_tx.send(true);
        }
    }
}

/// How a connect attempt resolved.
enum ConnectResult {
    Connected(Box<WsStream>),
    Shutdown,
    Error(ClientError),
}

async fn connect_with_timeout(
    url: &str,
    timeout: Duration,
    close_rx: &mut watch::Receiver<bool>,
) -> ConnectResult {
    loop {
        tokio::select! {
            biased;

            res = close_rx.changed() => {
                if res.is_err() || *close_rx.borrow() {
                    return ConnectResult::Shutdown;
                }
                // Spurious wakeup; retry
            }

            result = tokio::time::timeout(timeout, connect_async(url)) => {
                return match result {
                    Ok(Ok((stream, _))) => ConnectResult::Connected(Box::new(stream)),
                    Ok(Err(e)) => ConnectResult::Error(ClientError::WebSocket(e.to_string())),
                    Err(_) => ConnectResult::Error(ClientError::ConnectTimeout),
                };
            }
        }
    }
}

/// How a live session ended.
enum SessionEnd {
    /// `close()` was called (or the handle went away).
    ManualClose,
    /// The stream ended or errored; candidate for reconnection.
    Ended(String),
}

async fn run_session(
    stream: WsStream,
    registry: &SharedRegistry,
    outbound_rx: &mut mpsc::UnboundedReceiver<String>,
    close_rx: &mut watch::Receiver<bool>,
    ping_interval: Duration,
) -> SessionEnd {
    let (mut write, mut read) = stream.split();

    // First keep-alive goes out one full interval after open
    let mut keep_alive =
        tokio::time::interval_at(tokio::time::Instant::now() + ping_interval, ping_interval);
    let ping_frame = serde_json::to_string(&Request::from(PingRequest::default()))
        .unwrap_or_else(|_| r#"{"ping":1}"#.to_string());

    loop {
        tokio::select! {
            biased;

            res = close_rx.changed() => {
                if res.is_err() || *close_rx.borrow() {
                    let _ = write.close().await;
                    return SessionEnd::ManualClose;
                }
            }

            _ = keep_alive.tick() => {
                trace!("sending keep-alive");
                if let Err(e) = write.send(Message::Text(ping_frame.clone())).await {
                    return SessionEnd::Ended(format!("keep-alive failed: {e}"));
                }
            }

            maybe_text = outbound_rx.recv() => {
                match maybe_text {
                    Some(text) => {
                        debug!(request = %text, "sending request");
                        if let Err(e) = write.send(Message::Text(text)).await {
                            return SessionEnd::Ended(format!("send failed: {e}"));
                        }
                    }
                    // Client handle dropped; nobody left to reconnect for
                    None => {
                        let _ = write.close().await;
                        return SessionEnd::ManualClose;
                    }
                }
            }

            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => handle_frame(&text, registry),
                    Some(Ok(Message::Ping(payload))) => {
                        if let Err(e) = write.send(Message::Pong(payload)).await {
                            return SessionEnd::Ended(format!("pong failed: {e}"));
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        return SessionEnd::Ended("closed by server".to_string());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return SessionEnd::Ended(e.to_string()),
                    None => return SessionEnd::Ended("stream ended".to_string()),
                }
            }
        }
    }
}

/// Decode one frame and fan it out. Malformed frames are dropped
/// per-message; the connection is unaffected.
fn handle_frame(text: &str, registry: &SharedRegistry) {
    match decode_message(text) {
        Ok(ApiMessage::Tick(tick)) => {
            registry.dispatch(&FeedPayload::Tick(tick));
        }
        Ok(ApiMessage::History(history)) => {
            registry.dispatch(&FeedPayload::History(history));
        }
        Ok(ApiMessage::ActiveSymbols(symbols)) => {
            registry.dispatch(&FeedPayload::ActiveSymbols(symbols));
        }
        Ok(ApiMessage::PingAck) => trace!("keep-alive acknowledged"),
        Ok(ApiMessage::Authorize(account)) => {
            debug!(loginid = %account.loginid, "authorize response on feed connection");
        }
        Ok(ApiMessage::Error(error)) => {
            warn!(code = %error.code, message = %error.message, "api error");
        }
        Ok(ApiMessage::Unknown) => {}
        Err(e) => debug!(error = %e, "ignoring malformed frame"),
    }
}

async fn run_driver(
    config: ClientConfig,
    registry: SharedRegistry,
    state_tx: watch::Sender<ClientState>,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    mut close_rx: watch::Receiver<bool>,
    ready_tx: oneshot::Sender<Result<(), ClientError>>,
) {
    let url = config.effective_url();
    let mut retry = config.retry.clone();
    let mut ready = Some(ready_tx);

    loop {
        if *close_rx.borrow() {
            let _ = state_tx.send(ClientState::Closed);
            return;
        }

        let _ = state_tx.send(ClientState::Connecting);
        info!(url = %url, "connecting to market data feed");

        match connect_with_timeout(&url, config.connect_timeout, &mut close_rx).await {
            ConnectResult::Connected(stream) => {
                info!("market data connection established");
                retry.reset();
                let _ = state_tx.send(ClientState::Connected);
                if let Some(tx) = ready.take() {
                    let _ = tx.send(Ok(()));
                }

                match run_session(
                    *stream,
                    &registry,
                    &mut outbound_rx,
                    &mut close_rx,
                    config.ping_interval,
                )
                .await
                {
                    SessionEnd::ManualClose => {
                        info!("connection closed manually");
                        let _ = state_tx.send(ClientState::Closed);
                        return;
                    }
                    SessionEnd::Ended(reason) => {
                        warn!(reason = %reason, "connection lost");
                    }
                }
            }
            ConnectResult::Shutdown => {
                let _ = state_tx.send(ClientState::Closed);
                return;
            }
            ConnectResult::Error(error) => {
                // The first attempt reports to the caller and stops; only
                // an established session reconnects automatically
                if let Some(tx) = ready.take() {
                    error!(error = %error, "initial connect failed");
                    let _ = state_tx.send(ClientState::Disconnected);
                    let _ = tx.send(Err(error));
                    return;
                }
                warn!(error = %error, "reconnect attempt failed");
            }
        }

        let Some(delay) = retry.next_delay() else {
            error!(
                attempts = retry.max_attempts(),
                "max reconnect attempts reached, giving up"
            );
            let _ = state_tx.send(ClientState::Failed);
            return;
        };

        let _ = state_tx.send(ClientState::Reconnecting);
        info!(
            attempt = retry.attempt(),
            max_attempts = retry.max_attempts(),
            delay_ms = delay.as_millis() as u64,
            "reconnecting"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            res = close_rx.changed() => {
                if res.is_err() || *close_rx.borrow() {
                    let _ = state_tx.send(ClientState::Closed);
                    return;
                }
            }
        }
    }
}
