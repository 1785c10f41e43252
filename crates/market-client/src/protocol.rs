//! Request and response shapes of the broker's WebSocket API.
//!
//! The wire protocol is the broker's, not ours; requests serialize to the
//! exact field names the upstream expects, and every inbound frame is
//! decoded exactly once here into an [`ApiMessage`] before anything else
//! looks at it. The domain structs in `model` already match the wire
//! field-for-field, so the envelope deserializes straight into them.

use model::{AccountInfo, ActiveSymbol, ApiError, Tick, TickHistory};
use serde::{Deserialize, Serialize};

/// A request to subscribe to the latest ticks of a symbol, seeded with
/// recent history.
#[derive(Debug, Clone, Serialize)]
pub struct TicksHistoryRequest {
    pub ticks_history: String,
    pub adjust_start_time: u8,
    pub count: u32,
    pub end: String,
    pub start: u64,
    pub style: String,
    pub subscribe: u8,
}

impl TicksHistoryRequest {
    /// Subscribe to live ticks for `symbol`, seeded with the latest
    /// `count` historical quotes.
    pub fn latest_ticks(symbol: impl Into<String>, count: u32) -> Self {
        Self {
            ticks_history: symbol.into(),
            adjust_start_time: 1,
            count,
            end: "latest".to_string(),
            start: 1,
            style: "ticks".to_string(),
            subscribe: 1,
        }
    }
}

/// A request for the instrument catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSymbolsRequest {
    pub active_symbols: String,
    pub product_type: String,
}

impl Default for ActiveSymbolsRequest {
    fn default() -> Self {
        Self {
            active_symbols: "brief".to_string(),
            product_type: "basic".to_string(),
        }
    }
}

/// A request to drop every subscription of one kind.
#[derive(Debug, Clone, Serialize)]
pub struct ForgetAllRequest {
    pub forget_all: String,
}

impl ForgetAllRequest {
    /// Unsubscribe from all tick streams.
    pub fn ticks() -> Self {
        Self { forget_all: "ticks".to_string() }
    }
}

/// Keep-alive request; the server echoes it back.
#[derive(Debug, Clone, Serialize)]
pub struct PingRequest {
    pub ping: u8,
}

impl Default for PingRequest {
    fn default() -> Self {
        Self { ping: 1 }
    }
}

/// A session-token authorization request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest {
    pub authorize: String,
}

/// Any outbound request. Serializes as the inner shape, untagged.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Request {
    TicksHistory(TicksHistoryRequest),
    ActiveSymbols(ActiveSymbolsRequest),
    ForgetAll(ForgetAllRequest),
    Ping(PingRequest),
    Authorize(AuthorizeRequest),
}

impl From<TicksHistoryRequest> for Request {
    fn from(req: TicksHistoryRequest) -> Self {
        Self::TicksHistory(req)
    }
}

impl From<ActiveSymbolsRequest> for Request {
    fn from(req: ActiveSymbolsRequest) -> Self {
        Self::ActiveSymbols(req)
    }
}

impl From<ForgetAllRequest> for Request {
    fn from(req: ForgetAllRequest) -> Self {
        Self::ForgetAll(req)
    }
}

impl From<PingRequest> for Request {
    fn from(req: PingRequest) -> Self {
        Self::Ping(req)
    }
}

impl From<AuthorizeRequest> for Request {
    fn from(req: AuthorizeRequest) -> Self {
        Self::Authorize(req)
    }
}

/// One inbound frame, decoded by message kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiMessage {
    Tick(Tick),
    History(TickHistory),
    ActiveSymbols(Vec<ActiveSymbol>),
    Authorize(AccountInfo),
    /// Acknowledgement of our keep-alive; never fanned out.
    PingAck,
    Error(ApiError),
    /// A frame we don't consume (subscription echoes, forget acks, ...).
    Unknown,
}

/// Response envelope: the broker marks the kind by which field is present.
#[derive(Debug, Deserialize)]
struct Envelope {
    error: Option<ApiError>,
    tick: Option<Tick>,
    history: Option<TickHistory>,
    active_symbols: Option<Vec<ActiveSymbol>>,
    authorize: Option<AccountInfo>,
    ping: Option<serde_json::Value>,
}

/// Decode one raw frame into an [`ApiMessage`].
///
/// Returns `Err` only for frames that are not JSON objects of the expected
/// envelope shape; callers ignore those per-message.
pub fn decode_message(text: &str) -> Result<ApiMessage, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(text)?;

    // An error payload wins over everything else in the same frame
    let message = if let Some(error) = envelope.error {
        ApiMessage::Error(error)
    } else if let Some(tick) = envelope.tick {
        ApiMessage::Tick(tick)
    } else if let Some(history) = envelope.history {
        ApiMessage::History(history)
    } else if let Some(symbols) = envelope.active_symbols {
        ApiMessage::ActiveSymbols(symbols)
    } else if let Some(account) = envelope.authorize {
        ApiMessage::Authorize(account)
    } else if envelope.ping.is_some() {
        ApiMessage::PingAck
    } else {
        ApiMessage::Unknown
    };

    Ok(message)
}
