//! Reconnecting WebSocket client for the Deriv market-data API.
//!
//! The broker owns the wire protocol; this crate consumes it:
//!
//! - **Protocol**: typed request shapes and a single decode point turning
//!   raw frames into [`ApiMessage`]s ([`protocol`])
//! - **Fan-out**: a topic-keyed subscriber registry; many callbacks per
//!   topic, each invoked once per matching message ([`SubscriberRegistry`])
//! - **Connection**: one driver task per [`MarketClient`] running the
//!   lifecycle Disconnected → Connecting → Connected → Reconnecting →
//!   Failed/Closed with keep-alive pings and a bounded retry budget
//!
//! Messages sent while disconnected are dropped, never queued; malformed
//! inbound frames are ignored per message.
//!
//! # Example
//!
//! ```rust,ignore
//! use market_client::{ClientConfig, MarketClient, FeedPayload, Topic, TicksHistoryRequest};
//!
//! let mut client = MarketClient::new(ClientConfig::default());
//! client.subscribe(Topic::Tick, |payload| {
//!     if let FeedPayload::Tick(tick) = payload {
//!         println!("{} @ {}", tick.symbol, tick.quote);
//!     }
//! });
//! client.connect().await?;
//! client.send(TicksHistoryRequest::latest_ticks("R_100", 20))?;
//! ```

mod client;
mod error;
pub mod protocol;
mod registry;

pub use client::{ClientConfig, ClientState, MarketClient};
pub use error::ClientError;
pub use protocol::{
    ActiveSymbolsRequest, ApiMessage, AuthorizeRequest, ForgetAllRequest, PingRequest, Request,
    TicksHistoryRequest,
};
pub use registry::{
    create_registry, FeedPayload, SharedRegistry, SubscriberRegistry, SubscriptionId, Topic,
};
