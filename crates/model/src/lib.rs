//! Domain types for the Deriv market-data feed, shared across crates.
//!
//! These are the wire-independent shapes; the raw serde structs that match
//! the broker's JSON frames live in `market-client` and convert into these
//! via `From`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single timestamped price quote from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol, e.g. `R_100`.
    pub symbol: String,
    /// Quote time, seconds since epoch.
    pub epoch: i64,
    /// Quoted price. The broker sends this as a number or a string;
    /// `Decimal` absorbs both.
    pub quote: Decimal,
}

/// Historical tick block returned for a `ticks_history` request.
///
/// `prices[i]` was quoted at `times[i]`; both run oldest to newest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickHistory {
    pub prices: Vec<Decimal>,
    pub times: Vec<i64>,
}

/// One entry of the instrument catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSymbol {
    pub symbol: String,
    pub display_name: String,
    pub market: String,
}

/// Error payload attached to a failed API request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Account details returned by a successful `authorize` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub loginid: String,
    pub balance: Decimal,
    pub currency: String,
    /// 1 for demo (virtual-money) accounts, 0 for real accounts.
    pub is_virtual: u8,
    pub email: String,
}

impl AccountInfo {
    /// Whether this is a demo (virtual-money) account.
    pub fn is_demo(&self) -> bool {
        self.is_virtual != 0
    }
}
