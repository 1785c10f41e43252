//! Deriv API endpoint configuration.
//!
//! The broker exposes the same WebSocket API on two hosts; the fallback
//! exists because the primary is blocked on some networks.

use std::fmt;
use std::str::FromStr;

/// Application id registered with the broker for this dashboard.
pub const APP_ID: u32 = 108991;

/// Deriv WebSocket endpoint (primary or fallback host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DerivEndpoint {
    /// Primary host.
    #[default]
    Primary,
    /// Fallback host for networks where the primary is unreachable.
    Fallback,
}

impl DerivEndpoint {
    /// WebSocket URL for the API, qualified with an application id.
    pub fn ws_url(&self, app_id: u32) -> String {
        format!("{}?app_id={}", self.ws_base_url(), app_id)
    }

    /// WebSocket base URL without the application id.
    pub fn ws_base_url(&self) -> &'static str {
        match self {
            Self::Primary => "wss://ws.binaryws.com/websockets/v3",
            Self::Fallback => "wss://ws.derivws.com/websockets/v3",
        }
    }

    /// OAuth authorization page URL (same for both hosts).
    pub fn oauth_url(&self) -> &'static str {
        "https://oauth.deriv.com/oauth2/authorize"
    }

    /// Load the endpoint from the `DERIV_ENDPOINT` env var.
    ///
    /// Returns `Primary` if not set or invalid.
    pub fn from_env() -> Self {
        std::env::var("DERIV_ENDPOINT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for DerivEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

impl FromStr for DerivEndpoint {
    type Err = ParseEndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" | "binaryws" => Ok(Self::Primary),
            "fallback" | "derivws" => Ok(Self::Fallback),
            _ => Err(ParseEndpointError(s.to_string())),
        }
    }
}

/// Error parsing an endpoint string.
#[derive(Debug, Clone)]
pub struct ParseEndpointError(String);

impl fmt::Display for ParseEndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid endpoint '{}', expected 'primary' or 'fallback'",
            self.0
        )
    }
}

impl std::error::Error for ParseEndpointError {}
