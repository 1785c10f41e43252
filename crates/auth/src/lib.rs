//! Broker authentication for the dashboard.
//!
//! The broker owns the login page and the account database; this crate
//! consumes its two protocols:
//!
//! - **OAuth implicit grant**: build the login URL, pull `token` /
//!   `token1` / `token2` back out of the redirect ([`OauthConfig`],
//!   [`extract_tokens`])
//! - **WebSocket authorize**: validate a token and fetch account details
//!   over a short-lived connection ([`authorize`], [`validate_session`])
//!
//! Token storage goes through the workspace's [`common::KeyValueStore`]
//! seam: the real dashboard keeps tokens in browser local storage under
//! the same fixed keys.

mod error;
mod oauth;
mod session;
mod store;

pub use error::AuthError;
pub use oauth::{extract_tokens, OauthConfig, RedirectTokens};
pub use session::{authorize, validate_session};
pub use store::{
    candidate_tokens, clear_session, persist_session, stash_redirect_tokens, DEMO_TOKEN_KEY,
    REAL_TOKEN_KEY, SESSION_TOKEN_KEY,
};
