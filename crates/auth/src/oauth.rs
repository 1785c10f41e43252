//! OAuth implicit-grant URL building and redirect parsing.
//!
//! The broker hosts the login page; we only build the outbound URL and
//! pull tokens back out of the redirect. Multi-account logins redirect
//! with `token1` (real) and `token2` (demo) instead of a single `token`.

use url::Url;

use common::{DerivEndpoint, APP_ID};

use crate::error::AuthError;

/// OAuth implicit-grant configuration.
#[derive(Debug, Clone)]
pub struct OauthConfig {
    pub app_id: u32,
    pub oauth_url: String,
    pub redirect_uri: String,
    pub language: String,
}

impl Default for OauthConfig {
    fn default() -> Self {
        Self {
            app_id: APP_ID,
            oauth_url: DerivEndpoint::default().oauth_url().to_string(),
            redirect_uri: "https://tradealgopro.vercel.app/".to_string(),
            language: "EN".to_string(),
        }
    }
}

impl OauthConfig {
    /// The login page URL to send the user to.
    pub fn login_url(&self) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &self.oauth_url,
            &[
                ("app_id", self.app_id.to_string().as_str()),
                ("l", self.language.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "token"),
            ],
        )
        .map_err(|e| AuthError::InvalidRedirect(e.to_string()))
    }
}

/// Tokens carried on an OAuth redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTokens {
    /// Single-account token (`token` in query or fragment).
    pub token: Option<String>,
    /// Real-account token (`token1`).
    pub real_token: Option<String>,
    /// Demo-account token (`token2`).
    pub demo_token: Option<String>,
}

impl RedirectTokens {
    /// Whether the redirect carried any token at all.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.real_token.is_none() && self.demo_token.is_none()
    }
}

/// Extract tokens from an OAuth redirect URL.
///
/// The broker puts them in the query string; some flows land them in the
/// fragment instead, so both are checked (query wins).
pub fn extract_tokens(redirect_url: &str) -> Result<RedirectTokens, AuthError> {
    let url =
        Url::parse(redirect_url).map_err(|e| AuthError::InvalidRedirect(e.to_string()))?;

    let mut tokens = collect(url.query_pairs());

    if let Some(fragment) = url.fragment() {
        let fragment_tokens = collect(url::form_urlencoded::parse(fragment.as_bytes()));
        tokens.token = tokens.token.or(fragment_tokens.token);
        tokens.real_token = tokens.real_token.or(fragment_tokens.real_token);
        tokens.demo_token = tokens.demo_token.or(fragment_tokens.demo_token);
    }

    Ok(tokens)
}

fn collect<'a>(pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>) -> RedirectTokens {
    let mut tokens = RedirectTokens::default();
    for (key, value) in pairs {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "token" => tokens.token = Some(value.into_owned()),
            "token1" => tokens.real_token = Some(value.into_owned()),
            "token2" => tokens.demo_token = Some(value.into_owned()),
            _ => {}
        }
    }
    tokens
}
