//! Session-token persistence.
//!
//! Tokens live in the dashboard's local storage under fixed keys; the
//! storage backend itself is behind [`KeyValueStore`]. Token values are
//! never logged.

use common::KeyValueStore;

use crate::oauth::RedirectTokens;

/// Key of the validated session token.
pub const SESSION_TOKEN_KEY: &str = "deriv_token";
/// Key of the real-account token from a multi-account redirect.
pub const REAL_TOKEN_KEY: &str = "real_token";
/// Key of the demo-account token from a multi-account redirect.
pub const DEMO_TOKEN_KEY: &str = "demo_token";

/// Persist the per-account tokens carried on a redirect.
pub fn stash_redirect_tokens(store: &mut dyn KeyValueStore, tokens: &RedirectTokens) {
    if let Some(real) = &tokens.real_token {
        store.set(REAL_TOKEN_KEY, real);
    }
    if let Some(demo) = &tokens.demo_token {
        store.set(DEMO_TOKEN_KEY, demo);
    }
}

/// Candidate session tokens in validation priority order: explicit
/// redirect token, then real, then demo, then whatever a previous
/// session stored.
pub fn candidate_tokens(tokens: &RedirectTokens, store: &dyn KeyValueStore) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for token in [
        tokens.token.clone(),
        tokens.real_token.clone(),
        tokens.demo_token.clone(),
        store.get(SESSION_TOKEN_KEY),
    ]
    .into_iter()
    .flatten()
    {
        if !candidates.contains(&token) {
            candidates.push(token);
        }
    }

    candidates
}

/// Persist a validated session token.
pub fn persist_session(store: &mut dyn KeyValueStore, token: &str) {
    store.set(SESSION_TOKEN_KEY, token);
}

/// Drop the stored session token (logout).
pub fn clear_session(store: &mut dyn KeyValueStore) {
    store.remove(SESSION_TOKEN_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MemoryStore;

    #[test]
    fn test_session_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get(SESSION_TOKEN_KEY).is_none());

        persist_session(&mut store, "a1-xyz");
        assert_eq!(store.get(SESSION_TOKEN_KEY).as_deref(), Some("a1-xyz"));

        clear_session(&mut store);
        assert!(store.get(SESSION_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_stash_redirect_tokens_uses_fixed_keys() {
        let mut store = MemoryStore::new();
        let tokens = RedirectTokens {
            token: None,
            real_token: Some("a1-real".into()),
            demo_token: Some("a1-demo".into()),
        };

        stash_redirect_tokens(&mut store, &tokens);

        assert_eq!(store.get(REAL_TOKEN_KEY).as_deref(), Some("a1-real"));
        assert_eq!(store.get(DEMO_TOKEN_KEY).as_deref(), Some("a1-demo"));
        assert!(store.get(SESSION_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_candidate_priority() {
        let mut store = MemoryStore::new();
        persist_session(&mut store, "a1-stored");

        let tokens = RedirectTokens {
            token: Some("a1-explicit".into()),
            real_token: Some("a1-real".into()),
            demo_token: Some("a1-demo".into()),
        };

        let candidates = candidate_tokens(&tokens, &store);
        assert_eq!(
            candidates,
            vec!["a1-explicit", "a1-real", "a1-demo", "a1-stored"]
        );
    }

    #[test]
    fn test_candidates_deduplicate() {
        let mut store = MemoryStore::new();
        persist_session(&mut store, "a1-same");

        let tokens = RedirectTokens {
            token: Some("a1-same".into()),
            real_token: None,
            demo_token: None,
        };

        assert_eq!(candidate_tokens(&tokens, &store), vec!["a1-same"]);
    }

    #[test]
    fn test_candidates_fall_back_to_stored() {
        let mut store = MemoryStore::new();
        persist_session(&mut store, "a1-stored");

        let candidates = candidate_tokens(&RedirectTokens::default(), &store);
        assert_eq!(candidates, vec!["a1-stored"]);
    }
}
