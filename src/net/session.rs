//! Admin session: the bearer token and the forced-logout signal.
//!
//! DESIGN
//! ======
//! The token lives in a `watch` channel so every clone of `Session` sees the
//! same value and front ends can `subscribe` to learn when a 401 cleared it.
//! `redirect_to` is set to the login path on forced logout; whoever renders
//! screens reacts to it, the client never navigates itself.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

/// Where a forced logout sends the user.
pub const LOGIN_PATH: &str = "/login";

const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub redirect_to: Option<&'static str>,
}

#[derive(Clone, Debug)]
pub struct Session {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Session {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        let (tx, _rx) = watch::channel(SessionState { token, redirect_to: None });
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.tx.borrow().token.clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().token.is_some()
    }

    #[must_use]
    pub fn redirect_to(&self) -> Option<&'static str> {
        self.tx.borrow().redirect_to
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.tx.send_modify(|state| {
            state.token = Some(token);
            state.redirect_to = None;
        });
        info!("admin session token set");
    }

    /// Drop the token and request a redirect to the login screen.
    pub fn logout(&self) {
        self.tx.send_modify(|state| {
            state.token = None;
            state.redirect_to = Some(LOGIN_PATH);
        });
        warn!(redirect = LOGIN_PATH, "admin session cleared");
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Read the `token` entry from a `Cookie` header value.
#[must_use]
pub fn token_from_cookie(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| percent_decode(value.trim()))
        .filter(|value| !value.is_empty())
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .and_then(|h| std::str::from_utf8(h).ok());
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
