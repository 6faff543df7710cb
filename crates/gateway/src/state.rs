use std::sync::Arc;

use {secrecy::Secret, textline_relay::Relay};

/// Shared handler state: the relay core plus what the HTTP boundary itself
/// needs. Constructed once at startup; no global lookups.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub signing_secret: Secret<String>,
}
