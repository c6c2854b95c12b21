//! HTTP server configuration object.

use actix_web::cookie::{Key, SameSite};
use std::net::SocketAddr;

use crate::inbound::http::session_config::SessionSettings;

/// Actix's own default body limit.
const DEFAULT_PAYLOAD_LIMIT: usize = 256 * 1024;

/// Everything `create_server` needs besides the port bundle.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) payload_limit: usize,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
        }
    }

    /// Cap raw request bodies (CSV uploads) at `limit` bytes.
    #[must_use]
    pub fn with_payload_limit(mut self, limit: usize) -> Self {
        self.payload_limit = limit;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
