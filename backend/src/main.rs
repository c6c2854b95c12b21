//! Backend entry-point: loads settings, wires the port bundle and serves the
//! REST API.

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use kudotrio::inbound::http::health::HealthState;
use kudotrio::inbound::http::session_config::{BuildMode, session_settings};
use kudotrio::server::{ServerConfig, create_server, http_state_from_settings};
use kudotrio::settings::Settings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(e.to_string()))?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(io::Error::other)?;
    let http_state = http_state_from_settings(&settings)
        .await
        .map_err(io::Error::other)?;

    let config = ServerConfig::new(session, settings.bind_addr())
        .with_payload_limit(settings.import_max_bytes());
    info!(addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, http_state, config)?.await
}
