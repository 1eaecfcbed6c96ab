//! Service entry-point: loads settings, wires the service graph and serves HTTP.

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use marketplace::server::{ServerConfig, create_server};
use marketplace::settings::{BuildMode, MarketplaceSettings};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = MarketplaceSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load configuration")?;
    let mode = BuildMode::from_debug_assertions();
    let config = ServerConfig::new(
        settings.signing_key(mode)?,
        settings.token_ttl()?,
        settings.password_hash_cost()?,
        settings.bind_addr()?,
    );
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config)?;
    info!(%bind_addr, "marketplace listening");
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
