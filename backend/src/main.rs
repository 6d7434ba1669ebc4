//! Server entry point: load settings, migrate, build the pool and serve.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use postapp::inbound::http::health::HealthState;
use postapp::outbound::persistence::{DbPool, apply_pending_migrations};
use postapp::settings::AppSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| eyre!("failed to load settings: {e}"))?;
    let key = settings.session_key()?;
    let pool_config = settings.pool_config()?;

    let database_url = pool_config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || apply_pending_migrations(&database_url))
        .await
        .wrap_err("migration task panicked")??;
    info!(applied, "database migrations applied");

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = settings.bind_addr();
    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        bind_addr,
        pool,
    );
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}
