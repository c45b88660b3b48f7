//! Backend entry-point: loads settings, prepares storage and runs the server.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mentor_match::inbound::http::health::HealthState;
use mentor_match::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;
use server::{
    AppSettings, BuildMode, ServerConfig, create_server, load_session_key,
    session_toggles_from_env,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let toggles =
        session_toggles_from_env(&DefaultEnv::default(), BuildMode::from_debug_assertions())
            .map_err(std::io::Error::other)?;
    let key = load_session_key(&settings.session_key_file(), toggles.allow_ephemeral)
        .map_err(std::io::Error::other)?;

    let Some(url) = settings.database_url() else {
        return Err(std::io::Error::other("MENTOR_MATCH_DATABASE_URL must be set"));
    };
    run_pending_migrations(url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(key, toggles.cookie_secure, settings.bind_addr(), pool);
    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}
