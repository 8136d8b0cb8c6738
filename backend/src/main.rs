//! Explore server entry-point: loads settings, connects the decision store
//! and like cache, then serves the HTTP API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use explore::domain::ExploreService;
use explore::inbound::http::health::HealthState;
use explore::inbound::http::state::HttpState;
use explore::outbound::cache::RedisLikeCache;
use explore::outbound::persistence::{DbPool, DieselDecisionRepository, run_pending_migrations};
use explore::settings::ExploreSettings;
use ortho_config::OrthoConfig;
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

    let settings =
        ExploreSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let explore_config = settings.explore_config()?;
    let bind_addr = settings.bind_addr()?;

    if settings.run_migrations {
        let database_url = settings.database_url()?.to_owned();
        tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
            .await
            .wrap_err("migration task failed")??;
    }

    let pool = DbPool::new(settings.pool_config()?)
        .await
        .wrap_err("failed to build decision store pool")?;
    let cache = RedisLikeCache::connect(&settings.redis_pool_config()?)
        .await
        .wrap_err("failed to connect like cache")?;

    let service = Arc::new(ExploreService::new(
        Arc::new(DieselDecisionRepository::new(pool)),
        Arc::new(cache),
        Arc::new(DefaultClock),
        explore_config,
    ));
    let http_state = HttpState::new(service.clone(), service);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), ServerConfig::new(bind_addr, http_state))?;
    info!(%bind_addr, page_size = explore_config.page_size().get(), "explore server listening");

    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
