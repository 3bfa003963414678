//! # anonboard Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod telemetry;

use std::sync::Arc;

use ab_api::middleware::{cors_policy, security_headers, standard_middleware};
use ab_api::{configure_routes, AppState};
use ab_config::Settings;
use ab_core::traits::ThreadRepo;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use secrecy::ExposeSecret;

// Feature-gated imports: the storage backend is chosen at compile time
#[cfg(feature = "db-sqlite")]
use ab_db_sqlite::SqliteThreadRepo;

#[cfg(not(feature = "db-sqlite"))]
compile_error!("anonboard needs a storage backend; enable the `db-sqlite` feature");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    telemetry::init_tracing(settings.log.format)?;
    if let Some(path) = &settings.env_file {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    // 1. Initialize Database Implementation. No store, no server.
    #[cfg(feature = "db-sqlite")]
    let repo: Arc<dyn ThreadRepo> = Arc::new(
        SqliteThreadRepo::connect(
            settings.database.url.expose_secret(),
            settings.database.max_connections,
        )
        .await
        .context("failed to initialise the database")?,
    );

    // 2. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState::new(repo, settings.views_dir.clone()));

    let addr = (settings.server.host.clone(), settings.server.port);
    tracing::info!(host = %addr.0, port = addr.1, "anonboard starting");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .wrap(security_headers())
            .configure(configure_routes)
    });
    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(addr)
        .context("failed to bind listener")?
        .run()
        .await?;
    Ok(())
}
