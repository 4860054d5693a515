use player_registry::config::Config;
use player_registry::db::{self, PgPlayerRepository};
use player_registry::routes;
use player_registry::state::AppState;
use player_registry::utils::token::TokenService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load .env file immediately
    // Silently ignores a missing .env; real deployments set the env directly.
    dotenvy::dotenv().ok();

    // 1. Initialize Sentry (if configured)
    // The guard has to stay alive for the whole process or events are dropped.
    let _guard = sentry::init((std::env::var("SENTRY_DSN").ok(), sentry::ClientOptions {
        release: sentry::release_name!(),
        traces_sample_rate: 1.0,
        ..Default::default()
    }));

    // 2. Install rustls crypto provider
    // Must happen before the database pool opens any TLS connection.
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("Failed to install rustls crypto provider");
    }

    // 3. Initialize logging
    // Respects RUST_LOG; defaults to debug for this crate and tower_http.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "player_registry=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    tracing::info!("Starting Player Registry...");

    let config = Config::from_env()?;

    // 4. Connect to database
    // Creates the players table on first run.
    let pool = db::connect(&config).await?;
    tracing::info!("Connected to PostgreSQL successfully!");

    // 5. Build the app state
    // Handlers only see the repository trait, never the pool.
    let state = AppState::new(
        Arc::new(PgPlayerRepository::new(pool)),
        TokenService::new(&config.jwt_secret),
    );
    let app = routes::create_routes(state);

    // 6. Start the server
    // 0.0.0.0 so it binds to all interfaces (necessary in Docker).
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
