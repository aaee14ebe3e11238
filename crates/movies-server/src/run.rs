use crate::config::ServerConfig;
use crate::Result;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use futures::FutureExt;
use movies_app::origin::{cors_layer, origin_guard};
use movies_app::rest_api::{health, movie};
use movies_app::state::{AppConfig, AppState};
use movies_dal::{seed, MovieStore};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let app = main_router(state);

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    debug!("Server stopped");
    Ok(())
}

/// Full application router; the origin guard is the outermost layer so no
/// route is reachable from a foreign origin.
pub fn main_router(state: AppState) -> Router<()> {
    let cors = cors_layer(&state.config().allowed_origins);
    Router::new()
        .nest("/movies", movie::router())
        .route("/health", get(health))
        .layer(cors)
        .layer(from_fn_with_state(state.clone(), origin_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let app_config: AppConfig = config.into();

    let records = match (&config.seed_file, config.no_seed) {
        (_, true) => Vec::new(),
        (Some(path), false) => seed::load_dataset(path).await?,
        (None, false) => seed::default_dataset()?,
    };
    info!("Catalogue seeded with {} movies", records.len());

    Ok(AppState::new(app_config, MovieStore::new(records)))
}
