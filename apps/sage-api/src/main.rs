use axum::middleware::from_fn_with_state;
use axum_helpers::{
    JwtAuth, ShutdownCoordinator, create_production_app, create_router,
    optional_jwt_auth_middleware,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_questions::QuestionEvents;
use tracing::info;

mod api;
mod config;
mod events;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        environment = config.environment.as_str(),
        url = %config.mongodb.redacted_url(),
        "Connecting to MongoDB"
    );
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = config.mongodb.database(), "Connected to MongoDB");

    api::auth::init_indexes(&db).await?;

    let state = AppState {
        jwt_auth: JwtAuth::new(&config.jwt),
        question_events: QuestionEvents::default(),
        config,
        mongo_client,
        db,
    };

    let (coordinator, _shutdown_rx) = ShutdownCoordinator::new();
    let observer = events::spawn_observer(&state.question_events, coordinator.subscribe());

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), api::root_routes(&state)?)?
        .layer(from_fn_with_state(
            state.jwt_auth.clone(),
            optional_jwt_auth_middleware,
        ));

    info!("Starting {} v{}", state.config.app.name, state.config.app.version);

    let mongo_client = state.mongo_client.clone();
    create_production_app(router, &state.config.server, coordinator, async move {
        observer.await.ok();
        info!("Closing MongoDB connections");
        mongo_client.shutdown().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {e}"))?;

    info!("Sage API shutdown complete");
    Ok(())
}
