use std::sync::Arc;

use axum::routing::get;
use tower_http::cors::CorsLayer;
use tracing::info;

use medchat_backend::config::Config;
use medchat_backend::routes;
use medchat_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = Config::from_env();

    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: MEDCHAT_LOG='{}' is not a valid tracing filter ({}); falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };
    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true);
    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let state = Arc::new(AppState::from_config(&cfg)?);
    info!(responder = ?cfg.responder, "chat store ready");

    let app = routes::create_router()
        .route("/", get(|| async { "YOU ARE CONNECTED " }))
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_address).await?;
    info!(address = %cfg.bind_address, "medchat backend listening");
    axum::serve(listener, app).await?;
    Ok(())
}
