mod app;
mod auth;
mod categories;
mod config;
mod error;
mod export;
mod goals;
mod progress;
mod sessions;
mod state;
mod store;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "study_tracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    sqlx::migrate!("./migrations")
        .run(&app_state.db)
        .await
        .context("run migrations")?;

    categories::services::seed_categories(
        app_state.tracker.as_ref(),
        &app_state.config.seed_categories,
    )
    .await
    .context("seed categories")?;

    app::serve(app::build_app(app_state)).await
}
