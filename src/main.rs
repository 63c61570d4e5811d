use seabot::{app, config::AppConfig, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("seabot=debug,axum=info,tower_http=info,sqlx=warn");

    // Schema is migrated here, before the listener binds.
    let app_state = AppState::init(AppConfig::from_env()?).await?;
    let addr = app_state.config.socket_addr()?;

    app::serve(app::build_app(app_state), addr).await
}
