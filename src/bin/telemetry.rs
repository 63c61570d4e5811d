use seabot::{
    app,
    config::TelemetryConfig,
    logging,
    telemetry::{self, TelemetryState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("seabot=debug,axum=info,tower_http=info");

    let config = TelemetryConfig::from_env()?;
    let addr = config.socket_addr()?;

    app::serve(telemetry::build_app(TelemetryState::new()), addr).await
}
