// src/main.rs
use clinic_access::api::{app_router, AppState};
use clinic_access::config::Config;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinic_access=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Clinic Access server...");

    let app_config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", app_config);

    let server_addr = app_config.server_addr();
    let app_state = AppState::from_config(app_config)?;
    tracing::info!(
        navigation_groups = app_state.navigation.group_count(),
        "Navigation loaded"
    );

    let app_router = app_router(app_state);

    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
