use tracing_subscriber::EnvFilter;

use docapp::api::router::build_router;
use docapp::api::types::ApiContext;
use docapp::{config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let db_path = config::db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(
        version = config::APP_VERSION,
        db = %db_path.display(),
        "{} starting",
        config::APP_NAME
    );

    let app = build_router(ApiContext::new(conn));

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
