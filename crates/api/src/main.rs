use flashsale_infra::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashsale_observability::init();

    let config = Config::from_env()?;
    let app = flashsale_api::app::build_app_from_config(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, storage = ?config.storage, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
