use env_logger::Env;
use padkit_viewer::{app, AppState, ViewerConfig, ViewerError};

#[tokio::main]
async fn main() -> Result<(), ViewerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config)?;
    log::info!(
        "PDK '{}' with {} cells, exporting to {}",
        state.pdk.name,
        state.pdk.cell_names().len(),
        state.config.gds_dir.display()
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("Listening on {bind_addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
