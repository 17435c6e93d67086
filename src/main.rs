mod config;
mod qna;
mod routes;
mod skill;
mod state;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("qna_skill_backend=debug,tower_http=debug")),
        )
        .init();

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
        exe_dir.join("conf.json").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut loaded = None;
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                loaded = Some((cfg, path.clone()));
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {:#}", path, e);
            }
        }
    }

    let (config, loaded_path) = loaded.ok_or_else(|| {
        anyhow::anyhow!("Could not load a config file. Tried: {:?}", config_paths)
    })?;
    info!("Loaded configuration from: {}", loaded_path);
    info!("QnA settings: {:?}", config.qna_config);

    let addr: SocketAddr = format!("{}:{}", config.system_config.host, config.system_config.port)
        .parse()?;

    let app_state = AppState::new(&config)?;

    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
