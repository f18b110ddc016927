use anyhow::Result;
use blogflow::config::AppConfig;
use blogflow::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blogflow=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var("BLOGFLOW_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::from_yaml_file(&path)?
        }
        Err(_) => AppConfig::default(),
    };

    let addr = config.socket_addr()?.to_string();
    ServerBuilder::new().with_config(config).serve(&addr).await
}
