use axum::serve;
use console_devserver::api::routes::create_router;
use console_devserver::build_dev_server;
use console_devserver::config::AppConfig;
use log::info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = AppConfig::load()?;
    info!(
        "Configuration loaded: server={}:{} assets={:?} at {}",
        config.server.host, config.server.port, config.assets.mode, config.assets.root
    );

    let dev_server = build_dev_server(&config)?;
    for rule in dev_server.config.proxy_rules.rules() {
        info!("proxy {} -> {}{}", rule.public_path, rule.origin(), rule.upstream_path);
    }
    if dev_server.config.live_reload {
        info!("live reload is enabled; reload the browser after editing assets");
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("Console running on {}", config.public_origin());

    serve(listener, create_router(dev_server.shared())).await?;

    Ok(())
}
