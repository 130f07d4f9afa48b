pub mod api;
pub mod config;
pub mod logic;
pub mod model;

// Export API types
pub use api::handlers;
pub use api::routes;
pub use api::{DevServer, SharedState};

pub use logic::{
    adjust_href, file_icon_html, AssetLayout, EnvSource, LinkError, LinkResolver, ProcessEnv,
    RouteTableBuilder,
};

// Export all model types
pub use model::*;

/// Build the server state from the application config and the process environment.
pub fn build_dev_server(app_config: &config::AppConfig) -> anyhow::Result<DevServer> {
    let layout = app_config.asset_layout();
    let version = logic::collect_version_info(&layout.root, &layout.libs_dir);

    let dev_config = RouteTableBuilder::new(&ProcessEnv, layout)
        .port(app_config.server.port)
        .insecure_transport(app_config.upstream.insecure)
        .build()?;

    DevServer::new(dev_config, version, &app_config.public_origin())
}

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = crate::config::AppConfig::load()?;
    let state = build_dev_server(&config)?.shared();

    let app = crate::api::routes::create_router(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
