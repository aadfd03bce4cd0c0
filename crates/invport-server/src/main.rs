use anyhow::Result;
use chrono::Utc;
use invport_common::types::Role;
use invport_server::config::ServerConfig;
use invport_server::state::AppState;
use invport_server::{app, seed};
use invport_storage::auth::hash_password;
use invport_storage::InventoryStore;
use rand::Rng;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  invport-server [config.toml]                 Start the server");
    eprintln!("  invport-server seed <config.toml> <seed.json>  Import users and items from a seed file");
}

#[tokio::main]
async fn main() -> Result<()> {
    invport_common::id::init(1, 1);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("invport=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("seed") => {
            let config_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("seed requires <config.toml> and <seed.json> arguments")
            })?;
            let seed_path = args.get(3).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("seed requires <seed.json> argument")
            })?;
            run_seed_command(config_path, seed_path).await
        }
        Some(config_path) => {
            let config = ServerConfig::load(config_path)?;
            run_server(config).await
        }
        None => run_server(ServerConfig::default()).await,
    }
}

async fn connect_store(config: &ServerConfig) -> Result<InventoryStore> {
    std::fs::create_dir_all(&config.data_dir)?;
    InventoryStore::connect(&config.database_url).await
}

async fn run_seed_command(config_path: &str, seed_path: &str) -> Result<()> {
    let config = ServerConfig::load(config_path)?;
    let store = connect_store(&config).await?;
    seed::run_seed(&store, seed_path).await
}

fn resolve_jwt_secret(config: &ServerConfig) -> String {
    match &config.auth.jwt_secret {
        Some(secret) if !secret.is_empty() => secret.clone(),
        _ => {
            let bytes: [u8; 32] = rand::thread_rng().gen();
            tracing::warn!(
                "No jwt_secret configured; generated an ephemeral one - tokens will not survive a restart"
            );
            bytes.iter().map(|b| format!("{b:02x}")).collect()
        }
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    let store = Arc::new(connect_store(&config).await?);

    // Bootstrap admin so a fresh deployment can log in.
    let password_hash = hash_password(&config.auth.admin_password)?;
    store
        .ensure_user(
            &config.auth.admin_username,
            &config.auth.admin_email,
            &password_hash,
            Role::Admin,
        )
        .await?;

    let jwt_secret = resolve_jwt_secret(&config);
    let http_port = config.http_port;
    let state = AppState {
        store,
        start_time: Utc::now(),
        jwt_secret: Arc::new(jwt_secret),
        token_expire_secs: config.auth.token_expire_secs,
        config: Arc::new(config),
    };

    let app = app::build_http_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!(%addr, "invport HTTP server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
