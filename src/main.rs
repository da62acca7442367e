use alidns_webhook::{Config, SharedConfig, Solver};
use anyhow::Result;
use std::net::TcpListener;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = config_init(std::env::args().nth(1))?;

    let mut solver = Solver::new();
    solver.initialize(&config)?;
    let solver = Arc::new(solver);

    tracing::info!(
        group = %config.group_name,
        solver = solver.name(),
        "API listening on {}",
        &config.api_bind_addr
    );
    let listener = TcpListener::bind(config.api_bind_addr)?;
    let api_server = alidns_webhook::new_http(listener, config.clone(), solver)?;
    let api_handle = tokio::spawn(api_server);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        Ok(api_res) = api_handle => {
            if let Err(err) = api_res {
                return Err(err.into())
            }
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alidns_webhook=info".into()),
        )
        .init();
}

fn config_init(config_file: Option<String>) -> Result<SharedConfig> {
    let config = match config_file {
        None => {
            tracing::debug!("loaded config from environment");
            Config::from_env()?
        }
        Some(config_file) => {
            tracing::debug!("loaded config from {config_file}");
            Config::try_from_file(&config_file)?
        }
    };
    Ok(Arc::new(config))
}
