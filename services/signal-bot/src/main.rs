//! Signal bot - Main Entry Point

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use services_common::{BinanceClient, FileConfigStore, JournalStore, OracleClient};
use signal_bot::orchestrator::OrchestratorDeps;
use signal_bot::server::{self, AppState};
use signal_bot::{BotSettings, Orchestrator, SignalAdvisor};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const RUNTIME_CONFIG_FILE: &str = "bot_config.json";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "signal_bot=info,services_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let matches = Command::new("signal-bot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Periodic market analysis and trade signal recorder")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("signal-bot.toml"),
        )
        .arg(
            Arg::new("autostart")
                .long("autostart")
                .help("Start the analysis scheduler on boot")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("print-config")
                .long("print-config")
                .help("Print the effective configuration and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map_or("signal-bot.toml", String::as_str);
    if !Path::new(config_path).exists() {
        warn!("Config file {} not found, using defaults and environment", config_path);
    }
    let settings = BotSettings::load(config_path)
        .with_context(|| format!("Failed to load configuration from {config_path}"))?;

    if matches.get_flag("print-config") {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    info!("Starting signal bot v{}", env!("CARGO_PKG_VERSION"));
    info!("  Symbol: {} ({})", settings.market.symbol, settings.market.interval);
    info!("  Price feed: {}", settings.endpoints.price_feed);
    info!("  Advisory: {} ({})", settings.endpoints.advisory, settings.advisor.model);
    info!("  Data dir: {}", settings.storage.data_dir.display());
    if settings.advisor.api_key.is_none() {
        warn!("No advisory api key configured, every verdict will be the fallback");
    }

    let feed = Arc::new(BinanceClient::new(settings.feed_client_config())?);
    let oracle = Arc::new(OracleClient::new(settings.oracle_client_config())?);
    let store = Arc::new(JournalStore::open(&settings.storage.data_dir).await?);
    let config = Arc::new(
        FileConfigStore::open(settings.storage.data_dir.join(RUNTIME_CONFIG_FILE)).await?,
    );

    let orchestrator = Arc::new(Orchestrator::new(
        OrchestratorDeps {
            feed,
            advisor: SignalAdvisor::new(oracle, settings.scheduler.request_timeout()),
            store: store.clone(),
            config: config.clone(),
        },
        settings.clone(),
    ));

    if matches.get_flag("autostart") {
        orchestrator.start()?;
    }

    let state = AppState {
        orchestrator: Arc::clone(&orchestrator),
        store,
        config,
    };

    let shutdown_handle = Arc::clone(&orchestrator);
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
        shutdown_handle.stop();
    };

    server::serve(&settings.server_address(), state, shutdown).await?;
    orchestrator.stop();
    info!("Signal bot shut down");
    Ok(())
}
