//! Swap Scheduler Bot - Main Entry Point
//!
//! Runs the trade scheduler against live RPC endpoints until Ctrl+C

use swap_scheduler_bot::*;
use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{error, info, warn};
use swap_scheduler_bot::{
    config::StartupTrade,
    execution::{LocalKeySigner, TradeSigner},
    network::{AlloyGateway, ChainGateway},
};

const STATS_INTERVAL_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;

    // Load configuration
    let config = CONFIG.clone();
    utils::setup_output_directories(config.trade_log_dir.as_deref())?;

    info!("🔁 Swap Scheduler Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("📋 Configuration:");
    info!("   Default Network: {}", config.default_network);
    for network in config.networks.iter() {
        info!("   {} (chain {}): {}", network.display_name, network.chain_id, network.rpc_url);
    }
    info!("   Poll Interval: {:?}", config.poll_interval);
    info!("   Default Slippage: {}%", config.default_slippage_pct);
    info!("   Tx Deadline: {}s", config.tx_deadline_secs);
    info!("   RPC Timeout: {:?}", config.rpc_timeout);
    info!("   Fallback Signer: {}", if config.private_key.is_some() { "configured" } else { "none" });
    match &config.trade_log_dir {
        Some(dir) => info!("   Trade Log: {}", dir.display()),
        None => info!("   Trade Log: disabled"),
    }

    // Setup network gateway
    let gateway: Arc<dyn ChainGateway> = Arc::new(AlloyGateway::new(&config.networks, config.rpc_timeout)?);

    let default_network = config.networks.default_network();
    info!("🔗 Testing connection to {}...", default_network.display_name);
    if gateway.is_connected(default_network).await {
        info!("✅ Connected to {}", default_network.display_name);
    } else {
        warn!("⚠️  {} RPC is not reachable, trades will fail until it recovers", default_network.display_name);
    }

    let signer: Option<Credential> = match &config.private_key {
        Some(key) => Some(Arc::new(LocalKeySigner::from_private_key(key)?) as Credential),
        None => None,
    };
    if let Some(signer) = &signer {
        info!("🔑 Signing as {}", signer.address());
    }

    let engine = match &signer {
        Some(signer) => SwapEngine::with_default_signer(&config, gateway, signer.clone())?,
        None => SwapEngine::new(&config, gateway)?,
    };

    let scheduler = engine.start_scheduler();

    if let Some(startup) = &config.startup_trade {
        submit_startup_trade(&engine, startup, signer.clone()).await;
    }

    // Setup shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("\n📛 Received shutdown signal (Ctrl+C)..."),
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
        let _ = shutdown_tx.send(());
    });

    info!("\n🚀 Scheduler running, press Ctrl+C to stop\n");

    let start_time = Instant::now();
    let mut interval = time::interval(Duration::from_secs(STATS_INTERVAL_SECS));
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                utils::print_session_stats(start_time, &engine.stats().await);
            }
            _ = &mut shutdown_rx => {
                info!("Shutdown signal received, exiting main loop...");
                break;
            }
        }
    }

    scheduler.stop().await;

    // Print final statistics
    utils::print_session_stats(start_time, &engine.stats().await);
    for trade in engine.list_completed().await {
        utils::print_trade_outcome(&trade);
    }

    Ok(())
}

async fn submit_startup_trade(engine: &SwapEngine, startup: &StartupTrade, signer: Option<Credential>) {
    let request = TradeRequest {
        token_address: startup.token_address.clone(),
        native_amount: startup.amount_eth,
        network: startup.network.clone(),
        slippage_pct: Some(startup.slippage_pct),
        credential: signer,
    };

    match startup.scheduled_at {
        Some(scheduled_at) => {
            let request = ScheduleRequest {
                trade: request,
                scheduled_at,
                retain_credential: false,
            };
            match engine.schedule(request).await {
                Ok(id) => info!(trade_id = id, "Startup trade scheduled for {}", scheduled_at),
                Err(e) => error!("Startup trade rejected: {}", e),
            }
        }
        None => {
            match engine.quote(&request.token_address, request.native_amount, &request.network, request.slippage_pct).await {
                Ok(quote) => utils::print_quote(&request.token_address, &quote),
                Err(e) => warn!("Quote failed: {}", e),
            }
            match engine.execute_now(request).await {
                Ok(trade) => utils::print_trade_outcome(&trade),
                Err(e) => error!("Startup trade rejected: {}", e),
            }
        }
    }
}
