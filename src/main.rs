use std::sync::Arc;

use reward_hub::{
    admin::AdminGate,
    api::{self, AppState},
    config,
    data::DataAccess,
    payouts::FixturePayoutFeed,
    store::MockStore,
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("Reward Hub starting...");

    let cfg = config::load()?;
    info!("  Port: {}", cfg.port);
    info!("  Admin id: {}", cfg.admin_id);
    info!(
        "  Withdrawals: min ${}, max {:?}, daily limit {:?}, delay {:?}",
        cfg.withdrawal.min, cfg.withdrawal.max, cfg.withdrawal.daily_limit, cfg.withdrawal.delay
    );

    // volatile: a restart brings back the fixtures
    let state = AppState {
        data: DataAccess::new(MockStore::seeded(), cfg.withdrawal.clone()),
        gate: AdminGate::with_admin_id(cfg.admin_id),
        payouts: Arc::new(FixturePayoutFeed::default()),
    };

    let api_handle = tokio::spawn({
        let cfg = cfg.clone();
        async move { api::serve(cfg, state).await }
    });

    tokio::select! {
        res = api_handle => match res {
            Ok(Ok(_)) => info!("API exited cleanly"),
            Ok(Err(e)) => error!("API error: {:?}", e),
            Err(e) => error!("API task panicked: {:?}", e),
        },
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    info!("Reward Hub stopped.");
    Ok(())
}
