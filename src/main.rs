// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fiture sync diagnostic
//!
//! Connects to the configured backend, restores the session from the access
//! token and logs one day of tracked data plus the chart histories.
//!
//! Usage: `fiture-sync [YYYY-MM-DD]` (defaults to today)

use anyhow::Context;
use fiture_core::{
    config::Config,
    services::{bootstrap, AuthState, DailySnapshot, StaticAuth, TokenAuth, WaterEntryManager, WeightTargetManager},
    time_utils::{parse_day, today},
    AppContext,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let date = match std::env::args().nth(1) {
        Some(raw) => parse_day(&raw).with_context(|| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))?,
        None => today(),
    };

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(url = %config.supabase_url, date = %date, "Starting Fiture sync");

    let ctx = AppContext::connect(config.clone())?;

    let state = match TokenAuth::from_config(&config) {
        Some(auth) => bootstrap(&ctx, &auth).await,
        None => bootstrap(&ctx, &StaticAuth(None)).await,
    };
    let AuthState::Authenticated { user_id, profile } = state else {
        tracing::warn!("Not signed in; set SUPABASE_ACCESS_TOKEN");
        return Ok(());
    };
    tracing::info!(
        user_id = %user_id,
        name = profile.as_ref().map(|p| p.name.as_str()),
        "Signed in"
    );

    let snapshot = DailySnapshot::load(&ctx, user_id, date).await?;
    tracing::info!(snapshot = %serde_json::to_string(&snapshot)?, "Daily snapshot");

    let water = WaterEntryManager::new(&ctx)
        .fetch_history(user_id, config.history_days)
        .await?;
    let weight = WeightTargetManager::new(&ctx);
    weight.fetch_entries(user_id, config.history_days).await?;
    tracing::info!(
        days = config.history_days,
        water_days_logged = water.iter().filter(|p| p.value > 0.0).count(),
        water_total_ml = water.iter().map(|p| p.value).sum::<f64>(),
        weight_entries = weight.history().len(),
        "History"
    );

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fiture_core=debug,info")))
        .with(format)
        .init();
}
