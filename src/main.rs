//! Waterflow Monitor - Main entry point
//!
//! A monitoring service for water-flow endpoints: pulls readings from the
//! configured feed on a periodic tick, keeps a rolling realtime window,
//! persists usage history, and logs dashboard snapshots.

mod core;
mod dashboard;
mod feed;
mod groups;
mod i18n;
mod series;
mod store;
mod tariff;

use crate::core::{Config, FlowReading};
use crate::feed::FlowFeed;
use crate::groups::GroupRegistry;
use crate::i18n::I18n;
use crate::series::SeriesAggregator;
use crate::store::Store;
use crate::tariff::TariffEngine;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Service state shared between the tick loop and any future read surface
pub struct ServiceState {
    pub config: Arc<Mutex<Config>>,
    pub store: Arc<Mutex<Store>>,
    pub feed: Arc<Mutex<FlowFeed>>,
    pub engine: Arc<Mutex<TariffEngine>>,
    pub aggregator: Arc<Mutex<SeriesAggregator>>,
    pub groups: Arc<Mutex<GroupRegistry>>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    let i18n = I18n::new(&config.general.language);
    log::info!("{}", i18n.get("app.title"));

    // Initialize store
    let store = Store::new().unwrap_or_else(|e| {
        log::error!("Failed to initialize store: {}", e);
        std::process::exit(1);
    });

    match store.cleanup_old_readings(config.general.history_keep_days) {
        Ok(0) => {}
        Ok(n) => log::info!("Pruned {} expired readings from the store", n),
        Err(e) => log::warn!("Could not prune reading history: {}", e),
    }

    // Initialize the flow feed
    let feed = FlowFeed::from_config(&config, &store).unwrap_or_else(|e| {
        log::warn!("Failed to initialize {} feed: {}", config.feed.mode, e);
        log::warn!("Falling back to synthetic data");
        FlowFeed::synthetic_fallback(&config)
    });

    // Initialize the tariff engine from the seeded schedule table
    let engine = TariffEngine::new(&config.tariff)
        .map_err(|e| anyhow::anyhow!("Invalid tariff configuration: {}", e))?;

    // Realtime aggregation window
    let aggregator = SeriesAggregator::new(config.general.retention_window_secs);

    // Group definitions
    let mut registry = GroupRegistry::new(config.endpoints.ids.clone());
    if let Err(e) = registry.load(&store) {
        log::warn!("Could not load group definitions: {}", e);
    }

    let state = ServiceState {
        config: Arc::new(Mutex::new(config)),
        store: Arc::new(Mutex::new(store)),
        feed: Arc::new(Mutex::new(feed)),
        engine: Arc::new(Mutex::new(engine)),
        aggregator: Arc::new(Mutex::new(aggregator)),
        groups: Arc::new(Mutex::new(registry)),
    };

    monitoring_loop(state).await;
    Ok(())
}

/// Periodic tick loop: pull readings, update the window, persist on a
/// cadence, and log dashboard snapshots.
async fn monitoring_loop(state: ServiceState) {
    log::info!("Starting monitoring loop");

    let (mut current_refresh_secs, persist_every, stats_every) = {
        let config = state.config.lock().await;
        (
            config.general.clamped_refresh_secs(),
            config.general.persist_every_ticks.max(1),
            config.general.stats_update_every_ticks.max(1),
        )
    };
    let mut interval =
        tokio::time::interval(tokio::time::Duration::from_secs(current_refresh_secs));

    log::info!(
        "Monitoring loop initialized with {}s refresh interval",
        current_refresh_secs
    );

    let mut tick: u32 = 0;
    let mut pending: Vec<FlowReading> = Vec::new();

    loop {
        interval.tick().await;
        tick = tick.wrapping_add(1);

        // Pick up refresh-rate changes from config
        let refresh_secs = {
            let config = state.config.lock().await;
            config.general.clamped_refresh_secs()
        };
        if refresh_secs != current_refresh_secs {
            current_refresh_secs = refresh_secs;
            interval =
                tokio::time::interval(tokio::time::Duration::from_secs(current_refresh_secs));
            log::info!("Refresh interval changed to {}s", current_refresh_secs);
        }

        // Pull one batch of readings
        let batch = {
            let mut feed = state.feed.lock().await;
            match feed.pull() {
                Ok(batch) => batch,
                Err(e) => {
                    log::warn!("Feed pull failed: {}", e);
                    continue;
                }
            }
        };

        if batch.is_empty() {
            // a drained replay source has nothing more to deliver
            let feed = state.feed.lock().await;
            if !feed.is_synthetic() {
                log::info!("Feed {} exhausted, stopping", feed.source_name());
                break;
            }
            continue;
        }

        // Record into the realtime window
        {
            let mut aggregator = state.aggregator.lock().await;
            for reading in &batch {
                if let Err(e) =
                    aggregator.record_sample(&reading.endpoint_id, reading.timestamp, reading.flow_rate)
                {
                    log::warn!("Dropped sample: {}", e);
                }
            }
        }
        pending.extend(batch);

        // Persist the accumulated batch on the configured cadence
        if tick % persist_every == 0 {
            let mut store = state.store.lock().await;
            match store.insert_readings(&pending) {
                Ok(()) => pending.clear(),
                Err(e) => log::warn!("Failed to persist {} readings: {}", pending.len(), e),
            }
        }

        // Refresh today's statistics and log a snapshot
        if tick % stats_every == 0 {
            let config = state.config.lock().await;
            let store = state.store.lock().await;
            let engine = state.engine.lock().await;
            let aggregator = state.aggregator.lock().await;
            let feed = state.feed.lock().await;

            let secs_per_reading =
                (config.general.clamped_refresh_secs() * persist_every as u64) as f64;
            if let Err(e) = store.update_today_stats(
                secs_per_reading,
                &config.tariff.region,
                &config.tariff.usage_class,
                &engine,
            ) {
                log::warn!("Failed to update daily stats: {}", e);
            }

            match dashboard::build_snapshot(
                &store,
                &aggregator,
                &engine,
                &config,
                feed.source_name(),
                feed.is_synthetic(),
            ) {
                Ok(snapshot) => log::info!(
                    "Daily usage {:.2} m3, estimated bill {:.0} ({} {}), current flow {:.1}",
                    snapshot.daily_usage,
                    snapshot.estimated_bill.total,
                    snapshot.region,
                    snapshot.usage_class,
                    snapshot.current_total_flow
                ),
                Err(e) => log::warn!("Could not build dashboard snapshot: {}", e),
            }
        }
    }

    // Flush whatever the last partial cadence left behind
    if !pending.is_empty() {
        let mut store = state.store.lock().await;
        if let Err(e) = store.insert_readings(&pending) {
            log::warn!("Failed to flush {} readings: {}", pending.len(), e);
        }
    }
}
