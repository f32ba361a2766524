//! Dashboard snapshot assembly
//!
//! Pulls the home-overview figures together from the live components:
//! today's hourly usage out of the store, the billing estimate for that
//! usage, and the instantaneous combined flow from the aggregator. All
//! state comes in by reference; nothing global.

use crate::core::{Config, DashboardSnapshot, Result};
use crate::series::SeriesAggregator;
use crate::store::Store;
use crate::tariff::TariffEngine;

/// Build the overview payload for "now"
pub fn build_snapshot(
    store: &Store,
    aggregator: &SeriesAggregator,
    engine: &TariffEngine,
    config: &Config,
    feed_source: &str,
    is_synthetic: bool,
) -> Result<DashboardSnapshot> {
    let now = chrono::Utc::now();
    let today = now.format("%Y-%m-%d").to_string();

    let secs_per_reading =
        (config.general.clamped_refresh_secs() * config.general.persist_every_ticks as u64) as f64;

    let hourly_usage = store.get_hourly_usage(&today, secs_per_reading)?;
    let daily_usage: f64 = hourly_usage.iter().sum();

    let region = &config.tariff.region;
    let usage_class = &config.tariff.usage_class;
    let estimated_bill = engine.compute_bill_for(region, usage_class, daily_usage)?;

    let current_total_flow = aggregator.get_latest_total(&config.endpoints.ids);

    Ok(DashboardSnapshot {
        generated_at: now.timestamp(),
        hourly_usage: hourly_usage.to_vec(),
        daily_usage,
        estimated_bill,
        current_total_flow,
        region: region.clone(),
        usage_class: usage_class.clone(),
        feed_source: feed_source.to_string(),
        is_synthetic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FlowReading, TariffConfig};

    #[test]
    fn snapshot_combines_store_and_aggregator_figures() {
        let mut config = Config::default();
        config.general.refresh_rate_secs = 2;
        config.general.persist_every_ticks = 10;

        let mut store = Store::in_memory().unwrap();
        let now = chrono::Utc::now().timestamp();
        store
            .insert_readings(&[
                FlowReading::at("EP_1", now, 90.0),
                FlowReading::at("EP_2", now, 90.0),
            ])
            .unwrap();

        let mut aggregator = SeriesAggregator::new(600);
        aggregator.record_sample("EP_1", now, 30.0).unwrap();
        aggregator.record_sample("EP_2", now, 25.0).unwrap();

        let engine = TariffEngine::new(&TariffConfig::default()).unwrap();

        let snapshot =
            build_snapshot(&store, &aggregator, &engine, &config, "synthetic", true).unwrap();

        // two readings of 90 at 20s coverage each -> 180 * 20 / 3600 = 1.0
        assert!((snapshot.daily_usage - 1.0).abs() < 1e-9);
        assert_eq!(
            snapshot.daily_usage,
            snapshot.hourly_usage.iter().sum::<f64>()
        );

        let expected = engine
            .compute_bill_for("seoul", "household", snapshot.daily_usage)
            .unwrap();
        assert_eq!(snapshot.estimated_bill.total, expected.total);

        assert_eq!(snapshot.current_total_flow, 55.0);
        assert_eq!(snapshot.region, "seoul");
        assert!(snapshot.is_synthetic);
    }
}
