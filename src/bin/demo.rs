//! Waterflow Monitor - Demo CLI
//!
//! End-to-end demonstration of the core: synthetic feed, realtime
//! aggregation, group merging, and a tiered billing estimate.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

// Import from our library
use waterflow_monitor_lib::core::Config;
use waterflow_monitor_lib::feed::{FlowSource, SyntheticFeed};
use waterflow_monitor_lib::groups::GroupRegistry;
use waterflow_monitor_lib::i18n::I18n;
use waterflow_monitor_lib::series::SeriesAggregator;
use waterflow_monitor_lib::store::Store;
use waterflow_monitor_lib::tariff::TariffEngine;

const TICKS: u32 = 15;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::default();
    let i18n = I18n::new(&config.general.language);

    println!("==============================================");
    println!("   {}", i18n.get("app.title"));
    println!("==============================================\n");

    // 1. Synthetic feed over the default endpoint set
    println!("[1/4] Initializing flow feed...");
    let mut feed = SyntheticFeed::from_config(&config);
    println!("      Source: {} ({} endpoints)\n", feed.name(), config.endpoints.ids.len());

    // 2. Tariff engine
    println!("[2/4] Initializing tariff engine...");
    let engine = TariffEngine::new(&config.tariff)?;
    println!(
        "      Active tariff: {} / {}",
        config.tariff.region, config.tariff.usage_class
    );
    println!("      Regions: {:?}\n", engine.regions());

    // 3. Store (in-memory for the demo run)
    println!("[3/4] Initializing store...");
    let mut store = Store::in_memory()?;
    println!("      Using an in-memory database\n");

    // 4. Run the monitoring demo
    println!("[4/4] Sampling {} ticks...\n", TICKS);
    println!("----------------------------------------------");
    println!("  Tick  |  Total flow  |  Usage   |  Est. bill");
    println!("  (#)   |  (L/h)       |  (m3)    |  ({})", i18n.get("unit.currency"));
    println!("----------------------------------------------");

    let refresh_secs = config.general.clamped_refresh_secs();
    let mut aggregator = SeriesAggregator::new(config.general.retention_window_secs);
    let mut cumulative_usage = 0.0;

    for tick in 0..TICKS {
        let batch = feed.pull()?;

        for reading in &batch {
            aggregator.record_sample(&reading.endpoint_id, reading.timestamp, reading.flow_rate)?;
        }
        store.insert_readings(&batch)?;

        let total_flow = aggregator.get_latest_total(&config.endpoints.ids);
        cumulative_usage += total_flow * refresh_secs as f64 / 3600.0;

        let bill = engine.compute_bill_for(
            &config.tariff.region,
            &config.tariff.usage_class,
            cumulative_usage,
        )?;

        print!(
            "\r  {:>4}  | {:>10.1}  | {:>7.3} | {:>9.0}",
            tick + 1,
            total_flow,
            cumulative_usage,
            bill.total
        );
        io::stdout().flush()?;

        thread::sleep(Duration::from_secs(refresh_secs));
    }

    println!("\n----------------------------------------------\n");

    // Group aggregation over the first three endpoints
    let mut registry = GroupRegistry::new(config.endpoints.ids.clone());
    registry.create("demo-zone", config.endpoints.ids[..3].to_vec())?;
    registry.persist(&store)?;

    let members = registry.get("demo-zone").unwrap();
    let combined = aggregator.get_group_series(members);

    println!("=== {} ===\n", i18n.get("settings.saved_groups"));
    println!("  demo-zone: {}", members.join(", "));
    println!("  Combined series points: {}", combined.len());
    if let Some(point) = combined.last() {
        println!("  Latest combined flow:   {:.1}", point.flow_rate);
    }
    println!();

    // Final billing breakdown
    let bill = engine.compute_bill_for(
        &config.tariff.region,
        &config.tariff.usage_class,
        cumulative_usage,
    )?;

    println!("=== {} ===\n", i18n.get("home.estimated_bill"));
    println!("  Usage:                {:.3} m3", cumulative_usage);
    println!("  {}: {:>12.2}", i18n.get("bill.base_charge"), bill.base_charge);
    println!("  {}: {:>12.2}", i18n.get("bill.surcharge"), bill.surcharge_charge);
    println!("  {}: {:>12.2}", i18n.get("bill.levy"), bill.levy_charge);
    println!("  {}: {:>12.2}", i18n.get("bill.total"), bill.total);
    println!();

    println!("=== Store ===\n");
    println!("  Readings stored: {}", store.readings_count()?);
    println!("\n==============================================\n");

    Ok(())
}
