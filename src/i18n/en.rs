//! English translations

use std::collections::HashMap;

pub fn get_translations() -> HashMap<String, String> {
    let mut t = HashMap::new();

    // App general
    t.insert("app.title".into(), "Waterflow Monitoring System".into());
    t.insert("app.last_updated".into(), "Last updated".into());

    // Navigation
    t.insert("nav.home".into(), "Home".into());
    t.insert("nav.realtime".into(), "Realtime".into());
    t.insert("nav.statistics".into(), "Statistics".into());
    t.insert("nav.settings".into(), "Settings".into());

    // Home overview
    t.insert("home.hourly_usage".into(), "Usage over the last hours".into());
    t.insert("home.daily_usage".into(), "Realtime daily usage".into());
    t.insert("home.estimated_bill".into(), "Estimated water bill".into());
    t.insert("home.current_flow".into(), "Current total flow".into());

    // Realtime view
    t.insert("realtime.title".into(), "Realtime Waterflow Data".into());
    t.insert("realtime.group".into(), "Group".into());
    t.insert("realtime.individual".into(), "Individual EP".into());
    t.insert("realtime.no_groups".into(), "No saved groups yet. Create one under zone settings first.".into());
    t.insert("realtime.combined_series".into(), "Combined flow rate".into());

    // Statistics
    t.insert("stats.title".into(), "Statistics".into());
    t.insert("stats.daily".into(), "Daily usage".into());
    t.insert("stats.monthly".into(), "Monthly usage".into());
    t.insert("stats.yearly".into(), "Yearly usage".into());
    t.insert("stats.average_usage".into(), "Average usage".into());
    t.insert("stats.average_bill".into(), "Average bill".into());

    // Settings
    t.insert("settings.zones".into(), "Zone settings".into());
    t.insert("settings.tariffs".into(), "Water tariff settings".into());
    t.insert("settings.simulation".into(), "Bill simulation".into());
    t.insert("settings.region".into(), "Region".into());
    t.insert("settings.usage_class".into(), "Usage class".into());
    t.insert("settings.group_name".into(), "Group name".into());
    t.insert("settings.group_members".into(), "Endpoints in group".into());
    t.insert("settings.group_saved".into(), "Group saved".into());
    t.insert("settings.saved_groups".into(), "Saved groups".into());

    // Billing terms
    t.insert("bill.base_charge".into(), "Supply charge".into());
    t.insert("bill.surcharge".into(), "Sewage charge".into());
    t.insert("bill.levy".into(), "Water-use levy".into());
    t.insert("bill.total".into(), "Total bill".into());

    // Units
    t.insert("unit.flow".into(), "L/h".into());
    t.insert("unit.volume".into(), "m3".into());
    t.insert("unit.currency".into(), "KRW".into());

    t
}
