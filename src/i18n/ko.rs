//! Korean translations

use std::collections::HashMap;

pub fn get_translations() -> HashMap<String, String> {
    let mut t = HashMap::new();

    // App general
    t.insert("app.title".into(), "Waterflow \u{B370}\u{C774}\u{D130} \u{BAA8}\u{B2C8}\u{D130}\u{B9C1} \u{C2DC}\u{C2A4}\u{D15C}".into());
    t.insert("app.last_updated".into(), "\u{B9C8}\u{C9C0}\u{B9C9} \u{C5C5}\u{B370}\u{C774}\u{D2B8}".into());

    // Navigation
    t.insert("nav.home".into(), "\u{D648}".into());
    t.insert("nav.realtime".into(), "\u{C2E4}\u{C2DC}\u{AC04}".into());
    t.insert("nav.statistics".into(), "\u{D1B5}\u{ACC4}".into());
    t.insert("nav.settings".into(), "\u{C124}\u{C815}".into());

    // Home overview
    t.insert("home.hourly_usage".into(), "\u{CD5C}\u{ADFC} \u{C2DC}\u{AC04}\u{B300}\u{BCC4} \u{C0AC}\u{C6A9}\u{B7C9}".into());
    t.insert("home.daily_usage".into(), "\u{C77C} \u{C2E4}\u{C2DC}\u{AC04} \u{C0AC}\u{C6A9}\u{B7C9}".into());
    t.insert("home.estimated_bill".into(), "\u{C608}\u{C0C1} \u{C218}\u{B3C4}\u{C694}\u{AE08}".into());
    t.insert("home.current_flow".into(), "\u{D604}\u{C7AC} \u{CD1D} \u{C720}\u{B7C9}".into());

    // Realtime view
    t.insert("realtime.title".into(), "\u{C2E4}\u{C2DC}\u{AC04} Waterflow \u{B370}\u{C774}\u{D130}".into());
    t.insert("realtime.group".into(), "\u{ADF8}\u{B8F9}".into());
    t.insert("realtime.individual".into(), "\u{AC1C}\u{BCC4} EP".into());
    t.insert("realtime.no_groups".into(), "\u{C800}\u{C7A5}\u{B41C} \u{ADF8}\u{B8F9}\u{C774} \u{C5C6}\u{C2B5}\u{B2C8}\u{B2E4}. \u{BA3C}\u{C800} \u{AD6C}\u{C5ED} \u{C124}\u{C815}\u{C5D0}\u{C11C} \u{ADF8}\u{B8F9}\u{C744} \u{B9CC}\u{B4E4}\u{C5B4}\u{C8FC}\u{C138}\u{C694}.".into());
    t.insert("realtime.combined_series".into(), "\u{D569}\u{C0B0} \u{C720}\u{B7C9}".into());

    // Statistics
    t.insert("stats.title".into(), "\u{D1B5}\u{ACC4} \u{D398}\u{C774}\u{C9C0}".into());
    t.insert("stats.daily".into(), "\u{C77C} \u{C0AC}\u{C6A9}\u{B7C9}".into());
    t.insert("stats.monthly".into(), "\u{C6D4} \u{C0AC}\u{C6A9}\u{B7C9}".into());
    t.insert("stats.yearly".into(), "\u{C5F0} \u{C0AC}\u{C6A9}\u{B7C9}".into());
    t.insert("stats.average_usage".into(), "\u{D3C9}\u{ADE0} \u{C0AC}\u{C6A9}\u{B7C9}".into());
    t.insert("stats.average_bill".into(), "\u{D3C9}\u{ADE0} \u{C0AC}\u{C6A9}\u{C694}\u{AE08}".into());

    // Settings
    t.insert("settings.zones".into(), "\u{AD6C}\u{C5ED} \u{C124}\u{C815}".into());
    t.insert("settings.tariffs".into(), "\u{C218}\u{B3C4} \u{C694}\u{AE08} \u{C124}\u{C815}".into());
    t.insert("settings.simulation".into(), "\u{C694}\u{AE08} \u{C2DC}\u{BBAC}\u{B808}\u{C774}\u{C158}".into());
    t.insert("settings.region".into(), "\u{C9C0}\u{C5ED}".into());
    t.insert("settings.usage_class".into(), "\u{C6A9}\u{B3C4}".into());
    t.insert("settings.group_name".into(), "\u{ADF8}\u{B8F9} \u{C774}\u{B984}".into());
    t.insert("settings.group_members".into(), "\u{ADF8}\u{B8F9}\u{C5D0} \u{D3EC}\u{D568}\u{D560} EP".into());
    t.insert("settings.group_saved".into(), "\u{ADF8}\u{B8F9}\u{C774} \u{C800}\u{C7A5}\u{B418}\u{C5C8}\u{C2B5}\u{B2C8}\u{B2E4}".into());
    t.insert("settings.saved_groups".into(), "\u{C800}\u{C7A5}\u{B41C} \u{ADF8}\u{B8F9}".into());

    // Billing terms
    t.insert("bill.base_charge".into(), "\u{C0C1}\u{C218}\u{B3C4} \u{C694}\u{AE08}".into());
    t.insert("bill.surcharge".into(), "\u{D558}\u{C218}\u{B3C4} \u{C694}\u{AE08}".into());
    t.insert("bill.levy".into(), "\u{BB3C}\u{C774}\u{C6A9}\u{BD80}\u{B2F4}\u{AE08}".into());
    t.insert("bill.total".into(), "\u{CD1D} \u{C694}\u{AE08}".into());

    // Units
    t.insert("unit.flow".into(), "L/h".into());
    t.insert("unit.volume".into(), "\u{33A5}".into());
    t.insert("unit.currency".into(), "\u{C6D0}".into());

    t
}
