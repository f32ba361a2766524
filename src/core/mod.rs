//! Core module - Configuration, errors, and common types

mod config;
mod error;
mod types;

pub use config::{Config, GeneralConfig, EndpointsConfig, FeedConfig, TariffConfig, ScheduleConfig, TierConfig};
pub use error::{Error, Result};
pub use types::{FlowReading, SeriesPoint, BillBreakdown, DashboardSnapshot};
