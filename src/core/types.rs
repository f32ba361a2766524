//! Common types used across the application

use serde::{Deserialize, Serialize};

/// A single flow observation from one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReading {
    /// Identifier of the measuring endpoint (e.g. "EP_3")
    pub endpoint_id: String,
    /// Timestamp of the reading (Unix timestamp, seconds)
    pub timestamp: i64,
    /// Instantaneous flow rate, non-negative
    pub flow_rate: f64,
}

impl FlowReading {
    pub fn new(endpoint_id: &str, flow_rate: f64) -> Self {
        Self {
            endpoint_id: endpoint_id.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            flow_rate,
        }
    }

    pub fn at(endpoint_id: &str, timestamp: i64, flow_rate: f64) -> Self {
        Self {
            endpoint_id: endpoint_id.to_string(),
            timestamp,
            flow_rate,
        }
    }
}

/// One point of a combined (group) series: flow rates summed per timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub flow_rate: f64,
}

/// Itemized billing estimate for a consumption quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillBreakdown {
    /// Flat supply charge: quantity * base rate
    pub base_charge: f64,
    /// Tiered surcharge across the schedule's consumption brackets
    pub surcharge_charge: f64,
    /// Flat levy: quantity * levy rate
    pub levy_charge: f64,
    /// Sum of the three charges
    pub total: f64,
}

/// Dashboard overview payload assembled from the live components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// When this snapshot was generated (Unix timestamp)
    pub generated_at: i64,
    /// Usage per hour of the current day, 24 buckets
    pub hourly_usage: Vec<f64>,
    /// Total usage so far today
    pub daily_usage: f64,
    /// Billing estimate for today's usage under the active tariff
    pub estimated_bill: BillBreakdown,
    /// Sum of the most recent flow rate across all known endpoints
    pub current_total_flow: f64,
    /// Tariff region the estimate was computed for
    pub region: String,
    /// Tariff usage class the estimate was computed for
    pub usage_class: String,
    /// Name of the active feed source
    pub feed_source: String,
    /// Whether the feed data is synthetic
    pub is_synthetic: bool,
}
