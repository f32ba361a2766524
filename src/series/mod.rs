//! In-memory series aggregation over a trailing window
//!
//! Holds one bounded series of readings per endpoint and answers the
//! realtime queries: a single endpoint's window, a group's merged series,
//! and the instantaneous combined rate. Pruning happens on every write, so
//! memory stays bounded without a timer.

use crate::core::{Error, FlowReading, Result, SeriesPoint};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Timestamp alignment applied when a sample is recorded.
///
/// Readings only merge in a group series when their (aligned) timestamps
/// are equal, so endpoints sampled on independent clocks need `Interval`
/// to land on a shared grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucketing {
    /// Keep timestamps as delivered; merge on exact equality only
    Exact,
    /// Floor timestamps to a fixed interval in seconds
    Interval(i64),
}

impl Bucketing {
    fn align(&self, timestamp: i64) -> i64 {
        match self {
            Bucketing::Exact => timestamp,
            Bucketing::Interval(secs) => timestamp - timestamp.rem_euclid(*secs),
        }
    }
}

/// Per-endpoint trailing windows of flow readings
pub struct SeriesAggregator {
    series: HashMap<String, VecDeque<FlowReading>>,
    retention_window_secs: i64,
    bucketing: Bucketing,
}

impl SeriesAggregator {
    /// Create an aggregator keeping `retention_window_secs` of history per
    /// endpoint, merging on exact timestamps.
    pub fn new(retention_window_secs: i64) -> Self {
        Self::with_bucketing(retention_window_secs, Bucketing::Exact)
    }

    /// Create an aggregator with an explicit timestamp alignment strategy
    pub fn with_bucketing(retention_window_secs: i64, bucketing: Bucketing) -> Self {
        Self {
            series: HashMap::new(),
            retention_window_secs,
            bucketing,
        }
    }

    /// Record one sample and prune the endpoint's window.
    ///
    /// The incoming sample's timestamp is "now" for retention purposes:
    /// everything older than `timestamp - retention_window` is dropped.
    pub fn record_sample(
        &mut self,
        endpoint_id: &str,
        timestamp: i64,
        flow_rate: f64,
    ) -> Result<()> {
        if !flow_rate.is_finite() || flow_rate < 0.0 {
            return Err(Error::InvalidInput(format!(
                "flow rate for {} must be a non-negative number, got {}",
                endpoint_id, flow_rate
            )));
        }

        let timestamp = self.bucketing.align(timestamp);
        let window = self.series.entry(endpoint_id.to_string()).or_default();
        window.push_back(FlowReading::at(endpoint_id, timestamp, flow_rate));

        let cutoff = timestamp - self.retention_window_secs;
        window.retain(|r| r.timestamp > cutoff);

        Ok(())
    }

    /// Current window for one endpoint, oldest first.
    /// Unknown endpoints yield an empty series, not an error.
    pub fn get_series(&self, endpoint_id: &str) -> Vec<FlowReading> {
        self.series
            .get(endpoint_id)
            .map(|w| w.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Merge the members' windows into one series: readings sharing a
    /// timestamp are summed, and points come back in ascending time order.
    pub fn get_group_series(&self, members: &[String]) -> Vec<SeriesPoint> {
        let mut merged: BTreeMap<i64, f64> = BTreeMap::new();

        for member in members {
            if let Some(window) = self.series.get(member) {
                for reading in window {
                    *merged.entry(reading.timestamp).or_insert(0.0) += reading.flow_rate;
                }
            }
        }

        merged
            .into_iter()
            .map(|(timestamp, flow_rate)| SeriesPoint {
                timestamp,
                flow_rate,
            })
            .collect()
    }

    /// Sum of each member's most recent flow rate; endpoints with no data
    /// contribute zero.
    pub fn get_latest_total(&self, members: &[String]) -> f64 {
        members
            .iter()
            .filter_map(|m| self.series.get(m))
            .filter_map(|w| w.back())
            .map(|r| r.flow_rate)
            .sum()
    }

    /// Sorted ids of every endpoint seen so far
    pub fn endpoint_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.series.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records_appear_in_order() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 12.0).unwrap();
        agg.record_sample("EP_1", T0 + 2, 14.0).unwrap();

        let series = agg.get_series("EP_1");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, T0);
        assert_eq!(series[1].flow_rate, 14.0);
    }

    #[test]
    fn unknown_endpoint_yields_empty_series() {
        let agg = SeriesAggregator::new(600);
        assert!(agg.get_series("EP_99").is_empty());
        assert!(agg.get_group_series(&ids(&["EP_99"])).is_empty());
        assert_eq!(agg.get_latest_total(&ids(&["EP_99"])), 0.0);
    }

    #[test]
    fn negative_flow_is_rejected() {
        let mut agg = SeriesAggregator::new(600);
        assert!(matches!(
            agg.record_sample("EP_1", T0, -3.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            agg.record_sample("EP_1", T0, f64::NAN),
            Err(Error::InvalidInput(_))
        ));
        assert!(agg.get_series("EP_1").is_empty());
    }

    #[test]
    fn sample_past_the_window_evicts_older_readings() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 20.0).unwrap();
        // 11 minutes later: the first reading falls out of the 10-minute window
        agg.record_sample("EP_1", T0 + 660, 30.0).unwrap();

        let series = agg.get_series("EP_1");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].timestamp, T0 + 660);
    }

    #[test]
    fn window_span_never_exceeds_retention() {
        let mut agg = SeriesAggregator::new(600);
        for i in 0..400 {
            agg.record_sample("EP_1", T0 + i * 7, 1.0).unwrap();
        }

        let series = agg.get_series("EP_1");
        assert!(!series.is_empty());
        let span = series.last().unwrap().timestamp - series[0].timestamp;
        assert!(span <= 600, "window spans {} seconds", span);
    }

    #[test]
    fn shared_timestamp_readings_sum_in_group_series() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 10.0).unwrap();
        agg.record_sample("EP_2", T0, 15.0).unwrap();

        let combined = agg.get_group_series(&ids(&["EP_1", "EP_2"]));
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].timestamp, T0);
        assert_eq!(combined[0].flow_rate, 25.0);
    }

    #[test]
    fn exact_mode_keeps_offset_timestamps_apart() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 10.0).unwrap();
        agg.record_sample("EP_2", T0 + 1, 15.0).unwrap();

        let combined = agg.get_group_series(&ids(&["EP_1", "EP_2"]));
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].flow_rate, 10.0);
        assert_eq!(combined[1].flow_rate, 15.0);
    }

    #[test]
    fn interval_bucketing_merges_nearby_timestamps() {
        let mut agg = SeriesAggregator::with_bucketing(600, Bucketing::Interval(10));
        agg.record_sample("EP_1", T0 + 1, 10.0).unwrap();
        agg.record_sample("EP_2", T0 + 9, 15.0).unwrap();

        let combined = agg.get_group_series(&ids(&["EP_1", "EP_2"]));
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].timestamp, T0 - T0.rem_euclid(10));
        assert_eq!(combined[0].flow_rate, 25.0);
    }

    #[test]
    fn group_series_is_order_independent() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 10.0).unwrap();
        agg.record_sample("EP_1", T0 + 2, 12.0).unwrap();
        agg.record_sample("EP_2", T0, 15.0).unwrap();
        agg.record_sample("EP_3", T0 + 2, 7.0).unwrap();

        let forward = agg.get_group_series(&ids(&["EP_1", "EP_2", "EP_3"]));
        let backward = agg.get_group_series(&ids(&["EP_3", "EP_2", "EP_1"]));
        let shuffled = agg.get_group_series(&ids(&["EP_2", "EP_3", "EP_1"]));

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn singleton_group_equals_member_series() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 10.0).unwrap();
        agg.record_sample("EP_1", T0 + 2, 12.0).unwrap();

        let member = agg.get_series("EP_1");
        let group = agg.get_group_series(&ids(&["EP_1"]));

        assert_eq!(group.len(), member.len());
        for (point, reading) in group.iter().zip(member.iter()) {
            assert_eq!(point.timestamp, reading.timestamp);
            assert_eq!(point.flow_rate, reading.flow_rate);
        }
    }

    #[test]
    fn reads_are_idempotent() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 10.0).unwrap();
        agg.record_sample("EP_2", T0, 15.0).unwrap();

        assert_eq!(agg.get_series("EP_1"), agg.get_series("EP_1"));
        let members = ids(&["EP_1", "EP_2"]);
        assert_eq!(agg.get_group_series(&members), agg.get_group_series(&members));
    }

    #[test]
    fn latest_total_sums_most_recent_rates() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_1", T0, 10.0).unwrap();
        agg.record_sample("EP_1", T0 + 2, 40.0).unwrap();
        agg.record_sample("EP_2", T0, 15.0).unwrap();

        // EP_1 contributes its newest reading, EP_3 nothing
        let total = agg.get_latest_total(&ids(&["EP_1", "EP_2", "EP_3"]));
        assert_eq!(total, 55.0);
    }

    #[test]
    fn endpoint_ids_are_sorted() {
        let mut agg = SeriesAggregator::new(600);
        agg.record_sample("EP_2", T0, 1.0).unwrap();
        agg.record_sample("EP_1", T0, 1.0).unwrap();
        assert_eq!(agg.endpoint_ids(), vec!["EP_1", "EP_2"]);
    }
}
