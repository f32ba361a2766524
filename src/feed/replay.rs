//! Replay of persisted flow history
//!
//! Reads a window of stored readings and hands them back one batch per
//! distinct timestamp, oldest first. Useful for demos against recorded
//! data and for driving the pipeline without a generator.

use crate::core::{Error, FlowReading, Result};
use crate::feed::FlowSource;
use crate::store::Store;
use std::collections::{BTreeMap, VecDeque};

/// Feed that replays stored readings in timestamp order
pub struct ReplayFeed {
    batches: VecDeque<Vec<FlowReading>>,
}

impl ReplayFeed {
    /// Load the trailing `window_secs` of history from the store.
    /// Fails when there is nothing to replay.
    pub fn from_store(store: &Store, window_secs: i64) -> Result<Self> {
        let now = chrono::Utc::now().timestamp();
        let readings = store.get_readings(now - window_secs, now)?;

        if readings.is_empty() {
            return Err(Error::Feed(
                "no stored readings available to replay".to_string(),
            ));
        }

        Ok(Self::from_readings(readings))
    }

    /// Group readings into per-timestamp batches
    pub fn from_readings(readings: Vec<FlowReading>) -> Self {
        let mut by_timestamp: BTreeMap<i64, Vec<FlowReading>> = BTreeMap::new();
        for reading in readings {
            by_timestamp.entry(reading.timestamp).or_default().push(reading);
        }

        Self {
            batches: by_timestamp.into_values().collect(),
        }
    }

    /// Batches left to replay
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl FlowSource for ReplayFeed {
    fn pull(&mut self) -> Result<Vec<FlowReading>> {
        match self.batches.pop_front() {
            Some(batch) => Ok(batch),
            None => {
                log::debug!("Replay feed exhausted");
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn is_synthetic(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_come_back_in_timestamp_order() {
        let readings = vec![
            FlowReading::at("EP_2", 1_000_004, 20.0),
            FlowReading::at("EP_1", 1_000_000, 10.0),
            FlowReading::at("EP_2", 1_000_000, 15.0),
            FlowReading::at("EP_1", 1_000_004, 12.0),
        ];

        let mut feed = ReplayFeed::from_readings(readings);
        assert_eq!(feed.remaining(), 2);

        let first = feed.pull().unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|r| r.timestamp == 1_000_000));

        let second = feed.pull().unwrap();
        assert!(second.iter().all(|r| r.timestamp == 1_000_004));

        // exhausted feeds drain to empty batches
        assert!(feed.pull().unwrap().is_empty());
    }
}
