//! Synthetic flow generation
//!
//! Stands in for a real telemetry integration: every pull produces one
//! uniformly random flow rate per configured endpoint, all stamped with the
//! same observation time so group merges line up.

use crate::core::{Config, FlowReading, Result};
use crate::feed::FlowSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random flow-rate generator over the configured endpoint set
pub struct SyntheticFeed {
    endpoints: Vec<String>,
    min_flow: f64,
    max_flow: f64,
    rng: StdRng,
}

impl SyntheticFeed {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.endpoints.ids.clone(),
            config.feed.min_flow,
            config.feed.max_flow,
            config.feed.seed,
        )
    }

    /// Create a generator; pass a seed for reproducible output
    pub fn new(endpoints: Vec<String>, min_flow: f64, max_flow: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            endpoints,
            min_flow,
            max_flow,
            rng,
        }
    }
}

impl FlowSource for SyntheticFeed {
    fn pull(&mut self) -> Result<Vec<FlowReading>> {
        let now = chrono::Utc::now().timestamp();

        let readings = self
            .endpoints
            .iter()
            .map(|ep| {
                let flow = self.rng.gen_range(self.min_flow..self.max_flow);
                FlowReading::at(ep, now, flow)
            })
            .collect();

        Ok(readings)
    }

    fn name(&self) -> &str {
        "synthetic"
    }

    fn is_synthetic(&self) -> bool {
        true
    }
}
