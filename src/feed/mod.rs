//! Flow data sources
//!
//! Abstracts where readings come from so the rest of the system never
//! cares. Two sources exist today:
//! - synthetic: randomly generated flow rates standing in for telemetry
//! - replay: readings played back from the persisted history

mod replay;
mod synthetic;

pub use replay::ReplayFeed;
pub use synthetic::SyntheticFeed;

use crate::core::{Config, Error, FlowReading, Result};
use crate::store::Store;

/// Feed wrapper that selects the configured source
pub struct FlowFeed {
    source: Box<dyn FlowSource + Send + Sync>,
}

impl FlowFeed {
    /// Create a feed from configuration. The replay source needs persisted
    /// history to read from; an empty store is an error here so the caller
    /// can decide to fall back.
    pub fn from_config(config: &Config, store: &Store) -> Result<Self> {
        match config.feed.mode.as_str() {
            "synthetic" => {
                log::info!("Using synthetic flow feed");
                Ok(Self {
                    source: Box::new(SyntheticFeed::from_config(config)),
                })
            }
            "replay" => {
                let replay = ReplayFeed::from_store(store, config.feed.replay_window_secs)?;
                log::info!("Using replay flow feed ({} batches)", replay.remaining());
                Ok(Self {
                    source: Box::new(replay),
                })
            }
            other => Err(Error::Config(format!("Unknown feed mode: {}", other))),
        }
    }

    /// Fall back to the synthetic source regardless of configuration
    pub fn synthetic_fallback(config: &Config) -> Self {
        Self {
            source: Box::new(SyntheticFeed::from_config(config)),
        }
    }

    /// Pull one batch of readings, one per endpoint
    pub fn pull(&mut self) -> Result<Vec<FlowReading>> {
        self.source.pull()
    }

    /// Name of the active source
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Whether the readings are synthetic rather than recorded/measured
    pub fn is_synthetic(&self) -> bool {
        self.source.is_synthetic()
    }
}

/// Trait for flow reading sources
pub trait FlowSource {
    /// Pull the next batch of readings, one per endpoint.
    /// An exhausted source returns an empty batch, not an error.
    fn pull(&mut self) -> Result<Vec<FlowReading>>;

    /// Name of this source
    fn name(&self) -> &str;

    /// Whether readings are synthetic
    fn is_synthetic(&self) -> bool;
}
