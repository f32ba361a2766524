//! Tariff engine for water billing estimates
//!
//! A bill for a consumption quantity is the sum of three charges:
//! - base charge: flat supply rate applied to all consumption
//! - surcharge: tiered rate walked across consumption brackets
//! - levy: flat per-unit charge applied to all consumption
//!
//! Tier bounds are *capacities*, not cumulative thresholds: tier i always
//! covers up to `upper_bound_i` units regardless of earlier tiers. This
//! differs from conventional cumulative-bracket billing and is kept
//! deliberately; see the pinning tests below before changing it.

use crate::core::{BillBreakdown, Error, Result, ScheduleConfig, TariffConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One surcharge bracket: a capacity of units and its per-unit rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Units of consumption this tier covers; `f64::INFINITY` for the
    /// terminal open-ended tier
    pub upper_bound: f64,
    /// Surcharge per unit within this tier
    pub rate: f64,
}

/// Full tariff for one (region, usage class) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSchedule {
    /// Supply charge per unit
    pub base_rate: f64,
    /// Ordered surcharge tiers, lowest capacity first, last unbounded
    pub surcharge_tiers: Vec<Tier>,
    /// Flat levy per unit
    pub levy_rate: f64,
}

impl RateSchedule {
    /// Check the tier-list invariants: non-empty, upper bounds positive and
    /// strictly increasing, and the final tier (only) unbounded.
    pub fn validate(&self) -> Result<()> {
        if !self.base_rate.is_finite() || self.base_rate < 0.0 {
            return Err(Error::InvalidSchedule(format!(
                "base rate must be a non-negative number, got {}",
                self.base_rate
            )));
        }
        if !self.levy_rate.is_finite() || self.levy_rate < 0.0 {
            return Err(Error::InvalidSchedule(format!(
                "levy rate must be a non-negative number, got {}",
                self.levy_rate
            )));
        }

        if self.surcharge_tiers.is_empty() {
            return Err(Error::InvalidSchedule("tier list is empty".to_string()));
        }

        let mut prev: Option<f64> = None;
        for (i, tier) in self.surcharge_tiers.iter().enumerate() {
            if tier.upper_bound.is_nan() || tier.upper_bound <= 0.0 {
                return Err(Error::InvalidSchedule(format!(
                    "tier {} has invalid upper bound {}",
                    i, tier.upper_bound
                )));
            }
            if !tier.rate.is_finite() || tier.rate < 0.0 {
                return Err(Error::InvalidSchedule(format!(
                    "tier {} has invalid rate {}",
                    i, tier.rate
                )));
            }
            if let Some(p) = prev {
                if tier.upper_bound <= p {
                    return Err(Error::InvalidSchedule(format!(
                        "tier bounds must be strictly increasing ({} after {})",
                        tier.upper_bound, p
                    )));
                }
            }
            prev = Some(tier.upper_bound);
        }

        let last = self.surcharge_tiers.last().unwrap();
        if !last.upper_bound.is_infinite() {
            return Err(Error::InvalidSchedule(
                "last tier must have an unbounded upper limit".to_string(),
            ));
        }

        Ok(())
    }

    /// Compute the itemized bill for a consumption quantity
    pub fn compute_bill(&self, quantity: f64) -> Result<BillBreakdown> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(Error::InvalidInput(format!(
                "consumption quantity must be a non-negative number, got {}",
                quantity
            )));
        }

        let base_charge = quantity * self.base_rate;
        let surcharge_charge = tiered_surcharge(quantity, &self.surcharge_tiers);
        let levy_charge = quantity * self.levy_rate;

        Ok(BillBreakdown {
            base_charge,
            surcharge_charge,
            levy_charge,
            total: base_charge + surcharge_charge + levy_charge,
        })
    }
}

impl From<&ScheduleConfig> for RateSchedule {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            base_rate: config.base_rate,
            surcharge_tiers: config
                .tiers
                .iter()
                .map(|t| Tier {
                    upper_bound: t.upper_bound,
                    rate: t.rate,
                })
                .collect(),
            levy_rate: config.levy_rate,
        }
    }
}

/// Walk the tier list front to back, consuming each tier's capacity.
///
/// The walk stops inside the first tier whose capacity covers what is left,
/// so later tiers are never reached for small quantities.
pub fn tiered_surcharge(quantity: f64, tiers: &[Tier]) -> f64 {
    let mut fee = 0.0;
    let mut remaining = quantity;

    for tier in tiers {
        if remaining > tier.upper_bound {
            fee += tier.upper_bound * tier.rate;
            remaining -= tier.upper_bound;
        } else {
            fee += remaining * tier.rate;
            break;
        }
    }

    fee
}

/// Tariff engine holding the rate schedules for every known
/// (region, usage class) pair
pub struct TariffEngine {
    schedules: HashMap<(String, String), RateSchedule>,
}

impl TariffEngine {
    /// Build an engine from the configured schedule table, validating each
    /// schedule on the way in.
    pub fn new(config: &TariffConfig) -> Result<Self> {
        let mut schedules = HashMap::new();

        for entry in &config.schedules {
            let schedule = RateSchedule::from(entry);
            schedule.validate().map_err(|e| match e {
                Error::InvalidSchedule(msg) => Error::InvalidSchedule(format!(
                    "{}/{}: {}",
                    entry.region, entry.usage_class, msg
                )),
                other => other,
            })?;
            schedules.insert(
                (entry.region.clone(), entry.usage_class.clone()),
                schedule,
            );
        }

        Ok(Self { schedules })
    }

    /// Look up the schedule for a (region, usage class) pair
    pub fn schedule(&self, region: &str, usage_class: &str) -> Option<&RateSchedule> {
        self.schedules
            .get(&(region.to_string(), usage_class.to_string()))
    }

    /// Compute a bill under the schedule for the given pair
    pub fn compute_bill_for(
        &self,
        region: &str,
        usage_class: &str,
        quantity: f64,
    ) -> Result<BillBreakdown> {
        let schedule = self
            .schedule(region, usage_class)
            .ok_or_else(|| Error::UnknownTariff(format!("{}/{}", region, usage_class)))?;
        schedule.compute_bill(quantity)
    }

    /// Replace (or install) the schedule for one (region, usage class) pair.
    /// The new schedule must satisfy the tier invariants.
    pub fn update_schedule(
        &mut self,
        region: &str,
        usage_class: &str,
        schedule: RateSchedule,
    ) -> Result<()> {
        schedule.validate()?;

        let key = (region.to_string(), usage_class.to_string());
        if self.schedules.insert(key, schedule).is_some() {
            log::info!("Replaced tariff schedule for {}/{}", region, usage_class);
        } else {
            log::info!("Installed tariff schedule for {}/{}", region, usage_class);
        }
        Ok(())
    }

    /// Known regions, sorted
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> =
            self.schedules.keys().map(|(r, _)| r.clone()).collect();
        regions.sort();
        regions.dedup();
        regions
    }

    /// Known usage classes for a region, sorted
    pub fn usage_classes(&self, region: &str) -> Vec<String> {
        let mut classes: Vec<String> = self
            .schedules
            .keys()
            .filter(|(r, _)| r == region)
            .map(|(_, c)| c.clone())
            .collect();
        classes.sort();
        classes
    }
}
