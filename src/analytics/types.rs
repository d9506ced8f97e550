//! Analytics type definitions
//!
//! Contains the broken-time accumulator, the economic model and the loss
//! breakdown produced by the estimator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::AnalyticsError;
use crate::models::{RestaurantKey, RestaurantRecord, Snapshot};

/// Number of people visiting McDonald's in the USA per day
pub const NUM_VISITORS_PER_DAY: f64 = 45e6;

/// Share of visitors who order a dessert (assumption, no public figure)
pub const DESSERT_SHARE: f64 = 0.5;

/// Share of ice cream among ordered desserts
pub const ICE_CREAM_SHARE: f64 = 0.6;

/// Average McFlurry price
pub const ICE_CREAM_PRICE: f64 = 2.1;

/// Estimated cost of making one ice cream
pub const ICE_CREAM_MAKING_COST: f64 = 0.45;

/// Snapshots are captured hourly; this many make one restaurant-day
pub const HOURS_PER_DAY: f64 = 24.0;

/// Per-restaurant broken-hour counters for one day
///
/// Every restaurant seen in any snapshot has an entry, possibly zero.
/// Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokenTimeMap {
    hours: HashMap<RestaurantKey, u32>,
}

impl BrokenTimeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the restaurant and counts one broken-hour when the record
    /// is a USA, active, broken one
    pub fn observe(&mut self, record: &RestaurantRecord) {
        let hours = self.hours.entry(record.key()).or_insert(0);
        if record.counts_as_broken() {
            *hours += 1;
        }
    }

    /// Folds every record of one hourly snapshot
    pub fn observe_snapshot(&mut self, snapshot: &Snapshot) {
        for record in snapshot.records() {
            self.observe(record);
        }
    }

    pub fn get(&self, key: &RestaurantKey) -> Option<u32> {
        self.hours.get(key).copied()
    }

    pub fn restaurant_count(&self) -> usize {
        self.hours.len()
    }

    pub fn total_broken_hours(&self) -> u64 {
        self.hours.values().map(|&h| u64::from(h)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

impl FromIterator<(RestaurantKey, u32)> for BrokenTimeMap {
    fn from_iter<T: IntoIterator<Item = (RestaurantKey, u32)>>(iter: T) -> Self {
        Self {
            hours: iter.into_iter().collect(),
        }
    }
}

/// The raw assumptions behind the economic model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct EconomicAssumptions {
    /// Visitors per day across all US restaurants
    pub visitors_per_day: f64,
    /// Fraction of visitors ordering a dessert
    pub dessert_share: f64,
    /// Fraction of desserts that are ice cream
    pub ice_cream_share: f64,
    /// Net income per ice cream sold, in dollars
    pub ice_cream_net_income: f64,
}

impl Default for EconomicAssumptions {
    fn default() -> Self {
        Self {
            visitors_per_day: NUM_VISITORS_PER_DAY,
            dessert_share: DESSERT_SHARE,
            ice_cream_share: ICE_CREAM_SHARE,
            ice_cream_net_income: ICE_CREAM_PRICE - ICE_CREAM_MAKING_COST,
        }
    }
}

impl EconomicAssumptions {
    fn validate(&self) -> Result<(), AnalyticsError> {
        let fields = [
            ("visitors_per_day", self.visitors_per_day),
            ("dessert_share", self.dessert_share),
            ("ice_cream_share", self.ice_cream_share),
            ("ice_cream_net_income", self.ice_cream_net_income),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalyticsError::InvalidAssumption { name, value });
            }
        }
        Ok(())
    }
}

/// Immutable economic model; the national daily ice-cream net income is
/// derived once when the model is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomicModel {
    assumptions: EconomicAssumptions,
    net_ice_cream_income_per_day: f64,
}

impl EconomicModel {
    /// Builds a model, rejecting negative or non-finite assumptions
    pub fn new(assumptions: EconomicAssumptions) -> Result<Self, AnalyticsError> {
        assumptions.validate()?;
        let net_ice_cream_income_per_day = assumptions.visitors_per_day
            * assumptions.dessert_share
            * assumptions.ice_cream_share
            * assumptions.ice_cream_net_income;
        if !net_ice_cream_income_per_day.is_finite() {
            return Err(AnalyticsError::InvalidAssumption {
                name: "net_ice_cream_income_per_day",
                value: net_ice_cream_income_per_day,
            });
        }
        Ok(Self {
            assumptions,
            net_ice_cream_income_per_day,
        })
    }

    pub fn assumptions(&self) -> &EconomicAssumptions {
        &self.assumptions
    }

    pub fn net_ice_cream_income_per_day(&self) -> f64 {
        self.net_ice_cream_income_per_day
    }
}

impl Default for EconomicModel {
    fn default() -> Self {
        let assumptions = EconomicAssumptions::default();
        Self {
            net_ice_cream_income_per_day: assumptions.visitors_per_day
                * assumptions.dessert_share
                * assumptions.ice_cream_share
                * assumptions.ice_cream_net_income,
            assumptions,
        }
    }
}

/// Every intermediate value of one loss estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LossBreakdown {
    /// Sum of broken-hours across all restaurants
    pub broken_hours: u64,
    /// Broken-hours normalized to restaurant-days
    pub broken_restaurant_days: f64,
    /// Restaurants observed during the day
    pub restaurant_count: usize,
    /// National daily ice-cream income split evenly over the restaurants
    pub per_restaurant_daily_income: f64,
    /// Estimated loss in dollars
    pub loss: f64,
}
