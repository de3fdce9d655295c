//! # Surge Pricing
//!
//! Time, weather and demand multipliers on the delivery fee.
//!
//! Multipliers are kept in basis points (10000 = 1.0×) so the whole
//! calculation stays in integers.
//!
//! ## Rules (applied in order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start                                  1.0×                            │
//! │  peak hours 12:00-13:59, 18:00-21:59    at least 1.5×                   │
//! │  Friday from 18:00                      at least 1.3×                   │
//! │  Saturday, Sunday                       at least 1.4×                   │
//! │  rain / extreme heat                    × 1.5, capped at 3.0×           │
//! │  demand > 80                            × 1.2, capped at 5.0×           │
//! │  overall cap                            5.0×                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::NaiveDate;
//! use wyshkit_core::surge::{SurgeContext, Weather};
//! use wyshkit_core::Money;
//!
//! // Wednesday 19:30, raining
//! let at = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(19, 30, 0).unwrap();
//! let surge = SurgeContext::new(at).with_weather(Weather::Rain).evaluate();
//!
//! assert_eq!(surge.multiplier_bps, 22500);
//! assert_eq!(surge.reason.as_deref(), Some("Peak hours + Rain"));
//! assert_eq!(surge.apply(Money::from_paise(5000)).paise(), 11250);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// 1.0×
pub const BASE_MULTIPLIER_BPS: u32 = 10_000;

const PEAK_BPS: u32 = 15_000;
const FRIDAY_EVENING_BPS: u32 = 13_000;
const WEEKEND_BPS: u32 = 14_000;
const WEATHER_CAP_BPS: u32 = 30_000;
const MAX_MULTIPLIER_BPS: u32 = 50_000;
const HIGH_DEMAND: u8 = 80;

// =============================================================================
// Inputs
// =============================================================================

/// Weather conditions that affect surge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Clear,
    Rain,
    ExtremeHeat,
}

impl Weather {
    fn is_severe(self) -> bool {
        matches!(self, Weather::Rain | Weather::ExtremeHeat)
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weather::Clear => write!(f, "clear"),
            Weather::Rain => write!(f, "rain"),
            Weather::ExtremeHeat => write!(f, "extreme_heat"),
        }
    }
}

impl FromStr for Weather {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "rain" => Ok(Weather::Rain),
            "extreme_heat" | "extreme-heat" => Ok(Weather::ExtremeHeat),
            _ => Err(ValidationError::InvalidFormat {
                field: "weather".to_string(),
                reason: "expected clear, rain or extreme_heat".to_string(),
            }),
        }
    }
}

/// When and under what conditions the order is being placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgeContext {
    /// Local time in the delivery zone.
    pub at: NaiveDateTime,
    #[serde(default)]
    pub weather: Option<Weather>,
    /// Demand index, 0-100.
    #[serde(default)]
    pub demand: Option<u8>,
}

impl SurgeContext {
    pub fn new(at: NaiveDateTime) -> Self {
        SurgeContext {
            at,
            weather: None,
            demand: None,
        }
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_demand(mut self, demand: u8) -> Self {
        self.demand = Some(demand);
        self
    }

    fn is_peak_hour(&self) -> bool {
        let hour = self.at.hour();
        (12..14).contains(&hour) || (18..22).contains(&hour)
    }

    fn is_high_demand(&self) -> bool {
        self.demand.is_some_and(|demand| demand > HIGH_DEMAND)
    }

    /// Multiplier in basis points, between 1.0× and 5.0×.
    pub fn multiplier_bps(&self) -> u32 {
        let mut bps = BASE_MULTIPLIER_BPS;

        if self.is_peak_hour() {
            bps = bps.max(PEAK_BPS);
        }

        match self.at.weekday() {
            Weekday::Fri if self.at.hour() >= 18 => bps = bps.max(FRIDAY_EVENING_BPS),
            Weekday::Sat | Weekday::Sun => bps = bps.max(WEEKEND_BPS),
            _ => {}
        }

        if self.weather.is_some_and(Weather::is_severe) {
            bps = (bps * 15 / 10).min(WEATHER_CAP_BPS);
        }

        if self.is_high_demand() {
            bps = (bps * 12 / 10).min(MAX_MULTIPLIER_BPS);
        }

        bps.min(MAX_MULTIPLIER_BPS)
    }

    /// Customer-facing reason, `None` when there is no surge.
    ///
    /// Weekend surges carry no named reason and fall back to
    /// "Surge pricing applied".
    pub fn reason(&self, multiplier_bps: u32) -> Option<String> {
        if multiplier_bps <= BASE_MULTIPLIER_BPS {
            return None;
        }

        let mut reasons = Vec::new();
        if self.is_peak_hour() {
            reasons.push("Peak hours");
        }
        match self.weather {
            Some(Weather::Rain) => reasons.push("Rain"),
            Some(Weather::ExtremeHeat) => reasons.push("Extreme heat"),
            _ => {}
        }
        if self.is_high_demand() {
            reasons.push("High demand");
        }

        if reasons.is_empty() {
            Some("Surge pricing applied".to_string())
        } else {
            Some(reasons.join(" + "))
        }
    }

    /// Multiplier and reason together.
    pub fn evaluate(&self) -> Surge {
        let multiplier_bps = self.multiplier_bps();
        Surge {
            multiplier_bps,
            reason: self.reason(multiplier_bps),
        }
    }
}

// =============================================================================
// Result
// =============================================================================

/// An evaluated surge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Surge {
    pub multiplier_bps: u32,
    pub reason: Option<String>,
}

impl Surge {
    /// No surge.
    pub fn none() -> Self {
        Surge {
            multiplier_bps: BASE_MULTIPLIER_BPS,
            reason: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.multiplier_bps > BASE_MULTIPLIER_BPS
    }

    /// Scales a fee, rounding half-up to the paisa.
    pub fn apply(&self, fee: Money) -> Money {
        fee.scale_bps(self.multiplier_bps)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
