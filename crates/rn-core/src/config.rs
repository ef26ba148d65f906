//! Engine configuration.
//!
//! Typically built with `EngineConfig::default()` or loaded from a JSON file
//! by the application crate (requires the `serde` feature) and handed to the
//! engine at construction.

use crate::{CoreError, CoreResult};

/// Water-level thresholds and slowdown applied by a flood edit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FloodConfig {
    /// Water level (m) at or above which flooded edges are removed.
    pub ban_threshold: f64,
    /// Water level (m) at or above which flooded edges are slowed.
    pub slow_threshold: f64,
    /// Weight multiplier for slowed edges.
    pub slow_factor: f64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            ban_threshold:  0.5,
            slow_threshold: 0.2,
            slow_factor:    5.0,
        }
    }
}

impl FloodConfig {
    /// Reject a non-positive slow factor, NaN or infinite thresholds, and a
    /// slow threshold above the ban threshold.
    pub fn validate(&self) -> CoreResult<()> {
        positive("flood.slow_factor", self.slow_factor)?;
        for (name, value) in [
            ("flood.ban_threshold", self.ban_threshold),
            ("flood.slow_threshold", self.slow_threshold),
        ] {
            if !value.is_finite() {
                return Err(CoreError::Config(format!("{name} must be finite, got {value}")));
            }
        }
        if self.slow_threshold > self.ban_threshold {
            return Err(CoreError::Config(format!(
                "flood.slow_threshold ({}) exceeds flood.ban_threshold ({})",
                self.slow_threshold, self.ban_threshold
            )));
        }
        Ok(())
    }
}

/// Top-level configuration shared by the edit ledger and the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Weight given to edges re-inserted by a ban, area-ban, or flood restore.
    /// The original weight is not recorded, so this is a stand-in.
    pub restore_weight: f64,

    /// Multiplier used by `congest` when the caller does not pass one.
    pub congestion_factor: f64,

    /// Default flood thresholds.
    pub flood: FloodConfig,

    /// Speed (m/s) used by the distance/time estimate when none is given.
    /// Default 1.39 m/s ≈ 5 km/h walking.
    pub default_speed_mps: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            restore_weight:    1.0,
            congestion_factor: 5.0,
            flood:             FloodConfig::default(),
            default_speed_mps: 1.39,
        }
    }
}

impl EngineConfig {
    /// Reject values that would let an edit produce a non-positive weight.
    pub fn validate(&self) -> CoreResult<()> {
        positive("restore_weight", self.restore_weight)?;
        positive("congestion_factor", self.congestion_factor)?;
        positive("default_speed_mps", self.default_speed_mps)?;
        self.flood.validate()
    }
}

fn positive(name: &str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be finite and > 0, got {value}")))
    }
}
