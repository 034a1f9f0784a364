//! Run and sweep parameters
//!
//! Parameters deserialize from JSON with per-field defaults, so a config file
//! only needs to name the values it changes.

use crate::error::{CppiError, Result};
use crate::metrics::DEFAULT_VAR_CONFIDENCE;
use crate::schedule::RebalanceFrequency;
use crate::simulation::{CppiConfig, FloorPolicy, DEFAULT_FREEZE_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parameters for a single CPPI run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CppiParams {
    /// Protected fraction of initial capital, in (0, 1]
    #[serde(default = "default_floor")]
    pub floor: f64,

    /// Cushion multiplier, typically 2-5
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Rebalance frequency token (D, W, ME)
    #[serde(default = "default_frequency")]
    pub rebalance_frequency: RebalanceFrequency,

    /// Confidence level for VaR/CVaR, in (0, 1)
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,

    /// Zero-weight share at which a run is reported frozen
    #[serde(default = "default_freeze_threshold")]
    pub freeze_threshold: f64,
}

fn default_floor() -> f64 { 0.8 }
fn default_multiplier() -> f64 { 3.0 }
fn default_frequency() -> RebalanceFrequency { RebalanceFrequency::MonthEnd }
fn default_var_confidence() -> f64 { DEFAULT_VAR_CONFIDENCE }
fn default_freeze_threshold() -> f64 { DEFAULT_FREEZE_THRESHOLD }
fn default_floors() -> Vec<f64> { vec![0.7, 0.8, 0.9] }
fn default_multipliers() -> Vec<f64> { vec![2.0, 3.0, 4.0, 5.0] }
fn default_policies() -> Vec<FloorPolicy> { vec![FloorPolicy::Static, FloorPolicy::Dynamic] }

impl Default for CppiParams {
    fn default() -> Self {
        Self {
            floor: 0.8,
            multiplier: 3.0,
            rebalance_frequency: RebalanceFrequency::MonthEnd,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            freeze_threshold: DEFAULT_FREEZE_THRESHOLD,
        }
    }
}

impl CppiParams {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let params: Self = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        validate_floor(self.floor)?;
        validate_multiplier(self.multiplier)?;
        validate_confidence(self.var_confidence)?;
        validate_threshold(self.freeze_threshold)
    }

    /// Engine configuration for the given floor policy
    pub fn engine_config(&self, floor_policy: FloorPolicy) -> CppiConfig {
        CppiConfig {
            floor: self.floor,
            multiplier: self.multiplier,
            floor_policy,
        }
    }
}

/// Parameter grid for a floor x multiplier x policy sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepParams {
    #[serde(default = "default_floors")]
    pub floors: Vec<f64>,

    #[serde(default = "default_multipliers")]
    pub multipliers: Vec<f64>,

    #[serde(default = "default_policies")]
    pub policies: Vec<FloorPolicy>,

    #[serde(default = "default_frequency")]
    pub rebalance_frequency: RebalanceFrequency,

    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,

    #[serde(default = "default_freeze_threshold")]
    pub freeze_threshold: f64,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            floors: default_floors(),
            multipliers: default_multipliers(),
            policies: default_policies(),
            rebalance_frequency: RebalanceFrequency::MonthEnd,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            freeze_threshold: DEFAULT_FREEZE_THRESHOLD,
        }
    }
}

impl SweepParams {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let params: Self = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.floors.is_empty() || self.multipliers.is_empty() || self.policies.is_empty() {
            return Err(CppiError::InvalidConfiguration(
                "sweep needs at least one floor, multiplier and policy".into(),
            ));
        }
        for &floor in &self.floors {
            validate_floor(floor)?;
        }
        for &multiplier in &self.multipliers {
            validate_multiplier(multiplier)?;
        }
        validate_confidence(self.var_confidence)?;
        validate_threshold(self.freeze_threshold)
    }

    /// Number of runs in the grid
    pub fn grid_size(&self) -> usize {
        self.floors.len() * self.multipliers.len() * self.policies.len()
    }
}

/// Floor must lie in (0, 1]
pub fn validate_floor(floor: f64) -> Result<()> {
    if floor > 0.0 && floor <= 1.0 {
        Ok(())
    } else {
        Err(CppiError::InvalidConfiguration(format!(
            "floor must be in (0, 1], got {}",
            floor
        )))
    }
}

/// Multiplier must be positive and finite
pub fn validate_multiplier(multiplier: f64) -> Result<()> {
    if multiplier > 0.0 && multiplier.is_finite() {
        Ok(())
    } else {
        Err(CppiError::InvalidConfiguration(format!(
            "multiplier must be positive, got {}",
            multiplier
        )))
    }
}

/// Confidence level must lie in (0, 1)
pub fn validate_confidence(confidence: f64) -> Result<()> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(CppiError::InvalidConfiguration(format!(
            "VaR confidence must be in (0, 1), got {}",
            confidence
        )))
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(CppiError::InvalidConfiguration(format!(
            "freeze threshold must be in [0, 1], got {}",
            threshold
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CppiParams::default().validate().is_ok());
        assert!(SweepParams::default().validate().is_ok());
        assert_eq!(SweepParams::default().grid_size(), 24);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: CppiParams =
            serde_json::from_str(r#"{ "multiplier": 5.0, "rebalance_frequency": "W" }"#).unwrap();

        assert_eq!(params.multiplier, 5.0);
        assert_eq!(params.floor, 0.8);
        assert_eq!(params.rebalance_frequency, RebalanceFrequency::Weekly);
        assert_eq!(params.var_confidence, 0.95);
    }

    #[test]
    fn test_invalid_params() {
        for floor in [0.0, -0.1, 1.2, f64::NAN] {
            let params = CppiParams { floor, ..Default::default() };
            assert!(matches!(params.validate(), Err(CppiError::InvalidConfiguration(_))));
        }
        for multiplier in [0.0, -3.0, f64::INFINITY] {
            let params = CppiParams { multiplier, ..Default::default() };
            assert!(params.validate().is_err());
        }
        let params = CppiParams { var_confidence: 1.0, ..Default::default() };
        assert!(params.validate().is_err());

        // A floor of exactly 1.0 protects all capital and is allowed
        let params = CppiParams { floor: 1.0, ..Default::default() };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_empty_sweep_grid_rejected() {
        let params = SweepParams { multipliers: vec![], ..Default::default() };
        assert!(params.validate().is_err());
    }
}
