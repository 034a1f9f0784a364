//! Per-step simulation state

/// Evolving state of one CPPI run
///
/// Created at the start of a run, mutated once per step in chronological
/// order and read out after the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Net asset value, starting at 1.0
    pub portfolio_value: f64,
    /// Fraction of NAV held in the risky asset, in [0, 1]
    pub risky_weight: f64,
    /// Absolute floor level the cushion is measured against
    pub floor_level: f64,
}

impl SimulationState {
    /// Fresh state at unit NAV with the floor at `floor_fraction` of it
    pub fn new(initial_value: f64, floor_fraction: f64) -> Self {
        Self {
            portfolio_value: initial_value,
            risky_weight: 0.0,
            floor_level: floor_fraction * initial_value,
        }
    }

    /// Fractional distance of NAV above the floor
    ///
    /// Returns `None` once NAV is zero, negative or not finite; there is no
    /// meaningful cushion left to invest.
    pub fn cushion(&self) -> Option<f64> {
        if self.portfolio_value > 0.0 && self.portfolio_value.is_finite() {
            Some((self.portfolio_value - self.floor_level).max(0.0) / self.portfolio_value)
        } else {
            None
        }
    }

    /// Recompute the risky weight from the cushion
    ///
    /// Returns `false` when the weight was forced to zero because NAV is
    /// exhausted.
    pub fn rebalance(&mut self, multiplier: f64) -> bool {
        match self.cushion() {
            Some(cushion) => {
                self.risky_weight = (multiplier * cushion).clamp(0.0, 1.0);
                true
            }
            None => {
                self.risky_weight = 0.0;
                false
            }
        }
    }

    /// Whether the full NAV is allocated to the risky asset
    #[inline]
    pub fn fully_invested(&self) -> bool {
        self.risky_weight == 1.0
    }

    /// Lock in gains by raising the floor to `floor_fraction` of current NAV
    ///
    /// The floor never moves down. Returns `true` if it moved.
    pub fn ratchet_floor(&mut self, floor_fraction: f64) -> bool {
        let candidate = floor_fraction * self.portfolio_value;
        if candidate > self.floor_level {
            self.floor_level = candidate;
            true
        } else {
            false
        }
    }

    /// Apply one period of asset returns at the current weight
    ///
    /// Returns the portfolio return for the period.
    pub fn apply_returns(&mut self, risky_return: f64, safe_return: f64) -> f64 {
        let step_return =
            self.risky_weight * risky_return + (1.0 - self.risky_weight) * safe_return;
        self.portfolio_value *= 1.0 + step_return;
        step_return
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cushion_and_weight() {
        let mut state = SimulationState::new(1.0, 0.8);
        assert!((state.cushion().unwrap() - 0.2).abs() < 1e-12);

        state.rebalance(3.0);
        assert!((state.risky_weight - 0.6).abs() < 1e-12);

        // Large multiplier is capped at full allocation
        state.rebalance(10.0);
        assert_eq!(state.risky_weight, 1.0);
        assert!(state.fully_invested());
    }

    #[test]
    fn test_below_floor_goes_to_zero() {
        let mut state = SimulationState::new(1.0, 0.8);
        state.portfolio_value = 0.7;
        assert_eq!(state.cushion(), Some(0.0));
        state.rebalance(4.0);
        assert_eq!(state.risky_weight, 0.0);
    }

    #[test]
    fn test_zero_nav_absorbed() {
        let mut state = SimulationState::new(1.0, 0.8);
        state.risky_weight = 1.0;
        state.portfolio_value = 0.0;

        assert_eq!(state.cushion(), None);
        assert!(!state.rebalance(3.0));
        assert_eq!(state.risky_weight, 0.0);
    }

    #[test]
    fn test_ratchet_only_moves_up() {
        let mut state = SimulationState::new(1.0, 0.5);
        state.portfolio_value = 1.2;
        assert!(state.ratchet_floor(0.5));
        assert!((state.floor_level - 0.6).abs() < 1e-12);

        state.portfolio_value = 0.9;
        assert!(!state.ratchet_floor(0.5));
        assert!((state.floor_level - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_apply_returns() {
        let mut state = SimulationState::new(1.0, 0.8);
        state.risky_weight = 0.6;
        let r = state.apply_returns(0.05, 0.0);
        assert!((r - 0.03).abs() < 1e-12);
        assert!((state.portfolio_value - 1.03).abs() < 1e-12);
    }
}
