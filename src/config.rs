use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_ISA_ANNUAL_LIMIT: f64 = 20_000.0;
pub const DEFAULT_SOLVER_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MIN_ALLOCATION: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Aggregate cap across all ISA-eligible accounts for one tax year.
    pub isa_annual_limit: f64,
    pub solver_timeout: Duration,
    /// Solved amounts below this are treated as solver noise and dropped.
    pub min_allocation: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            isa_annual_limit: DEFAULT_ISA_ANNUAL_LIMIT,
            solver_timeout: Duration::from_millis(DEFAULT_SOLVER_TIMEOUT_MS),
            min_allocation: DEFAULT_MIN_ALLOCATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("--isa-limit must be a finite number >= 0")]
    InvalidIsaLimit,
    #[error("--solver-timeout-ms must be > 0")]
    InvalidTimeout,
    #[error("min_allocation must be a finite number >= 0")]
    InvalidMinAllocation,
}

impl OptimizerConfig {
    pub fn new(isa_annual_limit: f64, solver_timeout_ms: u64) -> Result<Self, ConfigError> {
        let config = Self {
            isa_annual_limit,
            solver_timeout: Duration::from_millis(solver_timeout_ms),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.isa_annual_limit.is_finite() || self.isa_annual_limit < 0.0 {
            return Err(ConfigError::InvalidIsaLimit);
        }
        if self.solver_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if !self.min_allocation.is_finite() || self.min_allocation < 0.0 {
            return Err(ConfigError::InvalidMinAllocation);
        }
        Ok(())
    }

    /// ISA headroom left for this request once contributions already made are deducted.
    pub fn remaining_isa_allowance(&self, allowance_used: f64) -> f64 {
        (self.isa_annual_limit - allowance_used).max(0.0)
    }
}
