use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use super::error::InputError;
use super::mapper::map_solution;
use super::model::build_model;
use super::solver::{GoodLpSolver, MilpSolver, TimeoutSolver};
use super::types::{InvestableAmount, OptimizationOutcome, SavingsAccount, SolverStatus};
use crate::config::OptimizerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationRequest {
    pub total_investment: f64,
    /// ISA contributions already made this tax year.
    pub isa_allowance_used: f64,
}

impl OptimizationRequest {
    pub fn new(total_investment: f64) -> Self {
        Self {
            total_investment,
            isa_allowance_used: 0.0,
        }
    }
}

pub fn validate_accounts(accounts: &[SavingsAccount]) -> Result<(), InputError> {
    if accounts.is_empty() {
        return Err(InputError::EmptyCatalog);
    }

    let mut seen = HashSet::with_capacity(accounts.len());
    for account in accounts {
        let label = || account.name.clone();
        for (field, value) in [
            ("aer", account.aer),
            ("min_investment", account.min_investment),
            ("max_investment", account.max_investment.unwrap_or(0.0)),
        ] {
            if !value.is_finite() {
                return Err(InputError::NonFiniteValue {
                    account: label(),
                    field,
                });
            }
        }
        if account.aer < 0.0 {
            return Err(InputError::NegativeRate { account: label() });
        }
        if account.min_investment < 0.0 {
            return Err(InputError::NegativeMinimum { account: label() });
        }
        if let Some(max) = account.max_investment {
            if account.min_investment > max {
                return Err(InputError::MinimumExceedsMaximum {
                    account: label(),
                    min: account.min_investment,
                    max,
                });
            }
        }
        if !seen.insert(account.id.as_str()) {
            return Err(InputError::DuplicateAccount {
                account: account.id.clone(),
            });
        }
    }
    Ok(())
}

/// Validates the request, then runs build → solve → map.
///
/// Infeasible and failed solves are returned as outcomes; only bad input is an `Err`.
pub fn optimize_savings(
    accounts: &[SavingsAccount],
    request: &OptimizationRequest,
    config: &OptimizerConfig,
    solver: &dyn MilpSolver,
) -> Result<OptimizationOutcome, InputError> {
    let total = InvestableAmount::new(request.total_investment)?;
    if !request.isa_allowance_used.is_finite() || request.isa_allowance_used < 0.0 {
        return Err(InputError::NegativeAllowanceUsed);
    }
    validate_accounts(accounts)?;

    let isa_cap = config.remaining_isa_allowance(request.isa_allowance_used);
    let model = build_model(accounts, total, isa_cap);
    debug!(
        "built model: {} variables ({} binary), {} constraints, isa cap {isa_cap}",
        model.variables.len(),
        model.binary_count(),
        model.constraints.len()
    );

    let raw = solver.solve(&model);
    match raw.status {
        SolverStatus::Error => warn!(
            "{} failed: {}",
            solver.name(),
            raw.message.as_deref().unwrap_or("unknown error")
        ),
        status => info!(
            "{} finished with status {status} for total {:.2}",
            solver.name(),
            total.value()
        ),
    }

    Ok(map_solution(raw, &model, accounts, config.min_allocation))
}

/// Owns the configuration and solver backend shared by every request.
#[derive(Clone)]
pub struct Optimizer {
    config: OptimizerConfig,
    solver: Arc<dyn MilpSolver>,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        let solver = TimeoutSolver::new(GoodLpSolver, config.solver_timeout);
        Self::with_solver(config, Arc::new(solver))
    }

    pub fn with_solver(config: OptimizerConfig, solver: Arc<dyn MilpSolver>) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn optimize(
        &self,
        accounts: &[SavingsAccount],
        request: &OptimizationRequest,
    ) -> Result<OptimizationOutcome, InputError> {
        optimize_savings(accounts, request, &self.config, self.solver.as_ref())
    }
}
