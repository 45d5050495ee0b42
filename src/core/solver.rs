use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, constraint, variable,
};

use super::model::{LinearConstraint, MilpModel, Sense, VariableKind};
use super::types::SolverStatus;

#[cfg(feature = "highs")]
use good_lp::solvers::highs::highs as backend;
#[cfg(not(feature = "highs"))]
use good_lp::solvers::microlp::microlp as backend;

#[cfg(feature = "highs")]
const BACKEND_NAME: &str = "highs";
#[cfg(not(feature = "highs"))]
const BACKEND_NAME: &str = "microlp";

/// Raw solver answer: one value per model variable when the status is Optimal.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub status: SolverStatus,
    pub values: Vec<f64>,
    pub message: Option<String>,
}

impl RawSolution {
    pub fn optimal(values: Vec<f64>) -> Self {
        Self {
            status: SolverStatus::Optimal,
            values,
            message: None,
        }
    }

    pub fn failed(status: SolverStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            values: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// An exact MILP backend. Implementations must return a global optimum or a non-Optimal status.
pub trait MilpSolver: Send + Sync {
    fn name(&self) -> &str;
    fn solve(&self, model: &MilpModel) -> RawSolution;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl MilpSolver for GoodLpSolver {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn solve(&self, model: &MilpModel) -> RawSolution {
        let mut problem = ProblemVariables::new();
        let vars: Vec<good_lp::Variable> = model
            .variables
            .iter()
            .map(|v| match v.kind {
                VariableKind::Continuous { lower, upper } => {
                    problem.add(variable().min(lower).max(upper).name(v.name.as_str()))
                }
                VariableKind::Binary => problem.add(variable().binary().name(v.name.as_str())),
            })
            .collect();

        let objective = linear_expression(&model.objective, &vars);
        let mut program = problem.maximise(objective).using(backend);
        for row in &model.constraints {
            program = program.with(to_good_lp(row, &vars));
        }

        match program.solve() {
            Ok(solution) => RawSolution::optimal(vars.iter().map(|v| solution.value(*v)).collect()),
            Err(ResolutionError::Infeasible) => {
                RawSolution::failed(SolverStatus::Infeasible, "no allocation satisfies every constraint")
            }
            Err(ResolutionError::Unbounded) => {
                RawSolution::failed(SolverStatus::Unbounded, "objective is unbounded")
            }
            Err(err) => RawSolution::failed(SolverStatus::Error, format!("{BACKEND_NAME}: {err}")),
        }
    }
}

fn linear_expression(terms: &[(usize, f64)], vars: &[good_lp::Variable]) -> Expression {
    terms.iter().map(|&(idx, coef)| coef * vars[idx]).sum()
}

fn to_good_lp(row: &LinearConstraint, vars: &[good_lp::Variable]) -> good_lp::Constraint {
    let lhs = linear_expression(&row.terms, vars);
    match row.sense {
        Sense::LessOrEqual => constraint::leq(lhs, row.rhs),
        Sense::GreaterOrEqual => constraint::geq(lhs, row.rhs),
        Sense::Equal => constraint::eq(lhs, row.rhs),
    }
}

/// Runs the wrapped solver on a worker thread and gives up after `timeout`.
///
/// A timed-out worker is left to finish on its own; its answer is discarded. A
/// panicking backend surfaces as `SolverStatus::Error`.
pub struct TimeoutSolver<S> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S: MilpSolver + 'static> TimeoutSolver<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }
}

impl<S: MilpSolver + 'static> MilpSolver for TimeoutSolver<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn solve(&self, model: &MilpModel) -> RawSolution {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let model = model.clone();
        let spawned = thread::Builder::new()
            .name("milp-solve".to_string())
            .spawn(move || {
                let _ = tx.send(inner.solve(&model));
            });
        if let Err(e) = spawned {
            return RawSolution::failed(
                SolverStatus::Error,
                format!("failed to start solver thread: {e}"),
            );
        }

        match rx.recv_timeout(self.timeout) {
            Ok(solution) => solution,
            Err(RecvTimeoutError::Timeout) => RawSolution::failed(
                SolverStatus::Error,
                format!(
                    "{} timed out after {}ms",
                    self.inner.name(),
                    self.timeout.as_millis()
                ),
            ),
            Err(RecvTimeoutError::Disconnected) => RawSolution::failed(
                SolverStatus::Error,
                format!("{} stopped without returning a result", self.inner.name()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::build_model;
    use crate::core::types::{InvestableAmount, SavingsAccount};

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    fn model_for(accounts: &[SavingsAccount], total: f64) -> MilpModel {
        build_model(
            accounts,
            InvestableAmount::new(total).expect("valid amount"),
            20_000.0,
        )
    }

    struct SlowSolver(Duration);

    impl MilpSolver for SlowSolver {
        fn name(&self) -> &str {
            "slow"
        }

        fn solve(&self, _model: &MilpModel) -> RawSolution {
            thread::sleep(self.0);
            RawSolution::optimal(Vec::new())
        }
    }

    struct PanickingSolver;

    impl MilpSolver for PanickingSolver {
        fn name(&self) -> &str {
            "panicking"
        }

        fn solve(&self, _model: &MilpModel) -> RawSolution {
            panic!("backend blew up");
        }
    }

    #[test]
    fn good_lp_finds_optimum_respecting_isa_cap() {
        let accounts = vec![
            SavingsAccount::new("Bond", 6.5).with_limits(0.0, Some(30_000.0)),
            SavingsAccount::new("ISA", 7.0)
                .with_limits(0.0, Some(20_000.0))
                .isa(),
        ];
        let model = model_for(&accounts, 50_000.0);
        let raw = GoodLpSolver.solve(&model);

        assert_eq!(raw.status, SolverStatus::Optimal);
        assert_eq!(raw.values.len(), model.variables.len());
        assert_approx(raw.values[model.accounts[0].amount], 30_000.0);
        assert_approx(raw.values[model.accounts[1].amount], 20_000.0);
    }

    #[test]
    fn good_lp_reports_infeasible_when_minimums_cannot_be_met() {
        let accounts = vec![
            SavingsAccount::new("Big", 5.0).with_limits(10_000.0, None),
            SavingsAccount::new("Bigger", 6.0).with_limits(25_000.0, None),
        ];
        let raw = GoodLpSolver.solve(&model_for(&accounts, 5_000.0));
        assert_eq!(raw.status, SolverStatus::Infeasible);
        assert!(raw.values.is_empty());
    }

    #[test]
    fn good_lp_skips_account_rather_than_breaking_its_minimum() {
        let accounts = vec![
            SavingsAccount::new("High", 8.0).with_limits(5_000.0, None),
            SavingsAccount::new("Low", 2.0),
        ];
        let model = model_for(&accounts, 3_000.0);
        let raw = GoodLpSolver.solve(&model);
        assert_eq!(raw.status, SolverStatus::Optimal);
        assert_approx(raw.values[model.accounts[0].amount], 0.0);
        assert_approx(raw.values[model.accounts[1].amount], 3_000.0);
    }

    #[test]
    fn timeout_guard_returns_error_for_slow_backend() {
        let solver = TimeoutSolver::new(
            SlowSolver(Duration::from_millis(500)),
            Duration::from_millis(20),
        );
        let raw = solver.solve(&model_for(&[SavingsAccount::new("A", 1.0)], 10.0));
        assert_eq!(raw.status, SolverStatus::Error);
        assert!(raw.values.is_empty());
        assert!(raw.message.as_deref().unwrap_or("").contains("timed out"));
    }

    #[test]
    fn timeout_guard_turns_panic_into_error() {
        let solver = TimeoutSolver::new(PanickingSolver, Duration::from_secs(5));
        let raw = solver.solve(&model_for(&[SavingsAccount::new("A", 1.0)], 10.0));
        assert_eq!(raw.status, SolverStatus::Error);
        assert_eq!(solver.name(), "panicking");
    }

    #[test]
    fn timeout_guard_passes_through_fast_result() {
        let accounts = vec![SavingsAccount::new("Only", 3.0)];
        let model = model_for(&accounts, 1_234.0);
        let solver = TimeoutSolver::new(GoodLpSolver, Duration::from_secs(10));
        let raw = solver.solve(&model);
        assert_eq!(raw.status, SolverStatus::Optimal);
        assert_approx(raw.values[model.accounts[0].amount], 1_234.0);
    }
}
