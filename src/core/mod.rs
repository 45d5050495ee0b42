mod engine;
mod error;
mod mapper;
mod model;
mod solver;
mod types;

pub use engine::{OptimizationRequest, Optimizer, optimize_savings, validate_accounts};
pub use error::InputError;
pub use mapper::{map_solution, round_currency};
pub use model::{
    AccountVariables, LinearConstraint, MilpModel, Sense, Variable, VariableKind, build_model,
};
pub use solver::{GoodLpSolver, MilpSolver, RawSolution, TimeoutSolver};
pub use types::{
    Allocation, InvestableAmount, Investment, OptimizationOutcome, SavingsAccount, SolverStatus,
};
