use super::model::MilpModel;
use super::solver::RawSolution;
use super::types::{Allocation, Investment, OptimizationOutcome, SavingsAccount, SolverStatus};

const SEARCH_URL_PREFIX: &str = "https://www.google.com/search?q=";

const TERM_KEYWORDS: [(&str, &str); 7] = [
    ("1 month", "1 month"),
    ("3 month", "3 months"),
    ("6 month", "6 months"),
    ("1 year", "1 year"),
    ("2 year", "2 years"),
    ("3 year", "3 years"),
    ("5 year", "5 years"),
];

pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turns a raw assignment into the reported allocation.
///
/// Amounts below `min_allocation` are dropped as solver noise; the rest are rounded
/// to pence and the total return is computed from the rounded amounts.
pub fn map_solution(
    raw: RawSolution,
    model: &MilpModel,
    accounts: &[SavingsAccount],
    min_allocation: f64,
) -> OptimizationOutcome {
    if !raw.status.is_optimal() {
        return OptimizationOutcome::without_allocation(raw.status, raw.message);
    }
    if raw.values.len() != model.variables.len() || model.accounts.len() != accounts.len() {
        return OptimizationOutcome::without_allocation(
            SolverStatus::Error,
            Some(format!(
                "solver returned {} values for a model with {} variables",
                raw.values.len(),
                model.variables.len()
            )),
        );
    }

    let mut entries = Vec::new();
    let mut investments = Vec::new();
    let mut total_return = 0.0;
    for (account, vars) in accounts.iter().zip(&model.accounts) {
        let solved = raw.values[vars.amount];
        if !solved.is_finite() || solved < min_allocation {
            continue;
        }
        let amount = round_currency(solved);
        total_return += amount * account.aer / 100.0;
        entries.push((account.id.clone(), amount));
        investments.push(Investment {
            account_name: account.name.clone(),
            amount,
            aer: account.aer,
            term: display_term(account),
            is_isa: account.is_isa,
            url: display_url(account),
            platform: account.platform.clone(),
        });
    }

    OptimizationOutcome {
        status: SolverStatus::Optimal,
        allocation: Allocation::from_entries(entries),
        investments,
        total_return: round_currency(total_return),
        message: None,
    }
}

fn display_term(account: &SavingsAccount) -> String {
    let term = account.term.trim();
    if !term.is_empty() {
        return term.to_string();
    }
    let name = account.name.to_lowercase();
    TERM_KEYWORDS
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| "Easy access".to_string())
}

fn display_url(account: &SavingsAccount) -> String {
    match account.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("{SEARCH_URL_PREFIX}{}", account.name.replace(' ', "+")),
    }
}
