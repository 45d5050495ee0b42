use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::InputError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub id: String,
    pub name: String,
    /// Annual equivalent rate in percent, e.g. 6.5.
    pub aer: f64,
    pub min_investment: f64,
    /// `None` means the product has no upper limit.
    pub max_investment: Option<f64>,
    pub is_isa: bool,
    pub term: String,
    pub url: Option<String>,
    pub platform: Option<String>,
}

impl SavingsAccount {
    pub fn new(name: impl Into<String>, aer: f64) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            aer,
            min_investment: 0.0,
            max_investment: None,
            is_isa: false,
            term: String::new(),
            url: None,
            platform: None,
        }
    }

    pub fn with_limits(mut self, min_investment: f64, max_investment: Option<f64>) -> Self {
        self.min_investment = min_investment;
        self.max_investment = max_investment;
        self
    }

    pub fn isa(mut self) -> Self {
        self.is_isa = true;
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Upper bound used by the model; an unbounded product is capped by the amount being invested.
    pub fn effective_max(&self, total: InvestableAmount) -> f64 {
        self.max_investment.unwrap_or(total.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct InvestableAmount(f64);

impl InvestableAmount {
    pub fn new(value: f64) -> Result<Self, InputError> {
        if !value.is_finite() {
            return Err(InputError::NonFiniteInvestment);
        }
        if value < 0.0 {
            return Err(InputError::NegativeInvestment(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        self == SolverStatus::Optimal
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolverStatus::Optimal => "Optimal",
            SolverStatus::Infeasible => "Infeasible",
            SolverStatus::Unbounded => "Unbounded",
            SolverStatus::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Invested amount per account id, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    entries: Vec<(String, f64)>,
}

impl Allocation {
    pub(crate) fn from_entries(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, account_id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(id, _)| id == account_id)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, amount)| (id.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Investment {
    pub account_name: String,
    pub amount: f64,
    pub aer: f64,
    pub term: String,
    pub is_isa: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub status: SolverStatus,
    pub allocation: Allocation,
    pub investments: Vec<Investment>,
    pub total_return: f64,
    pub message: Option<String>,
}

impl OptimizationOutcome {
    pub fn without_allocation(status: SolverStatus, message: Option<String>) -> Self {
        Self {
            status,
            allocation: Allocation::default(),
            investments: Vec::new(),
            total_return: 0.0,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn investable_amount_rejects_negative_and_non_finite_values() {
        assert!(matches!(
            InvestableAmount::new(-1.0),
            Err(InputError::NegativeInvestment(_))
        ));
        assert!(matches!(
            InvestableAmount::new(f64::NAN),
            Err(InputError::NonFiniteInvestment)
        ));
        assert!(matches!(
            InvestableAmount::new(f64::INFINITY),
            Err(InputError::NonFiniteInvestment)
        ));
        assert_eq!(InvestableAmount::new(0.0).map(|t| t.value()).ok(), Some(0.0));
    }

    #[test]
    fn unbounded_account_is_capped_by_total_investment() {
        let total = InvestableAmount::new(12_345.0).expect("valid amount");
        let open = SavingsAccount::new("Open", 4.0);
        let capped = SavingsAccount::new("Capped", 4.0).with_limits(0.0, Some(500.0));
        assert_eq!(open.effective_max(total), 12_345.0);
        assert_eq!(capped.effective_max(total), 500.0);
    }

    #[test]
    fn allocation_lookup_and_total() {
        let allocation = Allocation::from_entries(vec![
            ("a".to_string(), 100.25),
            ("b".to_string(), 50.0),
        ]);
        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation.get("a"), Some(100.25));
        assert_eq!(allocation.get("missing"), None);
        assert!((allocation.total() - 150.25).abs() < 1e-9);
    }

    #[test]
    fn status_serializes_with_canonical_labels() {
        let json = serde_json::to_string(&[
            SolverStatus::Optimal,
            SolverStatus::Infeasible,
            SolverStatus::Unbounded,
            SolverStatus::Error,
        ])
        .expect("serializable");
        assert_eq!(json, r#"["Optimal","Infeasible","Unbounded","Error"]"#);
        assert_eq!(SolverStatus::Infeasible.to_string(), "Infeasible");
    }
}
