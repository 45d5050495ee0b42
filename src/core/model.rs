use super::types::{InvestableAmount, SavingsAccount};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableKind {
    Continuous { lower: f64, upper: f64 },
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

/// `Σ coefficient · variable  <sense>  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// Indices of the two decision variables owned by one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountVariables {
    pub amount: usize,
    pub used: usize,
}

/// Backend-neutral mixed-integer program. The objective is always maximised.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpModel {
    pub variables: Vec<Variable>,
    pub constraints: Vec<LinearConstraint>,
    pub objective: Vec<(usize, f64)>,
    pub accounts: Vec<AccountVariables>,
}

impl MilpModel {
    fn add_variable(&mut self, name: String, kind: VariableKind) -> usize {
        self.variables.push(Variable { name, kind });
        self.variables.len() - 1
    }

    fn add_constraint(
        &mut self,
        name: String,
        terms: Vec<(usize, f64)>,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name,
            terms,
            sense,
            rhs,
        });
    }

    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VariableKind::Binary)
            .count()
    }
}

/// Builds the allocation MILP. Accounts must already be validated.
///
/// Each account gets an amount `x_i` and an indicator `y_i`; the pair of linking
/// rows `x_i >= min_i * y_i` and `x_i <= max_i * y_i` makes every account either
/// untouched or funded within its limits.
pub fn build_model(accounts: &[SavingsAccount], total: InvestableAmount, isa_cap: f64) -> MilpModel {
    let mut model = MilpModel {
        variables: Vec::with_capacity(accounts.len() * 2),
        constraints: Vec::with_capacity(accounts.len() * 2 + 2),
        objective: Vec::with_capacity(accounts.len()),
        accounts: Vec::with_capacity(accounts.len()),
    };

    for (idx, account) in accounts.iter().enumerate() {
        let upper = account.effective_max(total);
        let amount = model.add_variable(
            format!("x_{idx}"),
            VariableKind::Continuous { lower: 0.0, upper },
        );
        let used = model.add_variable(format!("y_{idx}"), VariableKind::Binary);

        model.add_constraint(
            format!("min_{idx}"),
            vec![(amount, 1.0), (used, -account.min_investment)],
            Sense::GreaterOrEqual,
            0.0,
        );
        model.add_constraint(
            format!("max_{idx}"),
            vec![(amount, 1.0), (used, -upper)],
            Sense::LessOrEqual,
            0.0,
        );

        model.objective.push((amount, account.aer / 100.0));
        model.accounts.push(AccountVariables { amount, used });
    }

    let budget = model.accounts.iter().map(|vars| (vars.amount, 1.0)).collect();
    model.add_constraint("budget".to_string(), budget, Sense::Equal, total.value());

    let isa_terms: Vec<(usize, f64)> = accounts
        .iter()
        .zip(&model.accounts)
        .filter(|(account, _)| account.is_isa)
        .map(|(_, vars)| (vars.amount, 1.0))
        .collect();
    if !isa_terms.is_empty() {
        model.add_constraint("isa_cap".to_string(), isa_terms, Sense::LessOrEqual, isa_cap);
    }

    model
}
