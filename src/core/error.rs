use thiserror::Error;

/// Request or catalog problems caught before a model is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("total_investment is required")]
    MissingInvestment,

    #[error("total_investment must be >= 0, got {0}")]
    NegativeInvestment(f64),

    #[error("total_investment must be a finite number")]
    NonFiniteInvestment,

    #[error("isa_allowance_used must be a finite number >= 0")]
    NegativeAllowanceUsed,

    #[error("account catalog is empty")]
    EmptyCatalog,

    #[error("account '{account}' has a negative rate")]
    NegativeRate { account: String },

    #[error("account '{account}' has a negative minimum investment")]
    NegativeMinimum { account: String },

    #[error("account '{account}' has minimum {min} above maximum {max}")]
    MinimumExceedsMaximum { account: String, min: f64, max: f64 },

    #[error("account '{account}' has a non-finite {field}")]
    NonFiniteValue {
        account: String,
        field: &'static str,
    },

    #[error("account id '{account}' appears more than once in the catalog")]
    DuplicateAccount { account: String },
}
