use super::{AccountCatalogProvider, CatalogError};
use crate::core::SavingsAccount;

/// Fixed sample catalog used when no catalog file is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl AccountCatalogProvider for BuiltinCatalog {
    fn accounts(&self) -> Result<Vec<SavingsAccount>, CatalogError> {
        Ok(vec![
            SavingsAccount::new("Easy Access Saver", 5.0)
                .with_limits(0.0, Some(250_000.0))
                .with_term("Easy access"),
            SavingsAccount::new("Fixed Rate Bond 1 Year", 6.5)
                .with_limits(0.0, Some(100_000.0))
                .with_term("1 year"),
            SavingsAccount::new("Easy Access ISA", 5.5)
                .with_limits(0.0, Some(20_000.0))
                .with_term("Easy access")
                .isa(),
            SavingsAccount::new("Fixed Rate ISA 2 Year", 7.0)
                .with_limits(0.0, Some(20_000.0))
                .with_term("2 years")
                .isa(),
            SavingsAccount::new("Super Saver", 4.0)
                .with_limits(1_000.0, Some(500_000.0))
                .with_term("Easy access"),
        ])
    }
}
