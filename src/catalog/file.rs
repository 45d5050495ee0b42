use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use super::{AccountCatalogProvider, CatalogError};
use crate::core::{SavingsAccount, validate_accounts};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AccountRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(alias = "interest_rate")]
    aer: f64,
    #[serde(default)]
    min_investment: f64,
    #[serde(default)]
    max_investment: Option<f64>,
    #[serde(default)]
    is_isa: bool,
    #[serde(default)]
    term: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    platform: Option<String>,
}

impl From<AccountRecord> for SavingsAccount {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id.unwrap_or_else(|| record.name.clone()),
            name: record.name,
            aer: record.aer,
            min_investment: record.min_investment,
            max_investment: record.max_investment,
            is_isa: record.is_isa,
            term: record.term,
            url: record.url,
            platform: record.platform,
        }
    }
}

/// Parses and validates a JSON array of account records.
pub fn parse_catalog(json: &str) -> Result<Vec<SavingsAccount>, CatalogError> {
    let records: Vec<AccountRecord> = serde_json::from_str(json)?;
    let accounts: Vec<SavingsAccount> = records.into_iter().map(SavingsAccount::from).collect();
    validate_accounts(&accounts)?;
    Ok(accounts)
}

/// Catalog backed by a JSON file, re-read on every request.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccountCatalogProvider for JsonFileCatalog {
    fn accounts(&self) -> Result<Vec<SavingsAccount>, CatalogError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let accounts = parse_catalog(&raw)?;
        debug!("loaded {} accounts from {}", accounts.len(), self.path.display());
        Ok(accounts)
    }
}
