mod builtin;
mod file;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{InputError, SavingsAccount};

pub use builtin::BuiltinCatalog;
pub use file::{JsonFileCatalog, parse_catalog};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog entry: {0}")]
    Invalid(#[from] InputError),
}

/// Supplies the savings products available for one optimization request.
///
/// Providers are queried afresh for every request; implementations must not hand
/// out state shared with other requests.
pub trait AccountCatalogProvider: Send + Sync {
    fn accounts(&self) -> Result<Vec<SavingsAccount>, CatalogError>;
}
