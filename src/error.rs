use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error: {} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Error decoding invoice: {source}")]
    Parse {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("Invalid invoice {}:\n  {}", path.display(), problems.join("\n  "))]
    Invalid {
        path: PathBuf,
        problems: Vec<String>,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum BillingError {
    #[error("Invoice total is too large to compute (adding items[{index}])")]
    Overflow { index: usize },
}
