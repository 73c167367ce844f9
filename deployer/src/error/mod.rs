use thiserror::Error;

use crate::chain::ChainError;
use crate::reconciler::ReconcileError;
use crate::types::CurrencyKeyError;

/// Result type for deployer operations
pub type DeployerResult<T> = Result<T, DeployerError>;

/// Configuration validation error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be provided in config file or environment")]
    MissingField(&'static str),

    #[error("Synth {0} is configured more than once")]
    DuplicateSynth(String),
}

/// Main error enum for the deployer
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Chain error: {0}")]
    ChainError(#[from] ChainError),

    #[error("Reconciliation failed: {0}")]
    ReconcileError(#[from] ReconcileError),

    #[error("Invalid currency key: {0}")]
    CurrencyKeyError(#[from] CurrencyKeyError),

    // File I/O errors
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Contract {0} is neither flagged for deployment nor present in the deployment file")]
    MissingContract(String),

    #[error("Cannot deploy {contract}: dependency {dependency} is not available")]
    MissingDependency { contract: String, dependency: String },

    #[error("{contract}.{function} returned an unexpected value: {value}")]
    UnexpectedValue { contract: String, function: String, value: String },
}
