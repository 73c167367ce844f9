use std::fmt;
use std::str::FromStr;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency key of the base synth. It is the only synth with a legacy ERC20 proxy.
pub const BASE_CURRENCY_KEY: &str = "zUSD";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyKeyError {
    #[error("Currency key must not be empty")]
    Empty,
    #[error("Currency key '{0}' does not fit in 32 bytes")]
    TooLong(String),
}

/// Human readable ticker of a synth, e.g. `zBTC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyKey(String);

impl CurrencyKey {
    pub fn new(key: impl Into<String>) -> Result<Self, CurrencyKeyError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CurrencyKeyError::Empty);
        }
        if key.len() > B256::len_bytes() {
            return Err(CurrencyKeyError::TooLong(key));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_base(&self) -> bool {
        self.0 == BASE_CURRENCY_KEY
    }

    /// Encodes the key the way the contracts store it: ASCII bytes, right padded with zeros.
    pub fn to_bytes32(&self) -> B256 {
        let mut word = [0u8; 32];
        let bytes = self.0.as_bytes();
        word[..bytes.len()].copy_from_slice(bytes);
        B256::from(word)
    }
}

impl TryFrom<String> for CurrencyKey {
    type Error = CurrencyKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyKey> for String {
    fn from(key: CurrencyKey) -> Self {
        key.0
    }
}

impl FromStr for CurrencyKey {
    type Err = CurrencyKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for CurrencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
