use std::convert::From;

use crate::app::config::ConfigError;
use crate::backend::BackendError;

#[derive(Debug, Clone)]
pub enum Error {
    Backend(BackendError),
    Config(String),
    /// No pane is registered under the given key: a shell wiring bug.
    UnknownPane(String),
    /// The given name is not in the loaded wallet list: a shell wiring bug.
    UnknownWallet(String),
    /// A wallet-scoped action was requested while no wallet is selected.
    NoWalletSelected,
    /// The change amount of the transaction under construction is negative.
    InsufficientFunds,
    Unexpected(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Backend(e) => write!(f, "{}", e),
            Self::Config(e) => write!(f, "{}", e),
            Self::UnknownPane(key) => write!(f, "No pane is registered under '{}'", key),
            Self::UnknownWallet(name) => write!(f, "Unknown wallet '{}'", name),
            Self::NoWalletSelected => write!(f, "No wallet is selected"),
            Self::InsufficientFunds => write!(f, "Not enough funds to cover the transaction"),
            Self::Unexpected(e) => write!(f, "Unexpected error: {}", e),
        }
    }
}

impl From<BackendError> for Error {
    fn from(error: BackendError) -> Self {
        Error::Backend(error)
    }
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Error::Config(error.to_string())
    }
}
