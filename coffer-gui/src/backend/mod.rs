pub mod client;

use std::fmt::Debug;
use std::io::ErrorKind;

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub enum BackendError {
    /// Something was wrong with the request.
    Rpc(i32, String),
    /// Something was wrong with the rpc socket communication.
    RpcSocket(Option<ErrorKind>, String),
    /// Something unexpected happened.
    Unexpected(String),
    /// No response.
    NoAnswer,
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Rpc(code, e) => write!(f, "Backend error rpc call: [{:?}] {}", code, e),
            Self::NoAnswer => write!(f, "Backend returned no answer"),
            Self::RpcSocket(kind, e) => write!(f, "Backend transport error: [{:?}] {}", kind, e),
            Self::Unexpected(e) => write!(f, "Backend unexpected error: {}", e),
        }
    }
}

/// The remote wallet backend.
///
/// Everything touching key material lives behind this boundary: the GUI
/// only ever sees wallet names, addresses and mnemonic phrases, and always
/// names the wallet it is asking about.
#[async_trait]
pub trait Backend: Debug {
    /// Names of the wallets the backend knows about, in no particular
    /// order.
    async fn get_wallet_list(&self) -> Result<Vec<String>, BackendError>;
    /// Current receive address of the named wallet.
    async fn get_address(&self, wallet_name: &str) -> Result<String, BackendError>;
    /// Decrypted mnemonic of the named wallet. Fails if `decryptor` is
    /// wrong.
    async fn get_mnemonic(&self, wallet_name: &str, decryptor: &str)
        -> Result<String, BackendError>;
    /// Creates a wallet from fresh entropy and returns its mnemonic, which
    /// the caller must present for backup.
    async fn create_new_random_wallet(
        &self,
        name: &str,
        decryptor: &str,
    ) -> Result<String, BackendError>;
    /// Creates a wallet from an existing mnemonic. The backend owns
    /// mnemonic validity.
    async fn restore_wallet(
        &self,
        name: &str,
        decryptor: &str,
        mnemonic: &str,
    ) -> Result<(), BackendError>;
}
