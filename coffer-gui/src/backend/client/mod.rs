use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use super::{Backend, BackendError};

pub mod jsonrpc;

pub trait Client {
    type Error: Into<BackendError> + Debug;
    fn request<S: Serialize + Debug, D: DeserializeOwned + Debug>(
        &self,
        method: &str,
        params: Option<S>,
    ) -> Result<D, Self::Error>;
}

/// Placeholder for requests without parameters.
#[derive(Debug, Serialize)]
pub struct Request {}

/// A `cofferd` reached through a [`Client`] transport.
#[derive(Debug, Clone)]
pub struct Cofferd<C: Client> {
    client: C,
}

impl<C: Client> Cofferd<C> {
    pub fn new(client: C) -> Cofferd<C> {
        Cofferd { client }
    }

    /// Generic call function for RPC calls.
    fn call<T: Serialize + Debug, U: DeserializeOwned + Debug>(
        &self,
        method: &str,
        input: Option<T>,
    ) -> Result<U, BackendError> {
        info!("{}", method);
        self.client.request(method, input).map_err(|e| {
            error!("method {} failed: {:?}", method, e);
            e.into()
        })
    }
}

#[async_trait]
impl<C: Client + Send + Sync + Debug> Backend for Cofferd<C> {
    async fn get_wallet_list(&self) -> Result<Vec<String>, BackendError> {
        self.call("get_wallet_list", Option::<Request>::None)
    }

    async fn get_address(&self, wallet_name: &str) -> Result<String, BackendError> {
        self.call("get_address", Some(json!({ "wallet_name": wallet_name })))
    }

    async fn get_mnemonic(
        &self,
        wallet_name: &str,
        decryptor: &str,
    ) -> Result<String, BackendError> {
        self.call(
            "get_mnemonic",
            Some(json!({ "wallet_name": wallet_name, "decryptor": decryptor })),
        )
    }

    async fn create_new_random_wallet(
        &self,
        name: &str,
        decryptor: &str,
    ) -> Result<String, BackendError> {
        self.call(
            "create_new_random_wallet",
            Some(json!({ "name": name, "decryptor": decryptor })),
        )
    }

    async fn restore_wallet(
        &self,
        name: &str,
        decryptor: &str,
        mnemonic: &str,
    ) -> Result<(), BackendError> {
        self.call(
            "restore_wallet",
            Some(json!({ "name": name, "decryptor": decryptor, "mnemonic": mnemonic })),
        )
    }
}
