//! Replay backend for tests: a [`Client`] fed with the expected
//! (request, response) exchanges, asserting each request as it comes.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::backend::client::{Client, Cofferd};
use crate::backend::{Backend, BackendError};

/// Expected request as `{"method": .., "params": ..}` (`None` skips the
/// assertion), and the result or `(code, message)` RPC error to answer.
pub type Exchange = (Option<Value>, Result<Value, (i32, String)>);

#[derive(Debug)]
pub struct ReplayClient {
    exchanges: Mutex<VecDeque<Exchange>>,
}

impl ReplayClient {
    pub fn new(exchanges: Vec<Exchange>) -> ReplayClient {
        ReplayClient {
            exchanges: Mutex::new(exchanges.into()),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Rpc(i32, String),
}

impl From<Error> for BackendError {
    fn from(e: Error) -> BackendError {
        match e {
            Error::Rpc(code, message) => BackendError::Rpc(code, message),
        }
    }
}

impl Client for ReplayClient {
    type Error = Error;

    fn request<S: Serialize + Debug, D: DeserializeOwned + Debug>(
        &self,
        method: &str,
        params: Option<S>,
    ) -> Result<D, Self::Error> {
        let (expected, response) = self
            .exchanges
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {}", method));
        let request = json!({ "method": method, "params": params });
        if let Some(expected) = expected {
            assert_eq!(expected, request);
        }
        match response {
            Ok(value) => Ok(serde_json::from_value(value).expect("mock response type")),
            Err((code, message)) => Err(Error::Rpc(code, message)),
        }
    }
}

/// A [`Backend`] over a [`ReplayClient`], ready to inject.
pub fn backend(exchanges: Vec<Exchange>) -> Arc<dyn Backend + Send + Sync> {
    Arc::new(Cofferd::new(ReplayClient::new(exchanges)))
}
