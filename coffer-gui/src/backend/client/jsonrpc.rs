use std::fmt::Debug;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Client;
use crate::backend::BackendError;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The backend answered the request, but refused it.
    Rpc(i32, String),
    /// The answer carried neither a result nor an error.
    NoErrorOrResult,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Error with socket communication: {}", e),
            Self::Json(e) => write!(f, "Error with JSON encoding: {}", e),
            Self::Rpc(code, e) => write!(f, "[{}] {}", code, e),
            Self::NoErrorOrResult => write!(f, "Answer has neither a result nor an error"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}

impl From<Error> for BackendError {
    fn from(e: Error) -> BackendError {
        match e {
            Error::Io(e) => BackendError::RpcSocket(Some(e.kind()), e.to_string()),
            Error::Json(e) => BackendError::Unexpected(e.to_string()),
            Error::Rpc(code, message) => BackendError::Rpc(code, message),
            Error::NoErrorOrResult => BackendError::NoAnswer,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: i32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Response {
    result: Option<serde_json::Value>,
    error: Option<ErrorResponse>,
}

/// JSON-RPC 2.0 client over the `cofferd` Unix domain socket, one
/// newline-delimited request/response exchange per connection.
#[derive(Debug)]
pub struct JsonRpcClient {
    socket_path: PathBuf,
    id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(socket_path: &Path) -> JsonRpcClient {
        JsonRpcClient {
            socket_path: socket_path.to_path_buf(),
            id: AtomicU64::new(0),
        }
    }
}

impl Client for JsonRpcClient {
    type Error = Error;

    fn request<S: Serialize + Debug, D: DeserializeOwned + Debug>(
        &self,
        method: &str,
        params: Option<S>,
    ) -> Result<D, Self::Error> {
        let id = self.id.fetch_add(1, Ordering::SeqCst);
        let mut request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
        });
        if let Some(params) = params {
            request["params"] = serde_json::to_value(params)?;
        }

        let mut stream = UnixStream::connect(&self.socket_path)?;
        let mut payload = serde_json::to_vec(&request)?;
        payload.push(b'\n');
        stream.write_all(&payload)?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let response: Response = serde_json::from_str(&line)?;
        if let Some(e) = response.error {
            return Err(Error::Rpc(e.code, e.message));
        }
        match response.result {
            Some(result) => Ok(serde_json::from_value(result)?),
            None => Err(Error::NoErrorOrResult),
        }
    }
}
