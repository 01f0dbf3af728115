// rpc.rs - JSON-RPC transport for read-only contract calls

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use grid_rules::Address;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::trace;

use crate::error::ChainError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can execute an `eth_call` against the latest block.
pub trait CallTransport: Send + Sync {
    fn call(&self, to: &Address, data: Vec<u8>) -> impl Future<Output = Result<Vec<u8>, ChainError>> + Send;
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC client bound to one endpoint.
pub struct RpcClient {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self, ChainError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, url: url.into(), next_id: AtomicU64::new(1) })
    }

    pub async fn eth_call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = call_request(id, to, data);
        trace!(id, to = %to, bytes = data.len(), "eth_call");

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        call_result(response)
    }
}

impl CallTransport for RpcClient {
    async fn call(&self, to: &Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        self.eth_call(to, &data).await
    }
}

fn call_request(id: u64, to: &Address, data: &[u8]) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        id,
        method: "eth_call",
        params: json!([
            { "to": to.to_string(), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]),
    }
}

fn call_result(response: RpcResponse) -> Result<Vec<u8>, ChainError> {
    if let Some(err) = response.error {
        return Err(ChainError::Rpc { code: err.code, message: err.message });
    }
    let result = response.result.ok_or(ChainError::EmptyResponse)?;
    let digits = result.strip_prefix("0x").unwrap_or(&result);
    hex::decode(digits).map_err(|e| ChainError::Hex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Vec<u8>, ChainError> {
        call_result(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn request_shape() {
        let to: Address = "0xcA11bde05977b3631167028862bE2a173976CA11".parse().unwrap();
        let request = serde_json::to_value(call_request(7, &to, &[0xb7, 0xd0, 0x62, 0x8b])).unwrap();
        assert_eq!(
            request,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "eth_call",
                "params": [
                    { "to": "0xca11bde05977b3631167028862be2a173976ca11", "data": "0xb7d0628b" },
                    "latest"
                ]
            })
        );
    }

    #[test]
    fn result_is_hex_decoded() {
        let bytes = parse(r#"{"jsonrpc":"2.0","id":1,"result":"0x00ff10"}"#).unwrap();
        assert_eq!(bytes, vec![0x00, 0xff, 0x10]);
        assert!(parse(r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#).unwrap().is_empty());
    }

    #[test]
    fn rpc_error_wins() {
        let err = parse(r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#)
            .unwrap_err();
        assert!(matches!(err, ChainError::Rpc { code: 3, ref message } if message == "execution reverted"));
    }

    #[test]
    fn missing_or_bad_result() {
        assert!(matches!(parse(r#"{"jsonrpc":"2.0","id":1}"#), Err(ChainError::EmptyResponse)));
        assert!(matches!(parse(r#"{"jsonrpc":"2.0","id":1,"result":"0xzz"}"#), Err(ChainError::Hex(_))));
    }
}
