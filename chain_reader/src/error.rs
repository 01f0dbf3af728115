use thiserror::Error;

/// Failures while decoding ABI-encoded return data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("return data too short: need {needed} bytes, got {got}")]
    Short { needed: usize, got: usize },
    #[error("word at byte {at} does not fit in {bits} bits")]
    Overflow { at: usize, bits: u32 },
    #[error("word at byte {at} is not a valid {kind}")]
    Invalid { at: usize, kind: &'static str },
    #[error("expected {expected} results, got {got}")]
    Count { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("rpc response carried neither result nor error")]
    EmptyResponse,
    #[error("rpc result is not hex: {0}")]
    Hex(String),
    #[error("abi decode failed: {0}")]
    Abi(#[from] AbiError),
    #[error("multicall sub-call {index} failed")]
    CallFailed { index: usize },
}
