// abi.rs - Solidity ABI codec for the handful of calls the viewer makes
//
// Only static words, addresses and `bytes` are needed: the game contract is
// read through getGameState()/getAgentAt(x, y), and the per-cell reads are
// batched through Multicall3.aggregate3.

use grid_rules::{Address, Bounds, GameState};

use crate::error::AbiError;

pub const WORD: usize = 32;

pub const GET_GAME_STATE: [u8; 4] = [0xb7, 0xd0, 0x62, 0x8b]; // getGameState()
pub const GET_AGENT_AT: [u8; 4] = [0x25, 0x1c, 0x22, 0xcb]; // getAgentAt(uint256,uint256)
pub const AGGREGATE3: [u8; 4] = [0x82, 0xad, 0x56, 0xcb]; // aggregate3((address,bool,bytes)[])

/// One entry of an aggregate3 batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call3 {
    pub target: Address,
    pub allow_failure: bool,
    pub call_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    pub success: bool,
    pub return_data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Encoding

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn push_uint(out: &mut Vec<u8>, value: u128) {
    out.extend_from_slice(&[0u8; 16]);
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_address(out: &mut Vec<u8>, address: &Address) {
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(address.as_bytes());
}

fn push_bytes(out: &mut Vec<u8>, data: &[u8]) {
    push_uint(out, data.len() as u128);
    out.extend_from_slice(data);
    out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
}

pub fn encode_get_game_state() -> Vec<u8> {
    GET_GAME_STATE.to_vec()
}

pub fn encode_get_agent_at(x: u64, y: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 2 * WORD);
    out.extend_from_slice(&GET_AGENT_AT);
    push_uint(&mut out, x.into());
    push_uint(&mut out, y.into());
    out
}

/// Calldata for `aggregate3(Call3[])`.
pub fn encode_aggregate3(calls: &[Call3]) -> Vec<u8> {
    let tuple_len = |call: &Call3| 4 * WORD + padded_len(call.call_data.len());
    let body_len: usize = calls.iter().map(|c| WORD + tuple_len(c)).sum();

    let mut out = Vec::with_capacity(4 + 2 * WORD + body_len);
    out.extend_from_slice(&AGGREGATE3);
    push_uint(&mut out, WORD as u128); // array offset
    push_uint(&mut out, calls.len() as u128);

    // Heads: tuple offsets, relative to the first head
    let mut offset = calls.len() * WORD;
    for call in calls {
        push_uint(&mut out, offset as u128);
        offset += tuple_len(call);
    }
    for call in calls {
        push_address(&mut out, &call.target);
        push_uint(&mut out, u128::from(call.allow_failure));
        push_uint(&mut out, (3 * WORD) as u128); // bytes offset inside the tuple
        push_bytes(&mut out, &call.call_data);
    }
    out
}

// ---------------------------------------------------------------------------
// Decoding

fn advance(base: usize, by: usize, data: &[u8]) -> Result<usize, AbiError> {
    base.checked_add(by).ok_or(AbiError::Short { needed: usize::MAX, got: data.len() })
}

fn word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let end = advance(at, WORD, data)?;
    data.get(at..end).ok_or(AbiError::Short { needed: end, got: data.len() })
}

pub(crate) fn read_u128(data: &[u8], at: usize) -> Result<u128, AbiError> {
    let w = word(data, at)?;
    if w[..16].iter().any(|&b| b != 0) {
        return Err(AbiError::Overflow { at, bits: 128 });
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&w[16..]);
    Ok(u128::from_be_bytes(low))
}

pub(crate) fn read_u64(data: &[u8], at: usize) -> Result<u64, AbiError> {
    u64::try_from(read_u128(data, at)?).map_err(|_| AbiError::Overflow { at, bits: 64 })
}

pub(crate) fn read_i64(data: &[u8], at: usize) -> Result<i64, AbiError> {
    i64::try_from(read_u64(data, at)?).map_err(|_| AbiError::Overflow { at, bits: 63 })
}

pub(crate) fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    usize::try_from(read_u64(data, at)?).map_err(|_| AbiError::Overflow { at, bits: usize::BITS })
}

pub(crate) fn read_bool(data: &[u8], at: usize) -> Result<bool, AbiError> {
    match read_u128(data, at) {
        Ok(0) => Ok(false),
        Ok(1) => Ok(true),
        Ok(_) | Err(AbiError::Overflow { .. }) => Err(AbiError::Invalid { at, kind: "bool" }),
        Err(err) => Err(err),
    }
}

pub(crate) fn read_address(data: &[u8], at: usize) -> Result<Address, AbiError> {
    let w = word(data, at)?;
    if w[..12].iter().any(|&b| b != 0) {
        return Err(AbiError::Invalid { at, kind: "address" });
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&w[12..]);
    Ok(Address(bytes))
}

/// Length-prefixed `bytes` starting at `at`.
pub(crate) fn read_bytes(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(data, at)?;
    let start = advance(at, WORD, data)?;
    let end = advance(start, len, data)?;
    data.get(start..end).ok_or(AbiError::Short { needed: end, got: data.len() })
}

/// Return data of `getGameState()`: nine uint256 words.
pub fn decode_game_state(data: &[u8]) -> Result<GameState, AbiError> {
    let at = |i: usize| i * WORD;
    Ok(GameState {
        game_id: read_u64(data, at(0))?,
        bounds: Bounds {
            min_x: read_i64(data, at(1))?,
            max_x: read_i64(data, at(2))?,
            min_y: read_i64(data, at(3))?,
            max_y: read_i64(data, at(4))?,
        },
        last_advance_at: read_u64(data, at(5))?,
        eth_pool: read_u128(data, at(6))?,
        token_pool: read_u128(data, at(7))?,
        next_advance_at: read_u64(data, at(8))?,
    })
}

/// Return data of `getAgentAt(x, y)`.
pub fn decode_address(data: &[u8]) -> Result<Address, AbiError> {
    read_address(data, 0)
}

/// Return data of `aggregate3`: `(bool success, bytes returnData)[]`.
pub fn decode_aggregate3(data: &[u8]) -> Result<Vec<CallResult>, AbiError> {
    let array = read_usize(data, 0)?;
    let len = read_usize(data, array)?;
    let heads = advance(array, WORD, data)?;
    if len > data.len() / WORD {
        return Err(AbiError::Short { needed: len.saturating_mul(WORD), got: data.len() });
    }

    let mut results = Vec::with_capacity(len);
    for i in 0..len {
        let tuple = advance(heads, read_usize(data, heads + i * WORD)?, data)?;
        let success = read_bool(data, tuple)?;
        let bytes_at = advance(tuple, read_usize(data, advance(tuple, WORD, data)?)?, data)?;
        results.push(CallResult {
            success,
            return_data: read_bytes(data, bytes_at)?.to_vec(),
        });
    }
    Ok(results)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xaa;
        bytes[19] = last;
        Address(bytes)
    }

    #[test]
    fn get_agent_at_layout() {
        let data = encode_get_agent_at(3, 97);
        assert_eq!(data.len(), 68);
        assert_eq!(&data[..4], &[0x25, 0x1c, 0x22, 0xcb]);
        assert_eq!(data[4 + 31], 3);
        assert_eq!(data[4 + 63], 97);
        assert!(data[4..4 + 31].iter().all(|&b| b == 0));
    }

    #[test]
    fn aggregate3_layout() {
        let calls = vec![
            Call3 { target: addr(1), allow_failure: false, call_data: encode_get_agent_at(0, 0) },
            Call3 { target: addr(1), allow_failure: true, call_data: vec![0xde, 0xad] },
        ];
        let data = encode_aggregate3(&calls);
        assert_eq!(&data[..4], &AGGREGATE3);
        let body = &data[4..];

        assert_eq!(read_usize(body, 0).unwrap(), 32);
        assert_eq!(read_usize(body, 32).unwrap(), 2);
        // first tuple follows the two heads; 68 bytes of calldata pad to 96
        assert_eq!(read_usize(body, 64).unwrap(), 64);
        assert_eq!(read_usize(body, 96).unwrap(), 64 + 4 * 32 + 96);

        let first = 64 + 64;
        assert_eq!(read_address(body, first).unwrap(), addr(1));
        assert!(!read_bool(body, first + 32).unwrap());
        assert_eq!(read_usize(body, first + 64).unwrap(), 96);
        assert_eq!(read_bytes(body, first + 96).unwrap(), encode_get_agent_at(0, 0).as_slice());

        let second = 64 + 64 + 4 * 32 + 96;
        assert!(read_bool(body, second + 32).unwrap());
        assert_eq!(read_bytes(body, second + 96).unwrap(), &[0xde, 0xad]);
        assert_eq!(body.len(), second + 4 * 32 + 32);
    }

    #[test]
    fn game_state_from_raw_words() {
        let mut raw = vec![0u8; 9 * WORD];
        let mut set = |i: usize, bytes: &[u8]| {
            let end = (i + 1) * WORD;
            raw[end - bytes.len()..end].copy_from_slice(bytes);
        };
        set(0, &[7]); // gameId
        set(1, &[2]);
        set(2, &[97]);
        set(3, &[1]);
        set(4, &[98]);
        set(5, &1_700_000_000u64.to_be_bytes());
        set(6, &1_500_000_000_000_000_000u128.to_be_bytes());
        set(7, &[0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]); // 2^80
        set(8, &1_700_000_900u64.to_be_bytes());

        let state = decode_game_state(&raw).unwrap();
        assert_eq!(state.game_id, 7);
        assert_eq!(state.bounds, Bounds::new(2, 97, 1, 98));
        assert_eq!(state.last_advance_at, 1_700_000_000);
        assert_eq!(state.eth_pool, 1_500_000_000_000_000_000);
        assert_eq!(state.token_pool, 1u128 << 80);
        assert_eq!(state.next_advance_at, 1_700_000_900);
    }

    #[test]
    fn game_state_rejects_short_and_oversized() {
        let state = GameState {
            game_id: 1,
            bounds: Bounds::full(),
            last_advance_at: 0,
            eth_pool: 0,
            token_pool: 0,
            next_advance_at: 0,
        };
        let mut raw = encode_game_state(&state);
        assert_eq!(decode_game_state(&raw[..8 * WORD]), Err(AbiError::Short { needed: 9 * WORD, got: 8 * WORD }));

        // minX = 2^64: fits the word but not u64
        raw[2 * WORD - 9] = 1;
        assert_eq!(decode_game_state(&raw), Err(AbiError::Overflow { at: WORD, bits: 64 }));

        // minX = 2^63: fits u64 but not i64
        raw[2 * WORD - 9] = 0;
        raw[2 * WORD - 8] = 0x80;
        assert_eq!(decode_game_state(&raw), Err(AbiError::Overflow { at: WORD, bits: 63 }));
        raw[2 * WORD - 8] = 0;

        // lastAdvanceAt = 2^64
        raw[6 * WORD - 9] = 1;
        assert_eq!(decode_game_state(&raw), Err(AbiError::Overflow { at: 5 * WORD, bits: 64 }));
        raw[6 * WORD - 9] = 0;

        raw[WORD] = 1; // minX with a high byte set
        assert_eq!(decode_game_state(&raw), Err(AbiError::Overflow { at: WORD, bits: 128 }));
    }

    #[test]
    fn address_padding_must_be_clean() {
        let mut raw = encode_address(&addr(9));
        assert_eq!(decode_address(&raw).unwrap(), addr(9));
        raw[0] = 1;
        assert_eq!(decode_address(&raw), Err(AbiError::Invalid { at: 0, kind: "address" }));
    }

    #[test]
    fn aggregate3_results() {
        let results = vec![
            CallResult { success: true, return_data: encode_address(&addr(1)) },
            CallResult { success: false, return_data: vec![] },
            CallResult { success: true, return_data: vec![1, 2, 3] },
        ];
        let decoded = decode_aggregate3(&encode_results(&results)).unwrap();
        assert_eq!(decoded, results);
    }

    #[test]
    fn aggregate3_rejects_truncated_payload() {
        let results = vec![CallResult { success: true, return_data: encode_address(&addr(1)) }];
        let raw = encode_results(&results);
        assert!(matches!(decode_aggregate3(&raw[..raw.len() - 1]), Err(AbiError::Short { .. })));
        assert_eq!(decode_aggregate3(&[]), Err(AbiError::Short { needed: 32, got: 0 }));
    }
}
