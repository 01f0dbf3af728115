// format.rs - Human readable numbers for the stats line

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;
const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000; // 18 decimals

/// Divides, rounding half away from zero.
fn div_round(value: u128, divisor: u128) -> u128 {
    value / divisor + u128::from(value % divisor >= divisor.div_ceil(2))
}

/// `m:ss`, minutes are not wrapped into hours.
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Wei as ether with four decimals.
pub fn format_eth(wei: u128) -> String {
    let ten_thousandths = div_round(wei, WEI_PER_ETH / 10_000);
    format!("{}.{:04}", ten_thousandths / 10_000, ten_thousandths % 10_000)
}

/// Token base units as whole tokens.
pub fn format_tokens(units: u128) -> String {
    div_round(units, TOKEN_UNIT).to_string()
}
