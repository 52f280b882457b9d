use chrono::{DateTime, Utc};
use rand::Rng;

/// `#SN-{code}-{SYMBOL}-{MMDD}` with a random four-digit code and the
/// current UTC date.
pub fn generate_serial(symbol: &str) -> String {
    let code = rand::thread_rng().gen_range(1000..=9999);
    serial_with_code(symbol, code, Utc::now())
}

pub fn serial_with_code(symbol: &str, code: u16, at: DateTime<Utc>) -> String {
    format!(
        "#SN-{}-{}-{}",
        code,
        symbol.trim().to_uppercase(),
        at.format("%m%d")
    )
}
