use chatzipt::signals::{generate_serial, serial_with_code};
use chrono::{TimeZone, Utc};

#[test]
fn serial_has_code_symbol_and_utc_date() {
    let at = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
    assert_eq!(serial_with_code("btcusdt", 1234, at), "#SN-1234-BTCUSDT-0307");
}

#[test]
fn generated_code_is_four_digits() {
    let serial = generate_serial("ETH");
    let parts: Vec<&str> = serial.split('-').collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0], "#SN");
    let code: u16 = parts[1].parse().unwrap();
    assert!((1000..=9999).contains(&code));
    assert_eq!(parts[2], "ETH");
    assert_eq!(parts[3].len(), 4);
}
