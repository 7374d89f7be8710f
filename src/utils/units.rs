use crate::constants::{KW_TO_W, MS_TO_KMH};

pub fn ms_to_kmh(speed_ms: f64) -> f64 {
    speed_ms * MS_TO_KMH
}

pub fn kw_to_w(power_kw: f64) -> f64 {
    power_kw * KW_TO_W
}

/// Parses a field value the way a form input is read: surrounding whitespace
/// is ignored and anything that is not a number becomes NaN.
pub fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}
