// ── Thermostat set-points ──
//
// The gateway encodes temperatures in half degrees with 16 = 8.0 °C and
// 56 = 28.0 °C. Two values outside that range carry special meaning:
// 253 switches the radiator off, 254 opens it fully.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest valid raw set-point (8.0 °C).
pub const RAW_MIN: i64 = 16;
/// Highest valid raw set-point (28.0 °C).
pub const RAW_MAX: i64 = 56;
/// Raw sentinel: radiator off.
pub const RAW_OFF: i64 = 253;
/// Raw sentinel: radiator fully open.
pub const RAW_ON: i64 = 254;

/// One slider step in percent (0.5 °C on the 8–28 °C scale).
pub const PERCENT_STEP: f64 = 2.5;

/// A decoded thermostat set-point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetPoint {
    Celsius(f64),
    Off,
    Max,
    Invalid,
}

impl SetPoint {
    /// Decode a raw half-degree value.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            RAW_MIN..=RAW_MAX => Self::Celsius(bin_to_celsius(raw)),
            RAW_OFF => Self::Off,
            RAW_ON => Self::Max,
            _ => Self::Invalid,
        }
    }

    pub fn celsius(self) -> Option<f64> {
        match self {
            Self::Celsius(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for SetPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius(c) => write!(f, "{c:.1} °C"),
            Self::Off => f.write_str("off"),
            Self::Max => f.write_str("max"),
            Self::Invalid => f.write_str("n/a"),
        }
    }
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn bin_to_celsius(raw: i64) -> f64 {
    (raw - RAW_MIN) as f64 / 2.0 + 8.0
}

/// Raw value to display value; alias of [`SetPoint::from_raw`].
pub fn bin_to_degree(raw: i64) -> SetPoint {
    SetPoint::from_raw(raw)
}

/// `round((°C − 8) × 2) + 16`, clamped to the valid range. `celsius`
/// must be finite.
#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
pub fn degree_to_bin(celsius: f64) -> i64 {
    let raw = ((celsius - 8.0) * 2.0).round() as i64 + RAW_MIN;
    raw.clamp(RAW_MIN, RAW_MAX)
}

/// Position of a raw set-point on the 0–100 % slider scale.
///
/// `off` starts the slider at the bottom, `max` at the top; any other
/// out-of-range value is clamped first.
#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
pub fn raw_to_percent(raw: i64) -> f64 {
    let raw = match raw {
        RAW_OFF => RAW_MIN,
        RAW_ON => RAW_MAX,
        other => other.clamp(RAW_MIN, RAW_MAX),
    };
    (raw - RAW_MIN) as f64 * 100.0 / 40.0
}

/// Slider percent to °C: 0 % = 8 °C, 100 % = 28 °C.
pub fn percent_to_celsius(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0) * 20.0 / 100.0 + 8.0
}

/// °C to slider percent; the inverse of [`percent_to_celsius`], unclamped.
pub fn celsius_to_percent(celsius: f64) -> f64 {
    (celsius - 8.0) * 100.0 / 20.0
}

/// Slider percent to the raw encoding sent as `param`.
pub fn percent_to_raw(percent: f64) -> i64 {
    degree_to_bin(percent_to_celsius(percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn decode_range_and_sentinels() {
        assert_eq!(SetPoint::from_raw(16), SetPoint::Celsius(8.0));
        assert_eq!(SetPoint::from_raw(40), SetPoint::Celsius(20.0));
        assert_eq!(SetPoint::from_raw(56), SetPoint::Celsius(28.0));
        assert_eq!(SetPoint::from_raw(253), SetPoint::Off);
        assert_eq!(SetPoint::from_raw(254), SetPoint::Max);
        assert_eq!(SetPoint::from_raw(0), SetPoint::Invalid);
        assert_eq!(SetPoint::from_raw(15), SetPoint::Invalid);
        assert_eq!(SetPoint::from_raw(57), SetPoint::Invalid);
        assert_eq!(SetPoint::from_raw(255), SetPoint::Invalid);
    }

    #[test]
    fn display_values() {
        assert_eq!(SetPoint::from_raw(40).to_string(), "20.0 °C");
        assert_eq!(SetPoint::from_raw(41).to_string(), "20.5 °C");
        assert_eq!(SetPoint::Off.to_string(), "off");
        assert_eq!(SetPoint::Max.to_string(), "max");
        assert_eq!(SetPoint::Invalid.to_string(), "n/a");
    }

    #[test]
    fn decode_inverts_encode_on_the_whole_domain() {
        for raw in RAW_MIN..=RAW_MAX {
            let Some(celsius) = bin_to_degree(raw).celsius() else {
                panic!("raw {raw} does not decode to °C");
            };
            assert_eq!(degree_to_bin(celsius), raw, "raw {raw}");
        }
    }

    #[test]
    fn encode_clamps() {
        assert_eq!(degree_to_bin(4.0), RAW_MIN);
        assert_eq!(degree_to_bin(35.0), RAW_MAX);
        assert_eq!(degree_to_bin(21.3), 43);
    }

    #[test]
    fn percent_scale() {
        assert!(close(raw_to_percent(16), 0.0));
        assert!(close(raw_to_percent(40), 60.0));
        assert!(close(raw_to_percent(56), 100.0));
        assert!(close(raw_to_percent(RAW_OFF), 0.0));
        assert!(close(raw_to_percent(RAW_ON), 100.0));
        assert!(close(raw_to_percent(3), 0.0));
    }

    #[test]
    fn celsius_and_percent_are_inverse() {
        assert!(close(celsius_to_percent(8.0), 0.0));
        assert!(close(celsius_to_percent(21.5), 67.5));
        assert!(close(celsius_to_percent(28.0), 100.0));
        assert!(close(percent_to_celsius(celsius_to_percent(17.5)), 17.5));
        assert!(celsius_to_percent(35.0) > 100.0);
    }

    #[test]
    fn chosen_percent_survives_encoding() {
        // Every slider stop maps to one raw value and back to the same °C.
        let mut percent = 0.0;
        while percent <= 100.0 {
            let chosen = percent_to_celsius(percent);
            let Some(shown) = bin_to_degree(percent_to_raw(percent)).celsius() else {
                panic!("{percent}% does not decode to °C");
            };
            assert!((chosen - shown).abs() < 0.1, "{percent}% -> {chosen} vs {shown}");
            percent += PERCENT_STEP;
        }
    }
}
