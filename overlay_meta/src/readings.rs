//! Temperature and barometric pressure readings.
//!
//! Only ASCII digits are read.  Other scripts' digits never match.

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::{first_value, Rule};

lazy_static! {
    /// Rules for finding a temperature in degrees Celsius, such as `23C` or
    /// `-4.5 C`.  The number must start a token, so `Z3C` is not read as 3.
    pub static ref TEMPERATURE_RULES: Vec<Rule> = vec![Rule::new(
        "signed_celsius",
        Regex::new(r"(-)?\b([0-9]+(?:\.[0-9]+)?)\s*C\b").unwrap(),
    )];

    /// Rules for finding a pressure in inches of mercury.  We insist on
    /// exactly `DD.DD`, because anything looser will happily read `9` out of
    /// a damaged `29.09`.
    pub static ref PRESSURE_RULES: Vec<Rule> = vec![Rule::new(
        "two_by_two_inhg",
        Regex::new(r"\b([0-9]{2}\.[0-9]{2})\s*INHG\b").unwrap(),
    )];
}

/// Extract a temperature (°C) and a pressure (inHg) from normalized text.
///
/// Either value may be missing without affecting the other.  We don't check
/// whether the values are physically plausible.
pub fn extract_temp_pressure(text: &str) -> (Option<f64>, Option<f64>) {
    let temperature = first_value(&TEMPERATURE_RULES, text, |caps| {
        let number: f64 = caps[2].parse().ok()?;
        Some(if caps.get(1).is_some() { -number } else { number })
    });
    let pressure =
        first_value(&PRESSURE_RULES, text, |caps| caps[1].parse::<f64>().ok());
    (temperature, pressure)
}

#[cfg(test)]
use crate::normalize::normalize_overlay_text;
#[cfg(test)]
use crate::rules::first_captures;

#[test]
fn reads_temperature_and_pressure() {
    assert_eq!(
        extract_temp_pressure("23C 29.09 INHG"),
        (Some(23.0), Some(29.09))
    );
    assert_eq!(
        extract_temp_pressure("-4.5C 30.12INHG"),
        (Some(-4.5), Some(30.12))
    );
    assert_eq!(extract_temp_pressure("X -12 C"), (Some(-12.0), None));
}

#[test]
fn repairs_jammed_readings_after_normalization() {
    let text = normalize_overlay_text("23C29.09INHG");
    assert_eq!(extract_temp_pressure(&text), (Some(23.0), Some(29.09)));
}

#[test]
fn pressure_requires_two_digits_on_each_side() {
    assert_eq!(extract_temp_pressure("29.09 INHG").1, Some(29.09));
    assert_eq!(extract_temp_pressure("9.09 INHG").1, None);
    assert_eq!(extract_temp_pressure("129.09 INHG").1, None);
    assert_eq!(extract_temp_pressure("29.9 INHG").1, None);
    assert_eq!(extract_temp_pressure("29.09 IN").1, None);
}

#[test]
fn temperature_must_be_a_standalone_token() {
    assert_eq!(extract_temp_pressure("23CX").0, None);
    assert_eq!(extract_temp_pressure("Z3C").0, None);
    assert_eq!(extract_temp_pressure("23").0, None);
}

#[test]
fn fields_are_independent() {
    assert_eq!(extract_temp_pressure("29.09 INHG"), (None, Some(29.09)));
    assert_eq!(extract_temp_pressure("7C"), (Some(7.0), None));
    assert_eq!(extract_temp_pressure(""), (None, None));
}

#[test]
fn letters_in_numbers_are_not_repaired() {
    let text = normalize_overlay_text("Z3C Z9.09INHG");
    assert_eq!(extract_temp_pressure(&text), (None, None));
}

#[test]
fn non_ascii_digits_do_not_match() {
    assert!(first_captures(&TEMPERATURE_RULES, "\u{0662}\u{0663}C").is_none());
    let fullwidth = "\u{FF12}\u{FF19}.\u{FF10}\u{FF19} INHG";
    assert!(first_captures(&PRESSURE_RULES, fullwidth).is_none());
    assert_eq!(
        extract_temp_pressure("\u{0662}\u{0663}C 29.09 INHG"),
        (None, Some(29.09))
    );
}
