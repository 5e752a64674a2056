//! Camera identifiers, such as `TRAILCAM05`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::{first_value, Rule};

lazy_static! {
    /// Rules for finding a camera identifier.  The number may be up to three
    /// characters, any of which may be an `O`, `Q` or `D` standing in for a
    /// zero.
    pub static ref CAMERA_RULES: Vec<Rule> = vec![Rule::new(
        "trailcam_number",
        Regex::new(r"(?i)TRAIL[\s_-]*CAM[\s_-]*([0-9OQD]{1,3})").unwrap(),
    )];
}

/// Find a camera identifier in `text` and convert it to canonical form.
///
/// Numbers below 100 are zero-padded to two digits (`TRAILCAM05`), and
/// larger numbers are used as-is (`TRAILCAM105`).  `text` may be either raw
/// or normalized OCR output.
pub fn extract_camera(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    let text = text.to_uppercase();
    first_value(&CAMERA_RULES, &text, |caps| canonical_camera_name(&caps[1]))
}

/// Repair OCR digit confusions in a camera number and format it.
fn canonical_camera_name(raw_number: &str) -> Option<String> {
    let cleaned = raw_number
        .chars()
        .map(|c| match c {
            'O' | 'Q' | 'D' => '0',
            other => other,
        })
        .collect::<String>();
    let n: u32 = cleaned.parse().ok()?;
    if n < 100 {
        Some(format!("TRAILCAM{:02}", n))
    } else {
        Some(format!("TRAILCAM{}", n))
    }
}

#[test]
fn canonical_camera_format() {
    for n in 1..100 {
        let name = format!("TRAILCAM{:02}", n);
        assert_eq!(extract_camera(&name), Some(name.clone()));
    }
    for n in 100..1000 {
        let name = format!("TRAILCAM{}", n);
        assert_eq!(extract_camera(&name), Some(name.clone()));
    }
}

#[test]
fn repairs_digit_confusion() {
    assert_eq!(extract_camera("TRAILCAMO5").as_deref(), Some("TRAILCAM05"));
    assert_eq!(extract_camera("TRAILCAMQ5").as_deref(), Some("TRAILCAM05"));
    assert_eq!(extract_camera("TRAILCAMD5").as_deref(), Some("TRAILCAM05"));
    assert_eq!(extract_camera("TRAILCAM1O5").as_deref(), Some("TRAILCAM105"));
    assert_eq!(extract_camera("trailcam q5").as_deref(), Some("TRAILCAM05"));
}

#[test]
fn tolerates_separators_and_surrounding_text() {
    assert_eq!(extract_camera("TRAIL CAM 07").as_deref(), Some("TRAILCAM07"));
    assert_eq!(extract_camera("TRAIL-CAM-07").as_deref(), Some("TRAILCAM07"));
    assert_eq!(extract_camera("TRAIL_CAM_07").as_deref(), Some("TRAILCAM07"));
    assert_eq!(extract_camera("XX TRAILCAM7 YY").as_deref(), Some("TRAILCAM07"));
    assert_eq!(extract_camera("TRAILCAM005").as_deref(), Some("TRAILCAM05"));
    // Only the first three characters are part of the number.
    assert_eq!(extract_camera("TRAILCAM1234").as_deref(), Some("TRAILCAM123"));
    // First match wins.
    assert_eq!(
        extract_camera("TRAILCAM03 TRAILCAM04").as_deref(),
        Some("TRAILCAM03")
    );
}

#[test]
fn missing_camera_is_none() {
    assert_eq!(extract_camera(""), None);
    assert_eq!(extract_camera("   "), None);
    assert_eq!(extract_camera("TRAILCAM"), None);
    assert_eq!(extract_camera("TRAILCAMX5"), None);
    assert_eq!(extract_camera("CAM05"), None);
}
