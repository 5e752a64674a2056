//! Clean up raw OCR text before we try to pull fields out of it.
//!
//! Digits are ASCII only.  The camera never prints anything else, and the
//! field patterns downstream wouldn't parse other digits anyway.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 23C29.09INHG -> 23C 29.09INHG
    static ref JAMMED_TEMPERATURE: Regex = Regex::new(r"([0-9])C([0-9])").unwrap();

    // 29.09INHG -> 29.09 INHG
    static ref JAMMED_PRESSURE_UNIT: Regex = Regex::new(r"([0-9])(INHG)\b").unwrap();

    // 12/06/202505:41PM -> 12/06/2025 05:41PM
    static ref JAMMED_DATE_TIME: Regex =
        Regex::new(r"([0-9]{2}/[0-9]{2}/[0-9]{4})([0-9]{1,2}:[0-9]{2}\s*[AP]M)\b").unwrap();

    // Anything which isn't part of a token or one of the separators our
    // field patterns rely on.
    static ref NOISE: Regex = Regex::new(r"[^\w\s:/.]").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalize raw OCR output from one overlay region.
///
/// This upper-cases the text, splits apart tokens which OCR commonly runs
/// together, replaces stray punctuation with spaces, and collapses runs of
/// whitespace.  Any input, including the empty string, produces a valid
/// (possibly empty) result, and normalizing twice gives the same result as
/// normalizing once.
pub fn normalize_overlay_text(raw: &str) -> String {
    let mut text = raw.to_uppercase();

    // Matches can't overlap (`1C2C3`), and stripping noise can expose a
    // jammed token (`05:41#PM`), so repeat until nothing changes.  Every
    // pass either inserts a space at a jammed token or leaves the text
    // alone, so this terminates.
    loop {
        let next = normalize_pass(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text
}

/// Apply each repair once, in order.
fn normalize_pass(text: &str) -> String {
    let text = JAMMED_TEMPERATURE.replace_all(text, "${1}C ${2}");
    let text = JAMMED_PRESSURE_UNIT.replace_all(&text, "${1} ${2}");
    let text = JAMMED_DATE_TIME.replace_all(&text, "${1} ${2}");
    let text = NOISE.replace_all(&text, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_owned()
}

#[test]
fn splits_jammed_temperature_and_pressure() {
    assert_eq!(normalize_overlay_text("23C29.09INHG"), "23C 29.09 INHG");
    assert_eq!(normalize_overlay_text("23c29.09inHg"), "23C 29.09 INHG");
    assert_eq!(normalize_overlay_text("1C2C3"), "1C 2C 3");
}

#[test]
fn splits_jammed_date_and_time() {
    assert_eq!(
        normalize_overlay_text("12/06/202505:41PM"),
        "12/06/2025 05:41PM"
    );
    assert_eq!(
        normalize_overlay_text("12/06/20255:41 pm"),
        "12/06/2025 5:41 PM"
    );
    // Already separated.
    assert_eq!(
        normalize_overlay_text("12/06/2025 05:41PM"),
        "12/06/2025 05:41PM"
    );
}

#[test]
fn strips_noise_and_collapses_whitespace() {
    assert_eq!(normalize_overlay_text("  TRAIL-CAM#05 \n"), "TRAIL CAM 05");
    assert_eq!(normalize_overlay_text("23°C, 29.09\"INHG!"), "23 C 29.09 INHG");
    assert_eq!(normalize_overlay_text("TRAIL_CAM 05"), "TRAIL_CAM 05");
    assert_eq!(normalize_overlay_text("12/06/2025\t05:41"), "12/06/2025 05:41");
}

#[test]
fn empty_and_garbage_input() {
    assert_eq!(normalize_overlay_text(""), "");
    assert_eq!(normalize_overlay_text("   \t\n"), "");
    assert_eq!(normalize_overlay_text("~!@#$%^&*()"), "");
}

#[test]
fn normalization_is_idempotent() {
    let examples = &[
        "",
        "23C29.09INHG",
        "Z3C Z9.09INHG",
        "1C2C3C4C5",
        "9INHGINHG",
        "12/06/202505:41PM",
        "12/06/2025 05:41 pm",
        "trail-cam q5",
        "  -12.5c   30.01 inhg ",
        "12C3INHG",
        "A1C1C1B/2:3.4",
        "straße ÉTÉ 5C",
        "~~~TRAILCAM05~~~",
        "12/06/202505:41#PM",
        "12/06/202505:41,PM",
        "12/06/2025#05:41PM",
        "23#C 29.09 INHG",
        "23C#29.09INHG",
        "23C 29.09#INHG",
        "12/06/2025 05:41PM 23C",
    ];
    for &example in examples {
        let once = normalize_overlay_text(example);
        let twice = normalize_overlay_text(&once);
        assert_eq!(once, twice, "normalizing {:?} was not idempotent", example);
    }
}

#[test]
fn noise_at_join_points_reads_like_clean_text() {
    use crate::readings::extract_temp_pressure;
    use crate::timestamp::extract_date_time;

    let date_time_examples = &[
        ("12/06/202505:41#PM", "12/06/2025 05:41PM"),
        ("12/06/202505:41,PM", "12/06/2025 05:41PM"),
        ("12/06/2025#05:41PM", "12/06/2025 05:41PM"),
        ("12/06/2025 05:41-PM", "12/06/2025 05:41PM"),
    ];
    for &(noisy, clean) in date_time_examples {
        let once = normalize_overlay_text(noisy);
        assert_eq!(once, normalize_overlay_text(&once), "{:?}", noisy);
        assert_eq!(
            extract_date_time(&once),
            extract_date_time(&normalize_overlay_text(clean)),
            "{:?}",
            noisy,
        );
    }

    let reading_examples = &[
        ("23#C 29.09 INHG", "23C 29.09 INHG"),
        ("23C#29.09INHG", "23C29.09INHG"),
        ("23C 29.09#INHG", "23C 29.09 INHG"),
        ("23C29.09(INHG)", "23C29.09INHG"),
    ];
    for &(noisy, clean) in reading_examples {
        let once = normalize_overlay_text(noisy);
        assert_eq!(once, normalize_overlay_text(&once), "{:?}", noisy);
        assert_eq!(
            extract_temp_pressure(&once),
            extract_temp_pressure(&normalize_overlay_text(clean)),
            "{:?}",
            noisy,
        );
    }
}

#[test]
fn noise_before_meridiem_is_read_on_the_first_pass() {
    use crate::timestamp::extract_date_time;
    use chrono::{NaiveDate, NaiveTime};

    let text = normalize_overlay_text("12/06/202505:41#PM");
    assert_eq!(text, "12/06/2025 05:41 PM");
    assert_eq!(
        extract_date_time(&text),
        (
            NaiveDate::from_ymd_opt(2025, 12, 6),
            NaiveTime::from_hms_opt(17, 41, 0)
        )
    );
}
