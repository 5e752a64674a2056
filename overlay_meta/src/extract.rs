//! Put the per-region recognizers together.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::camera::extract_camera;
use crate::normalize::normalize_overlay_text;
use crate::readings::extract_temp_pressure;
use crate::timestamp::extract_date_time;

/// The separator used between regions in [`OverlayMeta::raw_text`].
pub const RAW_TEXT_SEPARATOR: &str = " | ";

/// Everything we managed to read from a photo's overlay strip.
///
/// Every field is independently optional.  Callers should only copy fields
/// which are present, so that a bad scan never overwrites good data.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OverlayMeta {
    /// The canonical camera name, e.g. `"TRAILCAM05"`.
    pub camera_name: Option<String>,

    /// The date the photo was taken, according to the camera.
    pub date_taken: Option<NaiveDate>,

    /// The local time the photo was taken, according to the camera.
    pub time_taken: Option<NaiveTime>,

    /// The temperature in degrees Celsius.
    pub temperature_c: Option<f64>,

    /// The barometric pressure in inches of mercury.
    pub pressure_inhg: Option<f64>,

    /// The normalized text of all three regions, for debugging.  This is
    /// never parsed.
    #[serde(default)]
    pub raw_text: String,
}

impl OverlayMeta {
    /// Did we fail to read anything at all?
    pub fn is_empty(&self) -> bool {
        self.camera_name.is_none()
            && self.date_taken.is_none()
            && self.time_taken.is_none()
            && self.temperature_c.is_none()
            && self.pressure_inhg.is_none()
    }

    /// The full timestamp, if we have both a date and a time.
    pub fn taken_at(&self) -> Option<NaiveDateTime> {
        Some(self.date_taken?.and_time(self.time_taken?))
    }
}

/// The raw OCR output for the three regions of an overlay strip.
///
/// By convention, the left region holds the temperature and pressure, the
/// center region holds the camera name, and the right region holds the date
/// and time.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OverlayRegions {
    /// OCR output for the left region.
    #[serde(default)]
    pub left: String,
    /// OCR output for the center region.
    #[serde(default)]
    pub center: String,
    /// OCR output for the right region.
    #[serde(default)]
    pub right: String,
}

impl OverlayRegions {
    /// Extract metadata from these regions.
    pub fn extract(&self) -> OverlayMeta {
        extract_overlay_meta_split(&self.left, &self.center, &self.right)
    }
}

/// Extract metadata from the already-split OCR output of an overlay strip.
///
/// This is a pure function of its inputs, and it's safe to call from as many
/// threads as you like.
pub fn extract_overlay_meta_split(
    left_text: &str,
    center_text: &str,
    right_text: &str,
) -> OverlayMeta {
    let left = normalize_overlay_text(left_text);
    let center = normalize_overlay_text(center_text);
    let right = normalize_overlay_text(right_text);

    let (temperature_c, pressure_inhg) = extract_temp_pressure(&left);
    let camera_name = extract_camera(&center);
    let (date_taken, time_taken) = extract_date_time(&right);

    let meta = OverlayMeta {
        camera_name,
        date_taken,
        time_taken,
        temperature_c,
        pressure_inhg,
        raw_text: [left, center, right].join(RAW_TEXT_SEPARATOR),
    };
    if meta.is_empty() {
        debug!("could not read overlay: {:?}", meta.raw_text);
    } else {
        debug!(
            "read overlay {:?}: camera={:?} date={:?} time={:?} temp={:?} pressure={:?}",
            meta.raw_text,
            meta.camera_name,
            meta.date_taken,
            meta.time_taken,
            meta.temperature_c,
            meta.pressure_inhg,
        );
    }
    meta
}

#[test]
fn reads_a_clean_overlay() {
    let meta = extract_overlay_meta_split(
        "23C 29.09 INHG",
        "TRAILCAM05",
        "12/06/2025 05:41PM",
    );
    assert_eq!(meta.temperature_c, Some(23.0));
    assert_eq!(meta.pressure_inhg, Some(29.09));
    assert_eq!(meta.camera_name.as_deref(), Some("TRAILCAM05"));
    assert_eq!(meta.date_taken, NaiveDate::from_ymd_opt(2025, 12, 6));
    assert_eq!(meta.time_taken, NaiveTime::from_hms_opt(17, 41, 0));
    assert_eq!(
        meta.raw_text,
        "23C 29.09 INHG | TRAILCAM05 | 12/06/2025 05:41PM"
    );
    assert_eq!(
        meta.taken_at(),
        NaiveDate::from_ymd_opt(2025, 12, 6)
            .and_then(|d| d.and_hms_opt(17, 41, 0))
    );
}

#[test]
fn empty_regions_give_an_empty_result() {
    let meta = extract_overlay_meta_split("", "", "");
    assert!(meta.is_empty());
    assert_eq!(meta.taken_at(), None);
    assert_eq!(meta.raw_text, " |  | ");
}

#[test]
fn noisy_overlay_degrades_field_by_field() {
    let _ = env_logger::try_init();
    let meta = extract_overlay_meta_split(
        "Z3C Z9.09INHG",
        "TRAILCAMQ5",
        "12/06/202505:41PM",
    );
    assert_eq!(meta.camera_name.as_deref(), Some("TRAILCAM05"));
    assert_eq!(meta.date_taken, NaiveDate::from_ymd_opt(2025, 12, 6));
    assert_eq!(meta.time_taken, NaiveTime::from_hms_opt(17, 41, 0));
    // We don't repair letters standing in for digits in readings.
    assert_eq!(meta.temperature_c, None);
    assert_eq!(meta.pressure_inhg, None);
    assert!(!meta.is_empty());
    assert_eq!(
        meta.raw_text,
        "Z3C Z9.09 INHG | TRAILCAMQ5 | 12/06/2025 05:41PM"
    );
}

#[test]
fn regions_are_read_by_position() {
    // A camera name in the left region is not looked for.
    let meta = extract_overlay_meta_split("TRAILCAM05", "23C", "");
    assert_eq!(meta.camera_name, None);
    assert_eq!(meta.temperature_c, None);
}

#[test]
fn extraction_can_run_on_many_threads() {
    let expected = extract_overlay_meta_split("23C29.09INHG", "TRAILCAMQ5", "12/06/202505:41PM");
    let handles = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                extract_overlay_meta_split("23C29.09INHG", "TRAILCAMQ5", "12/06/202505:41PM")
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn serializes_to_json() {
    let regions: OverlayRegions = serde_json::from_str(
        r#"{"left": "23C29.09INHG", "center": "TRAIL CAM 7", "right": "01/02/2024 1:02 AM"}"#,
    )
    .unwrap();
    let meta = regions.extract();
    let json = serde_json::to_value(&meta).unwrap();
    assert_eq!(json["camera_name"], "TRAILCAM07");
    assert_eq!(json["date_taken"], "2024-01-02");
    assert_eq!(json["time_taken"], "01:02:00");
    assert_eq!(json["temperature_c"], 23.0);
    assert_eq!(json["pressure_inhg"], 29.09);

    let round_trip: OverlayMeta = serde_json::from_value(json).unwrap();
    assert_eq!(round_trip, meta);
}
