//! This crate reads the data strip that trail cameras burn into the bottom
//! of each photo.  A typical strip looks something like:
//!
//! ```text
//! 23C 29.09INHG        TRAILCAM05        12/06/2025 05:41PM
//! ```
//!
//! The caller is responsible for cropping the strip, splitting it into
//! left, center and right regions, and running OCR over each region.  We
//! take the three raw strings that come back, clean up the usual OCR damage,
//! and recover whatever fields we can.
//!
//! ## Example code
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//! use overlay_meta::extract_overlay_meta_split;
//!
//! let meta = extract_overlay_meta_split(
//!     "23C29.09INHG",
//!     "TRAILCAMQ5",
//!     "12/06/202505:41PM",
//! );
//! assert_eq!(meta.camera_name.as_deref(), Some("TRAILCAM05"));
//! assert_eq!(meta.temperature_c, Some(23.0));
//! assert_eq!(meta.pressure_inhg, Some(29.09));
//! assert_eq!(meta.date_taken, NaiveDate::from_ymd_opt(2025, 12, 6));
//! assert_eq!(meta.time_taken, NaiveTime::from_hms_opt(17, 41, 0));
//! ```
//!
//! ## Failure handling
//!
//! Reading an overlay never fails.  Low-quality scans are the normal case,
//! so every field is optional, and a field we can't recover is simply left
//! as `None`.  An `OverlayMeta` with nothing in it means "could not read the
//! overlay", and it's up to the caller to decide whether to ask a human.
//!
//! The only fallible operations in this crate are the ones that load
//! configuration from disk.
//!
//! ## Limitations
//!
//! OCR digit/letter confusion is only repaired for camera numbers, where
//! `O`, `Q` and `D` are read as `0`.  Temperatures, pressures and timestamps
//! containing letters (`Z9.09INHG`) are left unread.

#![warn(missing_docs)]

use std::path::PathBuf;
use std::result;
use thiserror::Error;

mod apply;
mod camera;
mod config;
mod detections;
mod extract;
mod normalize;
mod readings;
pub mod rules;
mod timestamp;

pub use self::apply::{
    apply_overlay_meta, AppliedFields, Camera, CameraRegistry, OverwritePolicy,
    PhotoRecord,
};
pub use self::camera::{extract_camera, CAMERA_RULES};
pub use self::config::Config;
pub use self::detections::{
    common_name, filter_by_confidence, Detection, DEFAULT_CONFIDENCE_THRESHOLD,
};
pub use self::extract::{
    extract_overlay_meta_split, OverlayMeta, OverlayRegions, RAW_TEXT_SEPARATOR,
};
pub use self::normalize::normalize_overlay_text;
pub use self::readings::{extract_temp_pressure, PRESSURE_RULES, TEMPERATURE_RULES};
pub use self::timestamp::{extract_date_time, DATE_RULES, TIME_RULES};

/// Our standard result type.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors which can be returned by this crate.
///
/// Note that none of these come from reading overlay text, which always
/// succeeds.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// We could not parse a configuration file.
    #[error("could not parse configuration")]
    #[non_exhaustive]
    CouldNotParseConfig {
        /// The underlying error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// We could not read a file from disk.
    #[error("could not read {}", path.display())]
    #[non_exhaustive]
    CouldNotReadFile {
        /// The file we were trying to read.
        path: PathBuf,

        /// The underlying error.
        source: std::io::Error,
    },

    /// Two cameras in the same registry have the same name.
    #[error("camera {name:?} is defined more than once")]
    #[non_exhaustive]
    DuplicateCamera {
        /// The duplicated camera name.
        name: String,
    },

    /// A camera's base coordinates are outside the range of latitudes and
    /// longitudes.
    #[error("camera {name:?} has invalid base coordinates {latitude},{longitude}")]
    #[non_exhaustive]
    InvalidCoordinates {
        /// The camera name.
        name: String,
        /// The base latitude we were given.
        latitude: f64,
        /// The base longitude we were given.
        longitude: f64,
    },
}
