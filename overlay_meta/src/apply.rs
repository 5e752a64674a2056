//! Copy extracted overlay data onto a photo record.
//!
//! This is the in-memory half of saving OCR results: storing the record is
//! somebody else's job.

use chrono::{NaiveDate, NaiveTime};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::extract::OverlayMeta;
use crate::{Error, Result};

/// A camera we know about, and where it's normally installed.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Camera {
    /// The camera name, normally in canonical `TRAILCAMNN` form.
    pub name: String,

    /// The latitude of the camera's usual location.
    pub base_latitude: f64,

    /// The longitude of the camera's usual location.
    pub base_longitude: f64,

    /// A human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Is this camera currently deployed?
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// A set of cameras, looked up by name.
#[derive(Clone, Debug, Default)]
pub struct CameraRegistry {
    cameras: HashMap<String, Camera>,
}

impl CameraRegistry {
    /// Build a registry from a list of cameras.  Names must be unique, and
    /// base coordinates must be valid latitudes and longitudes.
    pub fn new<I>(cameras: I) -> Result<CameraRegistry>
    where
        I: IntoIterator<Item = Camera>,
    {
        let mut by_name = HashMap::new();
        for camera in cameras {
            if !(-90.0..=90.0).contains(&camera.base_latitude)
                || !(-180.0..=180.0).contains(&camera.base_longitude)
            {
                return Err(Error::InvalidCoordinates {
                    name: camera.name,
                    latitude: camera.base_latitude,
                    longitude: camera.base_longitude,
                });
            }
            if by_name.contains_key(&camera.name) {
                return Err(Error::DuplicateCamera { name: camera.name });
            }
            by_name.insert(camera.name.clone(), camera);
        }
        Ok(CameraRegistry { cameras: by_name })
    }

    /// Look up a camera by its exact name.  Inactive cameras are still
    /// returned, because old photos were taken while they were active.
    pub fn lookup(&self, name: &str) -> Option<&Camera> {
        self.cameras.get(name)
    }

    /// The number of cameras in this registry.
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Is this registry empty?
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

/// Should extracted values replace values which are already stored?
///
/// Missing extracted values never replace anything, whatever the policy.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Replace stored values with any value we extracted.
    #[default]
    Overwrite,
    /// Only fill in fields which are currently unset.
    FillMissing,
}

/// The fields of a stored photo that overlay data can update.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PhotoRecord {
    /// The name of the camera which took this photo.
    pub camera: Option<String>,
    /// The date the photo was taken.
    pub date_taken: Option<NaiveDate>,
    /// The local time the photo was taken.
    pub time_taken: Option<NaiveTime>,
    /// The temperature in degrees Celsius.
    pub temperature_c: Option<f64>,
    /// The barometric pressure in inches of mercury.
    pub pressure_inhg: Option<f64>,
    /// Where the photo was taken.
    pub latitude: Option<f64>,
    /// Where the photo was taken.
    pub longitude: Option<f64>,
}

impl PhotoRecord {
    /// The overlay-derived fields which are still unset, and which a human
    /// will need to fill in by hand.
    pub fn missing_overlay_fields(&self) -> Vec<&'static str> {
        let mut missing = vec![];
        if self.date_taken.is_none() {
            missing.push("date_taken");
        }
        if self.time_taken.is_none() {
            missing.push("time_taken");
        }
        if self.temperature_c.is_none() {
            missing.push("temperature_c");
        }
        if self.pressure_inhg.is_none() {
            missing.push("pressure_inhg");
        }
        missing
    }
}

/// Which fields of a `PhotoRecord` were changed by `apply_overlay_meta`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AppliedFields {
    /// The camera was attached or replaced.
    pub camera: bool,
    /// The date was set.
    pub date_taken: bool,
    /// The time was set.
    pub time_taken: bool,
    /// The temperature was set.
    pub temperature_c: bool,
    /// The pressure was set.
    pub pressure_inhg: bool,
    /// The latitude was copied from the camera.
    pub latitude: bool,
    /// The longitude was copied from the camera.
    pub longitude: bool,
}

impl AppliedFields {
    /// Did we change anything?
    pub fn any(&self) -> bool {
        !self.names().is_empty()
    }

    /// The names of the fields we changed.
    pub fn names(&self) -> Vec<&'static str> {
        [
            ("camera", self.camera),
            ("date_taken", self.date_taken),
            ("time_taken", self.time_taken),
            ("temperature_c", self.temperature_c),
            ("pressure_inhg", self.pressure_inhg),
            ("latitude", self.latitude),
            ("longitude", self.longitude),
        ]
        .iter()
        .filter(|(_, changed)| *changed)
        .map(|(name, _)| *name)
        .collect()
    }
}

/// Store `value` in `slot` if the policy allows it.  Returns true if `slot`
/// changed.
fn merge<T: PartialEq>(slot: &mut Option<T>, value: Option<T>, policy: OverwritePolicy) -> bool {
    let value = match value {
        Some(value) => value,
        None => return false,
    };
    if slot.is_some() && policy == OverwritePolicy::FillMissing {
        return false;
    }
    if slot.as_ref() == Some(&value) {
        return false;
    }
    *slot = Some(value);
    true
}

/// Copy the fields present in `meta` onto `record`.
///
/// A camera name is only attached if `cameras` knows about it.  Once the
/// record has a camera, any unset coordinates are filled in from the
/// camera's base location.
pub fn apply_overlay_meta(
    record: &mut PhotoRecord,
    meta: &OverlayMeta,
    cameras: &CameraRegistry,
    policy: OverwritePolicy,
) -> AppliedFields {
    let mut applied = AppliedFields::default();

    if let Some(name) = &meta.camera_name {
        match cameras.lookup(name) {
            Some(camera) => {
                applied.camera =
                    merge(&mut record.camera, Some(camera.name.clone()), policy);
            }
            None => warn!("overlay names unknown camera {:?}", name),
        }
    }

    applied.date_taken = merge(&mut record.date_taken, meta.date_taken, policy);
    applied.time_taken = merge(&mut record.time_taken, meta.time_taken, policy);
    applied.temperature_c =
        merge(&mut record.temperature_c, meta.temperature_c, policy);
    applied.pressure_inhg =
        merge(&mut record.pressure_inhg, meta.pressure_inhg, policy);

    // Default the location from the camera, never overriding a location
    // which was entered by hand.
    if let Some(camera) = record.camera.as_deref().and_then(|n| cameras.lookup(n)) {
        if record.latitude.is_none() {
            record.latitude = Some(camera.base_latitude);
            applied.latitude = true;
        }
        if record.longitude.is_none() {
            record.longitude = Some(camera.base_longitude);
            applied.longitude = true;
        }
    }

    debug!("applied overlay fields: {:?}", applied.names());
    applied
}

#[cfg(test)]
fn test_registry() -> CameraRegistry {
    CameraRegistry::new(vec![
        Camera {
            name: "TRAILCAM05".to_owned(),
            base_latitude: 41.7,
            base_longitude: -87.6,
            description: "North ridge".to_owned(),
            is_active: true,
        },
        Camera {
            name: "TRAILCAM06".to_owned(),
            base_latitude: 41.8,
            base_longitude: -87.5,
            description: String::new(),
            is_active: false,
        },
    ])
    .unwrap()
}

#[cfg(test)]
fn test_meta() -> OverlayMeta {
    OverlayMeta {
        camera_name: Some("TRAILCAM05".to_owned()),
        date_taken: NaiveDate::from_ymd_opt(2025, 12, 6),
        time_taken: NaiveTime::from_hms_opt(17, 41, 0),
        temperature_c: Some(23.0),
        pressure_inhg: Some(29.09),
        raw_text: String::new(),
    }
}

#[test]
fn fills_an_empty_record() {
    let mut record = PhotoRecord::default();
    let applied = apply_overlay_meta(
        &mut record,
        &test_meta(),
        &test_registry(),
        OverwritePolicy::Overwrite,
    );
    assert_eq!(record.camera.as_deref(), Some("TRAILCAM05"));
    assert_eq!(record.temperature_c, Some(23.0));
    assert_eq!(record.pressure_inhg, Some(29.09));
    assert_eq!(record.latitude, Some(41.7));
    assert_eq!(record.longitude, Some(-87.6));
    assert!(record.missing_overlay_fields().is_empty());
    assert_eq!(applied.names().len(), 7);
}

#[test]
fn missing_values_never_clobber_stored_values() {
    let mut record = PhotoRecord {
        temperature_c: Some(10.0),
        pressure_inhg: Some(30.0),
        ..PhotoRecord::default()
    };
    let meta = OverlayMeta {
        temperature_c: None,
        pressure_inhg: None,
        ..test_meta()
    };
    let applied = apply_overlay_meta(
        &mut record,
        &meta,
        &test_registry(),
        OverwritePolicy::Overwrite,
    );
    assert_eq!(record.temperature_c, Some(10.0));
    assert_eq!(record.pressure_inhg, Some(30.0));
    assert!(!applied.temperature_c);
    assert!(!applied.pressure_inhg);
}

#[test]
fn policy_controls_overwriting() {
    let stored = PhotoRecord {
        temperature_c: Some(10.0),
        ..PhotoRecord::default()
    };

    let mut record = stored.clone();
    apply_overlay_meta(&mut record, &test_meta(), &test_registry(), OverwritePolicy::Overwrite);
    assert_eq!(record.temperature_c, Some(23.0));

    let mut record = stored.clone();
    let applied = apply_overlay_meta(
        &mut record,
        &test_meta(),
        &test_registry(),
        OverwritePolicy::FillMissing,
    );
    assert_eq!(record.temperature_c, Some(10.0));
    assert!(!applied.temperature_c);
    assert!(applied.pressure_inhg);
}

#[test]
fn unknown_cameras_are_not_attached() {
    let mut record = PhotoRecord {
        camera: Some("TRAILCAM06".to_owned()),
        ..PhotoRecord::default()
    };
    let meta = OverlayMeta {
        camera_name: Some("TRAILCAM99".to_owned()),
        ..OverlayMeta::default()
    };
    let applied = apply_overlay_meta(
        &mut record,
        &meta,
        &test_registry(),
        OverwritePolicy::Overwrite,
    );
    assert!(!applied.camera);
    // The existing camera still supplies a default location, even when it's
    // no longer active.
    assert_eq!(record.camera.as_deref(), Some("TRAILCAM06"));
    assert_eq!(record.latitude, Some(41.8));
}

#[test]
fn hand_entered_coordinates_are_kept() {
    let mut record = PhotoRecord {
        latitude: Some(1.0),
        ..PhotoRecord::default()
    };
    let applied = apply_overlay_meta(
        &mut record,
        &test_meta(),
        &test_registry(),
        OverwritePolicy::Overwrite,
    );
    assert_eq!(record.latitude, Some(1.0));
    assert_eq!(record.longitude, Some(-87.6));
    assert!(!applied.latitude);
    assert!(applied.longitude);
}

#[test]
fn empty_meta_changes_nothing() {
    let mut record = PhotoRecord::default();
    let applied = apply_overlay_meta(
        &mut record,
        &OverlayMeta::default(),
        &CameraRegistry::default(),
        OverwritePolicy::Overwrite,
    );
    assert!(!applied.any());
    assert_eq!(record, PhotoRecord::default());
    assert_eq!(record.missing_overlay_fields().len(), 4);
}

#[test]
fn registry_rejects_bad_cameras() {
    let camera = Camera {
        name: "TRAILCAM01".to_owned(),
        base_latitude: 10.0,
        base_longitude: 10.0,
        description: String::new(),
        is_active: true,
    };
    let result = CameraRegistry::new(vec![camera.clone(), camera.clone()]);
    assert!(matches!(result, Err(Error::DuplicateCamera { .. })));

    let bad = Camera {
        base_latitude: 91.0,
        ..camera
    };
    let result = CameraRegistry::new(vec![bad]);
    assert!(matches!(result, Err(Error::InvalidCoordinates { .. })));
}
