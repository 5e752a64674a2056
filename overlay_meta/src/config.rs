//! Settings for applying overlay data to photo records.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::apply::{Camera, CameraRegistry, OverwritePolicy};
use crate::{Error, Result};

/// Configuration, normally loaded from a JSON file like:
///
/// ```json
/// {
///   "overwrite": "fill_missing",
///   "cameras": [
///     { "name": "TRAILCAM05", "base_latitude": 41.7, "base_longitude": -87.6 }
///   ]
/// }
/// ```
///
/// All keys are optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Whether extracted values replace values already stored on a photo.
    pub overwrite: OverwritePolicy,

    /// The cameras we know about.
    pub cameras: Vec<Camera>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Config> {
        let data = fs::read_to_string(path).map_err(|err| Error::CouldNotReadFile {
            path: path.to_owned(),
            source: err,
        })?;
        data.parse()
    }

    /// Build a `CameraRegistry` from our list of cameras.
    pub fn camera_registry(&self) -> Result<CameraRegistry> {
        CameraRegistry::new(self.cameras.iter().cloned())
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(data: &str) -> Result<Config> {
        serde_json::from_str(data).map_err(|err| Error::CouldNotParseConfig {
            source: Box::new(err),
        })
    }
}

#[test]
fn parse_config() {
    let config: Config = r#"{
        "overwrite": "fill_missing",
        "cameras": [
            { "name": "TRAILCAM05", "base_latitude": 41.7, "base_longitude": -87.6 },
            { "name": "TRAILCAM06", "base_latitude": 41.8, "base_longitude": -87.5,
              "description": "Creek crossing", "is_active": false }
        ]
    }"#
    .parse()
    .expect("failed to parse config");
    assert_eq!(config.overwrite, OverwritePolicy::FillMissing);
    assert!(config.cameras[0].is_active);
    assert!(!config.cameras[1].is_active);

    let registry = config.camera_registry().unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.lookup("TRAILCAM06").map(|c| c.description.as_str()),
        Some("Creek crossing")
    );
}

#[test]
fn empty_config_uses_defaults() {
    let config: Config = "{}".parse().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.overwrite, OverwritePolicy::Overwrite);
    assert!(config.camera_registry().unwrap().is_empty());
}

#[test]
fn bad_config_is_an_error() {
    assert!(matches!(
        "{\"overwrite\": \"sometimes\"}".parse::<Config>(),
        Err(Error::CouldNotParseConfig { .. })
    ));
    assert!(matches!(
        "{\"cameras\": 3}".parse::<Config>(),
        Err(Error::CouldNotParseConfig { .. })
    ));
    assert!(matches!(
        Config::from_path(Path::new("does/not/exist.json")),
        Err(Error::CouldNotReadFile { .. })
    ));
}
