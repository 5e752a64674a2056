//! Helpers for the output of wildlife detection and classification models.
//!
//! We never run the models ourselves.  These are just the bits needed to
//! make sense of their JSON output when staging a photo for review.

use serde::{Deserialize, Serialize};

/// Detections below this confidence are usually noise (grass, shadows).
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.2;

/// A single bounding box reported by a detector.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Detection {
    /// `[x, y, width, height]`, normalized to the range 0 to 1.
    #[serde(default)]
    pub bbox: [f64; 4],

    /// Detection confidence, from 0 to 1.
    #[serde(default)]
    pub conf: f64,

    /// The detector's category label, such as `"1"` for animal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// The classifier's species string, if any.  See [`common_name`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,

    /// The classifier's confidence in `species`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_conf: Option<f64>,
}

impl Detection {
    /// The common name of the classified species, if we have one.
    pub fn common_name(&self) -> Option<String> {
        self.species.as_deref().and_then(common_name)
    }
}

/// Get the common name from a classifier species string of the form
/// `uuid;class;order;family;genus;species;common name`, in title case.
pub fn common_name(species: &str) -> Option<String> {
    let parts = species.split(';').collect::<Vec<_>>();
    if parts.len() < 7 {
        return None;
    }
    let name = title_case(parts[parts.len() - 1].trim());
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

// Upper-case the first letter of every run of letters, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }
    result
}

/// Keep only the detections with at least `threshold` confidence.
pub fn filter_by_confidence(
    detections: Vec<Detection>,
    threshold: f64,
) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| d.conf >= threshold)
        .collect()
}

#[test]
fn extracts_common_names() {
    assert_eq!(
        common_name(
            "990ae9dd-7a59-4344-afcb-1b7b21368000;mammalia;primates;hominidae;homo;sapiens;human"
        )
        .as_deref(),
        Some("Human")
    );
    assert_eq!(
        common_name("id;mammalia;cetartiodactyla;cervidae;odocoileus;virginianus;WHITE-TAILED deer ")
            .as_deref(),
        Some("White-Tailed Deer")
    );
    assert_eq!(common_name("id;mammalia;carnivora;procyonidae").as_deref(), None);
    assert_eq!(common_name("a;b;c;d;e;f;  ").as_deref(), None);
    assert_eq!(common_name("").as_deref(), None);
}

#[test]
fn parses_detector_output() {
    let detections: Vec<Detection> = serde_json::from_str(
        r#"[
            {"bbox": [0.1, 0.2, 0.3, 0.4], "conf": 0.98, "category": "1",
             "species": "id;aves;galliformes;phasianidae;meleagris;gallopavo;wild turkey",
             "species_conf": 0.91},
            {"conf": 0.05, "category": "1"},
            {"bbox": [0.5, 0.5, 0.1, 0.1], "conf": 0.2}
        ]"#,
    )
    .unwrap();
    assert_eq!(detections[1].bbox, [0.0; 4]);
    assert_eq!(detections[0].common_name().as_deref(), Some("Wild Turkey"));
    assert_eq!(detections[2].common_name(), None);

    let kept = filter_by_confidence(detections, DEFAULT_CONFIDENCE_THRESHOLD);
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|d| d.conf >= 0.2));
}
