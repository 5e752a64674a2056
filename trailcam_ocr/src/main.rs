//! Turn the OCR'd overlay text of trail-camera photos into structured
//! metadata.

use std::{
    fs::read_to_string,
    io::{stdout, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use overlay_meta::{
    apply_overlay_meta, normalize_overlay_text, CameraRegistry, Config, OverlayMeta,
    OverlayRegions, OverwritePolicy, PhotoRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
/// Read trail-camera overlay strips.  Crop the strip, split it into left,
/// center and right regions, OCR each region, and pass the resulting text to
/// this tool.
#[command(name = "trailcam_ocr", version)]
enum Args {
    /// Print the normalized form of some OCR text.
    #[command(name = "normalize")]
    Normalize {
        /// The raw OCR text.
        text: String,
    },

    /// Extract metadata from the three regions of a single overlay strip.
    #[command(name = "extract")]
    Extract {
        /// OCR text of the left region (temperature and pressure).
        #[arg(long, default_value = "")]
        left: String,

        /// OCR text of the center region (camera name).
        #[arg(long, default_value = "")]
        center: String,

        /// OCR text of the right region (date and time).
        #[arg(long, default_value = "")]
        right: String,

        /// Path to a JSON configuration file listing known cameras.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to a JSON photo record.  If present, we apply the extracted
        /// metadata to this record and print the updated record.
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Whether to replace values already stored on the photo.  Defaults
        /// to the setting in the configuration file.
        #[arg(long)]
        policy: Option<Policy>,
    },

    /// Extract metadata for many photos.  The input is a JSON array of
    /// objects with `left`, `center` and `right` keys, and an optional `id`.
    /// We print one line of JSON per photo.
    #[command(name = "batch")]
    Batch {
        /// Path to the JSON input file.
        input: PathBuf,
    },
}

/// Command-line names for `OverwritePolicy`.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// Replace stored values with any value we extracted.
    Overwrite,
    /// Only fill in fields which are currently unset.
    FillMissing,
}

impl From<Policy> for OverwritePolicy {
    fn from(policy: Policy) -> OverwritePolicy {
        match policy {
            Policy::Overwrite => OverwritePolicy::Overwrite,
            Policy::FillMissing => OverwritePolicy::FillMissing,
        }
    }
}

/// One photo in a batch input file.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(flatten)]
    regions: OverlayRegions,
}

/// One line of batch output.
#[derive(Debug, Serialize)]
struct BatchResult<'a> {
    id: Option<&'a serde_json::Value>,
    meta: OverlayMeta,
}

// Choose and run the appropriate command.
fn main() -> Result<()> {
    env_logger::init();

    let args: Args = Args::parse();
    match args {
        Args::Normalize { text } => cmd_normalize(&text),
        Args::Extract {
            left,
            center,
            right,
            config,
            photo,
            policy,
        } => {
            let regions = OverlayRegions {
                left,
                center,
                right,
            };
            let config = load_config(config.as_deref())?;
            let policy = policy.map(OverwritePolicy::from).unwrap_or(config.overwrite);
            cmd_extract(&regions, &config, photo.as_deref(), policy)
        }
        Args::Batch { input } => cmd_batch(&input),
    }
}

/// Load our configuration file, or use the defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Could not load config: {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn cmd_normalize(text: &str) -> Result<()> {
    println!("{}", normalize_overlay_text(text));
    Ok(())
}

fn cmd_extract(
    regions: &OverlayRegions,
    config: &Config,
    photo: Option<&Path>,
    policy: OverwritePolicy,
) -> Result<()> {
    let meta = regions.extract();
    let out = match photo {
        None => serde_json::to_string_pretty(&meta)?,
        Some(path) => {
            let data = read_to_string(path)
                .with_context(|| format!("Could not read file: {}", path.display()))?;
            let mut record: PhotoRecord = serde_json::from_str(&data)
                .with_context(|| format!("Could not parse photo: {}", path.display()))?;
            let cameras: CameraRegistry = config.camera_registry()?;
            let applied = apply_overlay_meta(&mut record, &meta, &cameras, policy);
            info!("updated {}: {:?}", path.display(), applied.names());
            let missing = record.missing_overlay_fields();
            if !missing.is_empty() {
                info!("{} still needs manual review of {:?}", path.display(), missing);
            }
            serde_json::to_string_pretty(&record)?
        }
    };
    println!("{}", out);
    Ok(())
}

fn cmd_batch(input: &Path) -> Result<()> {
    let data = read_to_string(input)
        .with_context(|| format!("Could not read file: {}", input.display()))?;
    let entries: Vec<BatchEntry> = serde_json::from_str(&data)
        .with_context(|| format!("Could not parse batch: {}", input.display()))?;

    let stdout = stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut unreadable = 0;
    for entry in &entries {
        let meta = entry.regions.extract();
        if meta.is_empty() {
            unreadable += 1;
        }
        let result = BatchResult {
            id: entry.id.as_ref(),
            meta,
        };
        serde_json::to_writer(&mut out, &result)?;
        writeln!(out)?;
    }
    out.flush()?;
    debug!(
        "read {} overlays, {} unreadable",
        entries.len(),
        unreadable
    );
    Ok(())
}
