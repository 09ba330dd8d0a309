//! Moving a legacy manipulation payload into a mod's manifest.
//!
//! A mod directory in the older layout carries its manipulations as a base64
//! payload in `meta.txt` next to the `default_mod.json` manifest. Importing
//! decodes the payload and stores the records under the manifest's
//! `Manipulations` field. Every other manifest field is written back as it
//! was, in its original order.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use pen_meta::{codec, MetaDictionary};
use serde_json::Value;
use std::fmt;

/// Manifest field that receives the manipulation records.
pub const MANIPULATIONS_FIELD: &str = "Manipulations";

pub const DEFAULT_META_FILE_NAME: &str = "meta.txt";
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "default_mod.json";

/// Options for [`import_manipulations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Name of the payload file inside the mod directory.
    pub meta_file_name: String,
    /// Name of the manifest inside the mod directory.
    pub manifest_file_name: String,
    /// Merge decoded records over the manifest's existing ones instead of
    /// replacing them.
    pub merge_existing: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            meta_file_name: DEFAULT_META_FILE_NAME.to_string(),
            manifest_file_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
            merge_existing: false,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meta_file_name(mut self, name: impl Into<String>) -> Self {
        self.meta_file_name = name.into();
        self
    }

    pub fn with_manifest_file_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_file_name = name.into();
        self
    }

    pub fn with_merge_existing(mut self, merge_existing: bool) -> Self {
        self.merge_existing = merge_existing;
        self
    }
}

/// Why a mod was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingPayload,
    /// The payload file contains only whitespace.
    EmptyPayload,
    MissingManifest,
    /// The payload could not be decoded. Holds the decode error message.
    Undecodable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingPayload => f.write_str("no manipulation payload"),
            SkipReason::EmptyPayload => f.write_str("manipulation payload is empty"),
            SkipReason::MissingManifest => f.write_str("no manifest"),
            SkipReason::Undecodable(e) => write!(f, "undecodable payload ({e})"),
        }
    }
}

/// Result of importing one mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The manifest was rewritten and now holds `manipulations` records.
    Imported { manipulations: usize },
    Skipped(SkipReason),
}

impl ImportOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }
}

/// Import the legacy payload of one mod directory into its manifest.
///
/// Returns [`ImportOutcome::Skipped`] without touching the manifest when there
/// is nothing usable to import. Returns `Err` only when reading or writing
/// files fails or the manifest itself is malformed.
pub fn import_manipulations(mod_dir: &Utf8Path, options: &ImportOptions) -> Result<ImportOutcome> {
    if !mod_dir.is_dir() {
        return Err(Error::InvalidModDir(mod_dir.to_path_buf()));
    }

    let meta_path = mod_dir.join(&options.meta_file_name);
    if !meta_path.exists() {
        tracing::debug!("No {} in {}", options.meta_file_name, mod_dir);
        return Ok(ImportOutcome::Skipped(SkipReason::MissingPayload));
    }

    let payload = match String::from_utf8(std::fs::read(&meta_path)?) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Skipping {}: {} is not valid UTF-8: {}", mod_dir, meta_path, e);
            return Ok(ImportOutcome::Skipped(SkipReason::Undecodable(e.to_string())));
        }
    };
    if payload.trim().is_empty() {
        tracing::debug!("Empty manipulation payload in {}", meta_path);
        return Ok(ImportOutcome::Skipped(SkipReason::EmptyPayload));
    }

    let decoded = match codec::decode(&payload) {
        Ok(dictionary) => dictionary,
        Err(e) => {
            tracing::warn!("Skipping {}: could not decode {}: {}", mod_dir, meta_path, e);
            return Ok(ImportOutcome::Skipped(SkipReason::Undecodable(e.to_string())));
        }
    };

    let manifest_path = mod_dir.join(&options.manifest_file_name);
    if !manifest_path.exists() {
        tracing::warn!("Skipping {}: no {}", mod_dir, options.manifest_file_name);
        return Ok(ImportOutcome::Skipped(SkipReason::MissingManifest));
    }

    let manipulations = write_manipulations(&manifest_path, decoded, options.merge_existing)?;

    tracing::info!(
        "Imported {} manipulation(s) into {}",
        manipulations,
        manifest_path
    );
    Ok(ImportOutcome::Imported { manipulations })
}

/// Replace (or merge into) the `Manipulations` field of a manifest file.
///
/// When merging, existing records that cannot be parsed are kept after the
/// merged ones. Returns the number of records the manifest holds afterwards.
pub fn write_manipulations(
    manifest_path: &Utf8Path,
    dictionary: MetaDictionary,
    merge_existing: bool,
) -> Result<usize> {
    let contents = std::fs::read_to_string(manifest_path)?;
    let mut root: Value = serde_json::from_str(&contents)?;
    let object = root
        .as_object_mut()
        .ok_or_else(|| Error::InvalidManifest(manifest_path.to_path_buf()))?;

    let (dictionary, unrecognized) = if merge_existing {
        let (mut merged, unrecognized) = object
            .get(MANIPULATIONS_FIELD)
            .and_then(Value::as_array)
            .map(|records| MetaDictionary::partition_manifest_records(records))
            .unwrap_or_default();
        merged.merge(&dictionary);
        (merged, unrecognized)
    } else {
        (dictionary, Vec::new())
    };

    // Records this tool does not understand are carried over untouched.
    let mut records = match codec::to_manipulations_json(&dictionary)? {
        Value::Array(records) => records,
        other => vec![other],
    };
    let count = records.len() + unrecognized.len();
    records.extend(unrecognized);
    object.insert(MANIPULATIONS_FIELD.to_string(), Value::Array(records));

    let contents = serde_json::to_string_pretty(&root)?;
    std::fs::write(manifest_path, contents)?;
    Ok(count)
}

/// Read the manipulations currently stored in a manifest.
///
/// Unknown records are skipped. A manifest without `Manipulations` yields an
/// empty dictionary.
pub fn read_manipulations(manifest_path: &Utf8Path) -> Result<MetaDictionary> {
    let contents = std::fs::read_to_string(manifest_path)?;
    let root: Value = serde_json::from_str(&contents)?;
    let object = root
        .as_object()
        .ok_or_else(|| Error::InvalidManifest(manifest_path.to_path_buf()))?;

    Ok(object
        .get(MANIPULATIONS_FIELD)
        .and_then(Value::as_array)
        .map(|records| MetaDictionary::from_manifest_records(records))
        .unwrap_or_default())
}
