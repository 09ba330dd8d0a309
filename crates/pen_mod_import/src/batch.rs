//! Importing many mod directories at once.

use crate::error::{Error, Result};
use crate::import::{import_manipulations, ImportOptions, ImportOutcome};
use camino::{Utf8Path, Utf8PathBuf};

/// What happened to one mod of a batch.
#[derive(Debug)]
pub struct ModImportReport {
    pub mod_dir: Utf8PathBuf,
    pub result: Result<ImportOutcome>,
}

/// Counts over a batch of [`ModImportReport`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn from_reports(reports: &[ModImportReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match &report.result {
                Ok(ImportOutcome::Imported { .. }) => summary.imported += 1,
                Ok(ImportOutcome::Skipped(_)) => summary.skipped += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Import every mod directory in order.
///
/// A failing mod never stops the batch; its error is kept in its report and
/// the remaining mods are still imported.
pub fn import_all<I, P>(mod_dirs: I, options: &ImportOptions) -> Vec<ModImportReport>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Utf8Path>,
{
    mod_dirs
        .into_iter()
        .map(|dir| {
            let mod_dir = dir.as_ref().to_path_buf();
            let result = import_manipulations(&mod_dir, options);
            if let Err(e) = &result {
                tracing::warn!("Failed to import {}: {}", mod_dir, e);
            }
            ModImportReport { mod_dir, result }
        })
        .collect()
}

/// Immediate subdirectories of `root` that carry a payload file, sorted by name.
pub fn find_mod_dirs(root: &Utf8Path, options: &ImportOptions) -> Result<Vec<Utf8PathBuf>> {
    if !root.is_dir() {
        return Err(Error::InvalidModDir(root.to_path_buf()));
    }

    let mut dirs = Vec::new();
    for entry in root.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() && path.join(&options.meta_file_name).is_file() {
            dirs.push(path.to_path_buf());
        }
    }
    dirs.sort();
    Ok(dirs)
}
