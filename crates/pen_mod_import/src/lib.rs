//! Import of legacy meta manipulation payloads into mod manifests.
//!
//! Older mods ship their manipulations as a base64 payload file. This crate
//! decodes such payloads with [`pen_meta`] and stores the records in the mod's
//! manifest, either for one mod ([`import_manipulations`]) or for a batch of
//! mods where every mod succeeds or fails on its own ([`import_all`]).

pub mod batch;
pub mod error;
pub mod import;

pub use batch::{find_mod_dirs, import_all, ImportSummary, ModImportReport};
pub use error::{Error, Result};
pub use import::{
    import_manipulations, read_manipulations, write_manipulations, ImportOptions, ImportOutcome,
    SkipReason, DEFAULT_MANIFEST_FILE_NAME, DEFAULT_META_FILE_NAME, MANIPULATIONS_FIELD,
};
