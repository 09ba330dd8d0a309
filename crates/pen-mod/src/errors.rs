use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("File not found: {path}")]
    #[diagnostic(
        code(file::not_found),
        help("Make sure the file exists and the path is correct")
    )]
    FileNotFound { path: PathBuf },

    #[error("Mod directory not found: {path}")]
    #[diagnostic(
        code(import::mod_dir_not_found),
        help("Pass the directory that contains the mod's manifest, or a folder of mods together with --all")
    )]
    ModDirNotFound { path: PathBuf },

    #[error("Failed to import {mod_dir}")]
    #[diagnostic(code(import::failed))]
    ImportFailed {
        mod_dir: PathBuf,
        #[source]
        source: pen_mod_import::Error,
    },

    #[error("{failed} of {total} mod(s) failed to import")]
    #[diagnostic(
        code(import::batch_failed),
        help("The other mods were imported. Run with RUST_LOG=pen_mod_import=debug for details")
    )]
    BatchFailed { failed: usize, total: usize },

    #[error("Payload file is empty: {path}")]
    #[diagnostic(code(payload::empty), help("There is nothing to decode"))]
    EmptyPayload { path: PathBuf },

    #[error("Could not decode payload: {path}")]
    #[diagnostic(
        code(payload::decode_failed),
        help("The file must hold a single base64 encoded manipulation payload")
    )]
    PayloadDecode {
        path: PathBuf,
        #[source]
        source: pen_meta::DecodeError,
    },

    #[error("Could not encode payload")]
    #[diagnostic(code(payload::encode_failed))]
    PayloadEncode {
        #[source]
        source: pen_meta::EncodeError,
    },

    #[error("Could not load snapshot: {path}")]
    #[diagnostic(
        code(tree::snapshot_invalid),
        help("A snapshot is a JSON array of {{ \"objectIndex\": .., \"tree\": .. }} objects")
    )]
    SnapshotLoad {
        path: PathBuf,
        #[source]
        source: pen_resource_tree::SnapshotError,
    },

    #[error("Unknown resource type: {name}")]
    #[diagnostic(
        code(tree::invalid_resource_type),
        help("Use a file extension such as mdl, mtrl, tex, sklb or pap")
    )]
    InvalidResourceType { name: String },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn mod_dir_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ModDirNotFound { path: path.into() }
    }

    pub fn import_failed(mod_dir: impl Into<PathBuf>, source: pen_mod_import::Error) -> Self {
        Self::ImportFailed {
            mod_dir: mod_dir.into(),
            source,
        }
    }
}
