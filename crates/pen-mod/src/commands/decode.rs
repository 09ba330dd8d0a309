use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{existing_file, write_or_print};
use clap::ValueEnum;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use pen_meta::{codec, LegacyVersion, MetaCategory};

pub struct DecodePayloadArgs {
    pub file_path: String,
    pub output: Option<String>,
    pub summary: bool,
}

pub fn decode_payload(args: DecodePayloadArgs) -> Result<()> {
    let path = existing_file(&args.file_path)?;
    let payload = std::fs::read_to_string(&path).map_err(CliError::from)?;
    if payload.trim().is_empty() {
        return Err(CliError::EmptyPayload {
            path: path.into_std_path_buf(),
        }
        .into());
    }

    let dictionary = codec::decode(&payload).map_err(|source| CliError::PayloadDecode {
        path: path.clone().into_std_path_buf(),
        source,
    })?;

    if args.summary {
        println_pad!(
            "{} {}",
            "🧾 Manipulations:".bright_blue().bold(),
            dictionary.len().to_string().bright_white().bold()
        );
        for category in MetaCategory::ALL {
            println_pad!(
                "   {} {} {}",
                "•".bright_cyan(),
                format!("{:<10}", category.as_str()).bright_cyan(),
                dictionary.count(category)
            );
        }
        return Ok(());
    }

    let records = codec::to_manipulations_json(&dictionary).into_diagnostic()?;
    let json = serde_json::to_string_pretty(&records).into_diagnostic()?;
    write_or_print(args.output.as_deref(), &json)
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Binary,
}

impl From<PayloadFormat> for LegacyVersion {
    fn from(format: PayloadFormat) -> Self {
        match format {
            PayloadFormat::Json => LegacyVersion::Json,
            PayloadFormat::Binary => LegacyVersion::Binary,
        }
    }
}

pub struct EncodePayloadArgs {
    pub manifest: String,
    pub output: Option<String>,
    pub format: PayloadFormat,
}

pub fn encode_payload(args: EncodePayloadArgs) -> Result<()> {
    let path = existing_file(&args.manifest)?;
    let dictionary = pen_mod_import::read_manipulations(&path)
        .map_err(|e| CliError::import_failed(path.as_std_path(), e))?;

    let payload = codec::encode_legacy(&dictionary, args.format.into())
        .map_err(|source| CliError::PayloadEncode { source })?;

    tracing::debug!(
        manipulations = dictionary.len(),
        "Encoded manipulations from {}",
        path
    );
    write_or_print(args.output.as_deref(), &payload)
}
