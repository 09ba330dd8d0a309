use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::AppConfig;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use pen_mod_import::{find_mod_dirs, import_all, ImportOutcome, ImportSummary};

pub struct ImportModsArgs {
    pub paths: Vec<String>,
    pub all: bool,
    pub merge: bool,
    pub meta_file: Option<String>,
    pub manifest_file: Option<String>,
}

pub fn import_mods(cfg: &AppConfig, args: ImportModsArgs) -> Result<()> {
    let mut options = cfg.import_options();
    if let Some(name) = args.meta_file {
        options = options.with_meta_file_name(name);
    }
    if let Some(name) = args.manifest_file {
        options = options.with_manifest_file_name(name);
    }
    if args.merge {
        options = options.with_merge_existing(true);
    }

    let mut mod_dirs = Vec::new();
    for path in args.paths {
        let path = Utf8PathBuf::from(path);
        if !path.is_dir() {
            return Err(CliError::mod_dir_not_found(path.into_std_path_buf()).into());
        }

        if args.all {
            let found = find_mod_dirs(&path, &options)
                .map_err(|e| CliError::import_failed(path.as_std_path(), e))?;
            if found.is_empty() {
                println_pad!(
                    "{} {}",
                    "No mods with a payload in".bright_yellow(),
                    path.as_str().bright_white()
                );
            }
            mod_dirs.extend(found);
        } else {
            mod_dirs.push(path);
        }
    }

    let reports = import_all(&mod_dirs, &options);
    for report in &reports {
        let name = report.mod_dir.as_str().bright_cyan();
        match &report.result {
            Ok(ImportOutcome::Imported { manipulations }) => println_pad!(
                "{} {} {}",
                "✓".bright_green(),
                name,
                format!("({} manipulation(s))", manipulations).dimmed()
            ),
            Ok(ImportOutcome::Skipped(reason)) => println_pad!(
                "{} {} {}",
                "-".bright_yellow(),
                name,
                format!("(skipped: {})", reason).dimmed()
            ),
            Err(e) => println_pad!("{} {} {}", "✗".bright_red(), name, e.to_string().bright_red()),
        }
    }

    let summary = ImportSummary::from_reports(&reports);
    println_pad!(
        "\n{} {} imported, {} skipped, {} failed",
        "📦 Done:".bright_blue().bold(),
        summary.imported.to_string().bright_green().bold(),
        summary.skipped.to_string().bright_yellow(),
        summary.failed.to_string().bright_red()
    );

    if summary.failed > 0 {
        return Err(CliError::BatchFailed {
            failed: summary.failed,
            total: reports.len(),
        }
        .into());
    }

    Ok(())
}
