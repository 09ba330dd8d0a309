use crate::utils::config::{self, AppConfig};
use colored::Colorize;
use miette::Result;

fn update_config(update: impl FnOnce(&mut AppConfig)) -> Result<()> {
    let mut cfg = config::load_config();
    update(&mut cfg);
    config::save_config(&cfg).map_err(|e| miette::miette!("Failed to save config: {}", e))
}

fn print_entry(name: &str, value: Option<String>, default: &str) {
    match value {
        Some(value) => println!("  {} {}", format!("{}:", name).bright_white(), value),
        None => println!(
            "  {} {} {}",
            format!("{}:", name).bright_white(),
            default,
            "(default)".bright_yellow()
        ),
    }
}

pub fn show_config() -> Result<()> {
    let cfg = config::load_config();
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let defaults = AppConfig::default().import_options();

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);
    print_entry(
        "meta_file_name",
        cfg.meta_file_name.clone(),
        &defaults.meta_file_name,
    );
    print_entry(
        "manifest_file_name",
        cfg.manifest_file_name.clone(),
        &defaults.manifest_file_name,
    );
    print_entry(
        "merge_existing",
        cfg.merge_existing.map(|v| v.to_string()),
        "false",
    );
    print_entry("log_filter", cfg.log_filter.clone(), config::DEFAULT_LOG_FILTER);
    println!();
    Ok(())
}

pub fn set_merge_existing(value: bool) -> Result<()> {
    update_config(|cfg| cfg.merge_existing = Some(value))?;
    println!(
        "{} {}",
        "✓ merge_existing set to".bright_green().bold(),
        value.to_string().bright_white()
    );
    Ok(())
}

pub fn set_log_filter(filter: String) -> Result<()> {
    update_config(|cfg| cfg.log_filter = Some(filter.clone()))?;
    println!(
        "{} {}",
        "✓ log_filter set to".bright_green().bold(),
        filter.bright_white()
    );
    Ok(())
}

pub fn reset_config() -> Result<()> {
    config::save_config(&AppConfig::default())
        .map_err(|e| miette::miette!("Failed to reset config: {}", e))?;

    println!(
        "{}",
        "✓ Configuration reset to defaults".bright_green().bold()
    );
    Ok(())
}
