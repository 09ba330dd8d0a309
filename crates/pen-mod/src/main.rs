use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    decode_payload, encode_payload, import_mods, show_tree, DecodePayloadArgs, EncodePayloadArgs,
    ImportModsArgs, PayloadFormat, ShowTreeArgs, TreeView,
};
use miette::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utils::config::{self, AppConfig};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move the manipulation payload of mods into their manifests
    Import {
        /// Mod directories, or folders of mods when --all is set
        #[arg(required = true)]
        paths: Vec<String>,

        /// Import every mod directory inside each given folder
        #[arg(short, long)]
        all: bool,

        /// Merge into the manifest's existing manipulations instead of replacing them
        #[arg(short, long)]
        merge: bool,

        /// Name of the payload file inside a mod directory
        #[arg(long)]
        meta_file: Option<String>,

        /// Name of the manifest inside a mod directory
        #[arg(long)]
        manifest_file: Option<String>,
    },
    /// Decode a manipulation payload and print its manifest records
    Decode {
        /// The path to the payload file
        #[arg(short, long)]
        file_path: String,

        /// Write the records to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Only print how many manipulations each category holds
        #[arg(long)]
        summary: bool,
    },
    /// Write the manipulations of a manifest as a legacy payload
    Encode {
        /// The path to the manifest
        #[arg(short, long)]
        manifest: String,

        /// Write the payload to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Payload body layout
        #[arg(long, value_enum, default_value = "binary")]
        format: PayloadFormat,
    },
    /// Show a view of captured resource trees
    Tree {
        /// The path to the snapshot file
        #[arg(short, long)]
        file_path: String,

        #[command(subcommand)]
        view: TreeView,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set whether imports merge into existing manipulations by default
    SetMergeExisting {
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Set the default log filter
    SetLogFilter { filter: String },
    /// Reset the configuration to defaults
    Reset,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging(cfg: &AppConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| cfg.log_filter().into());

    // stdout carries command output, logs go to stderr
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();

    let cfg = config::load_config();
    init_logging(&cfg);

    match args.command {
        Commands::Import {
            paths,
            all,
            merge,
            meta_file,
            manifest_file,
        } => import_mods(
            &cfg,
            ImportModsArgs {
                paths,
                all,
                merge,
                meta_file,
                manifest_file,
            },
        ),
        Commands::Decode {
            file_path,
            output,
            summary,
        } => decode_payload(DecodePayloadArgs {
            file_path,
            output,
            summary,
        }),
        Commands::Encode {
            manifest,
            output,
            format,
        } => encode_payload(EncodePayloadArgs {
            manifest,
            output,
            format,
        }),
        Commands::Tree { file_path, view } => show_tree(ShowTreeArgs { file_path, view }),
        Commands::Config { action } => match action {
            ConfigCommands::Show => commands::config::show_config(),
            ConfigCommands::SetMergeExisting { value } => {
                commands::config::set_merge_existing(value)
            }
            ConfigCommands::SetLogFilter { filter } => commands::config::set_log_filter(filter),
            ConfigCommands::Reset => commands::config::reset_config(),
        },
    }
}
