use crate::errors::CliError;
use crate::utils::existing_file;
use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use pen_resource_tree::snapshot::load_snapshots_from_file;
use pen_resource_tree::{
    encapsulate_resource_trees, resource_path_dictionaries, resources_of_type, EntitySnapshot,
    ResourceType,
};

#[derive(Subcommand, Debug, Clone)]
pub enum TreeView {
    /// Actual files and the game paths redirected to them, per entity
    Paths,
    /// Resources of one type keyed by resource handle, per entity
    Resources {
        /// Resource type as a file extension, e.g. tex or mtrl
        #[arg(short = 't', long = "type")]
        resource_type: String,
    },
    /// Flattened nodes with child positions, per entity
    Nodes,
}

pub struct ShowTreeArgs {
    pub file_path: String,
    pub view: TreeView,
}

pub fn show_tree(args: ShowTreeArgs) -> Result<()> {
    let path = existing_file(&args.file_path)?;
    let snapshots =
        load_snapshots_from_file(&path).map_err(|source| CliError::SnapshotLoad {
            path: path.clone().into_std_path_buf(),
            source,
        })?;
    let trees = snapshots.iter().map(EntitySnapshot::as_pair);

    let json = match args.view {
        TreeView::Paths => serde_json::to_string_pretty(&resource_path_dictionaries(trees)),
        TreeView::Resources { resource_type } => {
            let resource_type = parse_resource_type(&resource_type)?;
            serde_json::to_string_pretty(&resources_of_type(trees, resource_type))
        }
        TreeView::Nodes => serde_json::to_string_pretty(&encapsulate_resource_trees(trees)),
    }
    .into_diagnostic()?;

    println!("{}", json);
    Ok(())
}

fn parse_resource_type(name: &str) -> Result<ResourceType> {
    let name = name.trim_start_matches('.');
    match ResourceType::from_extension(name) {
        ResourceType::Unknown if !name.eq_ignore_ascii_case("unknown") => {
            Err(CliError::InvalidResourceType {
                name: name.to_string(),
            }
            .into())
        }
        resource_type => Ok(resource_type),
    }
}
