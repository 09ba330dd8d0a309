//! Resource dependency trees and their index-addressed views.
//!
//! A loader produces one [`ResourceTree`] per entity. Consumers outside the
//! process cannot follow node references, so this crate flattens trees
//! ([`flatten`]) and offers three per-entity views ([`api`]):
//!
//! - path dictionaries: actual file -> redirected game paths
//! - typed resources: resource handle -> path, name and icon
//! - adjacency lists: flat nodes with children given as positions

pub mod api;
pub mod flatten;
pub mod node;
pub mod snapshot;

pub use api::{
    encapsulate_resource_trees, encapsulate_resource_trees_with, resource_path_dictionaries,
    resource_path_dictionaries_with, resources_of_type, resources_of_type_with, IpcResourceNode,
    PathDictionary, ResourceDictionary, ResourceSummary,
};
pub use flatten::{child_indices, flatten};
pub use node::{
    ChangedItemIcon, ObjectAddress, ObjectIndex, ResourceHandle, ResourceNode, ResourceTree,
    ResourceType,
};
pub use snapshot::{load_snapshots, load_snapshots_from_file, EntitySnapshot, SnapshotError};
