//! Per-entity views of resource trees for external consumers.
//!
//! All three views take `(entity, tree)` pairs. An entity that was already
//! seen is skipped, so when the same entity appears twice the first tree wins.
//! The `*_with` variants take the seen set explicitly so a caller can share it
//! across several calls of one request; the plain variants start from an
//! empty set.

use crate::flatten::child_indices;
use crate::node::{
    ChangedItemIcon, ObjectAddress, ObjectIndex, ResourceHandle, ResourceNode, ResourceTree,
    ResourceType,
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Full path -> game paths that were redirected to it.
pub type PathDictionary = IndexMap<String, IndexSet<String>>;

/// Resource handle -> description of the first node with that handle.
pub type ResourceDictionary = IndexMap<ResourceHandle, ResourceSummary>;

/// What the typed resource view reports for one resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub full_path: String,
    /// Empty when the node has no name.
    pub name: String,
    pub icon: ChangedItemIcon,
}

/// A resource node with its children expressed as positions in the
/// surrounding node list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpcResourceNode {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub icon: ChangedItemIcon,
    pub name: Option<String>,
    pub game_path: Option<String>,
    pub actual_path: String,
    pub object_address: ObjectAddress,
    pub resource_handle: ResourceHandle,
    /// `None` when the child is not in the list. Serialized as `-1`.
    #[serde(with = "sentinel_indices")]
    pub children_indices: Vec<Option<usize>>,
}

impl IpcResourceNode {
    fn new(node: &ResourceNode, children_indices: Vec<Option<usize>>) -> Self {
        Self {
            resource_type: node.resource_type,
            icon: node.icon,
            name: node.name.clone(),
            game_path: node.game_path().map(str::to_string),
            actual_path: node.full_path.clone(),
            object_address: node.object_address,
            resource_handle: node.resource_handle,
            children_indices,
        }
    }
}

/// Path dictionaries for each distinct entity.
pub fn resource_path_dictionaries<'a>(
    trees: impl IntoIterator<Item = (ObjectIndex, &'a ResourceTree)>,
) -> IndexMap<ObjectIndex, PathDictionary> {
    resource_path_dictionaries_with(trees, &mut HashSet::new())
}

pub fn resource_path_dictionaries_with<'a>(
    trees: impl IntoIterator<Item = (ObjectIndex, &'a ResourceTree)>,
    seen: &mut HashSet<ObjectIndex>,
) -> IndexMap<ObjectIndex, PathDictionary> {
    per_entity(trees, seen, collect_resource_paths)
}

/// Union the game paths of every node by full path.
///
/// Nodes without game paths carry no redirection and are left out.
pub fn collect_resource_paths(tree: &ResourceTree) -> PathDictionary {
    let mut dictionary = PathDictionary::new();
    for node in tree.flat_nodes() {
        if node.possible_game_paths.is_empty() {
            continue;
        }

        dictionary
            .entry(node.full_path.clone())
            .or_default()
            .extend(node.possible_game_paths.iter().cloned());
    }
    dictionary
}

/// Resources of one type for each distinct entity.
pub fn resources_of_type<'a>(
    trees: impl IntoIterator<Item = (ObjectIndex, &'a ResourceTree)>,
    resource_type: ResourceType,
) -> IndexMap<ObjectIndex, ResourceDictionary> {
    resources_of_type_with(trees, resource_type, &mut HashSet::new())
}

pub fn resources_of_type_with<'a>(
    trees: impl IntoIterator<Item = (ObjectIndex, &'a ResourceTree)>,
    resource_type: ResourceType,
    seen: &mut HashSet<ObjectIndex>,
) -> IndexMap<ObjectIndex, ResourceDictionary> {
    per_entity(trees, seen, |tree| collect_resources_of_type(tree, resource_type))
}

/// Nodes of `resource_type`, keyed by resource handle. The first node with a
/// given handle wins.
pub fn collect_resources_of_type(
    tree: &ResourceTree,
    resource_type: ResourceType,
) -> ResourceDictionary {
    let mut dictionary = ResourceDictionary::new();
    for node in tree.flat_nodes() {
        if node.resource_type != resource_type {
            continue;
        }

        dictionary
            .entry(node.resource_handle)
            .or_insert_with(|| ResourceSummary {
                full_path: node.full_path.clone(),
                name: node.name.clone().unwrap_or_default(),
                icon: node.icon,
            });
    }
    dictionary
}

/// Full adjacency lists for each distinct entity.
pub fn encapsulate_resource_trees<'a>(
    trees: impl IntoIterator<Item = (ObjectIndex, &'a ResourceTree)>,
) -> IndexMap<ObjectIndex, Vec<IpcResourceNode>> {
    encapsulate_resource_trees_with(trees, &mut HashSet::new())
}

pub fn encapsulate_resource_trees_with<'a>(
    trees: impl IntoIterator<Item = (ObjectIndex, &'a ResourceTree)>,
    seen: &mut HashSet<ObjectIndex>,
) -> IndexMap<ObjectIndex, Vec<IpcResourceNode>> {
    per_entity(trees, seen, encapsulate_resource_tree)
}

/// Flatten a tree into a pointer free node list.
pub fn encapsulate_resource_tree(tree: &ResourceTree) -> Vec<IpcResourceNode> {
    to_ipc_nodes(&tree.flat_nodes())
}

/// Convert an already flattened node sequence, resolving children by identity.
pub fn to_ipc_nodes(flat: &[&ResourceNode]) -> Vec<IpcResourceNode> {
    let indices = child_indices(flat);
    let missing = indices.iter().flatten().filter(|i| i.is_none()).count();
    if missing > 0 {
        tracing::warn!(
            "{} child reference(s) could not be resolved in a list of {} node(s)",
            missing,
            flat.len()
        );
    }

    flat.iter()
        .zip(indices)
        .map(|(node, children)| IpcResourceNode::new(node, children))
        .collect()
}

fn per_entity<'a, T>(
    trees: impl IntoIterator<Item = (ObjectIndex, &'a ResourceTree)>,
    seen: &mut HashSet<ObjectIndex>,
    mut build: impl FnMut(&ResourceTree) -> T,
) -> IndexMap<ObjectIndex, T> {
    let mut views = IndexMap::new();
    for (object, tree) in trees {
        if !seen.insert(object) {
            tracing::debug!("Skipping duplicate entity {}", object);
            continue;
        }
        views.insert(object, build(tree));
    }
    views
}

mod sentinel_indices {
    use serde::{Deserialize, Deserializer, Serializer};

    const UNRESOLVED: i64 = -1;

    pub fn serialize<S: Serializer>(
        indices: &[Option<usize>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            indices
                .iter()
                .map(|index| index.map_or(UNRESOLVED, |i| i as i64)),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<usize>>, D::Error> {
        let raw = Vec::<i64>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|i| usize::try_from(i).ok()).collect())
    }
}
