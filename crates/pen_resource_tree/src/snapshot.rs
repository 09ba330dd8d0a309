//! Serialized resource trees of several entities.
//!
//! A snapshot file is a JSON array of `{ "objectIndex": .., "tree": .. }`
//! objects, in the order the entities were captured.

use crate::node::{ObjectIndex, ResourceTree};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// The captured resource tree of one entity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub object_index: ObjectIndex,
    pub tree: ResourceTree,
}

impl EntitySnapshot {
    pub fn new(object_index: ObjectIndex, tree: ResourceTree) -> Self {
        Self { object_index, tree }
    }

    /// The `(entity, tree)` pair the views in [`crate::api`] consume.
    pub fn as_pair(&self) -> (ObjectIndex, &ResourceTree) {
        (self.object_index, &self.tree)
    }
}

pub fn load_snapshots<R: Read>(reader: R) -> Result<Vec<EntitySnapshot>, SnapshotError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_snapshots_from_str(json: &str) -> Result<Vec<EntitySnapshot>, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_snapshots_from_file(path: &Utf8Path) -> Result<Vec<EntitySnapshot>, SnapshotError> {
    let file = File::open(path)?;
    load_snapshots(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resource_path_dictionaries;
    use crate::node::ResourceType;
    use std::io::Write;

    const SNAPSHOT: &str = r#"[
        {
            "objectIndex": 0,
            "tree": {
                "name": "Player",
                "nodes": [
                    {
                        "type": "mdl",
                        "resourceHandle": 16,
                        "fullPath": "/mods/body.mdl",
                        "possibleGamePaths": ["chara/human/c0101/obj/body/b0001/model/c0101b0001_top.mdl"],
                        "children": [
                            { "type": "mtrl", "resourceHandle": 32, "fullPath": "/game/skin.mtrl" }
                        ]
                    }
                ]
            }
        },
        {
            "objectIndex": 0,
            "tree": { "name": "Player again", "nodes": [] }
        },
        {
            "objectIndex": 201,
            "tree": { "name": "Minion" }
        }
    ]"#;

    #[test]
    fn test_load_snapshots_from_str() {
        let snapshots = load_snapshots_from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].object_index, ObjectIndex(0));
        assert_eq!(snapshots[0].tree.nodes[0].resource_type, ResourceType::Mdl);
        assert!(snapshots[2].tree.nodes.is_empty());
    }

    #[test]
    fn test_snapshots_feed_views() {
        let snapshots = load_snapshots_from_str(SNAPSHOT).unwrap();
        let dictionaries = resource_path_dictionaries(snapshots.iter().map(EntitySnapshot::as_pair));

        assert_eq!(dictionaries.len(), 2);
        assert!(dictionaries[&ObjectIndex(0)].contains_key("/mods/body.mdl"));
        assert!(dictionaries[&ObjectIndex(201)].is_empty());
    }

    #[test]
    fn test_load_snapshots_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshots = load_snapshots_from_file(Utf8Path::from_path(file.path()).unwrap()).unwrap();
        assert_eq!(snapshots[1].tree.name, "Player again");
    }

    #[test]
    fn test_invalid_snapshot() {
        let result = load_snapshots_from_str(r#"{"objectIndex": 0}"#);
        assert!(matches!(result, Err(SnapshotError::Json(_))));

        let result = load_snapshots_from_file(Utf8Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }
}
