//! Resource tree nodes as handed over by the resource loader.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of the game object (or sub-object) that loaded a resource.
///
/// Only used as a correlation key; never dereferenced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct ObjectAddress(pub usize);

/// Address of the loaded resource. Several nodes may share one handle.
///
/// Only used as a correlation key; never dereferenced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct ResourceHandle(pub usize);

/// Caller supplied identity of an entity, e.g. its object table slot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ObjectIndex(pub u16);

impl fmt::Display for ObjectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::Display for ObjectIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// File kind of a loaded resource.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Mdl,
    Mtrl,
    Tex,
    Sklb,
    Skp,
    Phyb,
    Pbd,
    Shpk,
    Tmb,
    Pap,
    Avfx,
    Atex,
    Eid,
    Atch,
    Imc,
    #[default]
    Unknown,
}

impl ResourceType {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "mdl" => ResourceType::Mdl,
            "mtrl" => ResourceType::Mtrl,
            "tex" => ResourceType::Tex,
            "sklb" => ResourceType::Sklb,
            "skp" => ResourceType::Skp,
            "phyb" => ResourceType::Phyb,
            "pbd" => ResourceType::Pbd,
            "shpk" => ResourceType::Shpk,
            "tmb" => ResourceType::Tmb,
            "pap" => ResourceType::Pap,
            "avfx" => ResourceType::Avfx,
            "atex" => ResourceType::Atex,
            "eid" => ResourceType::Eid,
            "atch" => ResourceType::Atch,
            "imc" => ResourceType::Imc,
            _ => ResourceType::Unknown,
        }
    }

    /// Classify a game path or file system path by its extension.
    pub fn from_path(path: &str) -> Self {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((_, extension)) => Self::from_extension(extension),
            None => ResourceType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Mdl => "mdl",
            ResourceType::Mtrl => "mtrl",
            ResourceType::Tex => "tex",
            ResourceType::Sklb => "sklb",
            ResourceType::Skp => "skp",
            ResourceType::Phyb => "phyb",
            ResourceType::Pbd => "pbd",
            ResourceType::Shpk => "shpk",
            ResourceType::Tmb => "tmb",
            ResourceType::Pap => "pap",
            ResourceType::Avfx => "avfx",
            ResourceType::Atex => "atex",
            ResourceType::Eid => "eid",
            ResourceType::Atch => "atch",
            ResourceType::Imc => "imc",
            ResourceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon shown next to a resource by consumers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChangedItemIcon {
    #[default]
    Unknown,
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Ears,
    Neck,
    Wrists,
    Finger,
    Mainhand,
    Offhand,
    Customization,
    Monster,
    Demihuman,
    Action,
    Emote,
}

/// A node of a resource dependency tree.
///
/// A node owns its children. `full_path` is the file that was actually
/// loaded; `possible_game_paths` are the game paths that were redirected to
/// it and may be empty when the node was only reached structurally.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub icon: ChangedItemIcon,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[serde(default)]
    pub object_address: ObjectAddress,

    pub resource_handle: ResourceHandle,

    pub full_path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_game_paths: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResourceNode>,
}

impl ResourceNode {
    pub fn new(
        resource_type: ResourceType,
        resource_handle: ResourceHandle,
        full_path: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            icon: ChangedItemIcon::Unknown,
            resource_type,
            object_address: ObjectAddress::default(),
            resource_handle,
            full_path: full_path.into(),
            possible_game_paths: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_icon(mut self, icon: ChangedItemIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_object_address(mut self, object_address: ObjectAddress) -> Self {
        self.object_address = object_address;
        self
    }

    pub fn with_game_path(mut self, game_path: impl Into<String>) -> Self {
        self.possible_game_paths.push(game_path.into());
        self
    }

    pub fn with_child(mut self, child: ResourceNode) -> Self {
        self.children.push(child);
        self
    }

    /// The game path this node was loaded through, if it is unambiguous.
    pub fn game_path(&self) -> Option<&str> {
        match self.possible_game_paths.as_slice() {
            [single] => Some(single.as_str()),
            _ => None,
        }
    }
}

/// All resources of one entity, as one or more top level nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTree {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub nodes: Vec<ResourceNode>,
}

impl ResourceTree {
    pub fn new(name: impl Into<String>, nodes: Vec<ResourceNode>) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    /// Every node of the tree in depth first order, see [`crate::flatten`].
    pub fn flat_nodes(&self) -> Vec<&ResourceNode> {
        crate::flatten::flatten_all(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_from_path() {
        assert_eq!(
            ResourceType::from_path("chara/equipment/e0001/model/c0101e0001_top.mdl"),
            ResourceType::Mdl
        );
        assert_eq!(
            ResourceType::from_path("C:\\mods\\Some.Mod\\texture_d.TEX"),
            ResourceType::Tex
        );
        assert_eq!(ResourceType::from_path("chara/no_extension"), ResourceType::Unknown);
        assert_eq!(ResourceType::from_path("folder.v2/readme"), ResourceType::Unknown);
    }

    #[test]
    fn test_resource_type_display() {
        assert_eq!(ResourceType::Mtrl.to_string(), "mtrl");
        assert_eq!(ResourceType::Unknown.to_string(), "unknown");

        // Display matches the serialized name and parses back by extension
        for kind in [ResourceType::Mdl, ResourceType::Shpk, ResourceType::Atch, ResourceType::Imc] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
            assert_eq!(ResourceType::from_extension(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_game_path_requires_single_candidate() {
        let node = ResourceNode::new(ResourceType::Tex, ResourceHandle(1), "/real/a.tex");
        assert_eq!(node.game_path(), None);

        let node = node.with_game_path("a/x.tex");
        assert_eq!(node.game_path(), Some("a/x.tex"));

        let node = node.with_game_path("a/y.tex");
        assert_eq!(node.game_path(), None);
    }

    #[test]
    fn test_node_json() {
        let json = r#"{
            "type": "mtrl",
            "name": "Material",
            "resourceHandle": 4096,
            "fullPath": "/mods/shirt/mt_c0101e0001_a.mtrl",
            "possibleGamePaths": ["chara/equipment/e0001/material/v0001/mt_c0101e0001_top_a.mtrl"],
            "children": [
                { "type": "tex", "resourceHandle": 8192, "fullPath": "/game/tex.tex" }
            ]
        }"#;

        let node: ResourceNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.resource_type, ResourceType::Mtrl);
        assert_eq!(node.icon, ChangedItemIcon::Unknown);
        assert_eq!(node.object_address, ObjectAddress(0));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].resource_handle, ResourceHandle(8192));
        assert!(node.children[0].possible_game_paths.is_empty());
    }
}
