//! Typed meta manipulations.
//!
//! A manipulation is an identifier (which game table row it touches) plus an
//! entry (the new row value). There are eight categories, each with its own
//! identifier and entry shape. In manifests a manipulation is written as
//!
//! ```json
//! { "Type": "Eqp", "Manipulation": { "SetId": 1, "Slot": "Head", "Entry": 123 } }
//! ```

use crate::types::{
    AtchType, BodySlot, EquipSlot, EstType, Gender, GlobalEqpType, ModelRace, ObjectType,
    PrimaryId, RspAttribute, SubRace,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight manipulation categories.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaCategory {
    GlobalEqp,
    Imc,
    Eqp,
    Eqdp,
    Est,
    Rsp,
    Gmp,
    Atch,
}

impl MetaCategory {
    /// Categories in the order manifests list them.
    pub const ALL: [MetaCategory; 8] = [
        MetaCategory::GlobalEqp,
        MetaCategory::Imc,
        MetaCategory::Eqp,
        MetaCategory::Eqdp,
        MetaCategory::Est,
        MetaCategory::Rsp,
        MetaCategory::Gmp,
        MetaCategory::Atch,
    ];

    /// The `Type` tag used in manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaCategory::GlobalEqp => "GlobalEqp",
            MetaCategory::Imc => "Imc",
            MetaCategory::Eqp => "Eqp",
            MetaCategory::Eqdp => "Eqdp",
            MetaCategory::Est => "Est",
            MetaCategory::Rsp => "Rsp",
            MetaCategory::Gmp => "Gmp",
            MetaCategory::Atch => "Atch",
        }
    }
}

impl fmt::Display for MetaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A global EQP rule. Its presence in a dictionary is the whole value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalEqpManipulation {
    #[serde(rename = "Type")]
    pub kind: GlobalEqpType,
    /// Model set the rule is conditioned on.
    pub condition: PrimaryId,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct ImcIdentifier {
    pub object_type: ObjectType,
    pub primary_id: PrimaryId,
    pub secondary_id: u16,
    pub variant: u8,
    pub equip_slot: EquipSlot,
    pub body_slot: BodySlot,
}

/// One row of an IMC file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ImcEntry {
    pub material_id: u8,
    pub decal_id: u8,
    pub vfx_id: u8,
    pub material_animation_id: u8,
    /// Lower 10 bits of the packed attribute/sound word.
    pub attribute_mask: u16,
    /// Upper 6 bits of the packed attribute/sound word.
    pub sound_id: u8,
}

impl ImcEntry {
    pub const ATTRIBUTE_MASK_MAX: u16 = 0x3FF;
    pub const SOUND_ID_MAX: u8 = 0x3F;

    /// Pack mask and sound id the way IMC files store them.
    pub fn attribute_and_sound(&self) -> u16 {
        (self.attribute_mask & Self::ATTRIBUTE_MASK_MAX)
            | (((self.sound_id & Self::SOUND_ID_MAX) as u16) << 10)
    }

    pub fn set_attribute_and_sound(&mut self, packed: u16) {
        self.attribute_mask = packed & Self::ATTRIBUTE_MASK_MAX;
        self.sound_id = (packed >> 10) as u8;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct EqpIdentifier {
    pub set_id: PrimaryId,
    pub slot: EquipSlot,
}

/// Equipment parameter flag word.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct EqpEntry(pub u64);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct EqdpIdentifier {
    pub set_id: PrimaryId,
    pub slot: EquipSlot,
    pub gender: Gender,
    pub race: ModelRace,
}

/// Equipment deform flags for one slot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct EqdpEntry(pub u16);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct EstIdentifier {
    pub set_id: PrimaryId,
    pub slot: EstType,
    pub gender: Gender,
    pub race: ModelRace,
}

/// Extra skeleton id.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct EstEntry(pub u16);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct RspIdentifier {
    pub sub_race: SubRace,
    pub attribute: RspAttribute,
}

/// Racial scaling factor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(transparent)]
pub struct RspEntry(pub f32);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct GmpIdentifier {
    pub set_id: PrimaryId,
}

/// Gimmick (visor) parameters of a head model.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "PascalCase")]
pub struct GmpEntry {
    pub enabled: bool,
    pub animated: bool,
    pub rotation_a: u16,
    pub rotation_b: u16,
    pub rotation_c: u16,
    pub unknown_a: u8,
    pub unknown_b: u8,
}

impl GmpEntry {
    pub const ROTATION_MAX: u16 = 0x3FF;
    pub const UNKNOWN_MAX: u8 = 0xF;

    /// Pack into the 40 significant bits of a GMP table value.
    pub fn to_bits(&self) -> u64 {
        (self.enabled as u64)
            | ((self.animated as u64) << 1)
            | (((self.rotation_a & Self::ROTATION_MAX) as u64) << 2)
            | (((self.rotation_b & Self::ROTATION_MAX) as u64) << 12)
            | (((self.rotation_c & Self::ROTATION_MAX) as u64) << 22)
            | (((self.unknown_a & Self::UNKNOWN_MAX) as u64) << 32)
            | (((self.unknown_b & Self::UNKNOWN_MAX) as u64) << 36)
    }

    pub fn from_bits(bits: u64) -> Self {
        Self {
            enabled: bits & 1 != 0,
            animated: bits & 2 != 0,
            rotation_a: ((bits >> 2) & Self::ROTATION_MAX as u64) as u16,
            rotation_b: ((bits >> 12) & Self::ROTATION_MAX as u64) as u16,
            rotation_c: ((bits >> 22) & Self::ROTATION_MAX as u64) as u16,
            unknown_a: ((bits >> 32) & Self::UNKNOWN_MAX as u64) as u8,
            unknown_b: ((bits >> 36) & Self::UNKNOWN_MAX as u64) as u8,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct AtchIdentifier {
    #[serde(rename = "Type")]
    pub kind: AtchType,
    pub index: u16,
    pub gender: Gender,
    pub race: ModelRace,
}

/// Attachment point placement relative to a bone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AtchEntry {
    pub bone: String,
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_z: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub rotation_z: f32,
}

impl AtchEntry {
    /// Longest bone name the game tables can hold.
    pub const MAX_BONE_LEN: usize = 34;
}

/// Identifier and entry of a single manipulation, as written in manifests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Manipulation<I, E> {
    #[serde(flatten)]
    pub identifier: I,
    #[serde(rename = "Entry")]
    pub entry: E,
}

impl<I, E> Manipulation<I, E> {
    pub fn new(identifier: I, entry: E) -> Self {
        Self { identifier, entry }
    }
}

/// A manipulation of any category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "Type", content = "Manipulation")]
pub enum MetaManipulation {
    GlobalEqp(GlobalEqpManipulation),
    Imc(Manipulation<ImcIdentifier, ImcEntry>),
    Eqp(Manipulation<EqpIdentifier, EqpEntry>),
    Eqdp(Manipulation<EqdpIdentifier, EqdpEntry>),
    Est(Manipulation<EstIdentifier, EstEntry>),
    Rsp(Manipulation<RspIdentifier, RspEntry>),
    Gmp(Manipulation<GmpIdentifier, GmpEntry>),
    Atch(Manipulation<AtchIdentifier, AtchEntry>),
}

/// The key half of a [`MetaManipulation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaIdentifier {
    GlobalEqp(GlobalEqpManipulation),
    Imc(ImcIdentifier),
    Eqp(EqpIdentifier),
    Eqdp(EqdpIdentifier),
    Est(EstIdentifier),
    Rsp(RspIdentifier),
    Gmp(GmpIdentifier),
    Atch(AtchIdentifier),
}

/// The value half of a [`MetaManipulation`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetaEntry {
    /// Global EQP rules carry no value beyond being present.
    GlobalEqp,
    Imc(ImcEntry),
    Eqp(EqpEntry),
    Eqdp(EqdpEntry),
    Est(EstEntry),
    Rsp(RspEntry),
    Gmp(GmpEntry),
    Atch(AtchEntry),
}

impl MetaManipulation {
    pub fn category(&self) -> MetaCategory {
        match self {
            MetaManipulation::GlobalEqp(_) => MetaCategory::GlobalEqp,
            MetaManipulation::Imc(_) => MetaCategory::Imc,
            MetaManipulation::Eqp(_) => MetaCategory::Eqp,
            MetaManipulation::Eqdp(_) => MetaCategory::Eqdp,
            MetaManipulation::Est(_) => MetaCategory::Est,
            MetaManipulation::Rsp(_) => MetaCategory::Rsp,
            MetaManipulation::Gmp(_) => MetaCategory::Gmp,
            MetaManipulation::Atch(_) => MetaCategory::Atch,
        }
    }

    pub fn identifier(&self) -> MetaIdentifier {
        match self {
            MetaManipulation::GlobalEqp(m) => MetaIdentifier::GlobalEqp(*m),
            MetaManipulation::Imc(m) => MetaIdentifier::Imc(m.identifier),
            MetaManipulation::Eqp(m) => MetaIdentifier::Eqp(m.identifier),
            MetaManipulation::Eqdp(m) => MetaIdentifier::Eqdp(m.identifier),
            MetaManipulation::Est(m) => MetaIdentifier::Est(m.identifier),
            MetaManipulation::Rsp(m) => MetaIdentifier::Rsp(m.identifier),
            MetaManipulation::Gmp(m) => MetaIdentifier::Gmp(m.identifier),
            MetaManipulation::Atch(m) => MetaIdentifier::Atch(m.identifier.clone()),
        }
    }

    pub fn entry(&self) -> MetaEntry {
        match self {
            MetaManipulation::GlobalEqp(_) => MetaEntry::GlobalEqp,
            MetaManipulation::Imc(m) => MetaEntry::Imc(m.entry),
            MetaManipulation::Eqp(m) => MetaEntry::Eqp(m.entry),
            MetaManipulation::Eqdp(m) => MetaEntry::Eqdp(m.entry),
            MetaManipulation::Est(m) => MetaEntry::Est(m.entry),
            MetaManipulation::Rsp(m) => MetaEntry::Rsp(m.entry),
            MetaManipulation::Gmp(m) => MetaEntry::Gmp(m.entry),
            MetaManipulation::Atch(m) => MetaEntry::Atch(m.entry.clone()),
        }
    }

    /// Recombine an identifier with an entry of the same category.
    ///
    /// Returns `None` when the categories differ.
    pub fn from_parts(identifier: MetaIdentifier, entry: MetaEntry) -> Option<Self> {
        let manipulation = match (identifier, entry) {
            (MetaIdentifier::GlobalEqp(i), MetaEntry::GlobalEqp) => MetaManipulation::GlobalEqp(i),
            (MetaIdentifier::Imc(i), MetaEntry::Imc(e)) => MetaManipulation::Imc(Manipulation::new(i, e)),
            (MetaIdentifier::Eqp(i), MetaEntry::Eqp(e)) => MetaManipulation::Eqp(Manipulation::new(i, e)),
            (MetaIdentifier::Eqdp(i), MetaEntry::Eqdp(e)) => MetaManipulation::Eqdp(Manipulation::new(i, e)),
            (MetaIdentifier::Est(i), MetaEntry::Est(e)) => MetaManipulation::Est(Manipulation::new(i, e)),
            (MetaIdentifier::Rsp(i), MetaEntry::Rsp(e)) => MetaManipulation::Rsp(Manipulation::new(i, e)),
            (MetaIdentifier::Gmp(i), MetaEntry::Gmp(e)) => MetaManipulation::Gmp(Manipulation::new(i, e)),
            (MetaIdentifier::Atch(i), MetaEntry::Atch(e)) => MetaManipulation::Atch(Manipulation::new(i, e)),
            _ => return None,
        };
        Some(manipulation)
    }
}

impl MetaIdentifier {
    pub fn category(&self) -> MetaCategory {
        match self {
            MetaIdentifier::GlobalEqp(_) => MetaCategory::GlobalEqp,
            MetaIdentifier::Imc(_) => MetaCategory::Imc,
            MetaIdentifier::Eqp(_) => MetaCategory::Eqp,
            MetaIdentifier::Eqdp(_) => MetaCategory::Eqdp,
            MetaIdentifier::Est(_) => MetaCategory::Est,
            MetaIdentifier::Rsp(_) => MetaCategory::Rsp,
            MetaIdentifier::Gmp(_) => MetaCategory::Gmp,
            MetaIdentifier::Atch(_) => MetaCategory::Atch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eqp_json_shape() {
        let manipulation = MetaManipulation::Eqp(Manipulation::new(
            EqpIdentifier {
                set_id: PrimaryId(1),
                slot: EquipSlot::Head,
            },
            EqpEntry(123),
        ));

        let value = serde_json::to_value(&manipulation).unwrap();
        assert_eq!(
            value,
            json!({
                "Type": "Eqp",
                "Manipulation": { "SetId": 1, "Slot": "Head", "Entry": 123 }
            })
        );
    }

    #[test]
    fn test_global_eqp_json_shape() {
        let manipulation = MetaManipulation::GlobalEqp(GlobalEqpManipulation {
            kind: GlobalEqpType::DoNotHideNecklace,
            condition: PrimaryId(0),
        });

        let value = serde_json::to_value(&manipulation).unwrap();
        assert_eq!(
            value,
            json!({
                "Type": "GlobalEqp",
                "Manipulation": { "Type": "DoNotHideNecklace", "Condition": 0 }
            })
        );
    }

    #[test]
    fn test_parse_imc_manipulation() {
        let value = json!({
            "Type": "Imc",
            "Manipulation": {
                "Entry": {
                    "MaterialId": 2,
                    "DecalId": 0,
                    "VfxId": 1,
                    "MaterialAnimationId": 0,
                    "AttributeMask": 5,
                    "SoundId": 3
                },
                "ObjectType": "Equipment",
                "PrimaryId": 6061,
                "SecondaryId": 0,
                "Variant": 1,
                "EquipSlot": "Body",
                "BodySlot": "Unknown"
            }
        });

        let manipulation: MetaManipulation = serde_json::from_value(value).unwrap();
        let MetaManipulation::Imc(imc) = manipulation else {
            panic!("expected an IMC manipulation");
        };
        assert_eq!(imc.identifier.primary_id, PrimaryId(6061));
        assert_eq!(imc.identifier.equip_slot, EquipSlot::Body);
        assert_eq!(imc.entry.material_id, 2);
        assert_eq!(imc.entry.sound_id, 3);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let value = json!({ "Type": "Shp", "Manipulation": { "Entry": 1 } });
        assert!(serde_json::from_value::<MetaManipulation>(value).is_err());
    }

    #[test]
    fn test_imc_attribute_and_sound_packing() {
        let mut entry = ImcEntry {
            attribute_mask: 0x2A5,
            sound_id: 0x15,
            ..Default::default()
        };
        let packed = entry.attribute_and_sound();
        assert_eq!(packed, 0x2A5 | (0x15 << 10));

        entry.set_attribute_and_sound(0);
        entry.set_attribute_and_sound(packed);
        assert_eq!(entry.attribute_mask, 0x2A5);
        assert_eq!(entry.sound_id, 0x15);
    }

    #[test]
    fn test_gmp_bits() {
        let entry = GmpEntry {
            enabled: true,
            animated: false,
            rotation_a: 0x3FF,
            rotation_b: 12,
            rotation_c: 500,
            unknown_a: 0xA,
            unknown_b: 0x3,
        };
        assert_eq!(GmpEntry::from_bits(entry.to_bits()), entry);
        assert_eq!(entry.to_bits() & 0b11, 0b01);
    }

    #[test]
    fn test_from_parts_category_mismatch() {
        let identifier = MetaIdentifier::Gmp(GmpIdentifier {
            set_id: PrimaryId(1),
        });
        assert!(MetaManipulation::from_parts(identifier.clone(), MetaEntry::Eqp(EqpEntry(1))).is_none());

        let manipulation =
            MetaManipulation::from_parts(identifier.clone(), MetaEntry::Gmp(GmpEntry::default()))
                .unwrap();
        assert_eq!(manipulation.category(), MetaCategory::Gmp);
        assert_eq!(manipulation.identifier(), identifier);
    }
}
