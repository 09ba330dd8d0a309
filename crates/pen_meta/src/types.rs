//! Game data enums shared by the manipulation identifiers.
//!
//! Every enum here has an explicit one byte discriminant, which is what the
//! binary legacy payload stores, and serializes by variant name in manifests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An enum stored as a single byte in the binary legacy payload.
pub trait ByteEnum: Copy + Into<u8> + TryFrom<u8, Error = u8> {
    /// Human readable type name used in decode errors.
    const NAME: &'static str;
}

macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl ByteEnum for $name {
            const NAME: &'static str = stringify!($name);
        }
    };
}

byte_enum! {
    /// Equipment slot a model or flag word applies to.
    pub enum EquipSlot {
        Unknown = 0,
        MainHand = 1,
        OffHand = 2,
        Head = 3,
        Body = 4,
        Hands = 5,
        Belt = 6,
        Legs = 7,
        Feet = 8,
        Ears = 9,
        Neck = 10,
        Wrists = 11,
        RFinger = 12,
        BothHand = 13,
        LFinger = 14,
        HeadBody = 15,
        BodyHandsLegsFeet = 16,
        SoulCrystal = 17,
        LegsFeet = 18,
        FullBody = 19,
        BodyHands = 20,
        BodyLegsFeet = 21,
        ChestHands = 22,
        Nothing = 23,
        All = 24,
    }
}

byte_enum! {
    pub enum Gender {
        Unknown = 0,
        Male = 1,
        Female = 2,
        MaleNpc = 3,
        FemaleNpc = 4,
    }
}

byte_enum! {
    /// Race as used by model and skeleton paths.
    pub enum ModelRace {
        Unknown = 0,
        Midlander = 1,
        Highlander = 2,
        Elezen = 3,
        Lalafell = 4,
        Miqote = 5,
        Roegadyn = 6,
        AuRa = 7,
        Hrothgar = 8,
        Viera = 9,
    }
}

byte_enum! {
    /// Clan, the key of the racial scaling table.
    pub enum SubRace {
        Unknown = 0,
        Midlander = 1,
        Highlander = 2,
        Wildwood = 3,
        Duskwight = 4,
        Plainsfolk = 5,
        Dunesfolk = 6,
        SeekerOfTheSun = 7,
        KeeperOfTheMoon = 8,
        Seawolf = 9,
        Hellsguard = 10,
        Raen = 11,
        Xaela = 12,
        Hellion = 13,
        Lost = 14,
        Rava = 15,
        Veena = 16,
    }
}

byte_enum! {
    /// Column of the racial scaling table.
    pub enum RspAttribute {
        MaleMinSize = 0,
        MaleMaxSize = 1,
        MaleMinTail = 2,
        MaleMaxTail = 3,
        FemaleMinSize = 4,
        FemaleMaxSize = 5,
        FemaleMinTail = 6,
        FemaleMaxTail = 7,
        BustMinX = 8,
        BustMinY = 9,
        BustMinZ = 10,
        BustMaxX = 11,
        BustMaxY = 12,
        BustMaxZ = 13,
    }
}

byte_enum! {
    /// Top level category of a game object path.
    pub enum ObjectType {
        Unknown = 0,
        Vfx = 1,
        DemiHuman = 2,
        Accessory = 3,
        World = 4,
        Housing = 5,
        Monster = 6,
        Icon = 7,
        LoadingScreen = 8,
        Map = 9,
        Interface = 10,
        Equipment = 11,
        Character = 12,
        Weapon = 13,
        Font = 14,
    }
}

byte_enum! {
    /// Secondary slot of monster and demihuman models.
    pub enum BodySlot {
        Unknown = 0,
        Hair = 1,
        Face = 2,
        Tail = 3,
        Body = 4,
        Zear = 5,
    }
}

byte_enum! {
    /// Which extra skeleton table an EST entry belongs to.
    pub enum EstType {
        Hair = 1,
        Face = 2,
        Body = 3,
        Head = 4,
    }
}

byte_enum! {
    /// Global visibility rules that apply regardless of the worn model.
    pub enum GlobalEqpType {
        DoNotHideEarrings = 0,
        DoNotHideNecklace = 1,
        DoNotHideBracelets = 2,
        DoNotHideRingR = 3,
        DoNotHideRingL = 4,
        DoNotHideHrothgarHats = 5,
        DoNotHideVieraHats = 6,
        DoNotHideVieraEars = 7,
    }
}

/// Model set id, e.g. the `0123` in `e0123`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct PrimaryId(pub u16);

impl From<u16> for PrimaryId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for PrimaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Attachment point code, e.g. `aeh` or `sab`.
///
/// At most [`AtchType::MAX_LEN`] ASCII characters, no NUL bytes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct AtchType(String);

impl AtchType {
    pub const MAX_LEN: usize = 4;

    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        let valid = !code.is_empty()
            && code.len() <= Self::MAX_LEN
            && code.bytes().all(|b| b.is_ascii_graphic());
        valid.then_some(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AtchType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AtchType::new(value.clone()).ok_or_else(|| format!("invalid attachment point code '{value}'"))
    }
}

impl From<AtchType> for String {
    fn from(value: AtchType) -> Self {
        value.0
    }
}

impl fmt::Display for AtchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_enum_round_trip() {
        assert_eq!(EquipSlot::try_from(3), Ok(EquipSlot::Head));
        assert_eq!(u8::from(EquipSlot::LFinger), 14);
        assert_eq!(EstType::try_from(0), Err(0));
        assert_eq!(SubRace::try_from(17), Err(17));
    }

    #[test]
    fn test_enum_names_in_json() {
        assert_eq!(serde_json::to_string(&ModelRace::AuRa).unwrap(), r#""AuRa""#);
        let slot: EquipSlot = serde_json::from_str(r#""RFinger""#).unwrap();
        assert_eq!(slot, EquipSlot::RFinger);
    }

    #[test]
    fn test_atch_type_validation() {
        assert!(AtchType::new("aeh").is_some());
        assert!(AtchType::new("").is_none());
        assert!(AtchType::new("toolong").is_none());
        assert!(AtchType::new("a b").is_none());

        assert!(serde_json::from_str::<AtchType>(r#""sab""#).is_ok());
        assert!(serde_json::from_str::<AtchType>(r#""bad code""#).is_err());
    }

    #[test]
    fn test_primary_id_display() {
        assert_eq!(PrimaryId(42).to_string(), "0042");
        assert_eq!(serde_json::to_string(&PrimaryId(7)).unwrap(), "7");
    }
}
