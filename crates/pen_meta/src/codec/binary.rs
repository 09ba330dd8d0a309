//! Version 1 legacy layout.
//!
//! Little endian. Sections in order Imc, Eqp, Eqdp, Est, Rsp, Gmp, Atch,
//! GlobalEqp, each a `u32` count followed by fixed size records. Writers
//! predating attachment points stop after the Gmp section, so the last two
//! sections are optional when reading.
//!
//! | section   | record layout                                                                 |
//! |-----------|-------------------------------------------------------------------------------|
//! | Imc       | `u8 object_type, u16 primary, u16 secondary, u8 variant, u8 slot, u8 body_slot, u8 material, u8 decal, u16 attribute_and_sound, u8 vfx, u8 material_animation` |
//! | Eqp       | `u16 set, u8 slot, u64 entry`                                                 |
//! | Eqdp      | `u16 set, u8 slot, u8 gender, u8 race, u16 entry`                             |
//! | Est       | `u16 set, u8 slot, u8 gender, u8 race, u16 entry`                             |
//! | Rsp       | `u8 sub_race, u8 attribute, f32 entry`                                        |
//! | Gmp       | `u16 set, u64 entry`                                                          |
//! | Atch      | `[u8; 4] type, u16 index, u8 gender, u8 race, [u8; 34] bone, 7 x f32`         |
//! | GlobalEqp | `u8 type, u16 condition`                                                      |

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{Cursor, Read, Write};

use crate::dictionary::MetaDictionary;
use crate::error::{DecodeError, EncodeError};
use crate::manipulation::{
    AtchEntry, AtchIdentifier, EqdpEntry, EqdpIdentifier, EqpEntry, EqpIdentifier, EstEntry,
    EstIdentifier, GlobalEqpManipulation, GmpEntry, GmpIdentifier, ImcEntry, ImcIdentifier,
    Manipulation, MetaCategory, MetaManipulation, RspEntry, RspIdentifier,
};
use crate::types::{AtchType, ByteEnum, PrimaryId};

pub(crate) fn read_dictionary(data: &[u8]) -> Result<MetaDictionary, DecodeError> {
    let mut reader = Cursor::new(data);
    let mut dictionary = MetaDictionary::new();

    read_section(&mut reader, &mut dictionary, read_imc)?;
    read_section(&mut reader, &mut dictionary, read_eqp)?;
    read_section(&mut reader, &mut dictionary, read_eqdp)?;
    read_section(&mut reader, &mut dictionary, read_est)?;
    read_section(&mut reader, &mut dictionary, read_rsp)?;
    read_section(&mut reader, &mut dictionary, read_gmp)?;

    if remaining(&reader) > 0 {
        read_section(&mut reader, &mut dictionary, read_atch)?;
    }
    if remaining(&reader) > 0 {
        read_section(&mut reader, &mut dictionary, read_global_eqp)?;
    }

    match remaining(&reader) {
        0 => Ok(dictionary),
        n => Err(DecodeError::TrailingBytes(n)),
    }
}

pub(crate) fn write_dictionary<W: Write>(
    writer: &mut W,
    dictionary: &MetaDictionary,
) -> Result<(), EncodeError> {
    writer.write_u32::<LE>(dictionary.count(MetaCategory::Imc) as u32)?;
    for (identifier, entry) in dictionary.imc() {
        writer.write_u8(identifier.object_type.into())?;
        writer.write_u16::<LE>(identifier.primary_id.0)?;
        writer.write_u16::<LE>(identifier.secondary_id)?;
        writer.write_u8(identifier.variant)?;
        writer.write_u8(identifier.equip_slot.into())?;
        writer.write_u8(identifier.body_slot.into())?;

        if entry.attribute_mask > ImcEntry::ATTRIBUTE_MASK_MAX {
            return Err(overflow(MetaCategory::Imc, "AttributeMask"));
        }
        if entry.sound_id > ImcEntry::SOUND_ID_MAX {
            return Err(overflow(MetaCategory::Imc, "SoundId"));
        }
        writer.write_u8(entry.material_id)?;
        writer.write_u8(entry.decal_id)?;
        writer.write_u16::<LE>(entry.attribute_and_sound())?;
        writer.write_u8(entry.vfx_id)?;
        writer.write_u8(entry.material_animation_id)?;
    }

    writer.write_u32::<LE>(dictionary.count(MetaCategory::Eqp) as u32)?;
    for (identifier, entry) in dictionary.eqp() {
        writer.write_u16::<LE>(identifier.set_id.0)?;
        writer.write_u8(identifier.slot.into())?;
        writer.write_u64::<LE>(entry.0)?;
    }

    writer.write_u32::<LE>(dictionary.count(MetaCategory::Eqdp) as u32)?;
    for (identifier, entry) in dictionary.eqdp() {
        writer.write_u16::<LE>(identifier.set_id.0)?;
        writer.write_u8(identifier.slot.into())?;
        writer.write_u8(identifier.gender.into())?;
        writer.write_u8(identifier.race.into())?;
        writer.write_u16::<LE>(entry.0)?;
    }

    writer.write_u32::<LE>(dictionary.count(MetaCategory::Est) as u32)?;
    for (identifier, entry) in dictionary.est() {
        writer.write_u16::<LE>(identifier.set_id.0)?;
        writer.write_u8(identifier.slot.into())?;
        writer.write_u8(identifier.gender.into())?;
        writer.write_u8(identifier.race.into())?;
        writer.write_u16::<LE>(entry.0)?;
    }

    writer.write_u32::<LE>(dictionary.count(MetaCategory::Rsp) as u32)?;
    for (identifier, entry) in dictionary.rsp() {
        writer.write_u8(identifier.sub_race.into())?;
        writer.write_u8(identifier.attribute.into())?;
        writer.write_f32::<LE>(entry.0)?;
    }

    writer.write_u32::<LE>(dictionary.count(MetaCategory::Gmp) as u32)?;
    for (identifier, entry) in dictionary.gmp() {
        if entry.rotation_a > GmpEntry::ROTATION_MAX
            || entry.rotation_b > GmpEntry::ROTATION_MAX
            || entry.rotation_c > GmpEntry::ROTATION_MAX
        {
            return Err(overflow(MetaCategory::Gmp, "Rotation"));
        }
        if entry.unknown_a > GmpEntry::UNKNOWN_MAX || entry.unknown_b > GmpEntry::UNKNOWN_MAX {
            return Err(overflow(MetaCategory::Gmp, "Unknown"));
        }
        writer.write_u16::<LE>(identifier.set_id.0)?;
        writer.write_u64::<LE>(entry.to_bits())?;
    }

    writer.write_u32::<LE>(dictionary.count(MetaCategory::Atch) as u32)?;
    for (identifier, entry) in dictionary.atch() {
        write_fixed_str::<_, { AtchType::MAX_LEN }>(writer, identifier.kind.as_str(), "Type")?;
        writer.write_u16::<LE>(identifier.index)?;
        writer.write_u8(identifier.gender.into())?;
        writer.write_u8(identifier.race.into())?;

        write_fixed_str::<_, { AtchEntry::MAX_BONE_LEN }>(writer, &entry.bone, "Bone")?;
        for value in [
            entry.scale,
            entry.offset_x,
            entry.offset_y,
            entry.offset_z,
            entry.rotation_x,
            entry.rotation_y,
            entry.rotation_z,
        ] {
            writer.write_f32::<LE>(value)?;
        }
    }

    writer.write_u32::<LE>(dictionary.count(MetaCategory::GlobalEqp) as u32)?;
    for manipulation in dictionary.global_eqp() {
        writer.write_u8(manipulation.kind.into())?;
        writer.write_u16::<LE>(manipulation.condition.0)?;
    }

    Ok(())
}

fn remaining(reader: &Cursor<&[u8]>) -> usize {
    reader.get_ref().len().saturating_sub(reader.position() as usize)
}

fn read_section<R: Read>(
    reader: &mut R,
    dictionary: &mut MetaDictionary,
    read_record: fn(&mut R) -> Result<MetaManipulation, DecodeError>,
) -> Result<(), DecodeError> {
    let count = reader.read_u32::<LE>()?;
    for _ in 0..count {
        dictionary.insert(read_record(reader)?);
    }
    Ok(())
}

fn read_enum<T: ByteEnum, R: Read>(reader: &mut R) -> Result<T, DecodeError> {
    let value = reader.read_u8()?;
    T::try_from(value).map_err(|value| DecodeError::InvalidDiscriminant {
        kind: T::NAME,
        value,
    })
}

fn read_primary_id<R: Read>(reader: &mut R) -> Result<PrimaryId, DecodeError> {
    Ok(PrimaryId(reader.read_u16::<LE>()?))
}

fn read_imc<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    let identifier = ImcIdentifier {
        object_type: read_enum(reader)?,
        primary_id: read_primary_id(reader)?,
        secondary_id: reader.read_u16::<LE>()?,
        variant: reader.read_u8()?,
        equip_slot: read_enum(reader)?,
        body_slot: read_enum(reader)?,
    };

    let mut entry = ImcEntry {
        material_id: reader.read_u8()?,
        decal_id: reader.read_u8()?,
        ..Default::default()
    };
    entry.set_attribute_and_sound(reader.read_u16::<LE>()?);
    entry.vfx_id = reader.read_u8()?;
    entry.material_animation_id = reader.read_u8()?;

    Ok(MetaManipulation::Imc(Manipulation::new(identifier, entry)))
}

fn read_eqp<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    let identifier = EqpIdentifier {
        set_id: read_primary_id(reader)?,
        slot: read_enum(reader)?,
    };
    let entry = EqpEntry(reader.read_u64::<LE>()?);
    Ok(MetaManipulation::Eqp(Manipulation::new(identifier, entry)))
}

fn read_eqdp<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    let identifier = EqdpIdentifier {
        set_id: read_primary_id(reader)?,
        slot: read_enum(reader)?,
        gender: read_enum(reader)?,
        race: read_enum(reader)?,
    };
    let entry = EqdpEntry(reader.read_u16::<LE>()?);
    Ok(MetaManipulation::Eqdp(Manipulation::new(identifier, entry)))
}

fn read_est<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    let identifier = EstIdentifier {
        set_id: read_primary_id(reader)?,
        slot: read_enum(reader)?,
        gender: read_enum(reader)?,
        race: read_enum(reader)?,
    };
    let entry = EstEntry(reader.read_u16::<LE>()?);
    Ok(MetaManipulation::Est(Manipulation::new(identifier, entry)))
}

fn read_rsp<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    let identifier = RspIdentifier {
        sub_race: read_enum(reader)?,
        attribute: read_enum(reader)?,
    };
    let entry = RspEntry(reader.read_f32::<LE>()?);
    Ok(MetaManipulation::Rsp(Manipulation::new(identifier, entry)))
}

fn read_gmp<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    let identifier = GmpIdentifier {
        set_id: read_primary_id(reader)?,
    };
    let entry = GmpEntry::from_bits(reader.read_u64::<LE>()?);
    Ok(MetaManipulation::Gmp(Manipulation::new(identifier, entry)))
}

fn read_atch<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    let code = read_fixed_str::<_, { AtchType::MAX_LEN }>(reader, "Type")?;
    let kind = AtchType::new(code).ok_or(DecodeError::InvalidString {
        category: MetaCategory::Atch,
        field: "Type",
    })?;
    let identifier = AtchIdentifier {
        kind,
        index: reader.read_u16::<LE>()?,
        gender: read_enum(reader)?,
        race: read_enum(reader)?,
    };

    let entry = AtchEntry {
        bone: read_fixed_str::<_, { AtchEntry::MAX_BONE_LEN }>(reader, "Bone")?,
        scale: reader.read_f32::<LE>()?,
        offset_x: reader.read_f32::<LE>()?,
        offset_y: reader.read_f32::<LE>()?,
        offset_z: reader.read_f32::<LE>()?,
        rotation_x: reader.read_f32::<LE>()?,
        rotation_y: reader.read_f32::<LE>()?,
        rotation_z: reader.read_f32::<LE>()?,
    };
    Ok(MetaManipulation::Atch(Manipulation::new(identifier, entry)))
}

fn read_global_eqp<R: Read>(reader: &mut R) -> Result<MetaManipulation, DecodeError> {
    Ok(MetaManipulation::GlobalEqp(GlobalEqpManipulation {
        kind: read_enum(reader)?,
        condition: read_primary_id(reader)?,
    }))
}

/// Read a NUL padded string from a fixed width field.
fn read_fixed_str<R: Read, const N: usize>(
    reader: &mut R,
    field: &'static str,
) -> Result<String, DecodeError> {
    let mut buffer = [0u8; N];
    reader.read_exact(&mut buffer)?;
    let len = buffer.iter().position(|&b| b == 0).unwrap_or(N);
    String::from_utf8(buffer[..len].to_vec()).map_err(|_| DecodeError::InvalidString {
        category: MetaCategory::Atch,
        field,
    })
}

fn write_fixed_str<W: Write, const N: usize>(
    writer: &mut W,
    value: &str,
    field: &'static str,
) -> Result<(), EncodeError> {
    if value.len() > N || value.bytes().any(|b| b == 0) {
        return Err(overflow(MetaCategory::Atch, field));
    }
    let mut buffer = [0u8; N];
    buffer[..value.len()].copy_from_slice(value.as_bytes());
    writer.write_all(&buffer)?;
    Ok(())
}

fn overflow(category: MetaCategory, field: &'static str) -> EncodeError {
    EncodeError::FieldOverflow { category, field }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EquipSlot, Gender, ModelRace};

    #[test]
    fn test_empty_dictionary_layout() {
        let mut buffer = Vec::new();
        write_dictionary(&mut buffer, &MetaDictionary::new()).unwrap();

        // Eight empty sections
        assert_eq!(buffer, vec![0u8; 8 * 4]);
        assert_eq!(read_dictionary(&buffer).unwrap(), MetaDictionary::new());
    }

    #[test]
    fn test_optional_trailing_sections() {
        // Six empty sections, as written before attachment points existed
        let data = vec![0u8; 6 * 4];
        assert!(read_dictionary(&data).unwrap().is_empty());
    }

    #[test]
    fn test_eqp_record_layout() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes()); // imc
        data.extend_from_slice(&1u32.to_le_bytes()); // eqp
        data.extend_from_slice(&201u16.to_le_bytes());
        data.push(EquipSlot::Legs as u8);
        data.extend_from_slice(&0xDEADu64.to_le_bytes());
        data.extend_from_slice(&[0u8; 4 * 4]); // eqdp, est, rsp, gmp

        let dictionary = read_dictionary(&data).unwrap();
        let (identifier, entry) = dictionary.eqp().next().unwrap();
        assert_eq!(identifier.set_id, PrimaryId(201));
        assert_eq!(identifier.slot, EquipSlot::Legs);
        assert_eq!(entry.0, 0xDEAD);
    }

    #[test]
    fn test_truncated_section() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[1, 0, 3]);

        assert!(matches!(read_dictionary(&data), Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_invalid_discriminant() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.push(200);
        data.extend_from_slice(&0u64.to_le_bytes());
        data.extend_from_slice(&[0u8; 4 * 4]);

        assert!(matches!(
            read_dictionary(&data),
            Err(DecodeError::InvalidDiscriminant {
                kind: "EquipSlot",
                value: 200
            })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut data = vec![0u8; 8 * 4];
        data.push(0xFF);
        assert!(matches!(
            read_dictionary(&data),
            Err(DecodeError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_bone_name_too_long() {
        let dictionary: MetaDictionary = [MetaManipulation::Atch(Manipulation::new(
            AtchIdentifier {
                kind: AtchType::new("aeh").unwrap(),
                index: 0,
                gender: Gender::Male,
                race: ModelRace::Hrothgar,
            },
            AtchEntry {
                bone: "j_this_bone_name_is_far_too_long_to_fit".to_string(),
                ..Default::default()
            },
        ))]
        .into_iter()
        .collect();

        let mut buffer = Vec::new();
        assert!(matches!(
            write_dictionary(&mut buffer, &dictionary),
            Err(EncodeError::FieldOverflow {
                category: MetaCategory::Atch,
                field: "Bone"
            })
        ));
    }
}
