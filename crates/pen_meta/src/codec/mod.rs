//! Legacy manipulation payload codec.
//!
//! Mods distributed in the older format ship their manipulations as a single
//! base64 string (usually in `meta.txt`). The string wraps a gzip stream whose
//! first byte is the format version:
//!
//! - `0`: the remaining bytes are a UTF-8 JSON array of manifest records
//! - `1`: the remaining bytes use the binary layout described in [`binary`]
//!
//! [`decode`] lifts such a payload into a [`MetaDictionary`]; [`encode`] turns a
//! dictionary into the record sequence stored in a manifest's `Manipulations`
//! field.

mod binary;

use base64::prelude::*;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::dictionary::MetaDictionary;
use crate::error::{DecodeError, EncodeError};
use crate::manipulation::MetaManipulation;

/// Version byte of a legacy payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegacyVersion {
    /// JSON record array.
    Json = 0,
    /// Binary sections.
    #[default]
    Binary = 1,
}

/// Decode a legacy payload into a dictionary.
///
/// Whitespace anywhere in the payload is ignored, so line wrapped payloads
/// decode too. Fails without producing partial data when
/// the payload is empty, is not base64, is not gzip, has an unknown version,
/// or its body does not match the version's layout.
pub fn decode(payload: &str) -> Result<MetaDictionary, DecodeError> {
    let payload: String = payload.split_ascii_whitespace().collect();
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }

    let compressed = BASE64_STANDARD.decode(&payload)?;

    let mut data = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut data)
        .map_err(DecodeError::Decompress)?;

    let (&version, body) = data.split_first().ok_or(DecodeError::MissingVersion)?;
    let dictionary = match version {
        0 => decode_json(body)?,
        1 => binary::read_dictionary(body)?,
        other => return Err(DecodeError::UnsupportedVersion(other)),
    };

    tracing::debug!(
        version,
        manipulations = dictionary.len(),
        "Decoded legacy manipulation payload"
    );
    Ok(dictionary)
}

fn decode_json(body: &[u8]) -> Result<MetaDictionary, DecodeError> {
    let manipulations: Vec<MetaManipulation> = serde_json::from_slice(body)?;
    Ok(manipulations.into_iter().collect())
}

/// Serialize a dictionary into the ordered manifest record sequence.
///
/// Categories always come out in [`MetaCategory::ALL`](crate::MetaCategory::ALL)
/// order; within a category, records keep insertion order.
pub fn encode(dictionary: &MetaDictionary) -> Vec<MetaManipulation> {
    dictionary.iter().collect()
}

/// [`encode`], rendered as the JSON array stored under `Manipulations`.
pub fn to_manipulations_json(dictionary: &MetaDictionary) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(encode(dictionary))
}

/// Write a dictionary as a legacy payload that [`decode`] reads back.
pub fn encode_legacy(
    dictionary: &MetaDictionary,
    version: LegacyVersion,
) -> Result<String, EncodeError> {
    let mut body = vec![version as u8];
    match version {
        LegacyVersion::Json => serde_json::to_writer(&mut body, &encode(dictionary))?,
        LegacyVersion::Binary => binary::write_dictionary(&mut body, dictionary)?,
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    let compressed = encoder.finish()?;

    Ok(BASE64_STANDARD.encode(compressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manipulation::*;
    use crate::types::*;

    fn sample_dictionary() -> MetaDictionary {
        [
            MetaManipulation::Atch(Manipulation::new(
                AtchIdentifier {
                    kind: AtchType::new("sab").unwrap(),
                    index: 2,
                    gender: Gender::Female,
                    race: ModelRace::Miqote,
                },
                AtchEntry {
                    bone: "j_buki_sebo_l".to_string(),
                    scale: 1.0,
                    offset_x: 0.1,
                    offset_y: -0.25,
                    offset_z: 0.0,
                    rotation_x: 90.0,
                    rotation_y: 0.0,
                    rotation_z: 12.5,
                },
            )),
            MetaManipulation::Gmp(Manipulation::new(
                GmpIdentifier {
                    set_id: PrimaryId(6024),
                },
                GmpEntry {
                    enabled: true,
                    animated: true,
                    rotation_a: 30,
                    rotation_b: 0,
                    rotation_c: 1023,
                    unknown_a: 1,
                    unknown_b: 15,
                },
            )),
            MetaManipulation::Rsp(Manipulation::new(
                RspIdentifier {
                    sub_race: SubRace::Veena,
                    attribute: RspAttribute::FemaleMaxSize,
                },
                RspEntry(1.125),
            )),
            MetaManipulation::Est(Manipulation::new(
                EstIdentifier {
                    set_id: PrimaryId(101),
                    slot: EstType::Hair,
                    gender: Gender::Male,
                    race: ModelRace::AuRa,
                },
                EstEntry(17),
            )),
            MetaManipulation::Eqdp(Manipulation::new(
                EqdpIdentifier {
                    set_id: PrimaryId(6061),
                    slot: EquipSlot::Feet,
                    gender: Gender::Female,
                    race: ModelRace::Lalafell,
                },
                EqdpEntry(0b11),
            )),
            MetaManipulation::Eqp(Manipulation::new(
                EqpIdentifier {
                    set_id: PrimaryId(6061),
                    slot: EquipSlot::Body,
                },
                EqpEntry(0x0123_4567_89AB_CDEF),
            )),
            MetaManipulation::Imc(Manipulation::new(
                ImcIdentifier {
                    object_type: ObjectType::Equipment,
                    primary_id: PrimaryId(6061),
                    secondary_id: 0,
                    variant: 3,
                    equip_slot: EquipSlot::Body,
                    body_slot: BodySlot::Unknown,
                },
                ImcEntry {
                    material_id: 4,
                    decal_id: 1,
                    vfx_id: 2,
                    material_animation_id: 0,
                    attribute_mask: 0x155,
                    sound_id: 9,
                },
            )),
            MetaManipulation::GlobalEqp(GlobalEqpManipulation {
                kind: GlobalEqpType::DoNotHideVieraHats,
                condition: PrimaryId(0),
            }),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_round_trip_binary() {
        let dictionary = sample_dictionary();
        let payload = encode_legacy(&dictionary, LegacyVersion::Binary).unwrap();
        assert_eq!(decode(&payload).unwrap(), dictionary);
    }

    #[test]
    fn test_round_trip_json() {
        let dictionary = sample_dictionary();
        let payload = encode_legacy(&dictionary, LegacyVersion::Json).unwrap();
        assert_eq!(decode(&payload).unwrap(), dictionary);
    }

    #[test]
    fn test_decode_ignores_surrounding_whitespace() {
        let dictionary = sample_dictionary();
        let payload = encode_legacy(&dictionary, LegacyVersion::Binary).unwrap();
        let padded = format!("\n  {payload}\r\n");
        assert_eq!(decode(&padded).unwrap(), dictionary);
    }

    #[test]
    fn test_decode_line_wrapped_payload() {
        let dictionary = sample_dictionary();
        let payload = encode_legacy(&dictionary, LegacyVersion::Binary).unwrap();
        let wrapped = payload
            .as_bytes()
            .chunks(20)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        assert!(wrapped.contains("\r\n"));
        assert_eq!(decode(&wrapped).unwrap(), dictionary);
    }

    #[test]
    fn test_encode_uses_fixed_category_order() {
        let categories: Vec<MetaCategory> = encode(&sample_dictionary())
            .iter()
            .map(|m| m.category())
            .collect();
        assert_eq!(categories, MetaCategory::ALL.to_vec());
    }

    #[test]
    fn test_to_manipulations_json() {
        let value = to_manipulations_json(&sample_dictionary()).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records[0]["Type"], "GlobalEqp");
        assert_eq!(records[7]["Type"], "Atch");
        assert_eq!(records[7]["Manipulation"]["Entry"]["Bone"], "j_buki_sebo_l");
    }

    #[test]
    fn test_decode_invalid_payload() {
        assert!(matches!(
            decode("not-valid-payload"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(matches!(decode(""), Err(DecodeError::Empty)));
        assert!(matches!(decode("   \n"), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_not_gzip() {
        let payload = BASE64_STANDARD.encode(b"\x01plain bytes");
        assert!(matches!(decode(&payload), Err(DecodeError::Decompress(_))));
    }

    fn gzip_base64(data: &[u8]) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        BASE64_STANDARD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_decode_unsupported_version() {
        assert!(matches!(
            decode(&gzip_base64(&[7, 0, 0])),
            Err(DecodeError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_decode_missing_version() {
        assert!(matches!(
            decode(&gzip_base64(&[])),
            Err(DecodeError::MissingVersion)
        ));
    }

    #[test]
    fn test_decode_json_with_unknown_tag_fails() {
        let body = br#"[{"Type":"Shp","Manipulation":{}}]"#;
        let mut data = vec![0u8];
        data.extend_from_slice(body);
        assert!(matches!(
            decode(&gzip_base64(&data)),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_encode_legacy_rejects_overflowing_fields() {
        let dictionary: MetaDictionary = [MetaManipulation::Imc(Manipulation::new(
            ImcIdentifier {
                object_type: ObjectType::Equipment,
                primary_id: PrimaryId(1),
                secondary_id: 0,
                variant: 1,
                equip_slot: EquipSlot::Head,
                body_slot: BodySlot::Unknown,
            },
            ImcEntry {
                attribute_mask: 0x400,
                ..Default::default()
            },
        ))]
        .into_iter()
        .collect();

        assert!(matches!(
            encode_legacy(&dictionary, LegacyVersion::Binary),
            Err(EncodeError::FieldOverflow {
                category: MetaCategory::Imc,
                field: "AttributeMask"
            })
        ));
        // The JSON layout has no packing and accepts it
        assert!(encode_legacy(&dictionary, LegacyVersion::Json).is_ok());
    }
}
