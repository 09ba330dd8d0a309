//! Meta manipulations for mods.
//!
//! This crate models the game table overrides ("meta manipulations") a mod can
//! carry, stores them in a [`MetaDictionary`], and converts between the legacy
//! base64 payload and the record array kept in a mod manifest.
//!
//! # Example
//!
//! ```no_run
//! use pen_meta::codec;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let payload = std::fs::read_to_string("meta.txt")?;
//! let dictionary = codec::decode(&payload)?;
//! let manipulations = codec::to_manipulations_json(&dictionary)?;
//! println!("{}", serde_json::to_string_pretty(&manipulations)?);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod dictionary;
pub mod error;
pub mod manipulation;
pub mod types;

pub use codec::{decode, encode, encode_legacy, to_manipulations_json, LegacyVersion};
pub use dictionary::MetaDictionary;
pub use error::{DecodeError, EncodeError};
pub use manipulation::{Manipulation, MetaCategory, MetaEntry, MetaIdentifier, MetaManipulation};
