//! The optional ID3v2 extended header.
//!
//! Layout, relative to the first byte after the 10 byte tag header:
//!
//! ```text
//! size            4 bytes, syncsafe
//! flag count      1 byte
//! per flag entry:
//!   flag byte     1 byte   (%0bcd0000)
//!   CRC           1 length byte + 5 byte syncsafe value, if `c` is set
//!   restrictions  1 length byte + 1 byte, if `d` is set
//! ```

use crate::common::config::ParsingMode;
use crate::common::error::{Id3Error, Result};
use crate::common::util::{get_syncsafe_u32, get_syncsafe_u35, get_u8};

// Flag entry bits
const FLAG_UPDATE: u8 = 0b0100_0000;
const FLAG_CRC: u8 = 0b0010_0000;
const FLAG_RESTRICTIONS: u8 = 0b0001_0000;

// Restriction byte bits (%ppqrrstt)
const RESTRICT_TAG_SIZE: u8 = 0b1100_0000;
const RESTRICT_TEXT_ENCODING: u8 = 0b0010_0000;
const RESTRICT_TEXT_FIELDS_SIZE: u8 = 0b0001_1000;
const RESTRICT_IMAGE_ENCODING: u8 = 0b0000_0100;
const RESTRICT_IMAGE_SIZE: u8 = 0b0000_0011;

/// Size field plus flag count byte
const MIN_EXTENDED_SIZE: usize = 5;
/// Length byte plus the 35-bit CRC
const CRC_FIELD_SIZE: usize = 1 + 5;
/// Length byte plus the restriction byte
const RESTRICTIONS_FIELD_SIZE: usize = 1 + 1;

/// Tag restrictions, as stored in the extended header
///
/// The 2-bit fields are kept as their raw values (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagRestrictions {
    pub tag_size: u8,
    pub text_encoding: bool,
    pub text_fields_size: u8,
    pub image_encoding: bool,
    pub image_size: u8,
}

impl TagRestrictions {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            tag_size: (byte & RESTRICT_TAG_SIZE) >> 6,
            text_encoding: byte & RESTRICT_TEXT_ENCODING != 0,
            text_fields_size: (byte & RESTRICT_TEXT_FIELDS_SIZE) >> 3,
            image_encoding: byte & RESTRICT_IMAGE_ENCODING != 0,
            image_size: byte & RESTRICT_IMAGE_SIZE,
        }
    }
}

/// One flag entry of the extended header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagEntry {
    pub update: bool,
    pub crc: Option<u32>,
    pub tag_restrictions: Option<TagRestrictions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedHeader {
    /// Declared size, including the size field itself
    pub size: u32,
    pub number_of_flags: u8,
    pub flags: Vec<FlagEntry>,
}

/// Parse the extended header at the start of `body` (the tag minus its 10 byte header).
///
/// The declared size must match the bytes walked while reading the flag
/// entries. In [`ParsingMode::Strict`] a mismatch is an error, otherwise it is
/// only logged.
pub(crate) fn parse_extended_header(body: &[u8], mode: ParsingMode) -> Result<ExtendedHeader> {
    let size = get_syncsafe_u32(body, 0)?;
    let number_of_flags = get_u8(body, 4)?;

    let mut pos = MIN_EXTENDED_SIZE;
    let mut flags = Vec::with_capacity(usize::from(number_of_flags));

    for _ in 0..number_of_flags {
        let flag = get_u8(body, pos)?;
        pos += 1;

        let mut entry = FlagEntry {
            update: flag & FLAG_UPDATE != 0,
            ..FlagEntry::default()
        };

        if flag & FLAG_CRC != 0 {
            // Skip the length byte, it is always 5
            entry.crc = Some(get_syncsafe_u35(body, pos + 1)?);
            pos += CRC_FIELD_SIZE;
        }

        if flag & FLAG_RESTRICTIONS != 0 {
            // Skip the length byte, it is always 1
            entry.tag_restrictions = Some(TagRestrictions::from_byte(get_u8(body, pos + 1)?));
            pos += RESTRICTIONS_FIELD_SIZE;
        }

        flags.push(entry);
    }

    let consumed = pos as u32;
    if consumed != size {
        match mode {
            ParsingMode::Strict => {
                return Err(Id3Error::ExtendedHeaderSize {
                    declared: size,
                    consumed,
                })
            }
            ParsingMode::Relaxed => log::warn!(
                "Extended header declares {} bytes but {} were parsed, keeping it",
                size,
                consumed
            ),
        }
    }

    Ok(ExtendedHeader {
        size,
        number_of_flags,
        flags,
    })
}
