pub mod extended;
pub mod header;
pub mod id3v1;
pub mod specs;

use crate::common::config::ParseOptions;
use crate::common::error::Result;
use crate::id3::header::{read_id3v2, V2Tag};
use crate::id3::id3v1::{read_id3v1, V1Tag};

/// Result of looking for a tag in a byte window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Absent,
    V1(V1Tag),
    V2(V2Tag),
}

impl TagOutcome {
    pub fn is_absent(&self) -> bool {
        matches!(self, TagOutcome::Absent)
    }

    pub fn as_v1(&self) -> Option<&V1Tag> {
        match self {
            TagOutcome::V1(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_v2(&self) -> Option<&V2Tag> {
        match self {
            TagOutcome::V2(tag) => Some(tag),
            _ => None,
        }
    }

    /// Version string of the decoded tag, e.g. `ID3v2.4.0` or `ID3v1.1`.
    pub fn version(&self) -> Option<String> {
        match self {
            TagOutcome::Absent => None,
            TagOutcome::V1(tag) => Some(tag.version.to_string()),
            TagOutcome::V2(tag) => Some(tag.version.to_string()),
        }
    }
}

/// Decode the tag of a whole file held in memory.
///
/// ID3v2 at the start of the window wins; the ID3v1 trailer is only
/// inspected when there is no ID3v2 tag. A malformed ID3v2 tag is an error,
/// not a reason to fall back to ID3v1.
pub fn load_id3_from_data(data: &[u8], options: ParseOptions) -> Result<TagOutcome> {
    if options.read_id3v2 {
        if let Some(tag) = read_id3v2(data, options)? {
            return Ok(TagOutcome::V2(tag));
        }
    }

    if options.read_id3v1 {
        if let Some(tag) = read_id3v1(data)? {
            return Ok(TagOutcome::V1(tag));
        }
    }

    Ok(TagOutcome::Absent)
}
