use std::fmt;

use crate::common::error::Result;
use crate::common::util::{get_u8, read_chars};
use crate::id3::specs::genre_name;

/// Size of an ID3v1 tag, always the last bytes of the file.
pub const ID3V1_SIZE: usize = 128;
pub const ID3V1_MARKER: &[u8; 3] = b"TAG";

// Field layout within the 128 byte tag: (offset, length)
const TITLE: (usize, usize) = (3, 30);
const ARTIST: (usize, usize) = (33, 30);
const ALBUM: (usize, usize) = (63, 30);
const YEAR: (usize, usize) = (93, 4);
const COMMENT_V1_0: (usize, usize) = (97, 30);
const COMMENT_V1_1: (usize, usize) = (97, 28);
const ZERO_BYTE: usize = 125;
const TRACK: usize = 126;
const GENRE: usize = 127;

/// ID3v1 revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Id3v1Version {
    V1_0,
    /// Last two comment bytes hold a zero byte and a track number
    V1_1,
}

impl Id3v1Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Id3v1Version::V1_0 => "ID3v1.0",
            Id3v1Version::V1_1 => "ID3v1.1",
        }
    }
}

impl fmt::Display for Id3v1Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded ID3v1 tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V1Tag {
    pub version: Id3v1Version,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub genre: &'static str,
    /// Only present for ID3v1.1
    pub track: Option<u8>,
}

/// Check if file data ends with an ID3v1 tag.
/// Returns the offset of the TAG if found.
pub fn find_id3v1(data: &[u8]) -> Option<usize> {
    let tag_offset = data.len().checked_sub(ID3V1_SIZE)?;
    data[tag_offset..].starts_with(ID3V1_MARKER).then_some(tag_offset)
}

/// Decode the ID3v1 tag in the last 128 bytes of `data`.
///
/// Returns `Ok(None)` when the window is too short or doesn't end in a tag.
pub fn read_id3v1(data: &[u8]) -> Result<Option<V1Tag>> {
    let Some(tag_offset) = find_id3v1(data) else {
        log::debug!("No ID3v1 tag found");
        return Ok(None);
    };

    let tag = &data[tag_offset..];

    let (version, comment, track) = if tag[ZERO_BYTE] == 0 && tag[TRACK] != 0 {
        (
            Id3v1Version::V1_1,
            field(tag, COMMENT_V1_1)?,
            Some(get_u8(tag, TRACK)?),
        )
    } else {
        (Id3v1Version::V1_0, field(tag, COMMENT_V1_0)?, None)
    };

    let v1 = V1Tag {
        version,
        title: field(tag, TITLE)?,
        artist: field(tag, ARTIST)?,
        album: field(tag, ALBUM)?,
        year: field(tag, YEAR)?,
        comment,
        genre: genre_name(get_u8(tag, GENRE)?),
        track,
    };

    log::debug!("Found {} tag at offset {}", v1.version, tag_offset);
    Ok(Some(v1))
}

/// Decode an ID3v1 fixed-length string, trimming nulls and surrounding whitespace.
fn field(tag: &[u8], (offset, length): (usize, usize)) -> Result<String> {
    Ok(read_chars(tag, offset, length)?.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(tag: &mut [u8], offset: usize, text: &[u8]) {
        tag[offset..offset + text.len()].copy_from_slice(text);
    }

    fn basic_tag() -> [u8; ID3V1_SIZE] {
        let mut tag = [0u8; ID3V1_SIZE];
        put(&mut tag, 0, b"TAG");
        put(&mut tag, 3, b"Title");
        put(&mut tag, 33, b"Artist");
        put(&mut tag, 63, b"Album");
        put(&mut tag, 93, b"2003");
        put(&mut tag, 97, b"Comment");
        tag[127] = 7;
        tag
    }

    #[test]
    fn basic_v1_0() {
        let tag = read_id3v1(&basic_tag()).unwrap().unwrap();
        assert_eq!(tag.version, Id3v1Version::V1_0);
        assert_eq!(tag.title, "Title");
        assert_eq!(tag.artist, "Artist");
        assert_eq!(tag.album, "Album");
        assert_eq!(tag.year, "2003");
        assert_eq!(tag.comment, "Comment");
        assert_eq!(tag.genre, "Hip-Hop");
        assert_eq!(tag.track, None);
    }

    #[test]
    fn track_makes_v1_1() {
        let mut raw = basic_tag();
        raw[126] = 12;
        let tag = read_id3v1(&raw).unwrap().unwrap();
        assert_eq!(tag.version, Id3v1Version::V1_1);
        assert_eq!(tag.version.to_string(), "ID3v1.1");
        assert_eq!(tag.track, Some(12));
    }

    #[test]
    fn nonzero_byte_125_keeps_full_comment() {
        let mut raw = basic_tag();
        put(&mut raw, 97, b"abcdefghijklmnopqrstuvwxyz0123");
        let tag = read_id3v1(&raw).unwrap().unwrap();
        assert_eq!(tag.version, Id3v1Version::V1_0);
        assert_eq!(tag.comment, "abcdefghijklmnopqrstuvwxyz0123");
        assert_eq!(tag.track, None);
    }

    #[test]
    fn v1_1_comment_is_28_bytes() {
        let mut raw = basic_tag();
        put(&mut raw, 97, b"abcdefghijklmnopqrstuvwxyz01");
        raw[126] = 3;
        let tag = read_id3v1(&raw).unwrap().unwrap();
        assert_eq!(tag.comment, "abcdefghijklmnopqrstuvwxyz01");
        assert_eq!(tag.track, Some(3));
    }

    #[test]
    fn fields_are_trimmed() {
        let mut raw = basic_tag();
        put(&mut raw, 3, b"  Padded title                ");
        let tag = read_id3v1(&raw).unwrap().unwrap();
        assert_eq!(tag.title, "Padded title");
    }

    #[test]
    fn uses_last_128_bytes() {
        let mut data = vec![0xFFu8; 500];
        data.extend_from_slice(&basic_tag());
        assert_eq!(find_id3v1(&data), Some(500));
        assert_eq!(read_id3v1(&data).unwrap().unwrap().title, "Title");
    }

    #[test]
    fn missing_marker_or_short_window() {
        let mut raw = basic_tag();
        raw[0] = b'X';
        assert_eq!(read_id3v1(&raw).unwrap(), None);
        assert_eq!(read_id3v1(&basic_tag()[..127]).unwrap(), None);
        assert_eq!(read_id3v1(&[]).unwrap(), None);
    }
}
