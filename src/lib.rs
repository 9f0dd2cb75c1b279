//! Decode the ID3 tag of an audio file held in memory.
//!
//! ID3v2 headers (and their extended header) are read from the start of the
//! file, ID3v1 tags from its last 128 bytes. ID3v2 frame bodies are not parsed.
//!
//! ```rust
//! use id3_reader::{read_id3, TagOutcome};
//!
//! let mut file = vec![0u8; 128];
//! file[..3].copy_from_slice(b"TAG");
//! file[3..8].copy_from_slice(b"Title");
//!
//! match read_id3(&file).unwrap() {
//!     TagOutcome::V1(tag) => assert_eq!(tag.title, "Title"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod common;
pub mod id3;

pub use common::config::{ParseOptions, ParsingMode};
pub use common::error::{Id3Error, Result};
pub use id3::extended::{ExtendedHeader, FlagEntry, TagRestrictions};
pub use id3::header::{Id3v2Flags, Id3v2Version, V2Tag};
pub use id3::id3v1::{Id3v1Version, V1Tag};
pub use id3::specs::{genre_name, GENRES, UNKNOWN_GENRE};
pub use id3::TagOutcome;

/// Decode the tag in `data` with the default [`ParseOptions`].
pub fn read_id3(data: &[u8]) -> Result<TagOutcome> {
    id3::load_id3_from_data(data, ParseOptions::new())
}

pub fn read_id3_with_options(data: &[u8], options: ParseOptions) -> Result<TagOutcome> {
    id3::load_id3_from_data(data, options)
}

/// Decode many independent windows, in parallel when the `parallel` feature is on.
/// Results are in input order.
#[cfg(feature = "parallel")]
pub fn read_id3_batch(windows: &[&[u8]], options: ParseOptions) -> Vec<Result<TagOutcome>> {
    use rayon::prelude::*;

    windows
        .par_iter()
        .map(|data| id3::load_id3_from_data(data, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn read_id3_batch(windows: &[&[u8]], options: ParseOptions) -> Vec<Result<TagOutcome>> {
    windows
        .iter()
        .map(|data| id3::load_id3_from_data(data, options))
        .collect()
}
