use std::{fs, path::Path};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};

mod extract;
pub mod repair;
mod report;

pub use extract::{
    extract_stories, Diagnostic, Extraction, Story, CHARACTER_SEPARATOR,
};
pub use report::{
    aggregate, convert_word_count, top_by_frequency, top_stories, Category,
    Frequencies, FrequencyTable, SortKey,
};

/// Read a file's contents as text without trusting it to be UTF-8.
///
/// UTF-8 is tried first. When that fails, the charset is sniffed from the
/// raw bytes and the contents redecoded. Returns the text along with the
/// encoding that produced it, or empty text when no usable charset was
/// found.
pub fn read_file_text(
    path: impl AsRef<Path>,
) -> Result<(String, &'static Encoding)> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read {path:?}"))?;

    if let Ok(text) = std::str::from_utf8(&bytes) {
        return Ok((text.to_owned(), UTF_8));
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(&bytes, true);
    let encoding = detector.guess(None, true);
    log::warn!("{path:?} is not UTF-8, retrying as {}", encoding.name());

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        log::warn!("no usable charset detected for {path:?}");
        return Ok((String::new(), UTF_8));
    }

    Ok((text.into_owned(), encoding))
}

/// Derive an AO3 profile URL from an author name.
pub fn profile_url(author: &str) -> String {
    format!("https://archiveofourown.org/users/{author}/pseuds/{author}")
}
