//! Repair for reading lists saved by the old export format.
//!
//! Old exports wrote author lines as plain `- by jdoe → 12k words`; the
//! current format wraps the author in a markdown link. Repairing rewrites
//! every unlinked author line and leaves everything else alone.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};

use crate::{profile_url, read_file_text};

const AUTHOR_PREFIX: &str = "- by ";
const ARROW: &str = " → ";

/// Rewrite `- by <author> → <size>` into the linked form.
///
/// Lines that already carry a link, or that don't split cleanly into an
/// author and a size, pass through unchanged.
pub fn process_line(line: &str) -> String {
    if line.starts_with("- by [") {
        return line.to_owned();
    }
    let Some(rest) = line.strip_prefix(AUTHOR_PREFIX) else {
        return line.to_owned();
    };

    let parts: Vec<&str> = rest.split(ARROW).collect();
    let &[author, size] = parts.as_slice() else {
        log::warn!("could not split author line {line:?}");
        return line.to_owned();
    };

    format!(
        "{AUTHOR_PREFIX}[{author}]({}){ARROW}{size}",
        profile_url(author)
    )
}

/// Write a repaired copy of `path` beside it, stem suffixed `_repaired`.
///
/// The copy is re-encoded with the input's detected encoding. The original
/// file is not touched. Returns the path of the copy.
pub fn repair_file(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.is_file() {
        bail!("file not found: {path:?}");
    }

    let (content, encoding) = read_file_text(path)?;

    let repaired = content
        .split('\n')
        .map(process_line)
        .collect::<Vec<_>>()
        .join("\n");

    let Some(stem) = path.file_stem().map(|s| s.to_string_lossy()) else {
        bail!("invalid file name: {path:?}");
    };
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let target = path.with_file_name(format!("{stem}_repaired{ext}"));

    let (bytes, _, _) = encoding.encode(&repaired);
    fs::write(&target, &bytes)?;

    Ok(target)
}
