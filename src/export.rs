//! CSV export of frequency tables.

use std::{fs, path::Path};

use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Row<'a> {
    key: &'a str,
    count: usize,
}

/// Write ranked `(key, count)` rows as CSV to a file, or to stdout when no
/// output path is given.
pub fn run(rows: &[(String, usize)], output: Option<&Path>) -> Result<()> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        for (key, count) in rows {
            wtr.serialize(Row { key, count: *count })?;
        }
        wtr.flush()?;
    }

    match output {
        Some(path) => fs::write(path, &buf)?,
        None => print!("{}", std::str::from_utf8(&buf)?),
    }

    Ok(())
}
