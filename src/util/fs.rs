//! File helpers.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Returns true if a file or directory exists at `path`.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().try_exists().unwrap_or(false)
}

/// Read a whole file as lines with `\n` / `\r\n` terminators stripped.
pub fn read_lines(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    reader.lines().collect()
}
