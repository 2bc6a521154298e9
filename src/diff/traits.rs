//! Utility traits for diff I/O.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::model::FileDiff;

/// Extension trait for paths holding unified-diff text
pub trait DiffFile {
  fn read_diff(&self) -> Result<String>;
  fn write_diff(&self, files: &[FileDiff]) -> Result<()>;
}

impl DiffFile for Path {
  fn read_diff(&self) -> Result<String> {
    let mut bytes = Vec::new();
    File::open(self)
      .with_context(|| format!("Failed to open diff file at {}", self.display()))?
      .read_to_end(&mut bytes)
      .with_context(|| format!("Failed to read diff file at {}", self.display()))?;
    Ok(bytes.to_utf8())
  }

  fn write_diff(&self, files: &[FileDiff]) -> Result<()> {
    let mut file = File::create(self).with_context(|| format!("Failed to create diff file at {}", self.display()))?;
    for diff in files {
      write!(file, "{diff}").with_context(|| format!("Failed to write diff file at {}", self.display()))?;
    }
    Ok(())
  }
}

/// Extension trait for converting bytes to UTF-8 strings
pub trait Utf8String {
  fn to_utf8(&self) -> String;
}

impl Utf8String for Vec<u8> {
  fn to_utf8(&self) -> String {
    self.as_slice().to_utf8()
  }
}

impl Utf8String for [u8] {
  fn to_utf8(&self) -> String {
    // Fast path for valid UTF-8 (most common case)
    if let Ok(s) = std::str::from_utf8(self) {
      return s.to_string();
    }
    String::from_utf8_lossy(self).into_owned()
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::diff::parse;

  #[test]
  fn test_invalid_utf8_is_replaced() {
    let bytes: Vec<u8> = vec![b'+', 0xff, b'x'];
    assert_eq!(bytes.to_utf8(), "+\u{fffd}x");
  }

  #[test]
  fn test_write_then_read_diff() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("change.diff");
    let files = parse("--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b\n").unwrap();

    path.write_diff(&files).unwrap();
    let text = path.read_diff().unwrap();

    assert_eq!(parse(&text).unwrap(), files);
  }

  #[test]
  fn test_read_missing_file_has_context() {
    let dir = TempDir::new().unwrap();
    let err = dir.path().join("missing.diff").read_diff().unwrap_err();
    assert!(err.to_string().contains("Failed to open diff file"));
  }
}
