//! Error handling utilities for the tinygen CLI tool.
//!
//! Fetch failures and malformed diffs are the two failure classes a user
//! ever sees. An empty parse result is not an error; callers report it
//! separately.

use thiserror::Error;

use crate::diff::ParseError;
use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Failed to fetch diff: {0}")]
  FetchFailed(#[from] FetchError),

  #[error(transparent)]
  MalformedDiff(#[from] ParseError),

  // anyhow
  #[error(transparent)]
  Anyhow(#[from] anyhow::Error)
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Checks if an error came from the diff endpoint exchange rather than
/// from parsing or local I/O.
///
/// # Examples
///
/// ```
/// use anyhow::anyhow;
/// use tinygen::error::is_fetch_error;
/// use tinygen::fetch::FetchError;
///
/// assert!(is_fetch_error(&FetchError::MissingInput("prompt").into()));
/// assert!(!is_fetch_error(&anyhow!("File not found")));
/// ```
pub fn is_fetch_error(error: &anyhow::Error) -> bool {
  error.chain().any(|cause| {
    cause.downcast_ref::<FetchError>().is_some() || matches!(cause.downcast_ref::<Error>(), Some(Error::FetchFailed(_)))
  })
}

#[cfg(test)]
mod tests {
  use anyhow::{anyhow, Context};

  use super::*;

  #[test]
  fn test_detects_wrapped_fetch_error() {
    let error = anyhow::Error::from(Error::FetchFailed(FetchError::MissingInput("repository URL")));
    assert!(is_fetch_error(&error));

    let error = Err::<(), _>(FetchError::InvalidResponse("missing `diff` field".to_string()))
      .context("while generating")
      .unwrap_err();
    assert!(is_fetch_error(&error));
  }

  #[test]
  fn test_ignores_parse_errors() {
    let error = anyhow::Error::from(Error::from(ParseError::MalformedDiff { line: 1, content: "@@".to_string() }));
    assert!(!is_fetch_error(&error));
  }

  #[test]
  fn test_ignores_unrelated_errors() {
    assert!(!is_fetch_error(&anyhow!("File not found")));
  }

  #[test]
  fn test_malformed_diff_message_is_transparent() {
    let error = Error::from(ParseError::MalformedDiff { line: 3, content: "@@ -1 +1 @@".to_string() });
    assert_eq!(
      error.to_string(),
      "malformed diff at line 3: hunk header `@@ -1 +1 @@` appears before any `---` file header"
    );
  }
}
