//! Unified diff parsing.
//!
//! A single pass over the input, one line at a time, with no lookahead.
//! Each line is classified by its leading marker and fed to a small state
//! machine (no file yet, inside a file header, inside a hunk).

use thiserror::Error;

use super::model::{FileDiff, Hunk, Line, LineKind};
use crate::profile;

const OLD_FILE_MARKER: &str = "---";
const NEW_FILE_MARKER: &str = "+++";
const HUNK_MARKER: &str = "@@";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  #[error("malformed diff at line {line}: hunk header `{content}` appears before any `---` file header")]
  MalformedDiff { line: usize, content: String }
}

/// Classified input line
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
  OldFile(&'a str),
  NewFile(&'a str),
  HunkHeader,
  Body(LineKind),
  Blank
}

#[derive(Debug)]
enum State {
  NoFile,
  InFile(FileDiff),
  InHunk(FileDiff, Hunk)
}

impl State {
  /// Closes any open hunk and hands back the current file, if there is one.
  fn into_file(self) -> Option<FileDiff> {
    match self {
      State::NoFile => None,
      State::InFile(file) => Some(file),
      State::InHunk(mut file, hunk) => {
        file.hunks.push(hunk);
        Some(file)
      }
    }
  }
}

fn classify(line: &str) -> Token<'_> {
  if let Some(rest) = line.strip_prefix(OLD_FILE_MARKER) {
    Token::OldFile(strip_marker_padding(rest))
  } else if let Some(rest) = line.strip_prefix(NEW_FILE_MARKER) {
    Token::NewFile(strip_marker_padding(rest))
  } else if line.starts_with(HUNK_MARKER) {
    Token::HunkHeader
  } else if line.starts_with('+') {
    Token::Body(LineKind::Addition)
  } else if line.starts_with('-') {
    Token::Body(LineKind::Deletion)
  } else if line.trim().is_empty() {
    Token::Blank
  } else {
    Token::Body(LineKind::Context)
  }
}

/// Drops the whitespace between a file marker and its path.
fn strip_marker_padding(rest: &str) -> &str {
  rest.trim_start_matches([' ', '\t'])
}

/// Parses unified-diff text into its files, in input order.
///
/// Lines are `\n`-separated; a trailing `\r` on any line is ignored. Blank
/// lines are skipped everywhere, and body lines seen outside a hunk are
/// dropped. A `+++` line with no preceding `---` line is dropped as well.
///
/// # Errors
///
/// Returns [`ParseError::MalformedDiff`] when a `@@` hunk header appears
/// before any `---` line. Nothing parsed up to that point is returned.
///
/// # Examples
///
/// ```
/// let files = tinygen::parse("--- a/x.txt\n+++ b/x.txt\n@@ -1 +1 @@\n-old\n+new\n").unwrap();
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].hunks[0].additions(), vec!["+new"]);
/// ```
pub fn parse(diff_text: &str) -> Result<Vec<FileDiff>, ParseError> {
  profile!("Parse diff");

  let mut files = Vec::new();
  let mut state = State::NoFile;

  if diff_text.is_empty() {
    return Ok(files);
  }

  log::debug!("Parsing diff with {} lines", diff_text.lines().count());

  for (index, line) in diff_text.split('\n').enumerate() {
    let line = line.strip_suffix('\r').unwrap_or(line);

    state = match (classify(line), state) {
      (Token::OldFile(path), state) => {
        if let Some(file) = state.into_file() {
          files.push(file);
        }
        log::debug!("Found new file in diff: {path}");
        State::InFile(FileDiff::new(path))
      }

      (Token::NewFile(path), State::NoFile) => {
        log::debug!("Dropping `+++ {path}` with no preceding `---` line");
        State::NoFile
      }
      (Token::NewFile(path), State::InFile(mut file)) => {
        file.new_path = path.to_string();
        State::InFile(file)
      }
      (Token::NewFile(path), State::InHunk(mut file, hunk)) => {
        file.new_path = path.to_string();
        State::InHunk(file, hunk)
      }

      (Token::HunkHeader, state) =>
        match state.into_file() {
          Some(file) => State::InHunk(file, Hunk::new(line)),
          None => {
            return Err(ParseError::MalformedDiff { line: index + 1, content: line.to_string() });
          }
        },

      (Token::Body(kind), State::InHunk(file, mut hunk)) => {
        hunk.lines.push(Line::new(kind, line));
        State::InHunk(file, hunk)
      }
      (Token::Body(_), state) | (Token::Blank, state) => state
    };
  }

  if let Some(file) = state.into_file() {
    files.push(file);
  }

  log::debug!("Parsed {} files from diff", files.len());

  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classify_precedence() {
    assert_eq!(classify("--- a/x"), Token::OldFile("a/x"));
    assert_eq!(classify("+++ b/x"), Token::NewFile("b/x"));
    assert_eq!(classify("@@ -1 +1 @@"), Token::HunkHeader);
    assert_eq!(classify("+added"), Token::Body(LineKind::Addition));
    assert_eq!(classify("-removed"), Token::Body(LineKind::Deletion));
    assert_eq!(classify(" kept"), Token::Body(LineKind::Context));
    assert_eq!(classify("kept"), Token::Body(LineKind::Context));
    assert_eq!(classify("   \t"), Token::Blank);
    assert_eq!(classify(""), Token::Blank);
  }

  #[test]
  fn test_marker_padding_is_not_fixed_width() {
    assert_eq!(classify("---a/x"), Token::OldFile("a/x"));
    assert_eq!(classify("---\ta/x"), Token::OldFile("a/x"));
    assert_eq!(classify("+++   b/x"), Token::NewFile("b/x"));
    assert_eq!(classify("---"), Token::OldFile(""));
  }

  #[test]
  fn test_parse_single_file() {
    let files = parse("--- a/x.txt\n+++ b/x.txt\n@@ -1,1 +1,2 @@\n-old\n+new\n+new2\n").unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].old_path, "a/x.txt");
    assert_eq!(files[0].new_path, "b/x.txt");
    assert_eq!(files[0].hunks.len(), 1);

    let hunk = &files[0].hunks[0];
    assert_eq!(hunk.header, "@@ -1,1 +1,2 @@");
    assert_eq!(hunk.deletions(), vec!["-old"]);
    assert_eq!(hunk.additions(), vec!["+new", "+new2"]);
    assert!(hunk.context().is_empty());
  }

  #[test]
  fn test_parse_hunk_before_file_is_malformed() {
    let err = parse("@@ -1 +1 @@\n+x\n").unwrap_err();
    assert_eq!(err, ParseError::MalformedDiff { line: 1, content: "@@ -1 +1 @@".to_string() });
  }

  #[test]
  fn test_parse_reports_line_number_of_offending_header() {
    let err = parse("some preamble\n\n+++ b/x\n@@ -1 +1 @@\n").unwrap_err();
    assert!(matches!(err, ParseError::MalformedDiff { line: 4, .. }));
    assert!(err.to_string().contains("line 4"));
  }

  #[test]
  fn test_parse_empty_input() {
    assert!(parse("").unwrap().is_empty());
  }

  #[test]
  fn test_parse_crlf_line_endings() {
    let files = parse("--- a/x\r\n+++ b/x\r\n@@ -1 +1 @@\r\n-a\r\n+b\r\n").unwrap();
    assert_eq!(files[0].old_path, "a/x");
    assert_eq!(files[0].new_path, "b/x");
    assert_eq!(files[0].hunks[0].deletions(), vec!["-a"]);
    assert_eq!(files[0].hunks[0].additions(), vec!["+b"]);
  }

  #[test]
  fn test_parse_file_without_hunks_is_kept() {
    let files = parse("--- a/x\n+++ b/x\n").unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].hunks.is_empty());
  }

  #[test]
  fn test_body_lines_outside_hunk_are_dropped() {
    let files = parse("+stray\n-stray\ncontext\n--- a/x\n+stray\n+++ b/x\n@@ -1 +1 @@\n+kept\n").unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hunks[0].lines, vec![Line::new(LineKind::Addition, "+kept")]);
  }
}
