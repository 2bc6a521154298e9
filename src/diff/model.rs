//! Value types produced by the diff parser.

use std::fmt;

use serde::{Deserialize, Serialize};

const DEV_NULL: &str = "/dev/null";

/// Classification of a single hunk body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
  Addition,
  Deletion,
  Context
}

impl LineKind {
  /// The marker character unified diffs use for this kind of line.
  pub fn marker(&self) -> char {
    match self {
      LineKind::Addition => '+',
      LineKind::Deletion => '-',
      LineKind::Context => ' '
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      LineKind::Addition => "addition",
      LineKind::Deletion => "deletion",
      LineKind::Context => "context"
    }
  }
}

/// One line of a hunk body.
///
/// `raw` is the line exactly as it appeared in the input, marker included.
/// Renderers print `raw` as-is; use [`Line::content`] for the text without
/// its marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
  pub kind: LineKind,
  pub raw:  String
}

impl Line {
  pub fn new(kind: LineKind, raw: impl Into<String>) -> Self {
    Self { kind, raw: raw.into() }
  }

  /// The line text with its leading marker removed.
  pub fn content(&self) -> &str {
    self
      .raw
      .strip_prefix(self.kind.marker())
      .unwrap_or(&self.raw)
  }
}

/// Line ranges declared by a hunk header, `@@ -l,s +l,s @@ section`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkRange {
  pub old_start: u32,
  pub old_len:   u32,
  pub new_start: u32,
  pub new_len:   u32,
  pub section:   Option<String>
}

impl HunkRange {
  /// Parses a hunk header. Returns `None` for anything that is not a
  /// two-way range header; a missing length means a length of one.
  pub fn parse(header: &str) -> Option<Self> {
    let rest = header.strip_prefix("@@")?;
    let (ranges, section) = rest.split_once("@@")?;

    let mut parts = ranges.split_whitespace();
    let old = parts.next()?.strip_prefix('-')?;
    let new = parts.next()?.strip_prefix('+')?;
    if parts.next().is_some() {
      return None;
    }

    let (old_start, old_len) = parse_span(old)?;
    let (new_start, new_len) = parse_span(new)?;
    let section = section.trim();

    Some(Self {
      old_start,
      old_len,
      new_start,
      new_len,
      section: (!section.is_empty()).then(|| section.to_string())
    })
  }
}

fn parse_span(span: &str) -> Option<(u32, u32)> {
  match span.split_once(',') {
    Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
    None => Some((span.parse().ok()?, 1))
  }
}

/// One `@@ ... @@` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
  /// The header line, verbatim.
  pub header: String,
  /// Body lines in the order they appeared.
  pub lines:  Vec<Line>
}

impl Hunk {
  pub fn new(header: impl Into<String>) -> Self {
    Self { header: header.into(), lines: Vec::new() }
  }

  pub fn range(&self) -> Option<HunkRange> {
    HunkRange::parse(&self.header)
  }

  pub fn lines_of(&self, kind: LineKind) -> impl Iterator<Item = &Line> {
    self.lines.iter().filter(move |line| line.kind == kind)
  }

  /// Raw `+` lines in relative order.
  pub fn additions(&self) -> Vec<&str> {
    self.raw_lines_of(LineKind::Addition)
  }

  /// Raw `-` lines in relative order.
  pub fn deletions(&self) -> Vec<&str> {
    self.raw_lines_of(LineKind::Deletion)
  }

  /// Raw context lines in relative order.
  pub fn context(&self) -> Vec<&str> {
    self.raw_lines_of(LineKind::Context)
  }

  fn raw_lines_of(&self, kind: LineKind) -> Vec<&str> {
    self.lines_of(kind).map(|line| line.raw.as_str()).collect()
  }
}

/// The change set for one file: a `---`/`+++` pair and its hunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
  pub old_path: String,
  pub new_path: String,
  pub hunks:    Vec<Hunk>
}

impl FileDiff {
  pub fn new(old_path: impl Into<String>) -> Self {
    Self { old_path: old_path.into(), new_path: String::new(), hunks: Vec::new() }
  }

  pub fn added_count(&self) -> usize {
    self.count(LineKind::Addition)
  }

  pub fn deleted_count(&self) -> usize {
    self.count(LineKind::Deletion)
  }

  pub fn is_new_file(&self) -> bool {
    self.old_path == DEV_NULL
  }

  pub fn is_deleted_file(&self) -> bool {
    self.new_path == DEV_NULL
  }

  /// Path suitable for display: the destination path without its `b/`
  /// prefix, or the source path when the file was deleted or no `+++`
  /// line was seen.
  pub fn display_path(&self) -> &str {
    let path = if self.is_deleted_file() || self.new_path.is_empty() {
      &self.old_path
    } else {
      &self.new_path
    };

    path
      .strip_prefix("a/")
      .or_else(|| path.strip_prefix("b/"))
      .unwrap_or(path)
  }

  fn count(&self, kind: LineKind) -> usize {
    self
      .hunks
      .iter()
      .map(|hunk| hunk.lines_of(kind).count())
      .sum()
  }
}

/// Writes the file back out as unified-diff text, body lines in their
/// original order. Parsing the output yields an equal `FileDiff`.
impl fmt::Display for FileDiff {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "--- {}", self.old_path)?;
    writeln!(f, "+++ {}", self.new_path)?;
    for hunk in &self.hunks {
      writeln!(f, "{}", hunk.header)?;
      for line in &hunk.lines {
        writeln!(f, "{}", line.raw)?;
      }
    }
    Ok(())
  }
}
