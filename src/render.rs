//! Terminal rendering of parsed diffs.

use std::io::{self, Write};

use colored::Colorize;

use crate::diff::{FileDiff, Hunk, Line, LineKind};
use crate::style::Styled;

pub const NO_DIFF_FOUND: &str = "No diff found.";

/// Order in which a hunk's body lines are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
  /// Deletions, then additions, then context.
  #[default]
  Grouped,
  /// Lines in the order they appeared in the hunk.
  Interleaved
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
  pub layout: Layout,
  pub color:  bool
}

impl Renderer {
  pub fn new(layout: Layout, color: bool) -> Self {
    Self { layout, color }
  }

  /// Writes every file, or the "no diff" notice when there are none.
  pub fn render_all(&self, files: &[FileDiff], out: &mut impl Write) -> io::Result<()> {
    if files.is_empty() {
      let notice = if self.color { NO_DIFF_FOUND.yellow().to_string() } else { NO_DIFF_FOUND.to_string() };
      return writeln!(out, "{notice}");
    }

    for (index, file) in files.iter().enumerate() {
      if index > 0 {
        writeln!(out)?;
      }
      self.render(file, out)?;
    }
    Ok(())
  }

  pub fn render(&self, file: &FileDiff, out: &mut impl Write) -> io::Result<()> {
    self.write_header(out, &format!("--- {}", file.old_path))?;
    self.write_header(out, &format!("+++ {}", file.new_path))?;

    for hunk in &file.hunks {
      self.render_hunk(hunk, out)?;
    }
    Ok(())
  }

  pub fn render_to_string(&self, files: &[FileDiff]) -> String {
    let mut buffer = Vec::new();
    // writing into a Vec cannot fail
    let _ = self.render_all(files, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
  }

  fn render_hunk(&self, hunk: &Hunk, out: &mut impl Write) -> io::Result<()> {
    if self.color {
      writeln!(out, "{}", hunk.styled())?;
    } else {
      writeln!(out, "{}", hunk.header)?;
    }

    match self.layout {
      Layout::Grouped =>
        for kind in [LineKind::Deletion, LineKind::Addition, LineKind::Context] {
          for line in hunk.lines_of(kind) {
            self.write_line(out, line)?;
          }
        },
      Layout::Interleaved =>
        for line in &hunk.lines {
          self.write_line(out, line)?;
        },
    }
    Ok(())
  }

  fn write_header(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
    if self.color {
      writeln!(out, "{}", text.bold())
    } else {
      writeln!(out, "{text}")
    }
  }

  fn write_line(&self, out: &mut impl Write, line: &Line) -> io::Result<()> {
    if self.color {
      writeln!(out, "{}", line.styled())
    } else {
      writeln!(out, "{}", line.raw)
    }
  }
}

/// One-line `path (+added -deleted)` description of a file.
pub fn summary(file: &FileDiff) -> String {
  format!("{} (+{} -{})", file.display_path(), file.added_count(), file.deleted_count())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::diff::parse;

  const DIFF: &str = "--- a/x.txt\n+++ b/x.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n";

  #[test]
  fn test_grouped_layout_orders_by_kind() {
    let files = parse(DIFF).unwrap();
    let output = Renderer::new(Layout::Grouped, false).render_to_string(&files);
    assert_eq!(output, "--- a/x.txt\n+++ b/x.txt\n@@ -1,3 +1,3 @@\n-b\n+B\n a\n c\n");
  }

  #[test]
  fn test_interleaved_layout_keeps_input_order() {
    let files = parse(DIFF).unwrap();
    let output = Renderer::new(Layout::Interleaved, false).render_to_string(&files);
    assert_eq!(output, DIFF);
  }

  #[test]
  fn test_empty_result_prints_notice() {
    let output = Renderer::default().render_to_string(&[]);
    assert_eq!(output, format!("{NO_DIFF_FOUND}\n"));
  }

  #[test]
  fn test_files_are_separated_by_blank_line() {
    let files = parse("--- a/x\n+++ b/x\n--- a/y\n+++ b/y\n").unwrap();
    let output = Renderer::default().render_to_string(&files);
    assert_eq!(output, "--- a/x\n+++ b/x\n\n--- a/y\n+++ b/y\n");
  }

  #[test]
  fn test_summary_counts_lines() {
    let files = parse(DIFF).unwrap();
    assert_eq!(summary(&files[0]), "x.txt (+1 -1)");
  }
}
