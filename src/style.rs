use colored::{ColoredString, Colorize};

use crate::diff::{Hunk, Line, LineKind};

/// Terminal colouring for diff elements
pub trait Styled {
  fn styled(&self) -> ColoredString;
}

impl Styled for Line {
  fn styled(&self) -> ColoredString {
    match self.kind {
      LineKind::Addition => self.raw.green(),
      LineKind::Deletion => self.raw.red(),
      LineKind::Context => self.raw.normal()
    }
  }
}

impl Styled for Hunk {
  fn styled(&self) -> ColoredString {
    self.header.cyan()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_styled_keeps_raw_text() {
    colored::control::set_override(false);
    let line = Line::new(LineKind::Addition, "+new");
    assert_eq!(line.styled().to_string(), "+new");
    assert_eq!(Hunk::new("@@ -1 +1 @@").styled().to_string(), "@@ -1 +1 @@");
  }
}
