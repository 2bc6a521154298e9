//! Timing for the fetch and parse steps.
//!
//! [`Profile`] is the `Send` counterpart of the `profile!` span: it can be
//! held across an `.await`, and reports through `log` when dropped.

use std::fmt::Display;
use std::time::{Duration, Instant};

/// Times one operation and logs the elapsed time at debug level on drop,
/// together with whatever the operation recorded about its work (the
/// endpoint it called, how many files it produced, ...).
#[derive(Debug)]
pub struct Profile {
  operation: &'static str,
  start:     Instant,
  detail:    Option<String>
}

impl Profile {
  pub fn new(operation: &'static str) -> Self {
    Self { operation, start: Instant::now(), detail: None }
  }

  pub fn with_detail(mut self, detail: impl Display) -> Self {
    self.record(detail);
    self
  }

  /// Replaces the detail logged on drop; the last call wins.
  pub fn record(&mut self, detail: impl Display) {
    self.detail = Some(detail.to_string());
  }

  pub fn operation(&self) -> &'static str {
    self.operation
  }

  pub fn detail(&self) -> Option<&str> {
    self.detail.as_deref()
  }

  pub fn elapsed(&self) -> Duration {
    self.start.elapsed()
  }
}

impl Drop for Profile {
  fn drop(&mut self) {
    let elapsed = self.elapsed();
    match &self.detail {
      Some(detail) => log::debug!("{} took {elapsed:.2?} ({detail})", self.operation),
      None => log::debug!("{} took {elapsed:.2?}", self.operation)
    }
  }
}
