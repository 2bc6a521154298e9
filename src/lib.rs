#[macro_export]
macro_rules! profile {
  ($name:expr) => {
    let _profile_span = tracing::span!(tracing::Level::DEBUG, $name);
    let _profile_enter = _profile_span.enter();
  };
}

pub mod config;
pub mod diff;
pub mod error;
pub mod fetch;
pub mod profiling;
pub mod render;
pub mod style;

// Re-exports
pub use diff::{parse, FileDiff, Hunk, Line, LineKind, ParseError};
pub use profiling::Profile;
