//! Client side of the diff-generation endpoint.
//!
//! The endpoint takes a repository URL and an instruction and answers with
//! `{"diff": "..."}`, where the diff text may be wrapped in markdown code
//! fences. Everything here ends once that text is available; parsing
//! belongs to [`crate::diff`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::Settings;
use crate::diff::{parse, FileDiff};
use crate::{error, Profile};

const FENCE: &str = "```";

#[derive(Error, Debug)]
pub enum FetchError {
  #[error("{0} must not be empty")]
  MissingInput(&'static str),

  #[error("endpoint responded with {status}: {message}")]
  Status { status: StatusCode, message: String },

  #[error("could not reach endpoint: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("unexpected response from endpoint: {0}")]
  InvalidResponse(String)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRequest {
  pub repo_url: String,
  pub prompt:   String
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResponse {
  pub diff: String
}

/// Error body the endpoint sends alongside a non-success status
#[derive(Debug, Deserialize)]
struct ErrorBody {
  detail: String
}

impl DiffRequest {
  pub fn new(repo_url: impl Into<String>, prompt: impl Into<String>) -> Self {
    Self { repo_url: repo_url.into(), prompt: prompt.into() }
  }

  /// Both fields have to carry something besides whitespace.
  pub fn validate(&self) -> Result<(), FetchError> {
    if self.repo_url.trim().is_empty() {
      return Err(FetchError::MissingInput("repository URL"));
    }
    if self.prompt.trim().is_empty() {
      return Err(FetchError::MissingInput("prompt"));
    }
    Ok(())
  }
}

/// Anything that can produce raw diff text for a request.
#[async_trait]
pub trait DiffSource: Send + Sync {
  /// Returns the diff text with any code fences already removed.
  async fn fetch(&self, request: &DiffRequest) -> Result<String, FetchError>;
}

/// [`DiffSource`] backed by a single HTTP POST to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpDiffSource {
  client:   reqwest::Client,
  endpoint: Url
}

impl HttpDiffSource {
  pub fn new(settings: &Settings) -> Result<Self, FetchError> {
    let client = reqwest::Client::builder()
      .timeout(settings.timeout)
      .build()?;

    Ok(Self { client, endpoint: settings.endpoint.clone() })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }
}

#[async_trait]
impl DiffSource for HttpDiffSource {
  async fn fetch(&self, request: &DiffRequest) -> Result<String, FetchError> {
    let _profile = Profile::new("Fetch diff").with_detail(&self.endpoint);
    request.validate()?;

    log::debug!("Requesting diff for {} from {}", request.repo_url, self.endpoint);

    let response = self
      .client
      .post(self.endpoint.clone())
      .json(request)
      .send()
      .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      log::debug!("Endpoint answered {status}: {body}");
      let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.detail)
        .unwrap_or_else(|_| body.trim().to_string());
      return Err(FetchError::Status { status, message });
    }

    let payload: DiffResponse = serde_json::from_str(&body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

    Ok(strip_code_fence(&payload.diff))
  }
}

/// Removes markdown code fences (```` ``` ```` optionally followed by a
/// language tag) from generated text and trims the result.
///
/// The text is trimmed first, so an indented opening or closing fence still
/// counts. Column-0 fence lines between them are dropped too, since the
/// generator may emit one fenced block per file.
///
/// # Examples
///
/// ```
/// use tinygen::fetch::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```diff\n--- a\n+++ b\n```"), "--- a\n+++ b");
/// assert_eq!(strip_code_fence("  ```diff\n--- a\n+++ b\n  ```  "), "--- a\n+++ b");
/// ```
pub fn strip_code_fence(text: &str) -> String {
  let mut lines: Vec<&str> = text.trim().split('\n').collect();

  if lines.first().is_some_and(|line| is_fence_line(line.trim())) {
    lines.remove(0);
  }
  if lines.last().is_some_and(|line| is_fence_line(line.trim())) {
    lines.pop();
  }

  remove_fence_lines(&lines.join("\n")).trim().to_string()
}

/// Drops column-0 fence lines and leaves every other byte alone, including
/// trailing whitespace on body lines.
///
/// Suited to diff files read from disk, where whitespace is significant.
pub fn remove_fence_lines(text: &str) -> String {
  text
    .split('\n')
    .filter(|line| !is_fence_line(line.trim_end()))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Three backticks plus an optional tag; indentation is the caller's concern.
fn is_fence_line(line: &str) -> bool {
  line
    .strip_prefix(FENCE)
    .is_some_and(|tag| !tag.contains(char::is_whitespace))
}

/// Fetches a diff from `source` and parses it.
///
/// An empty vector means the endpoint produced no diff; that is a result,
/// not an error.
pub async fn generate(source: &dyn DiffSource, request: &DiffRequest) -> error::Result<Vec<FileDiff>> {
  let mut profile = Profile::new("Generate diff");
  let diff = source.fetch(request).await?;
  let files = parse(&diff)?;
  profile.record(format_args!("{} lines, {} files", diff.lines().count(), files.len()));
  Ok(files)
}
