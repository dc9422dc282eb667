//! HTTP registry client backed by system curl
//!
//! Index layout:
//! - `GET {base}/{module}/latest.json` -> `{"version": "1.2.0"}`
//! - `GET {base}/{module}/{version}.json` -> present iff published
//!
//! curl runs with `-sf` so HTTP errors surface as exit codes; the
//! not-found family maps to an absent result, everything else is a
//! connectivity failure. An empty 200 body on the latest-version lookup is
//! retried exactly once before giving up.

use super::{ModuleId, ModuleRegistry};
use crate::core::error::{ShipwayError, ShipwayResult};
use crate::core::version::Version;
use serde::Deserialize;
use std::process::Command;

/// curl exit codes that mean "the resource is not there" rather than
/// "the registry is unreachable": HTTP >= 400, file:// read failure,
/// FTP-style missing remote file
const NOT_FOUND_EXITS: [i32; 3] = [22, 37, 78];

/// Seconds before an unresponsive registry aborts the lookup
const CONNECT_TIMEOUT_SECS: u32 = 10;
const MAX_TIME_SECS: u32 = 60;

#[derive(Debug, Deserialize)]
struct LatestResponse {
  version: String,
}

/// Registry client for a JSON index served over HTTP (or file:// in tests)
pub struct HttpRegistry {
  base_url: String,
}

impl HttpRegistry {
  pub fn new(base_url: impl Into<String>) -> Self {
    let mut base_url = base_url.into();
    while base_url.ends_with('/') {
      base_url.pop();
    }
    Self { base_url }
  }

  fn url(&self, module: &ModuleId, leaf: &str) -> String {
    format!("{}/{}/{}", self.base_url, module.path(), leaf)
  }

  /// Fetch a URL; Ok(None) means a clean not-found
  fn fetch(&self, url: &str) -> ShipwayResult<Option<String>> {
    let output = Command::new("curl")
      .arg("-sf")
      .arg("--connect-timeout")
      .arg(CONNECT_TIMEOUT_SECS.to_string())
      .arg("--max-time")
      .arg(MAX_TIME_SECS.to_string())
      .arg(url)
      .output()
      .map_err(|e| ShipwayError::Registry {
        url: url.to_string(),
        detail: format!("failed to spawn curl: {}", e),
      })?;

    if output.status.success() {
      return Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()));
    }

    match output.status.code() {
      Some(code) if NOT_FOUND_EXITS.contains(&code) => Ok(None),
      code => Err(ShipwayError::Registry {
        url: url.to_string(),
        detail: format!(
          "curl exited with {:?}: {}",
          code,
          String::from_utf8_lossy(&output.stderr).trim()
        ),
      }),
    }
  }

  /// Fetch the latest-version document, retrying once on an empty body
  fn fetch_latest_body(&self, url: &str) -> ShipwayResult<Option<String>> {
    match self.fetch(url)? {
      Some(body) if body.trim().is_empty() => self.fetch(url),
      other => Ok(other),
    }
  }
}

impl ModuleRegistry for HttpRegistry {
  fn latest_version(&self, module: &ModuleId) -> ShipwayResult<Option<Version>> {
    let url = self.url(module, "latest.json");
    let body = match self.fetch_latest_body(&url)? {
      Some(body) if !body.trim().is_empty() => body,
      _ => return Ok(None),
    };

    let parsed: LatestResponse = serde_json::from_str(&body).map_err(|e| ShipwayError::Registry {
      url: url.clone(),
      detail: format!("malformed latest-version document: {}", e),
    })?;

    Ok(Some(Version::parse(&parsed.version)?))
  }

  fn exists(&self, module: &ModuleId, version: &Version) -> ShipwayResult<bool> {
    let url = self.url(module, &format!("{}.json", version));
    Ok(self.fetch(&url)?.is_some())
  }
}
