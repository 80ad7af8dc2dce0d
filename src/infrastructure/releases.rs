// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::version::{parse_version, ReleaseLister};
use crate::infrastructure::constants::{DEFAULT_RELEASES_URL, RELEASES_USER_AGENT};
use crate::shared::error::{AstarteError, Result};
use semver::Version;
use serde::Deserialize;
use tracing::debug;

/// One entry of the GitHub releases API response. Only the fields used to
/// pick the latest stable release are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

/// Highest published, non-prerelease version. Tags that do not parse as
/// versions are skipped.
pub fn latest_stable(releases: &[GitHubRelease]) -> Option<Version> {
    releases
        .iter()
        .filter(|r| !r.draft && !r.prerelease)
        .filter_map(|r| parse_version(&r.tag_name).ok())
        .filter(|v| v.pre.is_empty())
        .max()
}

pub struct GitHubReleaseLister {
    client: reqwest::Client,
    url: String,
}

impl GitHubReleaseLister {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.unwrap_or_else(|| DEFAULT_RELEASES_URL.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl ReleaseLister for GitHubReleaseLister {
    async fn latest_stable(&self) -> Result<String> {
        debug!(url = %self.url, "listing Astarte releases");
        let releases: Vec<GitHubRelease> = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, RELEASES_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        latest_stable(&releases)
            .map(|v| v.to_string())
            .ok_or_else(|| {
                AstarteError::ReleaseListing(format!("no stable release found at {}", self.url))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, prerelease: bool) -> GitHubRelease {
        GitHubRelease {
            tag_name: tag.to_string(),
            draft: false,
            prerelease,
        }
    }

    #[test]
    fn test_latest_stable_skips_prereleases() {
        let releases = vec![
            release("v0.11.4", false),
            release("v1.0.0", false),
            release("v1.1.0-rc.0", true),
            release("v1.0.1-beta", false),
            release("not-a-version", false),
        ];
        assert_eq!(latest_stable(&releases), Some(Version::new(1, 0, 0)));
    }

    #[test]
    fn test_latest_stable_empty() {
        assert_eq!(latest_stable(&[]), None);
        assert_eq!(latest_stable(&[release("v1.0.0-rc.1", true)]), None);
    }

    #[test]
    fn test_release_deserialization() {
        let body = r#"[{"tag_name": "v1.0.0", "draft": false, "prerelease": false, "name": "Astarte"}]"#;
        let releases: Vec<GitHubRelease> = serde_json::from_str(body).unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].tag_name, "v1.0.0");
    }
}
