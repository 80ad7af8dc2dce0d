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

use crate::domain::prompt::Prompter;
use crate::shared::error::{AstarteError, Result};
use semver::Version;
use tracing::debug;

const VERSION_QUESTION: &str = "What Astarte version would you like to install?";

/// Source of the "latest stable" Astarte version.
#[async_trait::async_trait]
pub trait ReleaseLister: Send + Sync {
    async fn latest_stable(&self) -> Result<String>;
}

/// Parse a user-facing version string.
///
/// Accepts a leading `v` and pads partial versions (`1`, `1.0`) with zeros.
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let raw = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if raw.is_empty() {
        return Err(AstarteError::InvalidVersion(input.to_string()));
    }

    let split_at = raw.find(['-', '+']).unwrap_or(raw.len());
    let (core, suffix) = raw.split_at(split_at);
    let components = core.split('.').count();
    let padded = match components {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => raw.to_string(),
    };

    Version::parse(&padded).map_err(|_| AstarteError::InvalidVersion(input.to_string()))
}

pub struct VersionResolver<'a> {
    releases: &'a dyn ReleaseLister,
    prompter: &'a dyn Prompter,
}

impl<'a> VersionResolver<'a> {
    pub fn new(releases: &'a dyn ReleaseLister, prompter: &'a dyn Prompter) -> Self {
        Self { releases, prompter }
    }

    /// Resolve the requested version, falling back to the latest stable
    /// release (offered as the prompt default) when none is given.
    pub async fn resolve(&self, requested: Option<&str>) -> Result<Version> {
        let candidate = match requested.map(str::trim).filter(|v| !v.is_empty()) {
            Some(version) => version.to_string(),
            None => {
                let latest = self.releases.latest_stable().await?;
                debug!(latest = %latest, "latest stable Astarte release");
                self.prompter.prompt_choice(VERSION_QUESTION, &latest, false)?
            }
        };

        parse_version(&candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_versions() {
        assert_eq!(parse_version("1.0.0").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_version("v0.11.4").unwrap(), Version::new(0, 11, 4));
        assert_eq!(parse_version(" 1.0.2 ").unwrap(), Version::new(1, 0, 2));
        assert_eq!(
            parse_version("1.1.0-rc.1").unwrap(),
            Version::parse("1.1.0-rc.1").unwrap()
        );
        assert_eq!(
            parse_version("1.0.0+build.5").unwrap(),
            Version::parse("1.0.0+build.5").unwrap()
        );
    }

    #[test]
    fn test_parse_partial_versions() {
        assert_eq!(parse_version("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_version("1.0").unwrap(), Version::new(1, 0, 0));
        assert_eq!(
            parse_version("1.1-beta").unwrap(),
            Version::parse("1.1.0-beta").unwrap()
        );
    }

    #[test]
    fn test_parse_invalid_versions() {
        for input in ["abc", "", "v", "1.0.0.0", "1.x.0", "latest"] {
            let err = parse_version(input).unwrap_err();
            assert!(
                matches!(err, AstarteError::InvalidVersion(ref s) if s == input),
                "expected InvalidVersion for {:?}, got {:?}",
                input,
                err
            );
        }
    }
}
