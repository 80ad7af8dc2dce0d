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

//! Optional `astartectl.toml` configuration.

use crate::infrastructure::constants::{
    CONF_FILE_ENV, DEFAULT_INSTANCE_NAME, DEFAULT_NAMESPACE, DEFAULT_RELEASES_URL,
};
use crate::shared::error::{AstarteError, Result};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AstartectlConf {
    pub kubernetes: KubernetesConf,
    pub releases: ReleasesConf,
    pub deploy: DeployConf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConf {
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasesConf {
    pub url: String,
}

impl Default for ReleasesConf {
    fn default() -> Self {
        Self {
            url: DEFAULT_RELEASES_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConf {
    pub name: String,
    pub namespace: String,
}

impl Default for DeployConf {
    fn default() -> Self {
        Self {
            name: DEFAULT_INSTANCE_NAME.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl AstartectlConf {
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            AstarteError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// `--config-file` if given, else `ASTARTECTL_CONF_FILE`, else defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from(path);
        }
        match std::env::var(CONF_FILE_ENV) {
            Ok(path) if !path.is_empty() => Self::from(path),
            _ => Ok(Self::default()),
        }
    }

    /// Command line first, then this file.
    pub fn kubeconfig(&self, flag: Option<&String>) -> Option<String> {
        flag.cloned().or_else(|| self.kubernetes.kubeconfig.clone())
    }

    pub fn context(&self, flag: Option<&String>) -> Option<String> {
        flag.cloned().or_else(|| self.kubernetes.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let conf = AstartectlConf::default();
        assert_eq!(conf.deploy.name, "astarte");
        assert_eq!(conf.deploy.namespace, "astarte");
        assert!(conf.releases.url.contains("astarte-platform/astarte"));
        assert_eq!(conf.kubernetes.kubeconfig, None);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[kubernetes]\ncontext = \"staging\"\n\n[deploy]\nnamespace = \"astarte-staging\""
        )
        .unwrap();

        let conf = AstartectlConf::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(conf.kubernetes.context.as_deref(), Some("staging"));
        assert_eq!(conf.deploy.namespace, "astarte-staging");
        assert_eq!(conf.deploy.name, "astarte");
        assert_eq!(conf.releases, ReleasesConf::default());
    }

    #[test]
    fn test_flag_precedence() {
        let conf = AstartectlConf {
            kubernetes: KubernetesConf {
                kubeconfig: Some("/etc/kube/config".to_string()),
                context: Some("prod".to_string()),
            },
            ..Default::default()
        };
        let flag = "dev".to_string();
        assert_eq!(conf.context(Some(&flag)).as_deref(), Some("dev"));
        assert_eq!(conf.context(None).as_deref(), Some("prod"));
        assert_eq!(
            conf.kubeconfig(None).as_deref(),
            Some("/etc/kube/config")
        );
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[deploy\nname = ").unwrap();
        let err = AstartectlConf::from(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AstarteError::TomlParse(_)));

        assert!(matches!(
            AstartectlConf::from("/nonexistent/astartectl.toml"),
            Err(AstarteError::ConfigError(_))
        ));
    }
}
