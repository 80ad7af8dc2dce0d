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

//! Deployment profiles: named bundles of sizing and topology defaults.

use crate::domain::descriptor::ResourceDescriptor;
use crate::domain::prompt::Prompter;
use crate::shared::error::{AstarteError, Result};
use crate::shared::path::lookup_dotted;
use semver::{Version, VersionReq};
use serde_json::{json, Value};

/// A spec field the profile wants filled in before deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomizableField {
    /// Dotted path below `spec`, e.g. `api.host`.
    pub path: &'static str,
    pub question: &'static str,
    pub default: Option<&'static str>,
    pub allow_empty: bool,
}

impl CustomizableField {
    const fn required(path: &'static str, question: &'static str) -> Self {
        Self {
            path,
            question,
            default: None,
            allow_empty: false,
        }
    }

    /// Left out of `spec` when no value is given.
    const fn optional(path: &'static str, question: &'static str) -> Self {
        Self {
            path,
            question,
            default: None,
            allow_empty: true,
        }
    }

    const fn with_default(
        path: &'static str,
        question: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            path,
            question,
            default: Some(default),
            allow_empty: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub compatible_versions: VersionReq,
    /// Defaults for the `spec` section of the resource.
    pub default_spec: Value,
    /// Asked in order, after flags have been applied.
    pub customizable_fields: Vec<CustomizableField>,
}

impl Profile {
    /// Pre-releases are judged by their release core, so `1.1.0-rc.1`
    /// fits wherever `1.1.0` does.
    pub fn is_compatible(&self, version: &Version) -> bool {
        let core = Version::new(version.major, version.minor, version.patch);
        self.compatible_versions.matches(&core)
    }

    /// Whether this profile runs Cassandra inside the cluster. Profiles
    /// without the key are assumed to.
    pub fn deploys_cassandra(&self) -> bool {
        lookup_dotted(&self.default_spec, "cassandra.deploy")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn field(&self, path: &str) -> Option<&CustomizableField> {
        self.customizable_fields.iter().find(|f| f.path == path)
    }
}

fn hosts_fields() -> Vec<CustomizableField> {
    vec![
        CustomizableField::optional(
            "api.host",
            "Please enter the API Host for this deployment:",
        ),
        CustomizableField::optional(
            "vernemq.host",
            "Please enter the MQTT Broker Host for this deployment:",
        ),
    ]
}

fn basic_profile() -> Profile {
    let mut fields = hosts_fields();
    fields.extend([
        CustomizableField::with_default(
            "cassandra.storage.size",
            "Please enter the Cassandra Volume size for this deployment:",
            "30Gi",
        ),
        CustomizableField::with_default(
            "cfssl.storage.size",
            "Please enter the CFSSL Volume size for this deployment:",
            "2Gi",
        ),
        CustomizableField::with_default(
            "rabbitmq.storage.size",
            "Please enter the RabbitMQ Volume size for this deployment:",
            "4Gi",
        ),
        CustomizableField::with_default(
            "vernemq.storage.size",
            "Please enter the VerneMQ Volume size for this deployment:",
            "4Gi",
        ),
    ]);

    Profile {
        name: "basic".to_string(),
        description: "Single-node evaluation deployment with every service in-cluster".to_string(),
        compatible_versions: VersionReq::parse(">=0.10.0").unwrap_or(VersionReq::STAR),
        default_spec: json!({
            "api": { "ssl": true, "replicas": 1 },
            "cassandra": {
                "deploy": true,
                "replicas": 1,
                "maxHeapSize": "1024M",
                "heapNewSize": "256M",
                "storage": { "size": "30Gi" }
            },
            "cfssl": {
                "deploy": true,
                "storage": { "size": "2Gi" },
                "dbConfig": { "driver": "sqlite3", "dataSource": "/data/certs.db" }
            },
            "rabbitmq": { "deploy": true, "replicas": 1, "storage": { "size": "4Gi" } },
            "vernemq": { "sslListener": true, "replicas": 1, "storage": { "size": "4Gi" } },
            "components": {
                "dataUpdaterPlant": { "dataQueueCount": 128 }
            }
        }),
        customizable_fields: fields,
    }
}

fn burst_profile() -> Profile {
    let mut fields = hosts_fields();
    fields.extend([
        CustomizableField::with_default(
            "cassandra.storage.size",
            "Please enter the Cassandra Volume size for this deployment:",
            "100Gi",
        ),
        CustomizableField::with_default(
            "cfssl.storage.size",
            "Please enter the CFSSL Volume size for this deployment:",
            "4Gi",
        ),
        CustomizableField::with_default(
            "rabbitmq.storage.size",
            "Please enter the RabbitMQ Volume size for this deployment:",
            "10Gi",
        ),
        CustomizableField::with_default(
            "vernemq.storage.size",
            "Please enter the VerneMQ Volume size for this deployment:",
            "10Gi",
        ),
    ]);

    Profile {
        name: "burst".to_string(),
        description: "Larger in-cluster deployment sized for load and burst testing".to_string(),
        compatible_versions: VersionReq::parse(">=0.10.0").unwrap_or(VersionReq::STAR),
        default_spec: json!({
            "api": { "ssl": true, "replicas": 2 },
            "cassandra": {
                "deploy": true,
                "replicas": 3,
                "maxHeapSize": "2048M",
                "heapNewSize": "512M",
                "storage": { "size": "100Gi" }
            },
            "cfssl": {
                "deploy": true,
                "storage": { "size": "4Gi" },
                "dbConfig": { "driver": "sqlite3", "dataSource": "/data/certs.db" }
            },
            "rabbitmq": { "deploy": true, "replicas": 3, "storage": { "size": "10Gi" } },
            "vernemq": { "sslListener": true, "replicas": 3, "storage": { "size": "10Gi" } },
            "components": {
                "dataUpdaterPlant": { "dataQueueCount": 1024, "replicas": 2 }
            }
        }),
        customizable_fields: fields,
    }
}

fn external_cassandra_profile() -> Profile {
    let mut fields = hosts_fields();
    fields.extend([
        CustomizableField::required(
            "cassandra.nodes",
            "Please enter the Cassandra nodes (host:port, comma separated) for this deployment:",
        ),
        CustomizableField::with_default(
            "cfssl.storage.size",
            "Please enter the CFSSL Volume size for this deployment:",
            "4Gi",
        ),
        CustomizableField::with_default(
            "rabbitmq.storage.size",
            "Please enter the RabbitMQ Volume size for this deployment:",
            "10Gi",
        ),
        CustomizableField::with_default(
            "vernemq.storage.size",
            "Please enter the VerneMQ Volume size for this deployment:",
            "10Gi",
        ),
    ]);

    Profile {
        name: "external-cassandra".to_string(),
        description: "Burst-sized deployment connecting to an externally managed Cassandra"
            .to_string(),
        compatible_versions: VersionReq::parse(">=0.11.0").unwrap_or(VersionReq::STAR),
        default_spec: json!({
            "api": { "ssl": true, "replicas": 2 },
            "cassandra": { "deploy": false },
            "cfssl": {
                "deploy": true,
                "storage": { "size": "4Gi" },
                "dbConfig": { "driver": "sqlite3", "dataSource": "/data/certs.db" }
            },
            "rabbitmq": { "deploy": true, "replicas": 3, "storage": { "size": "10Gi" } },
            "vernemq": { "sslListener": true, "replicas": 3, "storage": { "size": "10Gi" } },
            "components": {
                "dataUpdaterPlant": { "dataQueueCount": 1024, "replicas": 2 }
            }
        }),
        customizable_fields: fields,
    }
}

/// The set of profiles a deployment can choose from.
#[derive(Debug, Clone)]
pub struct ProfileCatalogue {
    profiles: Vec<Profile>,
}

impl Default for ProfileCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileCatalogue {
    pub fn builtin() -> Self {
        Self {
            profiles: vec![basic_profile(), burst_profile(), external_cassandra_profile()],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn compatible_with(&self, version: &Version) -> Vec<&Profile> {
        self.profiles
            .iter()
            .filter(|p| p.is_compatible(version))
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Picks the profile for a deployment and seeds the descriptor with its
/// defaults.
pub struct ProfilePrompter<'a> {
    catalogue: &'a ProfileCatalogue,
    prompter: &'a dyn Prompter,
}

impl<'a> ProfilePrompter<'a> {
    pub fn new(catalogue: &'a ProfileCatalogue, prompter: &'a dyn Prompter) -> Self {
        Self {
            catalogue,
            prompter,
        }
    }

    pub fn prompt(
        &self,
        version: &Version,
        requested: Option<&str>,
    ) -> Result<(Profile, ResourceDescriptor)> {
        let profile = match requested.map(str::trim).filter(|p| !p.is_empty()) {
            Some(name) => self.requested_profile(name, version)?,
            None => self.choose_profile(version)?,
        };

        let mut descriptor = ResourceDescriptor::empty();
        descriptor.set_spec_tree(profile.default_spec.clone());
        descriptor.set_spec("version", json!(version.to_string()));
        descriptor.set_profile_annotation(&profile.name);

        Ok((profile, descriptor))
    }

    fn requested_profile(&self, name: &str, version: &Version) -> Result<Profile> {
        let profile = self.catalogue.get(name).ok_or_else(|| {
            AstarteError::invalid_input(format!(
                "unknown deployment profile '{}' (available: {})",
                name,
                self.catalogue.names().join(", ")
            ))
        })?;

        if !profile.is_compatible(version) {
            return Err(AstarteError::invalid_input(format!(
                "deployment profile '{}' does not support Astarte {} (requires {})",
                name, version, profile.compatible_versions
            )));
        }

        Ok(profile.clone())
    }

    fn choose_profile(&self, version: &Version) -> Result<Profile> {
        let compatible = self.catalogue.compatible_with(version);
        if compatible.is_empty() {
            return Err(AstarteError::Profile(format!(
                "no deployment profile supports Astarte {}",
                version
            )));
        }

        if !self.prompter.is_interactive() {
            return Err(AstarteError::missing_field(
                "deployment profile (use --profile in non-interactive mode)",
            ));
        }

        let options: Vec<String> = compatible
            .iter()
            .map(|p| format!("{} - {}", p.name, p.description))
            .collect();
        let index = self
            .prompter
            .select("Which deployment profile would you like to use?", &options)?;

        compatible
            .get(index)
            .map(|p| (*p).clone())
            .ok_or_else(|| AstarteError::Prompt(format!("invalid profile selection {}", index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue() {
        let catalogue = ProfileCatalogue::builtin();
        assert_eq!(catalogue.names(), vec!["basic", "burst", "external-cassandra"]);
        assert!(catalogue.get("basic").unwrap().deploys_cassandra());
        assert!(!catalogue.get("external-cassandra").unwrap().deploys_cassandra());
    }

    #[test]
    fn test_compatibility() {
        let catalogue = ProfileCatalogue::builtin();
        let old = Version::new(0, 10, 2);
        let names: Vec<&str> = catalogue
            .compatible_with(&old)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["basic", "burst"]);
        assert_eq!(catalogue.compatible_with(&Version::new(1, 0, 0)).len(), 3);
        assert!(catalogue.compatible_with(&Version::new(0, 9, 0)).is_empty());
    }

    #[test]
    fn test_prerelease_compatibility() {
        let catalogue = ProfileCatalogue::builtin();
        let rc = Version::parse("1.1.0-rc.1").unwrap();
        assert!(catalogue.get("basic").unwrap().is_compatible(&rc));
        assert_eq!(catalogue.compatible_with(&rc).len(), 3);

        let old_rc = Version::parse("0.11.0-beta.2").unwrap();
        assert!(catalogue.get("external-cassandra").unwrap().is_compatible(&old_rc));
        let too_old = Version::parse("0.9.9-rc.1").unwrap();
        assert!(catalogue.compatible_with(&too_old).is_empty());
    }

    #[test]
    fn test_profile_fields() {
        let basic = ProfileCatalogue::builtin().get("basic").cloned().unwrap();
        let host = basic.field("api.host").unwrap();
        assert_eq!(host.default, None);
        assert!(host.allow_empty);
        assert_eq!(
            basic.field("cassandra.storage.size").unwrap().default,
            Some("30Gi")
        );
        assert!(basic.field("cassandra.nodes").is_none());

        let external = ProfileCatalogue::builtin()
            .get("external-cassandra")
            .cloned()
            .unwrap();
        assert!(!external.field("cassandra.nodes").unwrap().allow_empty);
    }
}
