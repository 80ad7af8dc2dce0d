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

use crate::domain::profile::Profile;
use crate::domain::prompt::Prompter;
use crate::domain::validator::DescriptorValidator;
use crate::infrastructure::constants::{
    ANNOTATION_DEPLOYMENT_MANAGER, ANNOTATION_DEPLOYMENT_PROFILE, ASTARTE_API_VERSION,
    ASTARTE_KIND, CFSSL_DEFAULT_DB_DRIVER, DEFAULT_INSTANCE_NAME, DEFAULT_NAMESPACE,
    DEPLOYMENT_MANAGER,
};
use crate::shared::error::{AstarteError, Result};
use crate::shared::path::{lookup, lookup_dotted, lookup_str, set_dotted};
use semver::Version;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// The Astarte custom resource document submitted to the cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceDescriptor {
    document: Value,
}

impl Default for ResourceDescriptor {
    fn default() -> Self {
        Self::empty()
    }
}

impl ResourceDescriptor {
    pub fn empty() -> Self {
        Self {
            document: json!({
                "apiVersion": ASTARTE_API_VERSION,
                "kind": ASTARTE_KIND,
                "metadata": {
                    "annotations": {
                        ANNOTATION_DEPLOYMENT_MANAGER: DEPLOYMENT_MANAGER
                    }
                },
                "spec": {}
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        lookup_str(&self.document, &["metadata", "name"])
    }

    pub fn namespace(&self) -> Option<&str> {
        lookup_str(&self.document, &["metadata", "namespace"])
    }

    /// `(name, namespace)`, failing if either is missing or empty.
    pub fn identity(&self) -> Result<(&str, &str)> {
        let name = self
            .name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AstarteError::missing_field("metadata.name"))?;
        let namespace = self
            .namespace()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AstarteError::missing_field("metadata.namespace"))?;
        Ok((name, namespace))
    }

    pub fn set_identity(&mut self, name: &str, namespace: &str) {
        set_dotted(&mut self.document, "metadata.name", json!(name));
        set_dotted(&mut self.document, "metadata.namespace", json!(namespace));
    }

    pub fn set_profile_annotation(&mut self, profile: &str) {
        if let Some(annotations) = self
            .document
            .pointer_mut("/metadata/annotations")
            .and_then(Value::as_object_mut)
        {
            annotations.insert(ANNOTATION_DEPLOYMENT_PROFILE.to_string(), json!(profile));
        }
    }

    /// Value at a dotted path below `spec`.
    pub fn spec(&self, path: &str) -> Option<&Value> {
        lookup(&self.document, &["spec"]).and_then(|spec| lookup_dotted(spec, path))
    }

    pub fn set_spec(&mut self, path: &str, value: Value) {
        set_dotted(&mut self.document, &format!("spec.{}", path), value);
    }

    /// Replace the whole `spec` section.
    pub fn set_spec_tree(&mut self, spec: Value) {
        set_dotted(&mut self.document, "spec", spec);
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    /// Human-readable preview. Display only.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.document)?)
    }
}

/// Explicit command-line values for a deployment. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployFlags {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub version: Option<String>,
    pub profile: Option<String>,
    pub api_host: Option<String>,
    pub broker_host: Option<String>,
    pub cassandra_nodes: Option<String>,
    pub cassandra_volume_size: Option<String>,
    pub cfssl_volume_size: Option<String>,
    pub cfssl_db_driver: Option<String>,
    pub cfssl_db_datasource: Option<String>,
    pub rabbitmq_volume_size: Option<String>,
    pub vernemq_volume_size: Option<String>,
    pub storage_class_name: Option<String>,
    pub no_ssl: bool,
}

/// Spec paths that can be set from a flag, with the flag that sets them.
pub const FLAG_PATHS: [(&str, &str); 10] = [
    ("api.host", "--api-host"),
    ("vernemq.host", "--broker-host"),
    ("cassandra.nodes", "--cassandra-nodes"),
    ("cassandra.storage.size", "--cassandra-volume-size"),
    ("cfssl.storage.size", "--cfssl-volume-size"),
    ("cfssl.dbConfig.driver", "--cfssl-db-driver"),
    ("cfssl.dbConfig.dataSource", "--cfssl-db-datasource"),
    ("rabbitmq.storage.size", "--rabbitmq-volume-size"),
    ("vernemq.storage.size", "--vernemq-volume-size"),
    ("storageClassName", "--storage-class-name"),
];

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DeployFlags {
    /// The flag-provided value for a spec path, if any.
    pub fn for_path(&self, path: &str) -> Option<&str> {
        let value = match path {
            "api.host" => &self.api_host,
            "vernemq.host" => &self.broker_host,
            "cassandra.nodes" => &self.cassandra_nodes,
            "cassandra.storage.size" => &self.cassandra_volume_size,
            "cfssl.storage.size" => &self.cfssl_volume_size,
            "cfssl.dbConfig.driver" => &self.cfssl_db_driver,
            "cfssl.dbConfig.dataSource" => &self.cfssl_db_datasource,
            "rabbitmq.storage.size" => &self.rabbitmq_volume_size,
            "vernemq.storage.size" => &self.vernemq_volume_size,
            "storageClassName" => &self.storage_class_name,
            _ => return None,
        };
        non_empty(value)
    }

    /// Every flag-provided spec value, in a fixed order.
    pub fn spec_overrides(&self) -> Vec<(&'static str, &str)> {
        FLAG_PATHS
            .iter()
            .filter_map(|(path, _)| self.for_path(path).map(|value| (*path, value)))
            .collect()
    }
}

fn flag_for(path: &str) -> Option<&'static str> {
    FLAG_PATHS
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, flag)| *flag)
}

/// Completes a profile-seeded descriptor from flags and prompts.
///
/// Performs no cluster I/O. Given the same version, profile and flags (and
/// the same prompt answers) it always yields the same descriptor.
pub struct DescriptorBuilder<'a> {
    prompter: &'a dyn Prompter,
    default_name: String,
    default_namespace: String,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self {
            prompter,
            default_name: DEFAULT_INSTANCE_NAME.to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Defaults offered when the identity is prompted for.
    pub fn with_identity_defaults(mut self, name: String, namespace: String) -> Self {
        self.default_name = name;
        self.default_namespace = namespace;
        self
    }

    pub fn build(
        &self,
        version: &Version,
        profile: &Profile,
        partial: ResourceDescriptor,
        flags: &DeployFlags,
    ) -> Result<ResourceDescriptor> {
        let mut descriptor = partial;

        let name = match non_empty(&flags.name) {
            Some(name) => name.to_string(),
            None => self.ask(
                "metadata.name",
                "--name",
                "Please enter the name for this Astarte instance:",
                &self.default_name,
                false,
            )?,
        };
        let namespace = match non_empty(&flags.namespace) {
            Some(namespace) => namespace.to_string(),
            None => self.ask(
                "metadata.namespace",
                "--namespace",
                "Please enter the namespace where the Astarte instance will be deployed:",
                &self.default_namespace,
                false,
            )?,
        };
        descriptor.set_identity(&name, &namespace);
        descriptor.set_spec("version", json!(version.to_string()));
        descriptor.set_profile_annotation(&profile.name);

        if non_empty(&flags.cassandra_nodes).is_some() && profile.deploys_cassandra() {
            return Err(AstarteError::invalid_input(format!(
                "--cassandra-nodes is only valid with a profile using an external Cassandra, \
                 but profile '{}' deploys Cassandra in the cluster",
                profile.name
            )));
        }

        for (path, value) in flags.spec_overrides() {
            debug!(path, value, "applying flag override");
            descriptor.set_spec(path, json!(value));
        }

        for field in &profile.customizable_fields {
            if flags.for_path(field.path).is_some() {
                continue;
            }

            let default = field
                .default
                .map(str::to_string)
                .or_else(|| {
                    descriptor
                        .spec(field.path)
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_default();
            let flag = flag_for(field.path).unwrap_or("a flag");
            let answer = self.ask(
                &format!("spec.{}", field.path),
                flag,
                field.question,
                &default,
                field.allow_empty,
            )?;

            if !answer.is_empty() {
                descriptor.set_spec(field.path, json!(answer));
            }
        }

        self.resolve_cfssl_datasource(&mut descriptor, flags)?;

        if flags.no_ssl {
            descriptor.set_spec("api.ssl", json!(false));
            descriptor.set_spec("vernemq.sslListener", json!(false));
        }

        DescriptorValidator::new().validate(&descriptor)?;
        Ok(descriptor)
    }

    /// A non-default CFSSL driver is useless without a datasource.
    fn resolve_cfssl_datasource(
        &self,
        descriptor: &mut ResourceDescriptor,
        flags: &DeployFlags,
    ) -> Result<()> {
        let Some(driver) = flags.for_path("cfssl.dbConfig.driver") else {
            return Ok(());
        };
        if driver == CFSSL_DEFAULT_DB_DRIVER
            || flags.for_path("cfssl.dbConfig.dataSource").is_some()
        {
            return Ok(());
        }

        let datasource = self.ask(
            "spec.cfssl.dbConfig.dataSource",
            "--cfssl-db-datasource",
            "Please enter the CFSSL Database Datasource:",
            "",
            false,
        )?;
        descriptor.set_spec("cfssl.dbConfig.dataSource", json!(datasource));
        Ok(())
    }

    fn ask(
        &self,
        field: &str,
        flag: &str,
        question: &str,
        default: &str,
        allow_empty: bool,
    ) -> Result<String> {
        if !self.prompter.is_interactive() && default.is_empty() && !allow_empty {
            return Err(AstarteError::missing_field(format!(
                "{} has no default and must be provided with {} in non-interactive mode",
                field, flag
            )));
        }

        let answer = self
            .prompter
            .prompt_choice(question, default, allow_empty)?
            .trim()
            .to_string();
        if answer.is_empty() && !allow_empty {
            return Err(AstarteError::missing_field(field.to_string()));
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_descriptor_shape() {
        let descriptor = ResourceDescriptor::empty();
        let value = descriptor.as_value();
        assert_eq!(value["apiVersion"], "api.astarte-platform.org/v1alpha1");
        assert_eq!(value["kind"], "Astarte");
        assert_eq!(
            value["metadata"]["annotations"]["astarte-platform.org/deployment-manager"],
            "astartectl"
        );
        assert!(descriptor.identity().is_err());
    }

    #[test]
    fn test_identity_requires_both_fields() {
        let mut descriptor = ResourceDescriptor::empty();
        descriptor.set_identity("astarte", "");
        assert!(matches!(
            descriptor.identity(),
            Err(AstarteError::MissingField(ref f)) if f == "metadata.namespace"
        ));

        descriptor.set_identity("astarte", "astarte");
        assert_eq!(descriptor.identity().unwrap(), ("astarte", "astarte"));
    }

    #[test]
    fn test_spec_accessors() {
        let mut descriptor = ResourceDescriptor::empty();
        descriptor.set_spec("cassandra.storage.size", json!("30Gi"));
        assert_eq!(
            descriptor.spec("cassandra.storage.size"),
            Some(&json!("30Gi"))
        );
        assert_eq!(descriptor.spec("cassandra.nodes"), None);
    }

    #[test]
    fn test_flag_overrides_order_and_blank_values() {
        let flags = DeployFlags {
            api_host: Some("api.example.com".to_string()),
            storage_class_name: Some("fast".to_string()),
            broker_host: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            flags.spec_overrides(),
            vec![("api.host", "api.example.com"), ("storageClassName", "fast")]
        );
        assert_eq!(flags.for_path("vernemq.host"), None);
    }

    struct TakeDefaults;

    impl Prompter for TakeDefaults {
        fn prompt_choice(&self, _: &str, default: &str, _: bool) -> Result<String> {
            Ok(default.to_string())
        }

        fn ask_confirmation(&self, _: &str) -> Result<bool> {
            Ok(true)
        }

        fn select(&self, question: &str, _: &[String]) -> Result<usize> {
            Err(AstarteError::missing_field(question))
        }

        fn is_interactive(&self) -> bool {
            false
        }
    }

    fn build(flags: &DeployFlags) -> Result<ResourceDescriptor> {
        let profile = crate::domain::profile::ProfileCatalogue::builtin()
            .get("basic")
            .cloned()
            .unwrap();
        let mut partial = ResourceDescriptor::empty();
        partial.set_spec_tree(profile.default_spec.clone());
        DescriptorBuilder::new(&TakeDefaults).build(
            &Version::new(1, 0, 0),
            &profile,
            partial,
            flags,
        )
    }

    #[test]
    fn test_cfssl_driver_requires_datasource() {
        let mut flags = DeployFlags {
            cfssl_db_driver: Some("postgres".to_string()),
            ..Default::default()
        };
        let err = build(&flags).unwrap_err();
        assert!(err.to_string().contains("--cfssl-db-datasource"));

        flags.cfssl_db_datasource = Some("postgres://cfssl@db/cfssl".to_string());
        let descriptor = build(&flags).unwrap();
        assert_eq!(
            descriptor.spec("cfssl.dbConfig.driver"),
            Some(&json!("postgres"))
        );
        assert_eq!(
            descriptor.spec("cfssl.dbConfig.dataSource"),
            Some(&json!("postgres://cfssl@db/cfssl"))
        );
    }

    #[test]
    fn test_identity_defaults_and_validation() {
        let descriptor = build(&DeployFlags::default()).unwrap();
        assert_eq!(descriptor.identity().unwrap(), ("astarte", "astarte"));
        assert_eq!(descriptor.spec("version"), Some(&json!("1.0.0")));

        let flags = DeployFlags {
            name: Some("Not_Valid".to_string()),
            ..Default::default()
        };
        assert!(matches!(build(&flags), Err(AstarteError::InvalidInput(_))));

        let flags = DeployFlags {
            vernemq_volume_size: Some("lots".to_string()),
            ..Default::default()
        };
        assert!(matches!(build(&flags), Err(AstarteError::InvalidInput(_))));
    }

    #[test]
    fn test_to_yaml_contains_identity() {
        let mut descriptor = ResourceDescriptor::empty();
        descriptor.set_identity("astarte", "astarte");
        let yaml = descriptor.to_yaml().unwrap();
        assert!(yaml.contains("kind: Astarte"));
        assert!(yaml.contains("name: astarte"));
    }
}
