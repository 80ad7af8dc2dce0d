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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, AstarteError>;

/// Coarse classification used to decide how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing user input. Fatal.
    Input,
    /// An external collaborator (release listing, prompting, serialization) failed. Fatal.
    Collaborator,
    /// The cluster rejected or failed a request. Fatal, never retried.
    Cluster,
    /// The requested instance does not exist. Informational.
    NotFound,
}

#[derive(Error, Debug)]
pub enum AstarteError {
    #[error("{0} is not a valid Astarte version")]
    InvalidVersion(String),

    #[error("Missing required value: {0}")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Could not list Astarte releases: {0}")]
    ReleaseListing(String),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Resource already exists: {resource_type} '{name}' in namespace '{namespace}'")]
    AlreadyExists {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for AstarteError {
    /// 409 and 404 API responses keep their meaning. The identity is taken
    /// from the API message (`<resource> "<name>" already exists`), the
    /// namespace is not part of it.
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 409 || ae.code == 404 => {
                let (resource_type, name) = split_api_message(&ae.message);
                if ae.code == 409 {
                    AstarteError::already_exists(resource_type, name, "")
                } else {
                    AstarteError::not_found(resource_type, name, "")
                }
            }
            kube::Error::Api(ae) => AstarteError::KubeError(format!("{} ({})", ae.message, ae.reason)),
            other => AstarteError::KubeError(other.to_string()),
        }
    }
}

fn split_api_message(message: &str) -> (String, String) {
    let mut parts = message.splitn(3, '"');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(resource), Some(name), Some(_)) => (resource.trim().to_string(), name.to_string()),
        _ => ("resource".to_string(), message.to_string()),
    }
}

impl From<reqwest::Error> for AstarteError {
    fn from(err: reqwest::Error) -> Self {
        AstarteError::ReleaseListing(err.to_string())
    }
}

impl AstarteError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid_input(context: impl Into<String>) -> Self {
        Self::InvalidInput(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn already_exists(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Like the `From` conversion, but 409 and 404 carry the identity the
    /// caller was operating on.
    pub fn from_kube(
        err: kube::Error,
        resource_type: &str,
        name: &str,
        namespace: &str,
    ) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 409 => {
                Self::already_exists(resource_type, name, namespace)
            }
            kube::Error::Api(ae) if ae.code == 404 => Self::not_found(resource_type, name, namespace),
            other => other.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidVersion(_)
            | Self::MissingField(_)
            | Self::InvalidInput(_)
            | Self::ConfigError(_)
            | Self::TomlParse(_) => ErrorKind::Input,
            Self::ReleaseListing(_)
            | Self::Profile(_)
            | Self::Prompt(_)
            | Self::Io(_)
            | Self::YamlParse(_)
            | Self::JsonParse(_) => ErrorKind::Collaborator,
            Self::KubeError(_) | Self::AlreadyExists { .. } => ErrorKind::Cluster,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}
