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

use crate::infrastructure::constants::{
    ANNOTATION_DEPLOYMENT_MANAGER, ANNOTATION_DEPLOYMENT_PROFILE, DEPLOYMENT_MANAGER,
    UNKNOWN_STATUS,
};
use crate::shared::path::{display_at, lookup_str};
use serde_json::Value;

/// An Astarte resource as returned by the cluster. Read-only; any part of
/// it, `status` in particular, may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterObject {
    raw: Value,
}

impl From<Value> for ClusterObject {
    fn from(raw: Value) -> Self {
        Self { raw }
    }
}

impl ClusterObject {
    pub fn name(&self) -> Option<&str> {
        lookup_str(&self.raw, &["metadata", "name"])
    }

    pub fn namespace(&self) -> Option<&str> {
        lookup_str(&self.raw, &["metadata", "namespace"])
    }

    pub fn creation_timestamp(&self) -> Option<&str> {
        lookup_str(&self.raw, &["metadata", "creationTimestamp"])
    }

    /// `spec.version` as written, not re-parsed.
    pub fn declared_version(&self) -> String {
        display_at(&self.raw, &["spec", "version"])
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn matches(&self, name: &str, namespace: &str) -> bool {
        self.name() == Some(name) && self.namespace() == Some(namespace)
    }
}

/// What the operator and the deploying tool recorded about an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedStatus {
    pub operator_status: String,
    pub deployment_manager: String,
    pub deployment_profile: String,
}

/// Read the operator health and the deployment tags of an object.
///
/// The operator fills in `status` asynchronously, so it is often absent
/// right after a deploy. Missing values come back as `"unknown"` for the
/// operator status and empty strings for the tags.
pub fn managed_resource_status(object: &ClusterObject) -> ManagedStatus {
    let raw = object.raw();
    let operator_status = lookup_str(raw, &["status", "health"])
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_STATUS)
        .to_string();
    let annotation = |key: &str| {
        lookup_str(raw, &["metadata", "annotations", key])
            .unwrap_or_default()
            .to_string()
    };

    ManagedStatus {
        operator_status,
        deployment_manager: annotation(ANNOTATION_DEPLOYMENT_MANAGER),
        deployment_profile: annotation(ANNOTATION_DEPLOYMENT_PROFILE),
    }
}

/// The fields shown for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceStatus {
    pub name: String,
    pub namespace: String,
    pub version: String,
    pub operator_status: String,
    pub deployment_manager: String,
    pub deployment_profile: String,
    pub created_at: Option<String>,
}

impl InstanceStatus {
    pub fn from_object(object: &ClusterObject) -> Self {
        let managed = managed_resource_status(object);
        Self {
            name: object.name().unwrap_or_default().to_string(),
            namespace: object.namespace().unwrap_or_default().to_string(),
            version: object.declared_version(),
            operator_status: managed.operator_status,
            deployment_manager: managed.deployment_manager,
            deployment_profile: managed.deployment_profile,
            created_at: object.creation_timestamp().map(str::to_string),
        }
    }

    pub fn is_managed(&self) -> bool {
        self.deployment_manager == DEPLOYMENT_MANAGER
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLookup {
    Found(InstanceStatus),
    NotFound { name: String, namespace: String },
}

pub struct StatusResolver;

impl StatusResolver {
    /// Linear scan for the object with the given identity.
    pub fn resolve(objects: &[ClusterObject], name: &str, namespace: &str) -> StatusLookup {
        match objects.iter().find(|o| o.matches(name, namespace)) {
            Some(object) => StatusLookup::Found(InstanceStatus::from_object(object)),
            None => StatusLookup::NotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
        }
    }
}
