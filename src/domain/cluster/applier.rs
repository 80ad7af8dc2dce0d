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

use crate::domain::descriptor::ResourceDescriptor;
use crate::infrastructure::kubernetes::client::AstarteKubeClient;
use crate::shared::error::{AstarteError, Result};
use std::io::Write;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub name: String,
    pub namespace: String,
    pub namespace_created: bool,
}

/// Realizes a descriptor in the cluster: namespace first, then a create of
/// the Astarte resource.
///
/// There is no update path and no rollback. If the create fails after the
/// namespace was created, the namespace stays; a later run reuses it.
pub struct ClusterApplier<'a> {
    client: &'a dyn AstarteKubeClient,
}

impl<'a> ClusterApplier<'a> {
    pub fn new(client: &'a dyn AstarteKubeClient) -> Self {
        Self { client }
    }

    pub async fn apply(
        &self,
        descriptor: &ResourceDescriptor,
        out: &mut dyn Write,
    ) -> Result<ApplyReport> {
        let (name, namespace) = descriptor.identity()?;

        let namespace_created = self.ensure_namespace(namespace, out).await?;

        if let Err(e) = self
            .client
            .create_astarte(namespace, descriptor.as_value())
            .await
        {
            if namespace_created {
                warn!(
                    namespace,
                    "namespace was created but the Astarte resource was not; leaving it in place"
                );
            }
            return Err(e);
        }
        info!(name, namespace, "Astarte resource created");

        Ok(ApplyReport {
            name: name.to_string(),
            namespace: namespace.to_string(),
            namespace_created,
        })
    }

    /// Returns whether the namespace had to be created.
    async fn ensure_namespace(&self, namespace: &str, out: &mut dyn Write) -> Result<bool> {
        let existing = self.client.list_namespaces().await?;
        if existing.iter().any(|ns| ns == namespace) {
            return Ok(false);
        }

        writeln!(out, "Namespace {} does not exist, creating it...", namespace)?;
        self.client
            .create_namespace(namespace)
            .await
            .map_err(|e| match e {
                AstarteError::KubeError(msg) => {
                    AstarteError::KubeError(format!("Could not create namespace {}: {}", namespace, msg))
                }
                other => other,
            })?;
        info!(namespace, "namespace created");
        Ok(true)
    }
}
