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
    ASTARTE_API_VERSION, ASTARTE_GROUP, ASTARTE_KIND, ASTARTE_PLURAL, ASTARTE_VERSION,
};
use crate::shared::error::{AstarteError, Result};
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{DynamicObject, ListParams, PostParams};
use kube::discovery::ApiResource;
use kube::{Api, Client};
use serde_json::Value;
use tracing::debug;

/// Cluster operations needed to deploy and inspect Astarte instances.
///
/// Every call is a single blocking round trip. Nothing is retried.
#[async_trait::async_trait]
pub trait AstarteKubeClient: Send + Sync {
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    async fn create_namespace(&self, name: &str) -> Result<()>;

    /// Create (never upsert) an Astarte resource. An existing identity is
    /// reported as [`AstarteError::AlreadyExists`].
    async fn create_astarte(&self, namespace: &str, resource: &Value) -> Result<()>;

    /// All Astarte resources across namespaces, as raw JSON objects.
    async fn list_astartes(&self) -> Result<Vec<Value>>;
}

pub fn astarte_api_resource() -> ApiResource {
    ApiResource {
        group: ASTARTE_GROUP.to_string(),
        version: ASTARTE_VERSION.to_string(),
        api_version: ASTARTE_API_VERSION.to_string(),
        kind: ASTARTE_KIND.to_string(),
        plural: ASTARTE_PLURAL.to_string(),
    }
}

pub struct AstarteKubeClientImpl {
    client: Client,
}

impl AstarteKubeClientImpl {
    pub async fn new() -> Result<Self> {
        let client = Client::try_default().await.map_err(|e| {
            AstarteError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }

    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            return Self::new().await;
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path).map_err(|e| {
                AstarteError::KubeError(format!("Failed to load kubeconfig: {}", e))
            })?
        } else {
            Kubeconfig::read().map_err(|e| {
                AstarteError::KubeError(format!("Failed to load kubeconfig: {}", e))
            })?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                AstarteError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            AstarteError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl AstarteKubeClient for AstarteKubeClientImpl {
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    async fn create_namespace(&self, name: &str) -> Result<()> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        api.create(&PostParams::default(), &namespace)
            .await
            .map_err(|e| AstarteError::from_kube(e, "Namespace", name, ""))?;
        debug!(namespace = name, "namespace created");
        Ok(())
    }

    async fn create_astarte(&self, namespace: &str, resource: &Value) -> Result<()> {
        let api_resource = astarte_api_resource();
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &api_resource);
        let object: DynamicObject = serde_json::from_value(resource.clone())?;
        let name = object.metadata.name.clone().unwrap_or_default();

        api.create(&PostParams::default(), &object)
            .await
            .map_err(|e| AstarteError::from_kube(e, ASTARTE_KIND, &name, namespace))?;
        debug!(name = %name, namespace, "Astarte resource created");
        Ok(())
    }

    async fn list_astartes(&self) -> Result<Vec<Value>> {
        let api_resource = astarte_api_resource();
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &api_resource);
        let list = api.list(&ListParams::default()).await?;

        list.items
            .iter()
            .map(|object| serde_json::to_value(object).map_err(AstarteError::from))
            .collect()
    }
}
