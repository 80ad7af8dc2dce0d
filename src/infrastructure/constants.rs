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

/// Astarte custom resource coordinates
pub const ASTARTE_GROUP: &str = "api.astarte-platform.org";
pub const ASTARTE_VERSION: &str = "v1alpha1";
pub const ASTARTE_API_VERSION: &str = "api.astarte-platform.org/v1alpha1";
pub const ASTARTE_KIND: &str = "Astarte";
pub const ASTARTE_PLURAL: &str = "astartes";

/// Annotations written by deploy and read back by show/list
pub const ANNOTATION_DEPLOYMENT_MANAGER: &str = "astarte-platform.org/deployment-manager";
pub const ANNOTATION_DEPLOYMENT_PROFILE: &str = "astarte-platform.org/deployment-profile";

/// Value of the deployment-manager annotation for instances this tool created
pub const DEPLOYMENT_MANAGER: &str = "astartectl";

/// Identity defaults
pub const DEFAULT_INSTANCE_NAME: &str = "astarte";
pub const DEFAULT_NAMESPACE: &str = "astarte";

/// Release listing
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/astarte-platform/astarte/releases";
pub const RELEASES_USER_AGENT: &str = "astartectl";

/// Configuration file environment variable
pub const CONF_FILE_ENV: &str = "ASTARTECTL_CONF_FILE";

/// CFSSL database driver that needs no datasource
pub const CFSSL_DEFAULT_DB_DRIVER: &str = "sqlite3";

/// Operator-reported status placeholder when the status sub-tree is missing
pub const UNKNOWN_STATUS: &str = "unknown";
