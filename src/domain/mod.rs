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

//! Deployment and introspection domain

pub mod cluster;
pub mod config;
pub mod confirm;
pub mod descriptor;
pub mod flow;
pub mod profile;
pub mod prompt;
pub mod validator;
pub mod version;

pub use self::cluster::{
    ApplyReport, ClusterApplier, ClusterObject, InstanceStatus, StatusLookup, StatusResolver,
};
pub use self::config::AstartectlConf;
pub use self::confirm::{Confirmation, ConfirmationGate};
pub use self::descriptor::{DeployFlags, DescriptorBuilder, ResourceDescriptor};
pub use self::flow::{DeployFlow, DeployOutcome, DeployPhase, DeployState};
pub use self::profile::{Profile, ProfileCatalogue, ProfilePrompter};
pub use self::prompt::Prompter;
pub use self::validator::DescriptorValidator;
pub use self::version::{parse_version, ReleaseLister, VersionResolver};
