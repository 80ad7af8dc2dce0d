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

//! The deploy path as an explicit state machine:
//! `Resolving -> Building -> AwaitingConfirmation -> Applying -> Done`,
//! with `Aborted` (user declined) and `Failed` as the other terminal states.

use crate::domain::cluster::applier::{ApplyReport, ClusterApplier};
use crate::domain::confirm::{Confirmation, ConfirmationGate};
use crate::domain::descriptor::{DeployFlags, DescriptorBuilder, ResourceDescriptor};
use crate::domain::profile::{ProfileCatalogue, ProfilePrompter};
use crate::domain::prompt::Prompter;
use crate::domain::version::{ReleaseLister, VersionResolver};
use crate::infrastructure::constants::{DEFAULT_INSTANCE_NAME, DEFAULT_NAMESPACE};
use crate::infrastructure::kubernetes::client::AstarteKubeClient;
use crate::shared::error::{AstarteError, Result};
use semver::Version;
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Resolving,
    Building,
    AwaitingConfirmation,
    Applying,
    Done,
    Aborted,
    Failed,
}

#[derive(Debug)]
pub enum DeployState {
    Resolving,
    Building(Version),
    AwaitingConfirmation(ResourceDescriptor),
    Applying(ResourceDescriptor),
    Done(ApplyReport),
    Aborted,
    Failed {
        phase: DeployPhase,
        error: AstarteError,
    },
}

impl DeployState {
    pub fn phase(&self) -> DeployPhase {
        match self {
            Self::Resolving => DeployPhase::Resolving,
            Self::Building(_) => DeployPhase::Building,
            Self::AwaitingConfirmation(_) => DeployPhase::AwaitingConfirmation,
            Self::Applying(_) => DeployPhase::Applying,
            Self::Done(_) => DeployPhase::Done,
            Self::Aborted => DeployPhase::Aborted,
            Self::Failed { .. } => DeployPhase::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Aborted | Self::Failed { .. })
    }

    /// Collapse a terminal state into a result. `Aborted` is a success.
    pub fn into_result(self) -> Result<DeployOutcome> {
        match self {
            Self::Done(report) => Ok(DeployOutcome::Deployed(report)),
            Self::Aborted => Ok(DeployOutcome::Aborted),
            Self::Failed { error, .. } => Err(error),
            other => Err(AstarteError::invalid_input(format!(
                "deploy flow stopped in non-terminal phase {:?}",
                other.phase()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed(ApplyReport),
    Aborted,
}

pub struct DeployFlow<'a> {
    releases: &'a dyn ReleaseLister,
    catalogue: &'a ProfileCatalogue,
    prompter: &'a dyn Prompter,
    client: &'a dyn AstarteKubeClient,
    default_name: String,
    default_namespace: String,
    history: Vec<DeployPhase>,
}

impl<'a> DeployFlow<'a> {
    pub fn new(
        releases: &'a dyn ReleaseLister,
        catalogue: &'a ProfileCatalogue,
        prompter: &'a dyn Prompter,
        client: &'a dyn AstarteKubeClient,
    ) -> Self {
        Self {
            releases,
            catalogue,
            prompter,
            client,
            default_name: DEFAULT_INSTANCE_NAME.to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            history: Vec::new(),
        }
    }

    pub fn with_identity_defaults(mut self, name: String, namespace: String) -> Self {
        self.default_name = name;
        self.default_namespace = namespace;
        self
    }

    /// Phases visited by the last `run`, terminal phase included.
    pub fn history(&self) -> &[DeployPhase] {
        &self.history
    }

    /// Drive the flow to a terminal state.
    pub async fn run(
        &mut self,
        flags: &DeployFlags,
        non_interactive: bool,
        out: &mut dyn Write,
    ) -> DeployState {
        self.history.clear();
        let mut state = DeployState::Resolving;

        loop {
            self.history.push(state.phase());
            if state.is_terminal() {
                return state;
            }

            let phase = state.phase();
            debug!(?phase, "deploy flow step");
            state = match self.step(state, flags, non_interactive, out).await {
                Ok(next) => next,
                Err(error) => DeployState::Failed { phase, error },
            };
        }
    }

    async fn step(
        &self,
        state: DeployState,
        flags: &DeployFlags,
        non_interactive: bool,
        out: &mut dyn Write,
    ) -> Result<DeployState> {
        match state {
            DeployState::Resolving => {
                let version = VersionResolver::new(self.releases, self.prompter)
                    .resolve(flags.version.as_deref())
                    .await?;
                Ok(DeployState::Building(version))
            }
            DeployState::Building(version) => {
                let (profile, partial) = ProfilePrompter::new(self.catalogue, self.prompter)
                    .prompt(&version, flags.profile.as_deref())?;
                let descriptor = DescriptorBuilder::new(self.prompter)
                    .with_identity_defaults(
                        self.default_name.clone(),
                        self.default_namespace.clone(),
                    )
                    .build(&version, &profile, partial, flags)?;
                Ok(DeployState::AwaitingConfirmation(descriptor))
            }
            DeployState::AwaitingConfirmation(descriptor) => {
                match ConfirmationGate::new(self.prompter, non_interactive)
                    .confirm(&descriptor, out)?
                {
                    Confirmation::Proceed => Ok(DeployState::Applying(descriptor)),
                    Confirmation::Declined => Ok(DeployState::Aborted),
                }
            }
            DeployState::Applying(descriptor) => {
                let report = ClusterApplier::new(self.client)
                    .apply(&descriptor, out)
                    .await?;
                Ok(DeployState::Done(report))
            }
            terminal => Ok(terminal),
        }
    }
}
