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
use crate::domain::prompt::Prompter;
use crate::shared::error::Result;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    /// The user said no. A normal outcome, not an error.
    Declined,
}

/// Last stop before the cluster is touched.
pub struct ConfirmationGate<'a> {
    prompter: &'a dyn Prompter,
    non_interactive: bool,
}

impl<'a> ConfirmationGate<'a> {
    pub fn new(prompter: &'a dyn Prompter, non_interactive: bool) -> Self {
        Self {
            prompter,
            non_interactive,
        }
    }

    pub fn summary(descriptor: &ResourceDescriptor) -> Result<String> {
        let (name, namespace) = descriptor.identity()?;
        Ok(format!(
            "Your Astarte instance \"{}\" will be deployed in namespace \"{}\".",
            name, namespace
        ))
    }

    /// Show the descriptor and ask for a go-ahead. Non-interactive mode
    /// prints the summary and always proceeds without consulting the prompter.
    pub fn confirm(
        &self,
        descriptor: &ResourceDescriptor,
        out: &mut dyn Write,
    ) -> Result<Confirmation> {
        let summary = Self::summary(descriptor)?;

        if self.non_interactive {
            writeln!(out, "{}", summary)?;
            return Ok(Confirmation::Proceed);
        }

        writeln!(out)?;
        writeln!(out, "Your Astarte instance is ready to be deployed!")?;

        if self
            .prompter
            .ask_confirmation("Do you wish to review the configuration before deployment?")?
        {
            writeln!(out, "{}", descriptor.to_yaml()?)?;
        }

        let question = format!("{} Do you want to continue?", summary);
        if self.prompter.ask_confirmation(&question)? {
            Ok(Confirmation::Proceed)
        } else {
            Ok(Confirmation::Declined)
        }
    }
}
