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

//! In-memory collaborators for driving the deploy and show paths.

#![allow(dead_code)]

use astartectl::domain::prompt::Prompter;
use astartectl::domain::version::ReleaseLister;
use astartectl::infrastructure::kubernetes::AstarteKubeClient;
use astartectl::{AstarteError, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct ClusterState {
    namespaces: Vec<String>,
    resources: Vec<Value>,
    calls: Vec<String>,
}

/// A cluster kept in memory. Creating an existing resource fails the way
/// the API server does.
#[derive(Debug, Default)]
pub struct FakeKubeClient {
    state: Mutex<ClusterState>,
    fail_create_astarte: bool,
    fail_create_namespace: bool,
    fail_list_namespaces: bool,
    fail_list_astartes: bool,
}

impl FakeKubeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespaces(namespaces: &[&str]) -> Self {
        let client = Self::default();
        client.state.lock().unwrap().namespaces =
            namespaces.iter().map(|ns| ns.to_string()).collect();
        client
    }

    pub fn with_resources(resources: Vec<Value>) -> Self {
        let client = Self::default();
        client.state.lock().unwrap().resources = resources;
        client
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create_astarte = true;
        self
    }

    pub fn failing_namespace_create(mut self) -> Self {
        self.fail_create_namespace = true;
        self
    }

    pub fn failing_namespace_list(mut self) -> Self {
        self.fail_list_namespaces = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list_astartes = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.state.lock().unwrap().namespaces.clone()
    }

    pub fn resources(&self) -> Vec<Value> {
        self.state.lock().unwrap().resources.clone()
    }
}

fn identity(resource: &Value) -> (String, String) {
    let field = |key: &str| {
        resource["metadata"][key]
            .as_str()
            .unwrap_or_default()
            .to_string()
    };
    (field("name"), field("namespace"))
}

#[async_trait::async_trait]
impl AstarteKubeClient for FakeKubeClient {
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_namespaces".to_string());
        if self.fail_list_namespaces {
            return Err(AstarteError::KubeError("namespaces is forbidden".to_string()));
        }
        Ok(state.namespaces.clone())
    }

    async fn create_namespace(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_namespace:{}", name));
        if self.fail_create_namespace {
            return Err(AstarteError::KubeError("forbidden".to_string()));
        }
        state.namespaces.push(name.to_string());
        Ok(())
    }

    async fn create_astarte(&self, namespace: &str, resource: &Value) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let (name, _) = identity(resource);
        state
            .calls
            .push(format!("create_astarte:{}/{}", namespace, name));

        if self.fail_create_astarte {
            return Err(AstarteError::KubeError("admission webhook denied the request".to_string()));
        }
        if state
            .resources
            .iter()
            .any(|r| identity(r) == (name.clone(), namespace.to_string()))
        {
            return Err(AstarteError::already_exists("Astarte", name, namespace));
        }
        state.resources.push(resource.clone());
        Ok(())
    }

    async fn list_astartes(&self) -> Result<Vec<Value>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_astartes".to_string());
        if self.fail_list_astartes {
            return Err(AstarteError::KubeError(
                "the server could not find the requested resource".to_string(),
            ));
        }
        Ok(state.resources.clone())
    }
}

/// Returns a fixed release, or fails.
pub struct FakeReleaseLister {
    latest: std::result::Result<String, String>,
}

impl FakeReleaseLister {
    pub fn latest(version: &str) -> Self {
        Self {
            latest: Ok(version.to_string()),
        }
    }

    pub fn offline() -> Self {
        Self {
            latest: Err("connection refused".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl ReleaseLister for FakeReleaseLister {
    async fn latest_stable(&self) -> Result<String> {
        self.latest
            .clone()
            .map_err(AstarteError::ReleaseListing)
    }
}

/// An interactive user reading from a script. Text questions with no
/// scripted answer (or an empty one) take the default.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    confirmations: Mutex<VecDeque<bool>>,
    selections: Mutex<VecDeque<usize>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answers(self, answers: &[&str]) -> Self {
        *self.answers.lock().unwrap() = answers.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn confirmations(self, confirmations: &[bool]) -> Self {
        *self.confirmations.lock().unwrap() = confirmations.iter().copied().collect();
        self
    }

    pub fn selections(self, selections: &[usize]) -> Self {
        *self.selections.lock().unwrap() = selections.iter().copied().collect();
        self
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt_choice(&self, question: &str, default: &str, _allow_empty: bool) -> Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Ok(default.to_string()),
        }
    }

    fn ask_confirmation(&self, question: &str) -> Result<bool> {
        self.questions.lock().unwrap().push(question.to_string());
        self.confirmations
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AstarteError::Prompt(format!("unexpected confirmation: {}", question)))
    }

    fn select(&self, question: &str, _options: &[String]) -> Result<usize> {
        self.questions.lock().unwrap().push(question.to_string());
        self.selections
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AstarteError::Prompt(format!("unexpected selection: {}", question)))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
