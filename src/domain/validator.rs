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
use crate::shared::error::{AstarteError, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const RFC1123_LABEL: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";
const QUANTITY: &str = r"^[0-9]+(\.[0-9]+)?(Ki|Mi|Gi|Ti|Pi|Ei|m|k|M|G|T|P|E)?$";
const MAX_LABEL_LENGTH: usize = 63;

static LABEL_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(RFC1123_LABEL));
static QUANTITY_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(QUANTITY));

fn compiled(
    re: &'static LazyLock<std::result::Result<Regex, regex::Error>>,
    what: &str,
) -> Result<&'static Regex> {
    re.as_ref()
        .map_err(|e| AstarteError::config_error(format!("invalid {} pattern: {}", what, e)))
}

const VOLUME_SIZE_PATHS: [&str; 4] = [
    "cassandra.storage.size",
    "cfssl.storage.size",
    "rabbitmq.storage.size",
    "vernemq.storage.size",
];

/// Checks the parts of a descriptor this tool is responsible for: the
/// instance identity and the volume sizes it may have been given.
pub struct DescriptorValidator;

impl Default for DescriptorValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, descriptor: &ResourceDescriptor) -> Result<()> {
        let (name, namespace) = descriptor.identity()?;
        self.validate_label("name", name)?;
        self.validate_label("namespace", namespace)?;

        for path in VOLUME_SIZE_PATHS {
            match descriptor.spec(path) {
                None | Some(Value::Null) => {}
                Some(Value::String(size)) => self.validate_quantity(path, size)?,
                Some(other) => {
                    return Err(AstarteError::invalid_input(format!(
                        "spec.{} must be a quantity string, got {}",
                        path, other
                    )))
                }
            }
        }

        Ok(())
    }

    pub fn validate_label(&self, what: &str, value: &str) -> Result<()> {
        let re = compiled(&LABEL_RE, "label")?;

        if value.len() > MAX_LABEL_LENGTH || !re.is_match(value) {
            return Err(AstarteError::invalid_input(format!(
                "{} '{}' must be a valid RFC 1123 label: at most {} lowercase alphanumeric \
                 characters or '-', starting and ending with an alphanumeric character",
                what, value, MAX_LABEL_LENGTH
            )));
        }
        Ok(())
    }

    pub fn validate_quantity(&self, path: &str, value: &str) -> Result<()> {
        let re = compiled(&QUANTITY_RE, "quantity")?;

        if !re.is_match(value) {
            return Err(AstarteError::invalid_input(format!(
                "spec.{} '{}' is not a valid Kubernetes quantity (e.g. 30Gi)",
                path, value
            )));
        }
        Ok(())
    }
}
