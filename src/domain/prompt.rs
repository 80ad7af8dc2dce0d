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

use crate::shared::error::Result;

/// Interactive primitives used while resolving a deployment.
///
/// The terminal implementation lives in `cli::prompt`; the non-interactive
/// one answers every question with its default.
pub trait Prompter {
    /// Ask a free-form question. `default` is offered and returned on an
    /// empty answer. An empty result is only accepted when `allow_empty`.
    fn prompt_choice(&self, question: &str, default: &str, allow_empty: bool) -> Result<String>;

    /// Yes/no question.
    fn ask_confirmation(&self, question: &str) -> Result<bool>;

    /// Pick one of `options`, returning its index.
    fn select(&self, question: &str, options: &[String]) -> Result<usize>;

    fn is_interactive(&self) -> bool;
}
