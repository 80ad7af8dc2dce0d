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

//! Optional path lookups over loosely-typed JSON documents.
//!
//! Cluster objects come back as arbitrary nested maps. Any level may be
//! missing or have an unexpected type, so every accessor here returns
//! `None` instead of failing.

use serde_json::{Map, Value};

/// Follow `path` through nested objects. `None` if any segment is absent
/// or an intermediate value is not an object.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |current, segment| current.as_object()?.get(*segment))
}

/// Like [`lookup`], but with a dotted path such as `"spec.api.host"`.
pub fn lookup_dotted<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments: Vec<&str> = path.split('.').collect();
    lookup(root, &segments)
}

/// String at `path`, or `None` when absent or not a string.
pub fn lookup_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(root, path).and_then(Value::as_str)
}

/// Render whatever sits at `path` for display. Strings are returned
/// verbatim, other scalars via their JSON form, absence as an empty string.
pub fn display_at(root: &Value, path: &[&str]) -> String {
    match lookup(root, path) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Set `value` at the dotted `path`, creating intermediate objects as needed.
/// A non-object value found on the way is replaced by an object.
pub fn set_dotted(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return,
        };
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert(last.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_present_and_absent() {
        let doc = json!({"status": {"health": "green"}, "spec": {"version": "1.0.0"}});
        assert_eq!(lookup_str(&doc, &["status", "health"]), Some("green"));
        assert_eq!(lookup(&doc, &["status", "missing"]), None);
        assert_eq!(lookup(&doc, &["nothing", "here"]), None);
    }

    #[test]
    fn test_lookup_through_non_object() {
        let doc = json!({"status": "pending"});
        assert_eq!(lookup(&doc, &["status", "health"]), None);
        assert_eq!(lookup_str(&doc, &["status"]), Some("pending"));
    }

    #[test]
    fn test_display_at() {
        let doc = json!({"spec": {"version": "1.0.0", "replicas": 3, "empty": null}});
        assert_eq!(display_at(&doc, &["spec", "version"]), "1.0.0");
        assert_eq!(display_at(&doc, &["spec", "replicas"]), "3");
        assert_eq!(display_at(&doc, &["spec", "empty"]), "");
        assert_eq!(display_at(&doc, &["spec", "absent"]), "");
    }

    #[test]
    fn test_set_dotted_creates_intermediate_objects() {
        let mut doc = json!({});
        set_dotted(&mut doc, "spec.cassandra.storage.size", json!("30Gi"));
        set_dotted(&mut doc, "spec.cassandra.deploy", json!(true));
        assert_eq!(
            doc,
            json!({"spec": {"cassandra": {"deploy": true, "storage": {"size": "30Gi"}}}})
        );
        assert_eq!(
            lookup_dotted(&doc, "spec.cassandra.storage.size"),
            Some(&json!("30Gi"))
        );
    }

    #[test]
    fn test_set_dotted_replaces_scalar() {
        let mut doc = json!({"api": "legacy"});
        set_dotted(&mut doc, "api.host", json!("api.example.com"));
        assert_eq!(doc, json!({"api": {"host": "api.example.com"}}));
    }
}
