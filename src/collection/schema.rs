// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw collection document shape
//!
//! Mirrors the JSON file as written by the user. Every optional field has a
//! serde default so that a partial document deserializes into a fully
//! populated structure; deserialization failures are shape errors.

use super::{ContentType, Method};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFile {
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub shared: BTreeMap<String, SharedGroupInput>,

    #[serde(default)]
    pub operations: BTreeMap<String, OperationInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedGroupInput {
    #[serde(default)]
    pub query: Vec<ParamInput>,

    #[serde(default)]
    pub headers: Vec<ParamInput>,

    #[serde(default)]
    pub body: Vec<ParamInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInput {
    pub path: String,

    pub method: Method,

    #[serde(default)]
    pub content_type: Option<ContentType>,

    #[serde(default, rename = "use")]
    pub uses: Vec<String>,

    /// Any JSON value; strings are taken as raw template text.
    #[serde(default)]
    pub body_template: Option<serde_json::Value>,

    #[serde(default)]
    pub params: OperationParamsInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationParamsInput {
    #[serde(default)]
    pub path: Vec<ParamInput>,

    #[serde(default)]
    pub headers: Vec<ParamInput>,

    #[serde(default)]
    pub query: Vec<ParamInput>,

    #[serde(default)]
    pub body: Vec<ParamInput>,
}

/// A params list entry: either a bare name or a detailed definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParamInput {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        default: Option<String>,
    },
}

/// Parse the raw text into the document shape.
pub fn parse_document(data: &str) -> Result<CollectionFile, serde_json::Error> {
    serde_json::from_str(data)
}

/// Falsy template values (`null`, `false`, `0`, `""`) count as no template.
pub fn has_body_template(value: &Option<serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(serde_json::Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(_) => true,
    }
}
