// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collection model and configuration parser

pub mod schema;

use crate::error::ApiCliError;
use regex::Regex;
use schema::{CollectionFile, OperationInput, ParamInput};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

/// A named set of operations sharing a base URL
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub operations: BTreeMap<String, Operation>,
}

impl Collection {
    /// Look up an operation, reporting every available name when absent.
    pub fn operation(&self, name: &str) -> Result<&Operation, ApiCliError> {
        self.operations
            .get(name)
            .ok_or_else(|| ApiCliError::OperationNotFound {
                operation: name.to_string(),
                available: self.operation_names(),
            })
    }

    pub fn operation_names(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    /// Base URL followed by the path; may still contain `{param}` tokens.
    pub url: String,
    pub method: Method,
    pub content_type: Option<ContentType>,
    /// Canonical template text used for placeholder substitution.
    pub body_template: Option<String>,
    pub params: Vec<ParamDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDefinition {
    pub name: String,
    pub location: ParamLocation,
    pub optional: bool,
    pub default: Option<String>,
}

impl ParamDefinition {
    /// A bare definition: required, no default.
    pub fn required(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            location,
            optional: false,
            default: None,
        }
    }

    /// Needs a value from some source before the request can be built.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ContentType {
    #[serde(rename = "application/x-www-form-urlencoded")]
    FormUrlEncoded,
    #[serde(rename = "application/json")]
    Json,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::FormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::Json => "application/json",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Path,
    Headers,
    Query,
    Body,
}

fn path_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("valid path placeholder pattern"))
}

// Whitespace and quotes are excluded so JSON object braces never match.
fn body_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\{([^{}\s"]+)\}"#).expect("valid body placeholder pattern"))
}

/// Parse a raw collection document into the normalized model.
pub fn parse_collection_config(collection_name: &str, data: &str) -> Result<Collection, ApiCliError> {
    let document = schema::parse_document(data)
        .map_err(|e| ApiCliError::config_validation(collection_name, e.to_string()))?;

    let mut operations = BTreeMap::new();
    for (name, input) in &document.operations {
        let operation = build_operation(collection_name, &document, name, input)?;
        tracing::debug!(
            collection = collection_name,
            operation = %name,
            params = operation.params.len(),
            "parsed operation"
        );
        operations.insert(name.clone(), operation);
    }

    Ok(Collection {
        name: collection_name.to_string(),
        description: document.description,
        base_url: document.base_url,
        operations,
    })
}

fn build_operation(
    collection_name: &str,
    document: &CollectionFile,
    name: &str,
    input: &OperationInput,
) -> Result<Operation, ApiCliError> {
    let mut params = infer_params(
        &input.path,
        path_placeholder(),
        &input.params.path,
        ParamLocation::Path,
    );

    for group_name in &input.uses {
        let group = document.shared.get(group_name).ok_or_else(|| {
            ApiCliError::config_validation(
                collection_name,
                format!("operation \"{name}\" uses undefined shared group \"{group_name}\""),
            )
        })?;
        params.extend(parse_params(&group.headers, ParamLocation::Headers));
        params.extend(parse_params(&group.query, ParamLocation::Query));
        params.extend(parse_params(&group.body, ParamLocation::Body));
    }

    params.extend(parse_params(&input.params.headers, ParamLocation::Headers));
    params.extend(parse_params(&input.params.query, ParamLocation::Query));

    let body_template = render_body_template(collection_name, input)?;
    match &body_template {
        Some(template) => {
            let inferred = infer_params(
                template,
                body_placeholder(),
                &input.params.body,
                ParamLocation::Body,
            );
            // Declared body params that no placeholder claims keep their own slot.
            let own = parse_params(&input.params.body, ParamLocation::Body)
                .into_iter()
                .filter(|param| !inferred.iter().any(|p| p.name == param.name));
            params.extend(own);
            params.extend(inferred);
        }
        None => params.extend(parse_params(&input.params.body, ParamLocation::Body)),
    }

    ensure_unique_names(collection_name, name, &params)?;

    let content_type = input
        .content_type
        .or_else(|| body_template.as_ref().map(|_| ContentType::Json));

    Ok(Operation {
        name: name.to_string(),
        url: format!("{}{}", document.base_url, input.path),
        method: input.method,
        content_type,
        body_template,
        params,
    })
}

fn parse_params(inputs: &[ParamInput], location: ParamLocation) -> Vec<ParamDefinition> {
    inputs
        .iter()
        .map(|input| match input {
            ParamInput::Name(name) => ParamDefinition::required(name.clone(), location),
            ParamInput::Detailed {
                name,
                optional,
                default,
            } => ParamDefinition {
                name: name.clone(),
                location,
                optional: *optional,
                default: default.clone(),
            },
        })
        .collect()
}

/// Scan `text` for placeholders in first-occurrence order, substituting any
/// explicitly declared definition of the same name in place.
fn infer_params(
    text: &str,
    pattern: &Regex,
    declared: &[ParamInput],
    location: ParamLocation,
) -> Vec<ParamDefinition> {
    let declared = parse_params(declared, location);
    let overrides: HashMap<&str, &ParamDefinition> =
        declared.iter().map(|param| (param.name.as_str(), param)).collect();

    let mut seen = HashSet::new();
    let mut params = Vec::new();
    for capture in pattern.captures_iter(text) {
        let name = &capture[1];
        if !seen.insert(name.to_string()) {
            continue;
        }
        let param = overrides
            .get(name)
            .map(|param| (*param).clone())
            .unwrap_or_else(|| ParamDefinition::required(name, location));
        params.push(param);
    }

    for param in &declared {
        if location == ParamLocation::Path && !seen.contains(&param.name) {
            tracing::warn!(param = %param.name, "path param declared but not present in path");
        }
    }

    params
}

fn render_body_template(
    collection_name: &str,
    input: &OperationInput,
) -> Result<Option<String>, ApiCliError> {
    if !schema::has_body_template(&input.body_template) {
        return Ok(None);
    }
    match &input.body_template {
        Some(serde_json::Value::String(raw)) => Ok(Some(raw.clone())),
        Some(value) => serde_json::to_string_pretty(value)
            .map(Some)
            .map_err(|e| ApiCliError::config_validation(collection_name, e.to_string())),
        None => Ok(None),
    }
}

fn ensure_unique_names(
    collection_name: &str,
    operation: &str,
    params: &[ParamDefinition],
) -> Result<(), ApiCliError> {
    let mut seen = HashSet::new();
    for param in params {
        if !seen.insert(param.name.as_str()) {
            return Err(ApiCliError::config_validation(
                collection_name,
                format!("operation \"{operation}\" defines param \"{}\" more than once", param.name),
            ));
        }
    }
    Ok(())
}
