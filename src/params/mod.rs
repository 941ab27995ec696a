// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter values and resolution across input sources
//!
//! Values come from three places, merged per parameter in this order:
//! environment file, CLI `name=value` arguments, interactive prompt. A
//! parameter's declared default is used only when none of them supplies a
//! non-empty value.

use crate::collection::{Operation, ParamDefinition};
use crate::error::ApiCliError;

/// A resolved name/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue {
    pub name: String,
    pub value: String,
}

impl ParamValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Split CLI `name=value` arguments on the first `=` only.
pub fn parse_param_value_strings<S: AsRef<str>>(params: &[S]) -> Result<Vec<ParamValue>, ApiCliError> {
    params
        .iter()
        .map(|raw| {
            let raw = raw.as_ref();
            raw.split_once('=')
                .map(|(name, value)| ParamValue::new(name, value))
                .ok_or_else(|| ApiCliError::InvalidParamValue(raw.to_string()))
        })
        .collect()
}

/// Supplied value if present and non-empty, else the default, else nothing.
pub fn resolve_value(definition: &ParamDefinition, values: &[ParamValue]) -> Option<String> {
    supplied_value(&definition.name, values)
        .map(str::to_string)
        .or_else(|| definition.default.clone())
}

fn supplied_value<'a>(name: &str, values: &'a [ParamValue]) -> Option<&'a str> {
    values
        .iter()
        .find(|value| value.name == name && !value.value.is_empty())
        .map(|value| value.value.as_str())
}

/// Every required definition with no non-empty value in `values`.
pub fn missing_params<'a>(
    definitions: &'a [ParamDefinition],
    values: &[ParamValue],
) -> Vec<&'a ParamDefinition> {
    definitions
        .iter()
        .filter(|param| param.is_required() && supplied_value(&param.name, values).is_none())
        .collect()
}

/// Value sources gathered for one invocation.
#[derive(Debug, Clone, Default)]
pub struct ParamSources {
    pub env: Vec<ParamValue>,
    pub cli: Vec<ParamValue>,
    pub prompted: Vec<ParamValue>,
}

impl ParamSources {
    /// True when the environment file supplies this parameter.
    pub fn from_env(&self, name: &str) -> bool {
        supplied_value(name, &self.env).is_some()
    }

    /// True when the environment or CLI supplies this parameter.
    pub fn is_supplied(&self, name: &str) -> bool {
        self.from_env(name) || supplied_value(name, &self.cli).is_some()
    }

    /// All sources flattened in precedence order; first match wins.
    pub fn merged(&self) -> Vec<ParamValue> {
        self.env
            .iter()
            .chain(&self.cli)
            .chain(&self.prompted)
            .filter(|value| !value.value.is_empty())
            .cloned()
            .collect()
    }
}

/// Resolve every parameter of `operation`, failing with the full list of
/// required parameters that no source satisfies.
pub fn resolve(operation: &Operation, sources: &ParamSources) -> Result<Vec<ParamValue>, ApiCliError> {
    let merged = sources.merged();

    let missing: Vec<String> = missing_params(&operation.params, &merged)
        .into_iter()
        .map(|param| param.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ApiCliError::MissingRequiredParams { missing });
    }

    let resolved: Vec<ParamValue> = operation
        .params
        .iter()
        .filter_map(|param| resolve_value(param, &merged).map(|value| ParamValue::new(&param.name, value)))
        .collect();

    tracing::debug!(
        operation = %operation.name,
        resolved = resolved.len(),
        declared = operation.params.len(),
        "resolved params"
    );

    Ok(resolved)
}
