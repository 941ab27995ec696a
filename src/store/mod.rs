// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collection and environment files in the config directory
//!
//! Layout:
//!
//! ```text
//! <config dir>/
//!   petstore.json            collection
//!   petstore.env             default environment
//!   petstore.env.staging     named environment "staging"
//! ```

use crate::collection::{parse_collection_config, Collection};
use crate::error::ApiCliError;
use crate::params::ParamValue;
use anyhow::{Context, Result};
use glob::Pattern;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const COLLECTION_EXT: &str = ".json";
const ENV_EXT: &str = ".env";

pub struct CollectionStore {
    dir: PathBuf,
}

impl CollectionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of every collection file, sorted.
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let pattern = Pattern::new("*.json")?;
        let mut names: Vec<String> = list_files(&self.dir)?
            .into_iter()
            .filter(|name| pattern.matches(name))
            .filter_map(|name| name.strip_suffix(COLLECTION_EXT).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn load_collection(&self, name: &str) -> Result<Collection> {
        let path = self.dir.join(format!("{name}{COLLECTION_EXT}"));
        if !path.is_file() {
            return Err(ApiCliError::CollectionNotFound(name.to_string()).into());
        }
        let data = read_file(&path)?;
        let collection = parse_collection_config(name, &data)?;
        tracing::debug!(
            collection = name,
            operations = collection.operations.len(),
            "loaded collection"
        );
        Ok(collection)
    }

    /// Named environments of a collection, from `<collection>.env.<name>` files.
    pub fn list_environments(&self, collection: &str) -> Result<Vec<String>> {
        let prefix = format!("{collection}{ENV_EXT}.");
        let pattern = Pattern::new(&format!("{}*", Pattern::escape(&prefix)))?;
        let mut names: Vec<String> = list_files(&self.dir)?
            .into_iter()
            .filter(|name| pattern.matches(name))
            .filter_map(|name| name.strip_prefix(&prefix).map(str::to_string))
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Values from `<collection>.env`, or `<collection>.env.<environment>`
    /// when an environment is named. A missing default file yields nothing;
    /// a missing named one is an error.
    pub fn load_env(&self, collection: &str, environment: Option<&str>) -> Result<Vec<ParamValue>> {
        let file_name = match environment {
            Some(env) => format!("{collection}{ENV_EXT}.{env}"),
            None => format!("{collection}{ENV_EXT}"),
        };
        let path = self.dir.join(file_name);

        if !path.is_file() {
            return match environment {
                Some(env) => Err(ApiCliError::EnvironmentNotFound {
                    collection: collection.to_string(),
                    environment: env.to_string(),
                }
                .into()),
                None => Ok(Vec::new()),
            };
        }

        let mut values = Vec::new();
        for item in dotenv::from_path_iter(&path)
            .with_context(|| format!("Failed to read environment file: {}", path.display()))?
        {
            match item {
                Ok((name, value)) => values.push(ParamValue::new(name, value)),
                Err(dotenv::Error::LineParse(line, _)) => match parse_loose_env_line(&line) {
                    Some(value) => values.push(value),
                    None => tracing::warn!(
                        path = %path.display(),
                        line = %line,
                        "skipping unparseable environment line"
                    ),
                },
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("Failed to parse environment file: {}", path.display())
                    })
                }
            }
        }

        tracing::debug!(path = %path.display(), values = values.len(), "loaded environment");
        Ok(values)
    }
}

/// Key syntax the dotenv grammar rejects but header names need, as in
/// `X-Api-Key=secret`. Value errors arrive without the key and are not
/// recoverable here.
fn parse_loose_env_line(line: &str) -> Option<ParamValue> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][\w.-]*)\s*=\s*(.*?)\s*$")
            .expect("valid env line pattern")
    });

    let captures = re.captures(line)?;
    let name = captures.get(1)?.as_str();
    let raw = captures.get(2)?.as_str();

    let value = ['"', '\'']
        .iter()
        .find_map(|quote| {
            raw.strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(raw);

    Some(ParamValue::new(name, value))
}

/// File names (not paths) directly inside `dir`. A missing directory has no files.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "config directory does not exist");
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}
