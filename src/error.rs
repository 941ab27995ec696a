// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error kinds surfaced to the user

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiCliError {
    #[error("Invalid collection \"{collection}\": {message}")]
    ConfigValidation { collection: String, message: String },

    #[error("Collection \"{0}\" not found")]
    CollectionNotFound(String),

    #[error("Environment \"{environment}\" not found for collection \"{collection}\"")]
    EnvironmentNotFound {
        collection: String,
        environment: String,
    },

    #[error("Operation \"{operation}\" not found.\nAvailable operations: {}", .available.join(", "))]
    OperationNotFound {
        operation: String,
        available: Vec<String>,
    },

    #[error("Missing the following required params: {}", .missing.join(", "))]
    MissingRequiredParams { missing: Vec<String> },

    #[error("Invalid param \"{0}\": expected name=value")]
    InvalidParamValue(String),

    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ApiCliError {
    pub fn config_validation(collection: &str, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            collection: collection.to_string(),
            message: message.into(),
        }
    }
}
