// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP request building and transport

mod client;
mod request;

pub use client::{Client, Transport};
pub use request::{build_request_data, build_request_data_with, BuildOptions};

use crate::collection::Method;
use serde::Deserialize;

/// A fully specified request, ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct RequestData {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestData {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Name/value pairs sent as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// Template text after placeholder substitution
    Json(String),
}

impl RequestBody {
    /// Body bytes as they go on the wire.
    pub fn to_text(&self) -> String {
        match self {
            RequestBody::Form(pairs) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish(),
            RequestBody::Json(text) => text.clone(),
        }
    }
}

/// HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// HTTP configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_true")]
    pub follow_redirects: bool,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub insecure: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            max_redirects: default_max_redirects(),
            proxy: None,
            user_agent: None,
            insecure: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_redirects() -> usize {
    10
}
