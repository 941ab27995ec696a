// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client implementation

use super::{HttpConfig, RequestBody, RequestData, Response};
use crate::error::ApiCliError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;

/// Sends a built request and returns the response.
#[async_trait]
pub trait Transport {
    async fn execute(&self, request: &RequestData) -> Result<Response, ApiCliError>;
}

pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        } else {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).context("Invalid proxy URL")?;
            builder = builder.proxy(proxy);
        }

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        } else {
            builder = builder.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        }

        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for Client {
    async fn execute(&self, request: &RequestData) -> Result<Response, ApiCliError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &request.headers {
            let header_name =
                HeaderName::from_str(key).map_err(|_| ApiCliError::InvalidHeader(key.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| ApiCliError::InvalidHeader(key.clone()))?;
            headers.insert(header_name, header_value);
        }

        let method = reqwest::Method::from_str(request.method.as_str())
            .map_err(|e| ApiCliError::Network(e.to_string()))?;

        let mut builder = self.inner.request(method, &request.url).headers(headers);

        // Content-Type is already among the built headers.
        if let Some(body) = &request.body {
            builder = match body {
                RequestBody::Form(_) => builder.body(body.to_text()),
                RequestBody::Json(text) => builder.body(text.clone()),
            };
        }

        tracing::info!(
            method = %request.method,
            url = %request.url,
            content_type = request.header("Content-Type"),
            "sending request"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| ApiCliError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| ApiCliError::Network(e.to_string()))?;

        tracing::info!(status, bytes = body.len(), "received response");

        Ok(Response {
            status,
            headers: response_headers,
            body,
        })
    }
}
