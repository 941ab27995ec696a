// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output formatting for responses and listings

use crate::collection::Collection;
use crate::http::{RequestData, Response};
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Pretty-printed JSON when the body parses as JSON, the raw text otherwise.
pub fn format_response_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

pub fn format_status_line(response: &Response, colorized: bool) -> String {
    let status = response.status.to_string();
    if !colorized {
        return format!("HTTP {status}");
    }
    let status = match response.status {
        200..=299 => status.green(),
        300..=399 => status.cyan(),
        400..=499 => status.yellow(),
        _ => status.red(),
    };
    format!("HTTP {status}")
}

pub fn format_response_headers(response: &Response) -> String {
    response
        .headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}\n"))
        .collect()
}

/// Request rendered as an HTTP message, for `--dry-run`.
pub fn format_request(request: &RequestData) -> String {
    let mut output = format!("{} {}\n", request.method, request.url);
    for (name, value) in &request.headers {
        output.push_str(&format!("{name}: {value}\n"));
    }
    if let Some(body) = &request.body {
        output.push('\n');
        output.push_str(&body.to_text());
        output.push('\n');
    }
    output
}

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "Operation")]
    name: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "URL")]
    url: String,
}

pub fn format_operations(collection: &Collection) -> String {
    let rows = collection.operations.values().map(|operation| OperationRow {
        name: operation.name.clone(),
        method: operation.method.to_string(),
        url: operation.url.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}
