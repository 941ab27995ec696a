// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request builder: operation + resolved values -> request data

use super::{RequestBody, RequestData};
use crate::collection::{ContentType, Operation, ParamDefinition, ParamLocation};
use crate::error::ApiCliError;
use crate::params::{resolve_value, ParamValue};
use url::Url;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// JSON-escape values before inserting them into a body template.
    pub strict_json: bool,
}

#[derive(Default)]
struct GroupedParams<'a> {
    path: Vec<&'a ParamDefinition>,
    query: Vec<&'a ParamDefinition>,
    headers: Vec<&'a ParamDefinition>,
    body: Vec<&'a ParamDefinition>,
}

fn group_params_by_location(params: &[ParamDefinition]) -> GroupedParams<'_> {
    let mut grouped = GroupedParams::default();
    for param in params {
        match param.location {
            ParamLocation::Path => grouped.path.push(param),
            ParamLocation::Query => grouped.query.push(param),
            ParamLocation::Headers => grouped.headers.push(param),
            ParamLocation::Body => grouped.body.push(param),
        }
    }
    grouped
}

pub fn build_request_data(operation: &Operation, values: &[ParamValue]) -> Result<RequestData, ApiCliError> {
    build_request_data_with(operation, values, BuildOptions::default())
}

pub fn build_request_data_with(
    operation: &Operation,
    values: &[ParamValue],
    options: BuildOptions,
) -> Result<RequestData, ApiCliError> {
    let params = group_params_by_location(&operation.params);

    let url = build_url(&operation.url, &params.query, &params.path, values)?;
    let headers = build_headers(operation, &params.headers, values);
    let body = build_body(operation, &params.body, values, options);

    tracing::debug!(method = %operation.method, %url, headers = headers.len(), "built request");

    Ok(RequestData {
        url,
        method: operation.method,
        headers,
        body,
    })
}

/// Non-empty resolved value, falling back to the declared default.
fn present_value(param: &ParamDefinition, values: &[ParamValue]) -> Option<String> {
    resolve_value(param, values).filter(|value| !value.is_empty())
}

fn build_url(
    template: &str,
    query_params: &[&ParamDefinition],
    path_params: &[&ParamDefinition],
    values: &[ParamValue],
) -> Result<String, ApiCliError> {
    let mut url = Url::parse(template).map_err(|e| ApiCliError::InvalidUrl {
        url: template.to_string(),
        reason: e.to_string(),
    })?;

    let query: Vec<(&str, String)> = query_params
        .iter()
        .filter_map(|param| present_value(param, values).map(|value| (param.name.as_str(), value)))
        .collect();
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    // The parser has percent-encoded the braces of every path placeholder.
    let mut path = url.path().to_string();
    for param in path_params {
        if let Some(value) = present_value(param, values) {
            path = path.replace(&format!("%7B{}%7D", param.name), &value);
        }
    }
    url.set_path(&path);

    Ok(url.to_string())
}

fn build_headers(
    operation: &Operation,
    header_params: &[&ParamDefinition],
    values: &[ParamValue],
) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();

    if let Some(content_type) = operation.content_type {
        headers.push(("Content-Type".to_string(), content_type.to_string()));
    }

    for param in header_params {
        if let Some(value) = present_value(param, values) {
            match headers
                .iter_mut()
                .find(|(name, _)| name.eq_ignore_ascii_case(&param.name))
            {
                Some(existing) => *existing = (param.name.clone(), value),
                None => headers.push((param.name.clone(), value)),
            }
        }
    }

    headers
}

fn build_body(
    operation: &Operation,
    body_params: &[&ParamDefinition],
    values: &[ParamValue],
    options: BuildOptions,
) -> Option<RequestBody> {
    match operation.content_type? {
        ContentType::FormUrlEncoded => Some(RequestBody::Form(
            body_params
                .iter()
                .filter_map(|param| present_value(param, values).map(|value| (param.name.clone(), value)))
                .collect(),
        )),
        ContentType::Json => {
            let template = operation.body_template.as_ref()?;
            Some(RequestBody::Json(substitute_template(template, body_params, values, options)))
        }
    }
}

/// Plain text replacement of every `{name}` token. Not JSON-aware unless
/// `strict_json` is set, in which case values are escaped as JSON string
/// content first.
fn substitute_template(
    template: &str,
    body_params: &[&ParamDefinition],
    values: &[ParamValue],
    options: BuildOptions,
) -> String {
    body_params.iter().fold(template.to_string(), |body, param| {
        match resolve_value(param, values) {
            Some(value) => {
                let value = if options.strict_json {
                    escape_json_fragment(&value)
                } else {
                    value
                };
                body.replace(&format!("{{{}}}", param.name), &value)
            }
            None => body,
        }
    })
}

fn escape_json_fragment(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{parse_collection_config, Method};
    use crate::params::parse_param_value_strings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn operation(document: serde_json::Value, name: &str) -> Operation {
        parse_collection_config("test", &document.to_string())
            .unwrap()
            .operations
            .remove(name)
            .unwrap()
    }

    fn values(raw: &[&str]) -> Vec<ParamValue> {
        parse_param_value_strings(raw).unwrap()
    }

    #[test]
    fn test_get_with_path_param() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": { "getUser": { "path": "/users/{id}", "method": "GET" } }
            }),
            "getUser",
        );
        let request = build_request_data(&op, &values(&["id=7"])).unwrap();
        assert_eq!(
            request,
            RequestData {
                url: "https://api.test/users/7".to_string(),
                method: Method::Get,
                headers: vec![],
                body: None,
            }
        );
    }

    #[test]
    fn test_missing_path_value_leaves_placeholder() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": { "getUser": { "path": "/users/{id}", "method": "GET" } }
            }),
            "getUser",
        );
        let request = build_request_data(&op, &[]).unwrap();
        assert_eq!(request.url, "https://api.test/users/%7Bid%7D");
    }

    #[test]
    fn test_query_params_skip_unresolved() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": {
                    "search": {
                        "path": "/search",
                        "method": "GET",
                        "params": {
                            "query": [
                                "q",
                                { "name": "limit", "default": "10" },
                                { "name": "cursor", "optional": true }
                            ]
                        }
                    }
                }
            }),
            "search",
        );
        let request = build_request_data(&op, &values(&["q=hello world"])).unwrap();
        assert_eq!(request.url, "https://api.test/search?q=hello+world&limit=10");
    }

    #[test]
    fn test_no_query_string_when_nothing_resolved() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": {
                    "list": { "path": "/items", "method": "GET", "params": { "query": ["page"] } }
                }
            }),
            "list",
        );
        let request = build_request_data(&op, &[]).unwrap();
        assert_eq!(request.url, "https://api.test/items");
    }

    #[test]
    fn test_header_params_follow_content_type() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "shared": { "auth": { "headers": ["Authorization"] } },
                "operations": {
                    "create": {
                        "path": "/items",
                        "method": "POST",
                        "use": ["auth"],
                        "bodyTemplate": { "name": "{name}" }
                    }
                }
            }),
            "create",
        );
        let request = build_request_data(&op, &values(&["Authorization=Bearer t", "name=x"])).unwrap();
        assert_eq!(
            request.headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer t".to_string()),
            ]
        );
    }

    #[test]
    fn test_explicit_content_type_header_overrides() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": {
                    "upload": {
                        "path": "/raw",
                        "method": "PUT",
                        "bodyTemplate": "{payload}",
                        "params": { "headers": ["content-type"] }
                    }
                }
            }),
            "upload",
        );
        let request =
            build_request_data(&op, &values(&["content-type=text/plain", "payload=hi"])).unwrap();
        assert_eq!(request.headers, vec![("content-type".to_string(), "text/plain".to_string())]);
        assert_eq!(request.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_json_body_is_literal_substitution() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": {
                    "create": {
                        "path": "/users",
                        "method": "POST",
                        "contentType": "application/json",
                        "bodyTemplate": "{\"id\":\"{id}\"}"
                    }
                }
            }),
            "create",
        );
        let request = build_request_data(&op, &values(&["id=42"])).unwrap();
        assert_eq!(request.body, Some(RequestBody::Json("{\"id\":\"42\"}".to_string())));
    }

    #[test]
    fn test_json_body_replaces_every_occurrence() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": {
                    "create": {
                        "path": "/users",
                        "method": "POST",
                        "bodyTemplate": { "a": "{v}", "b": "{v}" }
                    }
                }
            }),
            "create",
        );
        let request = build_request_data(&op, &values(&["v=1"])).unwrap();
        assert_eq!(
            request.body,
            Some(RequestBody::Json("{\n  \"a\": \"1\",\n  \"b\": \"1\"\n}".to_string()))
        );
    }

    #[test]
    fn test_json_body_does_not_escape_by_default() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": {
                    "create": { "path": "/", "method": "POST", "bodyTemplate": "{\"v\":\"{v}\"}" }
                }
            }),
            "create",
        );
        let raw = values(&["v=a\"b"]);
        let request = build_request_data(&op, &raw).unwrap();
        assert_eq!(request.body, Some(RequestBody::Json("{\"v\":\"a\"b\"}".to_string())));

        let strict = build_request_data_with(&op, &raw, BuildOptions { strict_json: true }).unwrap();
        assert_eq!(strict.body, Some(RequestBody::Json("{\"v\":\"a\\\"b\"}".to_string())));
    }

    #[test]
    fn test_form_body_skips_unresolved() {
        let op = operation(
            json!({
                "baseUrl": "https://api.test",
                "operations": {
                    "login": {
                        "path": "/login",
                        "method": "POST",
                        "contentType": "application/x-www-form-urlencoded",
                        "params": { "body": ["user", { "name": "remember", "optional": true }] }
                    }
                }
            }),
            "login",
        );
        let request = build_request_data(&op, &values(&["user=a b&c"])).unwrap();
        let body = request.body.unwrap();
        assert_eq!(body, RequestBody::Form(vec![("user".to_string(), "a b&c".to_string())]));
        assert_eq!(body.to_text(), "user=a+b%26c");
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let op = operation(
            json!({ "operations": { "o": { "path": "/x", "method": "GET" } } }),
            "o",
        );
        assert!(matches!(
            build_request_data(&op, &[]),
            Err(ApiCliError::InvalidUrl { .. })
        ));
    }
}
