// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn apicli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("apicli").unwrap();
    cmd.arg("--config-dir")
        .arg(dir)
        .arg("--no-input")
        .arg("--no-color")
        .env_remove("APICLI_HOME")
        .env_remove("APICLI_LOG_LEVEL");
    cmd
}

const USERS: &str = r#"{
    "baseUrl": "https://api.test",
    "description": "User service",
    "operations": {
        "getUser": { "path": "/users/{id}", "method": "GET" },
        "pair": { "path": "/pairs/{x}/{y}", "method": "GET" }
    }
}"#;

#[test]
fn lists_nothing_in_empty_config_dir() {
    let dir = config_dir(&[]);
    apicli(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("There are no collections available"));
}

#[test]
fn lists_collections() {
    let dir = config_dir(&[("users.json", USERS), ("pets.json", "{}"), ("users.env", "")]);
    apicli(dir.path())
        .assert()
        .success()
        .stdout("pets\nusers\n");
}

#[test]
fn lists_operations_and_environments() {
    let dir = config_dir(&[("users.json", USERS), ("users.env.staging", "id=1")]);
    apicli(dir.path())
        .arg("users")
        .assert()
        .success()
        .stdout(predicate::str::contains("Base URL: https://api.test"))
        .stdout(predicate::str::contains("getUser"))
        .stdout(predicate::str::contains("https://api.test/pairs/{x}/{y}"))
        .stdout(predicate::str::contains("Environments: staging"));
}

#[test]
fn dry_run_prints_request() {
    let dir = config_dir(&[("users.json", USERS)]);
    apicli(dir.path())
        .args(["users", "getUser", "id=7", "--dry-run"])
        .assert()
        .success()
        .stdout("GET https://api.test/users/7\n");
}

#[test]
fn reports_every_missing_param() {
    let dir = config_dir(&[("users.json", USERS)]);
    apicli(dir.path())
        .args(["users", "pair", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing the following required params: x, y"));
}

#[test]
fn reports_available_operations() {
    let dir = config_dir(&[("users.json", USERS)]);
    apicli(dir.path())
        .args(["users", "deleteUser"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Operation \"deleteUser\" not found."))
        .stderr(predicate::str::contains("Available operations: getUser, pair"));
}

#[test]
fn rejects_invalid_collection() {
    let dir = config_dir(&[(
        "broken.json",
        r#"{"operations":{"o":{"path":"/","method":"FETCH"}}}"#,
    )]);
    apicli(dir.path())
        .args(["broken", "o"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid collection \"broken\""));
}

#[test]
fn rejects_param_without_equals() {
    let dir = config_dir(&[("users.json", USERS)]);
    apicli(dir.path())
        .args(["users", "getUser", "7", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=value"));
}

#[test]
fn unknown_named_environment_fails() {
    let dir = config_dir(&[("users.json", USERS)]);
    apicli(dir.path())
        .args(["users", "getUser", "id=1", "--env", "prod", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Environment \"prod\" not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn sends_json_body_and_prints_pretty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(header("api_key", "secret"))
        .and(body_string("{\"id\":\"42\"}"))
        .respond_with(ResponseTemplate::new(201).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let collection = format!(
        r#"{{
            "baseUrl": "{}",
            "shared": {{ "auth": {{ "headers": ["api_key"] }} }},
            "operations": {{
                "create": {{
                    "path": "/users",
                    "method": "POST",
                    "use": ["auth"],
                    "bodyTemplate": "{{\"id\":\"{{id}}\"}}"
                }}
            }}
        }}"#,
        server.uri()
    );
    let dir = config_dir(&[("users.json", collection.as_str()), ("users.env", "api_key=secret\n")]);

    apicli(dir.path())
        .args(["users", "create", "id=42", "api_key=ignored"])
        .assert()
        .success()
        .stdout("{\n  \"ok\": true\n}\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn omits_unresolved_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust lang"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain result"))
        .expect(1)
        .mount(&server)
        .await;

    let collection = format!(
        r#"{{
            "baseUrl": "{}",
            "operations": {{
                "search": {{
                    "path": "/search",
                    "method": "GET",
                    "params": {{
                        "query": ["q", {{ "name": "limit", "default": "10" }}, {{ "name": "cursor", "optional": true }}]
                    }}
                }}
            }}
        }}"#,
        server.uri()
    );
    let dir = config_dir(&[("search.json", collection.as_str())]);

    apicli(dir.path())
        .args(["search", "search", "q=rust lang"])
        .assert()
        .success()
        .stdout("plain result\n");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("q=rust+lang&limit=10"));
}

#[tokio::test(flavor = "multi_thread")]
async fn verbose_prints_status_and_response_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "abc")
                .set_body_string("done"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let collection = format!(
        r#"{{"baseUrl":"{}","operations":{{"getUser":{{"path":"/users/{{id}}","method":"GET"}}}}}}"#,
        server.uri()
    );
    let dir = config_dir(&[("users.json", collection.as_str())]);

    apicli(dir.path())
        .args(["--verbose", "users", "getUser", "id=5"])
        .assert()
        .success()
        .stdout("done\n")
        .stderr(predicate::str::contains("HTTP 200"))
        .stderr(predicate::str::contains("x-request-id: abc"));
}
