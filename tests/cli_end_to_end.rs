#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use tempfile::TempDir;

fn token_dir(contents: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("tokens.json"), contents).expect("write tokens");
    dir
}

fn blogwire(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blogwire"));
    cmd.current_dir(dir.path())
        .env("BLOGWIRE_TOKEN_FILE", dir.path().join("tokens.json"))
        .env_remove("BLOGWIRE_PASSWORD")
        .env_remove("BLOGWIRE_PASSWORD_FILE")
        .env_remove("BLOGWIRE_CONFIG_FILE");
    cmd
}

fn read_tokens(dir: &TempDir) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.path().join("tokens.json")).expect("read tokens");
    serde_json::from_str(&raw).expect("token json")
}

#[test]
fn whoami_works_end_to_end() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/graphql")
            .header("authorization", "Bearer cli-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":{"meUser":{"id":"/api/users/1","username":"ada","email":"ada@example.com","fullname":"Ada"}}}"#);
    });

    let dir = token_dir(r#"{"authToken":"cli-token"}"#);
    let assert = blogwire(&dir)
        .env("BLOGWIRE_API_BASE_URL", server.base_url())
        .arg("whoami")
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"username\": \"ada\""));
    mock.assert();
}

#[test]
fn login_persists_tokens_to_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/login")
            .json_body_includes(r#"{"username":"ada","password":"s3cret"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"token":"t1","refresh_token":"r1"}"#);
    });

    let dir = token_dir("");
    blogwire(&dir)
        .env("BLOGWIRE_API_BASE_URL", server.base_url())
        .env("BLOGWIRE_PASSWORD", "s3cret")
        .args(["login", "--username", "ada"])
        .assert()
        .success()
        .stdout(contains("\"authenticated\": true"));

    mock.assert();
    let tokens = read_tokens(&dir);
    assert_eq!(tokens["authToken"], "t1");
    assert_eq!(tokens["authRefreshToken"], "r1");
}

#[test]
fn expired_token_is_refreshed_and_persisted() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path("/api/graphql").header("authorization", "Bearer stale");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method("POST").path("/api/token/refresh");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"token":"fresh"}"#);
    });
    server.mock(|when, then| {
        when.path("/api/graphql").header("authorization", "Bearer fresh");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":{"blogs":{"edges":[]}}}"#);
    });

    let dir = token_dir(r#"{"authToken":"stale","authRefreshToken":"r1"}"#);
    blogwire(&dir)
        .env("BLOGWIRE_API_BASE_URL", server.base_url())
        .args(["blogs", "list"])
        .assert()
        .success()
        .stdout(contains("[]"));

    refresh.assert();
    let tokens = read_tokens(&dir);
    assert_eq!(tokens["authToken"], "fresh");
    assert_eq!(tokens["authRefreshToken"], "r1");
}

#[test]
fn unauthorized_without_refresh_token_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path("/api/graphql");
        then.status(401);
    });

    let dir = token_dir(r#"{"authToken":"stale"}"#);
    blogwire(&dir)
        .env("BLOGWIRE_API_BASE_URL", server.base_url())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(contains("AuthenticationRequired"));

    assert!(read_tokens(&dir).get("authToken").is_none());
}

#[test]
fn login_without_password_fails_fast() {
    let dir = token_dir("");
    blogwire(&dir)
        .env("BLOGWIRE_API_BASE_URL", "http://127.0.0.1:9/")
        .args(["login", "--username", "ada"])
        .assert()
        .failure()
        .stderr(contains("MissingPassword"));
}

#[test]
fn invalid_base_url_is_a_config_error() {
    let dir = token_dir("");
    blogwire(&dir)
        .env("BLOGWIRE_API_BASE_URL", "ftp://example.com")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(contains("api.base_url"));
}
