use assert_cmd::prelude::*;
use chrono::Utc;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn finport() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("finport"));
    cmd.env_remove("FINPORT_CONFIG")
        .env_remove("FINPORT_API_HOST")
        .env_remove("FINPORT_FORMAT")
        .env_remove("FINPORT_TOKEN_STORE")
        .env_remove("FINPORT_PASSWORD");
    cmd
}

fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let contents = format!("token_store: file\n{extra}");
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn write_tokens(dir: &Path, access: &str, refresh: &str) {
    let contents = format!(
        r#"{{"access_token":"{access}","refresh_token":"{refresh}","expires_in":3600,"issued_at":"{}"}}"#,
        Utc::now().to_rfc3339()
    );
    fs::write(dir.join("tokens.json"), contents).expect("failed to write tokens");
}

#[test]
fn status_without_session_suggests_login() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");

    finport()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"))
        .stdout(predicate::str::contains("finport login"))
        .stdout(predicate::str::contains(config_path.to_string_lossy().as_ref()));

    Ok(())
}

#[test]
fn status_json_reports_stored_session() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(
        temp.path(),
        "email: me@example.com\napi_host: http://finport.test/\nonboarded: true\n",
    );
    write_tokens(temp.path(), "acc-1", "ref-1");

    let assert = finport()
        .args(["status", "--format", "json", "--config"])
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["data"]["signed_in"], true);
    assert_eq!(value["data"]["user"], "me@example.com");
    assert_eq!(value["data"]["api_host"], "http://finport.test");
    assert_eq!(value["data"]["token_store"], "file");
    assert!(value["data"]["token_expires_at"].is_string());
    assert!(!stdout.contains("acc-1"));

    Ok(())
}

#[test]
fn protected_command_without_session_fails_before_network() -> Result<(), Box<dyn std::error::Error>>
{
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");

    finport()
        .args(["goal", "list", "--api-host", "http://127.0.0.1:1", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("finport login"));

    Ok(())
}

#[test]
fn connection_error_shows_network_message() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");
    write_tokens(temp.path(), "acc-1", "ref-1");

    finport()
        .args(["advice", "--api-host", "http://127.0.0.1:1", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));

    // A transport failure is not an auth failure; tokens stay put
    assert!(temp.path().join("tokens.json").exists());
    Ok(())
}

#[test]
fn upload_rejects_non_pdf_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");
    write_tokens(temp.path(), "acc-1", "ref-1");
    let file = temp.path().join("notes.txt");
    fs::write(&file, "hello")?;

    finport()
        .args(["transaction", "upload", "--bank", "Sber", "--config"])
        .arg(&config_path)
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a PDF file"));

    Ok(())
}

#[test]
fn completion_generates_bash_script() -> Result<(), Box<dyn std::error::Error>> {
    finport()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("finport"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn login_stores_tokens_in_file_and_remembers_user() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let login = server
        .mock("POST", "/auth/login")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "email": "me@example.com",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_body(r#"{"access_token":"acc-1","refresh_token":"ref-1","expires_in":3600}"#)
        .create();

    let temp = tempdir()?;
    let config_path = temp.path().join("config.yaml");

    finport()
        .args(["login", "--email", "me@example.com", "--token-store", "file"])
        .arg("--config")
        .arg(&config_path)
        .env("FINPORT_PASSWORD", "hunter2")
        .env("FINPORT_API_HOST", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in"));

    login.assert();

    let tokens = fs::read_to_string(temp.path().join("tokens.json"))?;
    assert!(tokens.contains("acc-1"));
    assert!(tokens.contains("ref-1"));

    let config = fs::read_to_string(&config_path)?;
    assert!(config.contains("email: me@example.com"));
    assert!(config.contains("onboarded: true"));
    assert!(config.contains("token_store: file"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn login_with_wrong_password_explains_failure() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _login = server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"detail":"Invalid credentials"}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");

    finport()
        .args(["login", "--email", "me@example.com", "--config"])
        .arg(&config_path)
        .env("FINPORT_PASSWORD", "wrong")
        .env("FINPORT_API_HOST", server.url())
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong email or password"));

    assert!(!temp.path().join("tokens.json").exists());
    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn goal_list_json_sends_bearer_token() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let goals = server
        .mock("GET", "/goals/")
        .match_header("authorization", "Bearer acc-1")
        .with_status(200)
        .with_body(r#"[{"id":1,"title":"Vacation","target_amount":1500.0,"current_amount":300.0}]"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");
    write_tokens(temp.path(), "acc-1", "ref-1");

    let assert = finport()
        .args(["goal", "list", "--format", "json", "--config"])
        .arg(&config_path)
        .env("FINPORT_API_HOST", server.url())
        .assert()
        .success();

    goals.assert();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["data"][0]["title"], "Vacation");
    assert_eq!(value["meta"]["count"], 1);

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn expired_token_is_refreshed_and_persisted() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let stale = server
        .mock("GET", "/advice/monthly")
        .match_header("authorization", "Bearer old-acc")
        .with_status(401)
        .create();
    let refresh = server
        .mock("POST", "/auth/refresh")
        .match_body(mockito::Matcher::Json(serde_json::json!({"refresh_token": "old-ref"})))
        .with_status(200)
        .with_body(r#"{"access_token":"new-acc","refresh_token":"new-ref","expires_in":3600}"#)
        .expect(1)
        .create();
    let fresh = server
        .mock("GET", "/advice/monthly")
        .match_header("authorization", "Bearer new-acc")
        .with_status(200)
        .with_body(r#"{"summary":"Spend less on taxis","recommendations":["Walk more"]}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");
    write_tokens(temp.path(), "old-acc", "old-ref");

    finport()
        .args(["advice", "--config"])
        .arg(&config_path)
        .env("FINPORT_API_HOST", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Walk more"));

    stale.assert();
    refresh.assert();
    fresh.assert();

    let tokens = fs::read_to_string(temp.path().join("tokens.json"))?;
    assert!(tokens.contains("new-acc"));
    assert!(tokens.contains("new-ref"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn rejected_refresh_signs_out_and_warns() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _stale = server
        .mock("GET", "/statements")
        .with_status(401)
        .create();
    let _refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_body(r#"{"detail":"Refresh token expired"}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");
    write_tokens(temp.path(), "old-acc", "old-ref");

    finport()
        .args(["statement", "list", "--config"])
        .arg(&config_path)
        .env("FINPORT_API_HOST", server.url())
        .assert()
        .failure()
        .stderr(predicate::str::contains("session has expired"));

    assert!(!temp.path().join("tokens.json").exists());
    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn upload_marks_statement_uploaded() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let upload = server
        .mock("POST", "/transactions/upload")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(mockito::Matcher::Regex("name=\"bank\"\r\n\r\nTinkoff".to_string()))
        .with_status(200)
        .with_body(r#"{"statement_id":9,"transactions_imported":42}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "");
    write_tokens(temp.path(), "acc-1", "ref-1");
    let pdf = temp.path().join("march.pdf");
    fs::write(&pdf, b"%PDF-1.4 fake statement")?;

    finport()
        .args(["transaction", "upload", "--bank", "Tinkoff", "--config"])
        .arg(&config_path)
        .arg(&pdf)
        .env("FINPORT_API_HOST", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));

    upload.assert();
    let config = fs::read_to_string(&config_path)?;
    assert!(config.contains("statement_uploaded: true"));

    Ok(())
}
