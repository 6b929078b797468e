use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, stderr, stdout};

fn read_snapshot(test: &CliTest, path: &str) -> Result<Value> {
    let content = test.read_file(path)?;
    serde_json::from_str(&content).context("Snapshot should be valid JSON")
}

#[test]
fn test_generate_writes_snapshot() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.generate_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stdout(&output).contains("Documented 2 endpoints from 3 source files -> api-docs.json"),
        "stdout: {}",
        stdout(&output)
    );

    let snapshot = read_snapshot(&test, "api-docs.json")?;
    assert_eq!(
        snapshot[0],
        json!({
            "title": "User login",
            "catalog": "user",
            "method": "post",
            "router": "/api/login",
            "header": [
                {"name": "X-Token", "type": "string", "required": false, "remark": "session token"}
            ],
            "body": [
                {"name": "username", "type": "string", "required": true, "remark": "user name"},
                {"name": "password", "type": "string", "required": true, "remark": "password"}
            ],
            "response_body": [
                {"name": "id", "type": "int", "required": true, "remark": "user id"},
                {"name": "username", "type": "string", "required": true, "remark": "user name"},
                {"name": "avatar", "type": "string", "required": false, "remark": "avatar url"}
            ]
        })
    );

    let info_fields: Vec<&str> = snapshot[1]["response_body"]
        .as_array()
        .context("response_body should be an array")?
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(
        info_fields,
        vec!["code", "msg", "data", "data.id", "data.username", "data.avatar"]
    );
    assert_eq!(snapshot[1]["url"], "/api/info");

    Ok(())
}

#[test]
fn test_generate_unchanged_snapshot_not_rewritten() -> Result<()> {
    let test = CliTest::with_project()?;

    test.generate_command().output()?;
    let output = test.generate_command().output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("(unchanged)"));

    Ok(())
}

#[test]
fn test_generate_missing_title_blocks_output() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file(
        "internal/server/api/admin.go",
        "package api\n\n// runapi\n// @method get\n// @router /api/admin\nfunc Admin() {}\n",
    )?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("error: missing @title  missing-field"), "stdout: {}", out);
    assert!(out.contains("--> internal/server/api/admin.go:6:1"), "stdout: {}", out);
    assert!(out.contains("= in: Admin"));
    assert!(stderr(&output).contains("api-docs.json not written"));
    assert!(!test.root().join("api-docs.json").exists());

    Ok(())
}

#[test]
fn test_generate_unresolved_type_is_warning() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file(
        "internal/server/api/logout.go",
        r#"package api

// Logout ends the session.
// runapi
// @title Logout
// @method post
// @router /api/logout
// @body LogoutRequest
func Logout() {}
"#,
    )?;

    let output = test.generate_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("warning: cannot resolve type 'LogoutRequest'  unresolved-type"));
    assert!(out.contains("= in: Logout"));

    let snapshot = read_snapshot(&test, "api-docs.json")?;
    let logout = snapshot
        .as_array()
        .context("snapshot should be an array")?
        .iter()
        .find(|d| d["title"] == "Logout")
        .context("Logout should be documented")?;
    assert!(logout.get("body").is_none());

    Ok(())
}

#[test]
fn test_generate_syntax_error_is_fatal() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file("internal/broken/broken.go", "package broken\n\nfunc {\n")?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("broken.go"), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_generate_respects_config() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file(
        "apiscribe.json",
        r#"{
  "docRoot": "internal/server/api",
  "output": "docs/api.json",
  "ignores": ["**/legacy/**"]
}"#,
    )?;
    test.write_file(
        "internal/legacy/user/user.go",
        "package user\n\ntype User struct {\n\tName string `json:\"name\"`\n}\n",
    )?;

    let output = test.generate_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    // Ignored paths never register, so no duplicate-type warning.
    assert!(!stdout(&output).contains("duplicate-type"));
    let snapshot = read_snapshot(&test, "docs/api.json")?;
    assert_eq!(snapshot.as_array().map(Vec::len), Some(2));

    Ok(())
}

#[test]
fn test_generate_output_flag_overrides_config() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test
        .generate_command()
        .args(["--output", "out/docs.json"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("out/docs.json").exists());
    assert!(!test.root().join("api-docs.json").exists());

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("generate"));
    assert!(out.contains("diff"));
    assert!(out.contains("init"));

    Ok(())
}
