use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, HANDLERS, stderr, stdout};

/// A project whose snapshot has already been generated.
fn generated_project() -> Result<CliTest> {
    let test = CliTest::with_project()?;
    let output = test.generate_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    Ok(test)
}

#[test]
fn test_diff_no_changes() -> Result<()> {
    let test = generated_project()?;

    let output = test.diff_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "\u{2713} No changes since api-docs.json\n");

    Ok(())
}

#[test]
fn test_diff_without_snapshot_reports_all_added() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.diff_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Added (2):"), "stdout: {}", out);
    assert!(out.contains("+ post:/api/login"));
    assert!(out.contains("+ get:/api/info"));
    assert!(out.contains("2 added, 0 removed, 0 changed"));
    assert!(!test.root().join("api-docs.json").exists());

    Ok(())
}

#[test]
fn test_diff_required_flip_is_one_change() -> Result<()> {
    let test = generated_project()?;
    test.write_file(
        "internal/server/model/user/user.go",
        r#"package user

type User struct {
	Id       int    `json:"id"`                     // user id
	Username string `json:"username,omitempty"`     // user name
	Avatar   string `json:"avatar,omitempty"`       // avatar url
}

type LoginRequest struct {
	Username string `json:"username"` // user name
	Password string `json:"password"` // password
}
"#,
    )?;

    let output = test.diff_command().arg("--json").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let diff: Value = serde_json::from_str(&stdout(&output)).context("diff should be JSON")?;
    assert_eq!(diff["added"].as_array().map(Vec::len), Some(0));
    assert_eq!(diff["removed"].as_array().map(Vec::len), Some(0));

    // Both endpoints embed User in their responses.
    let changed: Vec<&str> = diff["changed"]
        .as_array()
        .context("changed should be an array")?
        .iter()
        .filter_map(|c| c["key"].as_str())
        .collect();
    assert_eq!(changed, vec!["post:/api/login", "get:/api/info"]);

    Ok(())
}

#[test]
fn test_diff_renamed_route() -> Result<()> {
    let test = generated_project()?;
    test.write_file(
        "internal/server/api/user.go",
        &HANDLERS.replace("/api/login", "/api/v2/login"),
    )?;

    let output = test.diff_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("+ post:/api/v2/login"), "stdout: {}", out);
    assert!(out.contains("- post:/api/login"), "stdout: {}", out);
    assert!(out.contains("1 added, 1 removed, 0 changed"));

    Ok(())
}

#[test]
fn test_diff_write_updates_snapshot() -> Result<()> {
    let test = generated_project()?;
    test.write_file(
        "internal/server/api/ping.go",
        r#"package api

// Ping checks liveness.
// runapi
// @title Ping
// @method get
// @router /ping
func Ping() {}
"#,
    )?;

    let output = test.diff_command().arg("--write").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Wrote api-docs.json"));

    // The written snapshot now matches the sources.
    let output = test.diff_command().output()?;
    assert!(stdout(&output).contains("No changes since api-docs.json"));

    Ok(())
}

#[test]
fn test_diff_json_keeps_stdout_parseable() -> Result<()> {
    let test = generated_project()?;
    test.write_file(
        "internal/server/api/logout.go",
        "package api\n\n// runapi\n// @title Logout\n// @method post\n// @router /api/logout\n// @body LogoutRequest\nfunc Logout() {}\n",
    )?;

    let output = test.diff_command().arg("--json").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("unresolved-type"));
    let diff: Value = serde_json::from_str(&stdout(&output)).context("diff should be JSON")?;
    assert_eq!(diff["added"][0]["title"], "Logout");

    Ok(())
}

#[test]
fn test_diff_blocked_by_invalid_docs() -> Result<()> {
    let test = generated_project()?;
    test.write_file(
        "internal/server/api/admin.go",
        "package api\n\n// runapi\n// @title Admin\n// @method get\nfunc Admin() {}\n",
    )?;

    let output = test.diff_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("missing @router or @url"));
    assert!(stderr(&output).contains("cannot compare against api-docs.json"));

    Ok(())
}
