use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, HANDLERS, MODELS, stderr};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["root"], ".");
    assert_eq!(parsed["output"], "api-docs.json");
    assert_eq!(parsed["marker"], "runapi");
    assert!(
        parsed.get("ignores").is_some(),
        "Config should have 'ignores' field"
    );
    assert!(
        parsed.get("docRoot").is_none(),
        "docRoot defaults to root and is omitted"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created apiscribe.json

    ----- stderr -----
    ");

    assert!(test.root().join("apiscribe.json").exists());
    let content = test.read_file("apiscribe.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("apiscribe.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: apiscribe.json already exists
    ");

    // Existing config is left untouched.
    assert_eq!(test.read_file("apiscribe.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;

    for (path, content) in MODELS {
        test.write_file(path, content)?;
    }
    test.write_file("internal/server/api/user.go", HANDLERS)?;

    let output = test.generate_command().output()?;
    assert!(
        output.status.success(),
        "Generate should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(test.root().join("api-docs.json").exists());

    Ok(())
}
