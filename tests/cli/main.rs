use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod diff;
mod generate;
mod init;

const BIN_NAME: &str = "apiscribe";

/// Shared response envelope and user model used by most fixtures.
pub const MODELS: &[(&str, &str)] = &[
    ("go.mod", "module example\n\ngo 1.22\n"),
    (
        "internal/pkg/response/response.go",
        r#"package response

type Response struct {
	Code int    `json:"code"` // status code
	Msg  string `json:"msg"`  // message
	Data any    `json:"data"` // payload
}
"#,
    ),
    (
        "internal/server/model/user/user.go",
        r#"package user

type User struct {
	Id       int    `json:"id"`                 // user id
	Username string `json:"username"`           // user name
	Avatar   string `json:"avatar,omitempty"`   // avatar url
}

type LoginRequest struct {
	Username string `json:"username"` // user name
	Password string `json:"password"` // password
}
"#,
    ),
];

pub const HANDLERS: &str = r#"package api

import (
	"example/internal/pkg/response"
	"example/internal/server/model/user"
)

// Login logs a user in.
// runapi
// @catalog user
// @title User login
// @method post
// @router /api/login
// @param X-Token header string false session token
// @body user.LoginRequest
// @response_body user.User
func Login() {}

// Info returns the current user.
// runapi
// @catalog user
// @title User info
// @method get
// @url /api/info
// @response_body response.Response{data=user.User}
func Info() {}

var _ = response.Response{}
var _ = user.User{}
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stop config discovery at the project root.
        fs::create_dir_all(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// A project with the shared models and the two documented handlers.
    pub fn with_project() -> Result<Self> {
        let test = Self::new()?;
        for (path, content) in MODELS {
            test.write_file(path, content)?;
        }
        test.write_file("internal/server/api/user.go", HANDLERS)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn generate_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("generate");
        cmd
    }

    pub fn diff_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("diff");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

pub fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
