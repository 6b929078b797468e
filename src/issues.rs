//! Issue types produced while building documentation.
//!
//! Each issue is self-contained: the reporter only needs the issue itself to
//! print it. Warnings never stop a run; errors block output.

use std::path::{Path, PathBuf};

use enum_dispatch::enum_dispatch;

use crate::core::{directive::DirectiveError, validate::MissingField};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingField,
    MalformedDirective,
    UnresolvedType,
    DuplicateType,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MissingField => write!(f, "missing-field"),
            Rule::MalformedDirective => write!(f, "malformed-directive"),
            Rule::UnresolvedType => write!(f, "unresolved-type"),
            Rule::DuplicateType => write!(f, "duplicate-type"),
        }
    }
}

// ============================================================
// Source Context
// ============================================================

/// Where an issue was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub file: PathBuf,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, when known.
    pub column: Option<usize>,
    /// Documented function the issue belongs to.
    pub function: Option<String>,
}

impl SourceContext {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column: None,
            function: None,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file
    }
}

// ============================================================
// Issue Types
// ============================================================

/// A documented function is missing required directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFieldIssue {
    pub context: SourceContext,
    pub missing: Vec<MissingField>,
}

impl MissingFieldIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MissingField
    }
}

/// A directive line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedDirectiveIssue {
    pub context: SourceContext,
    pub error: DirectiveError,
}

impl MalformedDirectiveIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MalformedDirective
    }
}

/// A referenced type could not be found; the reference was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTypeIssue {
    pub context: SourceContext,
    /// The type token as written.
    pub type_token: String,
    pub reason: String,
}

impl UnresolvedTypeIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnresolvedType
    }
}

/// A registry key declared more than once; the first declaration is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTypeIssue {
    /// Location of the ignored declaration.
    pub context: SourceContext,
    pub key: String,
    /// File of the declaration that is used instead.
    pub kept: PathBuf,
}

impl DuplicateTypeIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DuplicateType
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingField(MissingFieldIssue),
    MalformedDirective(MalformedDirectiveIssue),
    UnresolvedType(UnresolvedTypeIssue),
    DuplicateType(DuplicateTypeIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MissingField(_) => MissingFieldIssue::severity(),
            Issue::MalformedDirective(_) => MalformedDirectiveIssue::severity(),
            Issue::UnresolvedType(_) => UnresolvedTypeIssue::severity(),
            Issue::DuplicateType(_) => DuplicateTypeIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::MissingField(_) => MissingFieldIssue::rule(),
            Issue::MalformedDirective(_) => MalformedDirectiveIssue::rule(),
            Issue::UnresolvedType(_) => UnresolvedTypeIssue::rule(),
            Issue::DuplicateType(_) => DuplicateTypeIssue::rule(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Trait for types that can be reported to CLI.
///
/// Implemented by every issue type; dispatched on [`Issue`] with
/// `enum_dispatch`.
#[enum_dispatch]
pub trait Report {
    fn context(&self) -> &SourceContext;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MissingFieldIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        let fields: Vec<String> = self.missing.iter().map(ToString::to_string).collect();
        format!("missing {}", fields.join(", "))
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("every documented endpoint needs @title, @method and @router or @url")
    }
}

impl Report for MalformedDirectiveIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        format!("{}: {}", self.error.key, self.error.kind)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("the directive line was ignored".to_string())
    }
}

impl Report for UnresolvedTypeIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        format!("cannot resolve type '{}'", self.type_token)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.reason.clone())
    }
}

impl Report for DuplicateTypeIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        format!("type '{}' is declared more than once", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("using the declaration in {}", self.kept.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::directive::DirectiveErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_names() {
        assert_eq!(Rule::MissingField.to_string(), "missing-field");
        assert_eq!(Rule::MalformedDirective.to_string(), "malformed-directive");
        assert_eq!(Rule::UnresolvedType.to_string(), "unresolved-type");
        assert_eq!(Rule::DuplicateType.to_string(), "duplicate-type");
    }

    #[test]
    fn test_dispatch() {
        let issue = Issue::from(MissingFieldIssue {
            context: SourceContext::new("api/user.go", 12).in_function("Login"),
            missing: vec![MissingField::Title, MissingField::RouteOrUrl],
        });

        assert!(issue.is_error());
        assert_eq!(issue.rule(), Rule::MissingField);
        assert_eq!(issue.message(), "missing @title, @router or @url");
        assert_eq!(issue.context().function.as_deref(), Some("Login"));
    }

    #[test]
    fn test_malformed_directive_message() {
        let issue = Issue::from(MalformedDirectiveIssue {
            context: SourceContext::new("api/user.go", 3).with_column(8),
            error: DirectiveError {
                key: "@param".to_string(),
                line: 3,
                column: 8,
                kind: DirectiveErrorKind::MissingArguments {
                    expected: 4,
                    found: 2,
                },
            },
        });

        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(
            issue.message(),
            "@param: expected at least 4 arguments, found 2"
        );
    }
}
