//! Doc-comment directives.
//!
//! A function is documented only when one of its doc-comment lines is exactly
//! the marker token (`runapi` by default). Every other line of the block that
//! starts with `@` is a directive:
//!
//! ```text
//! @catalog <text>
//! @title <text>
//! @description <text>
//! @method <http-verb>
//! @router <url-template>
//! @url <url-template>
//! @remark <free text>
//! @param <name> <header|query|formData> <type-token> <true|false> [remark...]
//! @response <name> <header|body> <type-token> [remark...]
//! @response_body <TypeToken> | <Base{field=Type,...}>
//! @body <TypeToken>
//! ```
//!
//! Unknown keys are ignored. Malformed directives are reported as
//! [`DirectiveError`]s and the line is dropped.

pub mod type_map;

use std::fmt;

use crate::core::source::CommentLine;

pub use type_map::{Direction, ParamType, map_request_type, map_response_type};

/// Default marker that opts a function into documentation.
pub const DEFAULT_MARKER: &str = "runapi";

/// Location of a request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Header,
    Query,
    FormData,
}

impl ParamLocation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "header" => Some(Self::Header),
            "query" => Some(Self::Query),
            "formData" => Some(Self::FormData),
            _ => None,
        }
    }
}

/// Location of a response parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseLocation {
    Header,
    Body,
}

impl ResponseLocation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "header" => Some(Self::Header),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDirective {
    pub name: String,
    pub location: ParamLocation,
    pub param_type: ParamType,
    pub required: bool,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDirective {
    pub name: String,
    pub location: ResponseLocation,
    pub param_type: ParamType,
    pub remark: String,
}

/// One `field=Type` pair of the composite response syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOverride {
    pub field: String,
    pub type_token: String,
}

/// Type reference of `@response_body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Plain(String),
    /// `Base{field=Type, ...}`
    Composite {
        base: String,
        overrides: Vec<FieldOverride>,
    },
}

impl TypeRef {
    /// Parse a type reference. Input that is not shaped `Base{...}` (e.g. no
    /// closing brace) is taken as a plain reference.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let Some(open) = value.find('{') else {
            return TypeRef::Plain(value.to_string());
        };
        let Some(inner) = value[open + 1..].strip_suffix('}') else {
            return TypeRef::Plain(value.to_string());
        };

        let overrides = inner
            .split(',')
            .filter_map(|pair| {
                let (field, ty) = pair.split_once('=')?;
                let (field, ty) = (field.trim(), ty.trim());
                (!field.is_empty() && !ty.is_empty()).then(|| FieldOverride {
                    field: field.to_string(),
                    type_token: ty.to_string(),
                })
            })
            .collect();

        TypeRef::Composite {
            base: value[..open].trim().to_string(),
            overrides,
        }
    }
}

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Catalog(String),
    Title(String),
    Description(String),
    Method(String),
    Router(String),
    Url(String),
    Remark(String),
    Param(ParamDirective),
    Response(ResponseDirective),
    ResponseBody(TypeRef),
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveErrorKind {
    MissingArguments { expected: usize, found: usize },
    InvalidRequired(String),
    InvalidLocation(String),
}

impl fmt::Display for DirectiveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveErrorKind::MissingArguments { expected, found } => {
                write!(f, "expected at least {} arguments, found {}", expected, found)
            }
            DirectiveErrorKind::InvalidRequired(v) => {
                write!(f, "required flag must be true or false, found '{}'", v)
            }
            DirectiveErrorKind::InvalidLocation(v) => write!(f, "unknown location '{}'", v),
        }
    }
}

/// A directive line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {key} directive at line {line}, column {column}: {kind}")]
pub struct DirectiveError {
    pub key: String,
    /// 1-based source line.
    pub line: usize,
    /// 1-based column within the comment text.
    pub column: usize,
    pub kind: DirectiveErrorKind,
}

/// A directive together with the source line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDirective {
    pub line: usize,
    pub directive: Directive,
}

/// Parsed doc block of one documented function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub directives: Vec<LocatedDirective>,
    pub errors: Vec<DirectiveError>,
}

/// Whether a doc block opts in to documentation.
pub fn has_marker(lines: &[CommentLine], marker: &str) -> bool {
    lines.iter().any(|l| l.text.trim() == marker)
}

/// Parse a function's doc comment. Returns `None` when the marker is absent.
pub fn parse_doc(lines: &[CommentLine], marker: &str) -> Option<DocBlock> {
    if !has_marker(lines, marker) {
        return None;
    }

    let mut block = DocBlock::default();
    for line in lines {
        if line.text.trim() == marker {
            continue;
        }
        match parse_line(&line.text, line.line) {
            Ok(Some(directive)) => block.directives.push(LocatedDirective {
                line: line.line,
                directive,
            }),
            Ok(None) => {}
            Err(err) => block.errors.push(err),
        }
    }
    Some(block)
}

/// Parse a single comment line. `Ok(None)` for lines that carry no directive.
pub fn parse_line(text: &str, line: usize) -> Result<Option<Directive>, DirectiveError> {
    let leading = text.len() - text.trim_start().len();
    let text = text.trim();
    if !text.starts_with('@') {
        return Ok(None);
    }

    let (key, rest) = match text.find(char::is_whitespace) {
        Some(idx) => text.split_at(idx),
        None => (text, ""),
    };
    let value = rest.trim();
    let column = leading + key.len() + (rest.len() - rest.trim_start().len()) + 1;

    let error = |kind| DirectiveError {
        key: key.to_string(),
        line,
        column,
        kind,
    };

    let directive = match key {
        "@catalog" | "@title" | "@description" | "@method" | "@router" | "@url" | "@remark"
        | "@body" | "@response_body"
            if value.is_empty() =>
        {
            return Ok(None);
        }
        "@catalog" => Directive::Catalog(value.to_string()),
        "@title" => Directive::Title(value.to_string()),
        "@description" => Directive::Description(value.to_string()),
        "@method" => Directive::Method(value.to_string()),
        "@router" => Directive::Router(value.to_string()),
        "@url" => Directive::Url(value.to_string()),
        "@remark" => Directive::Remark(value.to_string()),
        "@body" => Directive::Body(value.to_string()),
        "@response_body" => Directive::ResponseBody(TypeRef::parse(value)),
        "@param" => {
            let tokens: Vec<&str> = value.split_whitespace().collect();
            if tokens.len() < 4 {
                return Err(error(DirectiveErrorKind::MissingArguments {
                    expected: 4,
                    found: tokens.len(),
                }));
            }
            let Some(location) = ParamLocation::parse(tokens[1]) else {
                tracing::debug!(line, location = tokens[1], "dropping @param with unknown location");
                return Ok(None);
            };
            let required = match tokens[3] {
                "true" => true,
                "false" => false,
                other => {
                    return Err(error(DirectiveErrorKind::InvalidRequired(other.to_string())));
                }
            };
            Directive::Param(ParamDirective {
                name: tokens[0].to_string(),
                location,
                param_type: map_request_type(tokens[2]),
                required,
                remark: tokens[4..].join(" "),
            })
        }
        "@response" => {
            let tokens: Vec<&str> = value.split_whitespace().collect();
            if value.contains('{') || tokens.len() == 1 {
                return Ok(Some(Directive::ResponseBody(TypeRef::parse(value))));
            }
            if tokens.len() < 3 {
                return Err(error(DirectiveErrorKind::MissingArguments {
                    expected: 3,
                    found: tokens.len(),
                }));
            }
            let Some(location) = ResponseLocation::parse(tokens[1]) else {
                return Err(error(DirectiveErrorKind::InvalidLocation(tokens[1].to_string())));
            };
            Directive::Response(ResponseDirective {
                name: tokens[0].to_string(),
                location,
                param_type: map_response_type(tokens[2]),
                remark: tokens[3..].join(" "),
            })
        }
        other => {
            tracing::debug!(line, key = other, "ignoring unknown directive");
            return Ok(None);
        }
    };

    Ok(Some(directive))
}
