//! Mapping from declared type tokens to documentation type tags.
//!
//! One leading pointer marker is stripped before lookup. Slices and arrays map
//! to `array`; anything unrecognised is treated as a custom type (`object`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type of a documented parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Int,
    Long,
    Float,
    Double,
    /// Response-side rendering of both float widths.
    Number,
    Boolean,
    File,
    Object,
    Array,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Int => "int",
            ParamType::Long => "long",
            ParamType::Float => "float",
            ParamType::Double => "double",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::File => "file",
            ParamType::Object => "object",
            ParamType::Array => "array",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the exchange a type is documented for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    pub fn map(self, token: &str) -> ParamType {
        match self {
            Direction::Request => map_request_type(token),
            Direction::Response => map_response_type(token),
        }
    }
}

enum Base {
    String,
    Int,
    Long,
    Float32,
    Float64,
    Bool,
    File,
    Any,
    Sequence,
    Custom,
}

fn classify(token: &str) -> Base {
    let token = token.strip_prefix('*').unwrap_or(token);
    if token.starts_with('[') {
        return Base::Sequence;
    }
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.as_str() {
        "string" => Base::String,
        "int" | "int8" | "int16" | "int32" | "uint" | "uint8" | "uint16" | "uint32" | "byte"
        | "rune" => Base::Int,
        "int64" | "uint64" => Base::Long,
        "float32" => Base::Float32,
        "float64" => Base::Float64,
        "bool" => Base::Bool,
        "file" => Base::File,
        "interface{}" | "any" => Base::Any,
        _ => Base::Custom,
    }
}

/// Type tag for request-side parameters (`@param`, `@body` leaves).
pub fn map_request_type(token: &str) -> ParamType {
    match classify(token) {
        Base::String => ParamType::String,
        Base::Int => ParamType::Int,
        Base::Long => ParamType::Long,
        Base::Float32 => ParamType::Float,
        Base::Float64 => ParamType::Double,
        Base::Bool => ParamType::Boolean,
        Base::File => ParamType::File,
        Base::Sequence => ParamType::Array,
        Base::Any | Base::Custom => ParamType::Object,
    }
}

/// Type tag for response-side parameters (`@response`, flattened bodies).
pub fn map_response_type(token: &str) -> ParamType {
    match classify(token) {
        Base::String => ParamType::String,
        Base::Int => ParamType::Int,
        Base::Long => ParamType::Long,
        Base::Float32 | Base::Float64 => ParamType::Number,
        Base::Bool => ParamType::Boolean,
        Base::Sequence => ParamType::Array,
        Base::File | Base::Any | Base::Custom => ParamType::Object,
    }
}
