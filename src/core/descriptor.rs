//! API descriptors - the documented record of one endpoint.
//!
//! Descriptors serialize to the published JSON shape. Empty strings and
//! empty parameter lists are omitted; provenance (file, function, line) is
//! never serialized.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::directive::ParamType;

/// One documented parameter (a leaf after flattening).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDescriptor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub catalog: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub router: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<Parameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<Parameter>,
    #[serde(rename = "formData", skip_serializing_if = "Vec::is_empty")]
    pub form_data: Vec<Parameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<Parameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_header: Vec<Parameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_body: Vec<Parameter>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remark: String,

    #[serde(skip)]
    pub file: PathBuf,
    #[serde(skip)]
    pub function: String,
    #[serde(skip)]
    pub line: usize,
}

impl ApiDescriptor {
    /// Route if set, else the url.
    pub fn route_or_url(&self) -> &str {
        if self.router.is_empty() {
            &self.url
        } else {
            &self.router
        }
    }

    /// Logical endpoint identity: `method:route-or-url`.
    pub fn diff_key(&self) -> String {
        format!("{}:{}", self.method, self.route_or_url())
    }

    /// Structural equality over everything that is published.
    ///
    /// Router and url count as one address: only the effective route is
    /// compared, as in [`Self::diff_key`].
    /// Parameter lists compare element-wise in order, so a reordering counts
    /// as a change. Provenance is ignored.
    pub fn same_content(&self, other: &Self) -> bool {
        self.title == other.title
            && self.catalog == other.catalog
            && self.description == other.description
            && self.method == other.method
            && self.route_or_url() == other.route_or_url()
            && self.remark == other.remark
            && self.header == other.header
            && self.query == other.query
            && self.form_data == other.form_data
            && self.body == other.body
            && self.response_header == other.response_header
            && self.response_body == other.response_body
    }

    /// `file:line (function)` for messages.
    pub fn provenance(&self) -> String {
        format!("{}:{} ({})", self.file.display(), self.line, self.function)
    }
}
