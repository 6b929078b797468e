//! Descriptor validation.
//!
//! A descriptor needs a title, a method and a route or url. Violations are
//! collected across the whole batch and reported as one [`ValidationError`].

use std::fmt;

use crate::core::descriptor::ApiDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Title,
    Method,
    RouteOrUrl,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Title => write!(f, "@title"),
            MissingField::Method => write!(f, "@method"),
            MissingField::RouteOrUrl => write!(f, "@router or @url"),
        }
    }
}

/// One invalid descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub provenance: String,
    pub missing: Vec<MissingField>,
}

/// Every violation in a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documented endpoint(s) failed validation",
            self.violations.len()
        )?;
        for violation in &self.violations {
            let missing: Vec<String> = violation.missing.iter().map(ToString::to_string).collect();
            write!(f, "\n  {}: missing {}", violation.provenance, missing.join(", "))?;
        }
        Ok(())
    }
}

/// Required fields `descriptor` lacks, in a fixed order.
pub fn missing_fields(descriptor: &ApiDescriptor) -> Vec<MissingField> {
    let mut missing = Vec::new();
    if descriptor.title.is_empty() {
        missing.push(MissingField::Title);
    }
    if descriptor.method.is_empty() {
        missing.push(MissingField::Method);
    }
    if descriptor.router.is_empty() && descriptor.url.is_empty() {
        missing.push(MissingField::RouteOrUrl);
    }
    missing
}

pub fn validate(descriptors: &[ApiDescriptor]) -> Result<(), ValidationError> {
    let violations: Vec<Violation> = descriptors
        .iter()
        .filter_map(|d| {
            let missing = missing_fields(d);
            (!missing.is_empty()).then(|| Violation {
                provenance: d.provenance(),
                missing,
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}
