//! Composite response bodies: `Base{field=Type, ...}`.
//!
//! The base type is flattened first. Each override then either replaces an
//! existing top-level leaf of the same name with an `object` placeholder, or
//! appends a new placeholder, and appends the override type flattened under
//! `"<field>."`.

use std::path::Path;

use crate::core::{
    descriptor::Parameter,
    directive::{FieldOverride, ParamType},
    flatten::Flattener,
    resolve::{ResolveError, Resolver},
};

/// An override whose type could not be resolved; it contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOverride {
    pub type_token: String,
    pub error: ResolveError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeOutput {
    pub params: Vec<Parameter>,
    pub skipped: Vec<SkippedOverride>,
}

/// Expand a composite reference appearing in `file`.
///
/// Fails only when the base type cannot be resolved.
pub fn expand_composite(
    resolver: Resolver<'_>,
    flattener: &Flattener<'_>,
    base: &str,
    overrides: &[FieldOverride],
    file: &Path,
) -> Result<CompositeOutput, ResolveError> {
    let base_id = resolver.resolve(base, file)?;
    let mut output = CompositeOutput {
        params: flattener.flatten(base_id, ""),
        skipped: Vec::new(),
    };

    for FieldOverride { field, type_token } in overrides {
        let target = match resolver.resolve(type_token, file) {
            Ok(id) => id,
            Err(error) => {
                output.skipped.push(SkippedOverride {
                    type_token: type_token.clone(),
                    error,
                });
                continue;
            }
        };

        match output.params.iter_mut().find(|p| &p.name == field) {
            Some(existing) => existing.param_type = ParamType::Object,
            None => output.params.push(Parameter {
                name: field.clone(),
                param_type: ParamType::Object,
                required: true,
                remark: format!("{} info", field),
            }),
        }

        output
            .params
            .extend(flattener.flatten(target, &format!("{}.", field)));
    }

    Ok(output)
}
