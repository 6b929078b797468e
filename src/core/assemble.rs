//! Descriptor assembly - turning a documented function into an [`ApiDescriptor`].
//!
//! Text directives overwrite (last one wins); parameter directives append in
//! source order. Type references are resolved against the file the function
//! lives in. A reference that cannot be resolved is reported and dropped, the
//! rest of the descriptor is kept.

use std::path::Path;

use crate::{
    core::{
        composite::expand_composite,
        descriptor::{ApiDescriptor, Parameter},
        directive::{
            Direction, Directive, DocBlock, LocatedDirective, ParamLocation, ResponseLocation,
            TypeRef, parse_doc,
        },
        flatten::Flattener,
        resolve::{ResolveError, Resolver},
        source::{FunctionDecl, SourceFile},
    },
    issues::{Issue, MalformedDirectiveIssue, SourceContext, UnresolvedTypeIssue},
};

/// Descriptors and issues produced from one or more files.
#[derive(Debug, Default)]
pub struct Assembled {
    pub descriptors: Vec<ApiDescriptor>,
    pub issues: Vec<Issue>,
}

impl Assembled {
    pub fn extend(&mut self, other: Assembled) {
        self.descriptors.extend(other.descriptors);
        self.issues.extend(other.issues);
    }
}

pub struct Assembler<'a> {
    resolver: Resolver<'a>,
    request: Flattener<'a>,
    response: Flattener<'a>,
    marker: &'a str,
}

impl<'a> Assembler<'a> {
    pub fn new(resolver: Resolver<'a>, marker: &'a str) -> Self {
        Self {
            resolver,
            request: Flattener::new(resolver, Direction::Request),
            response: Flattener::new(resolver, Direction::Response),
            marker,
        }
    }

    /// Assemble every documented function of `file`, in declaration order.
    pub fn assemble_file(&self, file: &SourceFile) -> Assembled {
        let mut out = Assembled::default();
        for function in &file.functions {
            if let Some(block) = parse_doc(&function.doc, self.marker) {
                self.assemble_function(&file.path, function, block, &mut out);
            }
        }
        out
    }

    fn assemble_function(&self, path: &Path, function: &FunctionDecl, block: DocBlock, out: &mut Assembled) {
        let context = |line: usize| SourceContext::new(path, line).in_function(&function.name);

        for error in block.errors {
            out.issues.push(
                MalformedDirectiveIssue {
                    context: context(error.line).with_column(error.column),
                    error,
                }
                .into(),
            );
        }

        let mut descriptor = ApiDescriptor {
            file: path.to_path_buf(),
            function: function.name.clone(),
            line: function.line,
            ..Default::default()
        };

        for LocatedDirective { line, directive } in block.directives {
            let mut unresolved = |type_token: &str, error: ResolveError| {
                tracing::warn!(
                    file = %path.display(),
                    function = %function.name,
                    type_token,
                    "{}",
                    error
                );
                out.issues.push(
                    UnresolvedTypeIssue {
                        context: context(line),
                        type_token: type_token.to_string(),
                        reason: error.to_string(),
                    }
                    .into(),
                );
            };

            match directive {
                Directive::Catalog(v) => descriptor.catalog = v,
                Directive::Title(v) => descriptor.title = v,
                Directive::Description(v) => descriptor.description = v,
                Directive::Method(v) => descriptor.method = v,
                Directive::Router(v) => descriptor.router = v,
                Directive::Url(v) => descriptor.url = v,
                Directive::Remark(v) => descriptor.remark = v,
                Directive::Param(p) => {
                    let param = Parameter {
                        name: p.name,
                        param_type: p.param_type,
                        required: p.required,
                        remark: p.remark,
                    };
                    match p.location {
                        ParamLocation::Header => descriptor.header.push(param),
                        ParamLocation::Query => descriptor.query.push(param),
                        ParamLocation::FormData => descriptor.form_data.push(param),
                    }
                }
                Directive::Response(r) => {
                    let param = Parameter {
                        name: r.name,
                        param_type: r.param_type,
                        required: true,
                        remark: r.remark,
                    };
                    match r.location {
                        ResponseLocation::Header => descriptor.response_header.push(param),
                        ResponseLocation::Body => descriptor.response_body.push(param),
                    }
                }
                Directive::Body(token) => match self.resolver.resolve(&token, path) {
                    Ok(id) => descriptor.body.extend(self.request.flatten(id, "")),
                    Err(error) => unresolved(&token, error),
                },
                Directive::ResponseBody(TypeRef::Plain(token)) => {
                    match self.resolver.resolve(&token, path) {
                        Ok(id) => descriptor
                            .response_body
                            .extend(self.response.flatten(id, "")),
                        Err(error) => unresolved(&token, error),
                    }
                }
                Directive::ResponseBody(TypeRef::Composite { base, overrides }) => {
                    match expand_composite(self.resolver, &self.response, &base, &overrides, path) {
                        Ok(output) => {
                            descriptor.response_body.extend(output.params);
                            for skipped in output.skipped {
                                unresolved(&skipped.type_token, skipped.error);
                            }
                        }
                        Err(error) => unresolved(&base, error),
                    }
                }
            }
        }

        tracing::debug!(
            function = %function.name,
            key = %descriptor.diff_key(),
            "assembled descriptor"
        );
        out.descriptors.push(descriptor);
    }
}
