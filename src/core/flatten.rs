//! Struct flattening - expanding a declaration into ordered leaf parameters.
//!
//! Fields are visited in declaration order. A field whose type resolves to
//! another declaration is expanded in place: an embedded field keeps the
//! current prefix, a named field extends it with `"<name>."`. Every other
//! named field becomes one leaf; non-struct embeds contribute nothing.
//!
//! Expansion keeps the chain of declarations currently being expanded. A field
//! that would re-enter a declaration already on that chain becomes a single
//! `object` leaf instead.

use crate::core::{
    descriptor::Parameter,
    directive::{Direction, ParamType},
    registry::{DeclId, Field},
    resolve::Resolver,
};

pub struct Flattener<'a> {
    resolver: Resolver<'a>,
    direction: Direction,
}

impl<'a> Flattener<'a> {
    pub fn new(resolver: Resolver<'a>, direction: Direction) -> Self {
        Self {
            resolver,
            direction,
        }
    }

    /// Flatten `id` with every leaf name prefixed by `prefix`.
    pub fn flatten(&self, id: DeclId, prefix: &str) -> Vec<Parameter> {
        let mut out = Vec::new();
        let mut chain = Vec::new();
        self.expand(id, prefix, &mut chain, &mut out);
        out
    }

    fn expand(&self, id: DeclId, prefix: &str, chain: &mut Vec<DeclId>, out: &mut Vec<Parameter>) {
        chain.push(id);
        let decl = self.resolver.get(id);

        for field in &decl.fields {
            let token = field.type_token.strip_prefix('*').unwrap_or(&field.type_token);
            let target = is_type_name(token)
                .then(|| self.resolver.resolve(token, &decl.file).ok())
                .flatten();

            match target {
                Some(target) if chain.contains(&target) => {
                    tracing::debug!(
                        type_name = %decl.key(),
                        field = %field.name,
                        "cyclic type reference, emitting object leaf"
                    );
                    out.push(self.object_leaf(prefix, field, token));
                }
                Some(target) => {
                    let nested = if field.embedded {
                        prefix.to_string()
                    } else {
                        format!("{}{}.", prefix, field.name)
                    };
                    self.expand(target, &nested, chain, out);
                }
                None if field.embedded => {}
                None => out.push(Parameter {
                    name: format!("{}{}", prefix, field.name),
                    param_type: self.direction.map(&field.type_token),
                    required: field.required,
                    remark: field.remark.clone(),
                }),
            }
        }

        chain.pop();
    }

    fn object_leaf(&self, prefix: &str, field: &Field, token: &str) -> Parameter {
        let name = if field.embedded {
            token.rsplit('.').next().unwrap_or(token)
        } else {
            field.name.as_str()
        };
        Parameter {
            name: format!("{}{}", prefix, name),
            param_type: ParamType::Object,
            required: field.required,
            remark: field.remark.clone(),
        }
    }
}

/// `Name` or `pkg.Name`; slices, maps, channels and func types are not.
fn is_type_name(token: &str) -> bool {
    !token.is_empty()
        && token.split('.').count() <= 2
        && token
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::{ImportTable, Registry, test_support::*};
    use pretty_assertions::assert_eq;

    fn leaves(params: &[Parameter]) -> Vec<(&str, ParamType, bool)> {
        params
            .iter()
            .map(|p| (p.name.as_str(), p.param_type, p.required))
            .collect()
    }

    fn flatten(registry: &Registry, imports: &ImportTable, key: &str, direction: Direction) -> Vec<Parameter> {
        let resolver = Resolver::new(registry, imports);
        let id = registry.lookup(key).unwrap();
        Flattener::new(resolver, direction).flatten(id, "")
    }

    #[test]
    fn test_is_type_name() {
        assert!(is_type_name("User"));
        assert!(is_type_name("user.User"));
        assert!(!is_type_name("[]User"));
        assert!(!is_type_name("map[string]User"));
        assert!(!is_type_name("a.b.C"));
        assert!(!is_type_name(""));
    }

    #[test]
    fn test_named_struct_field_extends_prefix() {
        let (registry, imports) = build(&sample_files());
        let params = flatten(&registry, &imports, "user.LoginResponse", Direction::Response);

        assert_eq!(
            leaves(&params),
            vec![
                ("user.id", ParamType::Int, true),
                ("user.username", ParamType::String, true),
                ("token", ParamType::String, true),
            ]
        );
        assert_eq!(params[0].remark, "user id");
    }

    #[test]
    fn test_embedded_field_keeps_prefix() {
        let (registry, imports) = build(&sample_files());
        let params = flatten(&registry, &imports, "info.InfoResponse", Direction::Response);

        // info.User embeds user.User and adds avatar.
        assert_eq!(
            leaves(&params),
            vec![
                ("user.id", ParamType::Int, true),
                ("user.username", ParamType::String, true),
                ("user.avatar", ParamType::String, true),
            ]
        );
    }

    #[test]
    fn test_direction_controls_mapping() {
        let file = source(
            "geo/geo.go",
            "geo",
            &[],
            vec![strukt(
                "Point",
                vec![
                    field("Lat", "float64", Some(r#"json:"lat""#), None),
                    field("Tags", "[]string", Some(r#"json:"tags,omitempty""#), None),
                ],
            )],
        );
        let (registry, imports) = build(&[(file, location("geo", None))]);

        let request = flatten(&registry, &imports, "geo.Point", Direction::Request);
        let response = flatten(&registry, &imports, "geo.Point", Direction::Response);

        assert_eq!(
            leaves(&request),
            vec![("lat", ParamType::Double, true), ("tags", ParamType::Array, false)]
        );
        assert_eq!(
            leaves(&response),
            vec![("lat", ParamType::Number, true), ("tags", ParamType::Array, false)]
        );
    }

    #[test]
    fn test_non_struct_embed_dropped() {
        let file = source(
            "m/m.go",
            "m",
            &[(None, "sync")],
            vec![strukt(
                "Cache",
                vec![embedded("sync.Mutex"), field("Size", "int", Some(r#"json:"size""#), None)],
            )],
        );
        let (registry, imports) = build(&[(file, location("m", None))]);

        let params = flatten(&registry, &imports, "m.Cache", Direction::Response);
        assert_eq!(leaves(&params), vec![("size", ParamType::Int, true)]);
    }

    #[test]
    fn test_flattening_is_idempotent() {
        let (registry, imports) = build(&sample_files());
        let resolver = Resolver::new(&registry, &imports);
        let flattener = Flattener::new(resolver, Direction::Response);
        let id = registry.lookup("info.InfoResponse").unwrap();

        assert_eq!(flattener.flatten(id, "data."), flattener.flatten(id, "data."));
    }

    #[test]
    fn test_self_reference_becomes_object_leaf() {
        let file = source(
            "tree/node.go",
            "tree",
            &[],
            vec![strukt(
                "Node",
                vec![
                    field("Value", "string", Some(r#"json:"value""#), None),
                    field("Next", "*Node", Some(r#"json:"next,omitempty""#), Some("next node")),
                ],
            )],
        );
        let (registry, imports) = build(&[(file, location("tree", None))]);

        let params = flatten(&registry, &imports, "tree.Node", Direction::Response);
        assert_eq!(
            leaves(&params),
            vec![("value", ParamType::String, true), ("next", ParamType::Object, false)]
        );
        assert_eq!(params[1].remark, "next node");
    }

    #[test]
    fn test_mutual_reference_stops_at_reentry() {
        let file = source(
            "org/org.go",
            "org",
            &[],
            vec![
                strukt(
                    "Team",
                    vec![
                        field("Name", "string", Some(r#"json:"name""#), None),
                        field("Lead", "Member", Some(r#"json:"lead""#), None),
                    ],
                ),
                strukt(
                    "Member",
                    vec![
                        field("Email", "string", Some(r#"json:"email""#), None),
                        field("Team", "*Team", Some(r#"json:"team""#), None),
                    ],
                ),
            ],
        );
        let (registry, imports) = build(&[(file, location("org", None))]);

        let params = flatten(&registry, &imports, "org.Team", Direction::Response);
        assert_eq!(
            leaves(&params),
            vec![
                ("name", ParamType::String, true),
                ("lead.email", ParamType::String, true),
                ("lead.team", ParamType::Object, true),
            ]
        );
    }

    #[test]
    fn test_embedded_cycle_named_by_type() {
        let file = source(
            "loop/loop.go",
            "loop",
            &[],
            vec![
                strukt("A", vec![embedded("B"), field("X", "int", None, None)]),
                strukt("B", vec![embedded("*A"), field("Y", "int", None, None)]),
            ],
        );
        let (registry, imports) = build(&[(file, location("loop", None))]);

        let params = flatten(&registry, &imports, "loop.A", Direction::Response);
        assert_eq!(
            leaves(&params),
            vec![
                ("A", ParamType::Object, true),
                ("Y", ParamType::Int, true),
                ("X", ParamType::Int, true),
            ]
        );
    }

    #[test]
    fn test_repeated_type_on_separate_branches_is_expanded_twice() {
        let file = source(
            "trip/trip.go",
            "trip",
            &[],
            vec![
                strukt("Place", vec![field("City", "string", Some(r#"json:"city""#), None)]),
                strukt(
                    "Trip",
                    vec![
                        field("From", "Place", Some(r#"json:"from""#), None),
                        field("To", "Place", Some(r#"json:"to""#), None),
                    ],
                ),
            ],
        );
        let (registry, imports) = build(&[(file, location("trip", None))]);

        let params = flatten(&registry, &imports, "trip.Trip", Direction::Request);
        assert_eq!(
            leaves(&params),
            vec![
                ("from.city", ParamType::String, true),
                ("to.city", ParamType::String, true),
            ]
        );
    }
}
