//! Go source parsing backed by tree-sitter.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use super::{
    CommentLine, FunctionDecl, ImportSpec, ParseError, RawField, SourceFile, SourceParser,
    StructDecl,
};

/// Tree-sitter based [`SourceParser`] for `.go` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoParser;

impl GoParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_tree(&self, code: &str) -> Result<Tree, ParseError> {
        // tree_sitter::Parser is not Sync, so each call gets its own.
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ParseError::Language(e.to_string()))?;
        parser.parse(code, None).ok_or(ParseError::NoTree)
    }
}

impl SourceParser for GoParser {
    fn parse(&self, path: &Path, code: &str) -> Result<SourceFile, ParseError> {
        let tree = self.parse_tree(code)?;
        let root = tree.root_node();

        if root.has_error() {
            let (line, column) = first_error(root)
                .map(|n| (n.start_position().row + 1, n.start_position().column + 1))
                .unwrap_or((1, 1));
            return Err(ParseError::Syntax { line, column });
        }

        let mut file = SourceFile {
            path: path.to_path_buf(),
            ..Default::default()
        };

        let mut stack: Vec<Node> = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "package_clause" => {
                    if let Some(ident) = named_child_of_kind(node, "package_identifier") {
                        file.package = text(ident, code).to_string();
                    }
                }
                "import_declaration" => collect_imports(node, code, &mut file.imports),
                "type_spec" => {
                    if let Some(decl) = struct_decl(node, code) {
                        file.structs.push(decl);
                    }
                }
                "function_declaration" | "method_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        file.functions.push(FunctionDecl {
                            name: text(name, code).to_string(),
                            line: line_of(node),
                            doc: doc_comment(node, code),
                        });
                    }
                }
                _ => {}
            }

            // Children are pushed in reverse so that declarations come out in
            // source order.
            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(file)
    }
}

fn collect_imports(decl: Node, code: &str, out: &mut Vec<ImportSpec>) {
    let mut stack = vec![decl];
    while let Some(node) = stack.pop() {
        if node.kind() == "import_spec" {
            let Some(path) = node.child_by_field_name("path") else {
                continue;
            };
            out.push(ImportSpec {
                alias: node
                    .child_by_field_name("name")
                    .map(|n| text(n, code).to_string()),
                path: unquote(text(path, code)),
                line: line_of(node),
            });
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

fn struct_decl(spec: Node, code: &str) -> Option<StructDecl> {
    let name = spec.child_by_field_name("name")?;
    let ty = spec.child_by_field_name("type")?;
    if ty.kind() != "struct_type" {
        return None;
    }

    let mut fields = Vec::new();
    if let Some(list) = named_child_of_kind(ty, "field_declaration_list") {
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            if child.kind() == "field_declaration" {
                if let Some(field) = raw_field(child, code) {
                    fields.push(field);
                }
            }
        }
    }

    Some(StructDecl {
        name: text(name, code).to_string(),
        line: line_of(spec),
        fields,
    })
}

fn raw_field(node: Node, code: &str) -> Option<RawField> {
    let ty = node.child_by_field_name("type")?;

    let mut cursor = node.walk();
    let names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .map(|n| text(n, code).to_string())
        .collect();

    let mut type_token = collapse_whitespace(text(ty, code));
    if names.is_empty() && has_embedded_pointer(node) {
        type_token.insert(0, '*');
    }

    Some(RawField {
        names,
        type_token,
        tag: node
            .child_by_field_name("tag")
            .map(|t| unquote(text(t, code))),
        comment: trailing_comment(node, code),
        line: line_of(node),
    })
}

/// An embedded `*T` is spelled as an anonymous `*` token followed by the type.
fn has_embedded_pointer(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == "*");
    found
}

/// Comment that ends the line a field declaration ends on.
fn trailing_comment(node: Node, code: &str) -> Option<String> {
    let row = node.end_position().row;
    let mut found = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "comment" && child.start_position().row == row {
            found = Some(child);
        }
    }

    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.start_position().row != row {
            break;
        }
        if s.kind() == "comment" {
            found = Some(s);
        }
        sibling = s.next_sibling();
    }

    found
        .map(|c| comment_lines(text(c, code)).join(" "))
        .filter(|s| !s.is_empty())
}

/// Contiguous comment block directly above a declaration.
fn doc_comment(node: Node, code: &str) -> Vec<CommentLine> {
    let mut blocks = Vec::new();
    let mut next_row = node.start_position().row;

    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.kind() != "comment" || s.end_position().row + 1 != next_row {
            break;
        }
        next_row = s.start_position().row;
        blocks.push(s);
        sibling = s.prev_sibling();
    }

    blocks
        .into_iter()
        .rev()
        .flat_map(|c| {
            let first = line_of(c);
            comment_lines(text(c, code))
                .into_iter()
                .enumerate()
                .map(move |(i, t)| CommentLine::new(t, first + i))
        })
        .collect()
}

/// Strip comment markers; block comments yield one entry per line.
fn comment_lines(raw: &str) -> Vec<String> {
    if let Some(rest) = raw.strip_prefix("//") {
        return vec![rest.trim().to_string()];
    }
    let body = raw
        .strip_prefix("/*")
        .and_then(|s| s.strip_suffix("*/"))
        .unwrap_or(raw);
    body.lines()
        .map(|l| {
            let l = l.trim();
            l.strip_prefix('*').map(str::trim).unwrap_or(l).to_string()
        })
        .collect()
}

fn first_error(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

fn named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn text<'a>(node: Node, code: &'a str) -> &'a str {
    &code[node.byte_range()]
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

/// Value of a Go string literal: raw `` `...` `` is taken verbatim,
/// interpreted `"..."` has its escapes decoded. Exactly one delimiter is
/// removed from each end.
fn unquote(s: &str) -> String {
    if let Some(raw) = s.strip_prefix('`').and_then(|r| r.strip_suffix('`')) {
        return raw.to_string();
    }
    let Some(inner) = s.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return s.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
