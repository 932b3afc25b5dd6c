//! `tree-sitter-go`-backed `SyntaxFrontend`.
//!
//! This is an *extraction* layer over a real external grammar, not a
//! hand-written Go parser -- spec.md's Non-goal (a) excludes building a
//! full parser/formatter, and `tree-sitter-go` already is one. What lives
//! here is: walk the concrete syntax tree, pull out the declarations,
//! specs, and fields the engine needs identifier keys and byte spans for,
//! and associate comment tokens with the entity they document using the
//! same leading/trailing positional heuristic go/ast itself uses (a
//! comment group is a leading doc iff it ends on the line directly above
//! its entity with no blank line between; it is a trailing EOL iff it
//! starts on the entity's own last line).
//!
//! Node-kind and field names below follow the `tree-sitter-go` grammar as
//! pinned in `Cargo.toml`. Anything not recognized falls back to a
//! conservative `Ident`/raw-text representation rather than panicking --
//! shape comparisons against an unrecognized node will simply never
//! match, which is safe (it can only make the engine *reject* a snippet
//! it should have accepted, never silently misapply one).

use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser};

use crate::ast::{
    Decl, Field, File, FuncDecl, InterfaceMember, Span, TypeDecl, TypeSpec, ValueDecl, ValueSpec,
    ValueTok,
};
use crate::comment::{Attachment, CommentGroup, CommentGroupKind};
use crate::expr::{ChanDir, Expr, TypeExpr};
use crate::frontend::SyntaxFrontend;
use docrw_text::SourceBuf;

pub struct TreeSitterGoFrontend;

impl Default for TreeSitterGoFrontend {
    fn default() -> Self {
        Self
    }
}

impl SyntaxFrontend for TreeSitterGoFrontend {
    fn parse_file(&self, path: &Path, bytes: &[u8]) -> anyhow::Result<File> {
        let mut parser = Parser::new();
        let language = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| anyhow::anyhow!("failed to load tree-sitter-go grammar: {e}"))?;
        let tree = parser
            .parse(bytes, None)
            .ok_or_else(|| anyhow::anyhow!("tree-sitter produced no parse tree for {path:?}"))?;
        let root = tree.root_node();

        let mut groups = group_comments(collect_comments(root, bytes));

        let mut package_name = String::new();
        let mut package_doc = None;
        let mut decls = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_clause" => {
                    if let Some(id) = child.child_by_field_name("name") {
                        package_name = text(id, bytes).to_string();
                    } else {
                        package_name = last_ident_text(child, bytes);
                    }
                    let line = child.start_position().row + 1;
                    package_doc = take_leading(&mut groups, line);
                }
                "function_declaration" => {
                    decls.push(Decl::Func(func_decl(child, bytes, &mut groups, false)));
                }
                "method_declaration" => {
                    decls.push(Decl::Func(func_decl(child, bytes, &mut groups, true)));
                }
                "type_declaration" => {
                    decls.push(Decl::Type(type_decl(child, bytes, &mut groups)));
                }
                "var_declaration" => {
                    decls.push(Decl::Value(value_decl(
                        child,
                        bytes,
                        &mut groups,
                        ValueTok::Var,
                    )));
                }
                "const_declaration" => {
                    decls.push(Decl::Value(value_decl(
                        child,
                        bytes,
                        &mut groups,
                        ValueTok::Const,
                    )));
                }
                _ => {}
            }
        }

        let floating_comments = groups
            .into_iter()
            .map(|mut g| {
                g.attachment = Attachment::Floating;
                g
            })
            .collect();

        Ok(File {
            path: path.to_path_buf(),
            package_name,
            buf: SourceBuf::new(bytes.to_vec()),
            package_doc,
            decls,
            floating_comments,
        })
    }
}

// ---------------------------------------------------------------------
// Comment collection & association
// ---------------------------------------------------------------------

struct RawComment {
    start: usize,
    end: usize,
    start_line: usize,
    end_line: usize,
    text: String,
}

fn collect_comments(node: Node, src: &[u8]) -> Vec<RawComment> {
    let mut out = Vec::new();
    collect_comments_rec(node, src, &mut out);
    out.sort_by_key(|c| c.start);
    out
}

fn collect_comments_rec(node: Node, src: &[u8], out: &mut Vec<RawComment>) {
    if node.kind() == "comment" {
        out.push(RawComment {
            start: node.start_byte(),
            end: node.end_byte(),
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            text: text(node, src).to_string(),
        });
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comments_rec(child, src, out);
    }
}

/// Merge consecutive single-line `//` comments with no gap between them
/// into one group; a `/*...*/` token is always its own group.
fn group_comments(raw: Vec<RawComment>) -> Vec<CommentGroup> {
    let mut groups = Vec::new();
    let mut iter = raw.into_iter().peekable();
    while let Some(first) = iter.next() {
        if first.text.starts_with("/*") {
            groups.push(CommentGroup {
                kind: CommentGroupKind::Block(first.text),
                attachment: Attachment::Floating,
                start: first.start,
                end: first.end,
                start_line: first.start_line,
                end_line: first.end_line,
            });
            continue;
        }
        let mut lines = vec![first.text];
        let start = first.start;
        let mut end = first.end;
        let mut end_line = first.end_line;
        let start_line = first.start_line;
        while let Some(next) = iter.peek() {
            if next.text.starts_with("/*") || next.start_line != end_line + 1 {
                break;
            }
            let next = iter.next().unwrap();
            end = next.end;
            end_line = next.end_line;
            lines.push(next.text);
        }
        groups.push(CommentGroup {
            kind: CommentGroupKind::Line(lines),
            attachment: Attachment::Floating,
            start,
            end,
            start_line,
            end_line,
        });
    }
    groups
}

/// Claim the (unclaimed) group ending exactly one line above `entity_line`,
/// i.e. a leading doc with no blank line separating it from its entity.
fn take_leading(groups: &mut Vec<CommentGroup>, entity_line: usize) -> Option<CommentGroup> {
    let idx = groups
        .iter()
        .position(|g| g.end_line + 1 == entity_line)?;
    let mut g = groups.remove(idx);
    g.attachment = Attachment::Leading;
    Some(g)
}

/// Claim the (unclaimed) group starting on `entity_line` at or after
/// `after_byte` -- a trailing EOL comment on the entity's own line.
fn take_trailing(
    groups: &mut Vec<CommentGroup>,
    entity_line: usize,
    after_byte: usize,
) -> Option<CommentGroup> {
    let idx = groups
        .iter()
        .position(|g| g.start_line == entity_line && g.start >= after_byte)?;
    let mut g = groups.remove(idx);
    g.attachment = Attachment::Trailing;
    Some(g)
}

// ---------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------

fn span(node: Node) -> Span {
    Span {
        start: node.start_byte(),
        end: node.end_byte(),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
    }
}

fn func_decl(
    node: Node,
    src: &[u8],
    groups: &mut Vec<CommentGroup>,
    is_method: bool,
) -> FuncDecl {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, src).to_string())
        .unwrap_or_default();
    let receiver = if is_method {
        node.child_by_field_name("receiver")
            .and_then(|recv_list| recv_list.named_child(0))
            .and_then(|param| param.child_by_field_name("type"))
            .map(|t| type_expr(t, src).printed())
    } else {
        None
    };
    let has_body = node.child_by_field_name("body").is_some();
    let sp = span(node);
    let doc = take_leading(groups, sp.start_line);
    let eol = take_trailing(groups, sp.end_line, sp.end);
    FuncDecl {
        name,
        receiver,
        doc,
        eol,
        has_body,
        position: sp,
    }
}

fn has_paren_block(node: Node, src: &[u8]) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| text(c, src) == "(")
}

fn type_decl(node: Node, src: &[u8], groups: &mut Vec<CommentGroup>) -> TypeDecl {
    let sp = span(node);
    let is_block = has_paren_block(node, src);
    let decl_doc = take_leading(groups, sp.start_line);
    let mut specs = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "type_spec" && child.kind() != "type_alias" {
            continue;
        }
        let spec_span = span(child);
        let name = child
            .child_by_field_name("name")
            .map(|n| text(n, src).to_string())
            .unwrap_or_default();
        let ty_node = child.child_by_field_name("type");
        let ty = ty_node
            .map(|n| type_expr(n, src))
            .unwrap_or(TypeExpr::Ident(String::new()));
        let (doc, eol) = if is_block {
            (
                take_leading(groups, spec_span.start_line),
                take_trailing(groups, spec_span.end_line, spec_span.end),
            )
        } else {
            (None, take_trailing(groups, spec_span.end_line, spec_span.end))
        };
        specs.push(TypeSpec {
            name,
            ty,
            doc,
            eol,
            position: spec_span,
        });
    }
    TypeDecl {
        is_block,
        specs,
        doc: decl_doc,
        position: sp,
    }
}

fn value_decl(
    node: Node,
    src: &[u8],
    groups: &mut Vec<CommentGroup>,
    tok: ValueTok,
) -> ValueDecl {
    let sp = span(node);
    let is_block = has_paren_block(node, src);
    let decl_doc = take_leading(groups, sp.start_line);
    let spec_kind = match tok {
        ValueTok::Var => "var_spec",
        ValueTok::Const => "const_spec",
    };
    let mut specs = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != spec_kind {
            continue;
        }
        let spec_span = span(child);
        let mut name_cursor = child.walk();
        let names: Vec<String> = child
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| text(n, src).to_string())
            .collect();
        let eol = take_trailing(groups, spec_span.end_line, spec_span.end);
        let doc = if is_block {
            take_leading(groups, spec_span.start_line)
        } else {
            None
        };
        specs.push(ValueSpec {
            names,
            doc,
            eol,
            position: spec_span,
        });
    }
    ValueDecl {
        tok,
        is_block,
        specs,
        doc: decl_doc,
        position: sp,
    }
}

// ---------------------------------------------------------------------
// Struct fields / interface members
// ---------------------------------------------------------------------

fn struct_fields(node: Node, src: &[u8], groups: &mut Vec<CommentGroup>) -> Vec<Field> {
    let Some(list) = node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    let mut cursor = list.walk();
    for child in list.children(&mut cursor) {
        if child.kind() != "field_declaration" {
            continue;
        }
        let f_span = span(child);
        let mut name_cursor = child.walk();
        let names: Vec<String> = child
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| text(n, src).to_string())
            .collect();
        let ty = child
            .child_by_field_name("type")
            .map(|n| type_expr(n, src))
            .unwrap_or(TypeExpr::Ident(String::new()));
        let tag = child
            .child_by_field_name("tag")
            .map(|n| text(n, src).to_string());
        let doc = take_leading(groups, f_span.start_line);
        let eol = take_trailing(groups, f_span.end_line, f_span.end);
        fields.push(Field {
            names,
            ty,
            tag,
            doc,
            eol,
            position: f_span,
        });
    }
    fields
}

fn interface_members(
    node: Node,
    src: &[u8],
    groups: &mut Vec<CommentGroup>,
) -> Vec<InterfaceMember> {
    let mut members = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "method_elem" | "method_spec" => {
                let m_span = span(child);
                let name = child
                    .child_by_field_name("name")
                    .map(|n| text(n, src).to_string())
                    .unwrap_or_default();
                let params = child
                    .child_by_field_name("parameters")
                    .map(|p| parameter_types(p, src))
                    .unwrap_or_default();
                let results = child
                    .child_by_field_name("result")
                    .map(|r| result_types(r, src))
                    .unwrap_or_default();
                let doc = take_leading(groups, m_span.start_line);
                let eol = take_trailing(groups, m_span.end_line, m_span.end);
                members.push(InterfaceMember::Method {
                    name,
                    params,
                    results,
                    doc,
                    eol,
                    position: m_span,
                });
            }
            "type_elem" | "type_identifier" | "qualified_type" | "generic_type"
            | "pointer_type" => {
                let m_span = span(child);
                let ty = type_expr(child, src);
                let doc = take_leading(groups, m_span.start_line);
                let eol = take_trailing(groups, m_span.end_line, m_span.end);
                members.push(InterfaceMember::Embedded {
                    ty,
                    doc,
                    eol,
                    position: m_span,
                });
            }
            _ => {}
        }
    }
    members
}

fn parameter_types(list: Node, src: &[u8]) -> Vec<TypeExpr> {
    let mut out = Vec::new();
    let mut cursor = list.walk();
    for child in list.children(&mut cursor) {
        if child.kind() == "parameter_declaration" || child.kind() == "variadic_parameter_declaration" {
            if let Some(t) = child.child_by_field_name("type") {
                out.push(type_expr(t, src));
            }
        }
    }
    out
}

fn result_types(node: Node, src: &[u8]) -> Vec<TypeExpr> {
    if node.kind() == "parameter_list" {
        parameter_types(node, src)
    } else {
        vec![type_expr(node, src)]
    }
}

// ---------------------------------------------------------------------
// Type expressions
// ---------------------------------------------------------------------

fn type_expr(node: Node, src: &[u8]) -> TypeExpr {
    // Generic type-set unions (`A | B | ~C`) are detected structurally:
    // any direct child token literally `|` means this node is a union of
    // its other named children, regardless of what the grammar happens
    // to name the wrapping node.
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    if children.iter().any(|c| text(*c, src) == "|") {
        let terms = children
            .iter()
            .filter(|c| c.is_named())
            .map(|c| type_term(*c, src))
            .collect();
        return TypeExpr::Union(terms);
    }

    match node.kind() {
        "type_identifier" | "identifier" => TypeExpr::Ident(text(node, src).to_string()),
        "qualified_type" => {
            let pkg = node
                .child_by_field_name("package")
                .map(|n| text(n, src).to_string())
                .unwrap_or_default();
            let name = node
                .child_by_field_name("name")
                .map(|n| text(n, src).to_string())
                .unwrap_or_default();
            TypeExpr::Selector(pkg, name)
        }
        "pointer_type" => {
            let inner = node.named_child(0).map(|n| type_expr(n, src));
            TypeExpr::Pointer(Box::new(inner.unwrap_or(TypeExpr::Ident(String::new()))))
        }
        "slice_type" => {
            let elem = node
                .child_by_field_name("element")
                .map(|n| type_expr(n, src))
                .unwrap_or(TypeExpr::Ident(String::new()));
            TypeExpr::Slice(Box::new(elem))
        }
        "array_type" => {
            let len = node
                .child_by_field_name("length")
                .map(|n| expr_from(n, src))
                .unwrap_or(Expr::IntLit(String::new()));
            let elem = node
                .child_by_field_name("element")
                .map(|n| type_expr(n, src))
                .unwrap_or(TypeExpr::Ident(String::new()));
            TypeExpr::Array(len, Box::new(elem))
        }
        "map_type" => {
            let key = node
                .child_by_field_name("key")
                .map(|n| type_expr(n, src))
                .unwrap_or(TypeExpr::Ident(String::new()));
            let value = node
                .child_by_field_name("value")
                .map(|n| type_expr(n, src))
                .unwrap_or(TypeExpr::Ident(String::new()));
            TypeExpr::Map(Box::new(key), Box::new(value))
        }
        "channel_type" => {
            let raw = text(node, src);
            let dir = if raw.starts_with("<-chan") {
                ChanDir::RecvOnly
            } else if raw.starts_with("chan<-") {
                ChanDir::SendOnly
            } else {
                ChanDir::Bidirectional
            };
            let value = node
                .child_by_field_name("value")
                .map(|n| type_expr(n, src))
                .unwrap_or(TypeExpr::Ident(String::new()));
            TypeExpr::Chan(dir, Box::new(value))
        }
        "function_type" => {
            let params = node
                .child_by_field_name("parameters")
                .map(|p| parameter_types(p, src))
                .unwrap_or_default();
            let results = node
                .child_by_field_name("result")
                .map(|r| result_types(r, src))
                .unwrap_or_default();
            TypeExpr::Func(params, results)
        }
        "struct_type" => {
            let mut dummy_groups = Vec::new();
            TypeExpr::Struct(struct_fields(node, src, &mut dummy_groups))
        }
        "interface_type" => {
            let mut dummy_groups = Vec::new();
            TypeExpr::Interface(interface_members(node, src, &mut dummy_groups))
        }
        "parenthesized_type" => {
            let inner = node.named_child(0).map(|n| type_expr(n, src));
            TypeExpr::Paren(Box::new(inner.unwrap_or(TypeExpr::Ident(String::new()))))
        }
        "generic_type" => {
            // Instantiation of a generic type (e.g. `Stack[int]`); we
            // compare generic instantiations by base name only.
            let base = node
                .child_by_field_name("type")
                .map(|n| text(n, src).to_string())
                .unwrap_or_else(|| text(node, src).to_string());
            TypeExpr::Ident(base)
        }
        _ => TypeExpr::Ident(text(node, src).to_string()),
    }
}

fn type_term(node: Node, src: &[u8]) -> TypeExpr {
    let raw = text(node, src);
    if let Some(rest) = raw.strip_prefix('~') {
        let inner = node
            .named_child(0)
            .map(|n| type_expr(n, src))
            .unwrap_or(TypeExpr::Ident(rest.trim().to_string()));
        TypeExpr::Tilde(Box::new(inner))
    } else {
        type_expr(node, src)
    }
}

fn expr_from(node: Node, src: &[u8]) -> Expr {
    match node.kind() {
        "int_literal" | "float_literal" => Expr::IntLit(text(node, src).to_string()),
        "interpreted_string_literal" | "raw_string_literal" => {
            Expr::StrLit(text(node, src).to_string())
        }
        "identifier" => Expr::Ident(text(node, src).to_string()),
        "selector_expression" => {
            let operand = node
                .child_by_field_name("operand")
                .map(|n| expr_from(n, src))
                .unwrap_or(Expr::Ident(String::new()));
            let field = node
                .child_by_field_name("field")
                .map(|n| text(n, src).to_string())
                .unwrap_or_default();
            Expr::Selector(Box::new(operand), field)
        }
        "unary_expression" => {
            let operand = node
                .child_by_field_name("operand")
                .map(|n| expr_from(n, src))
                .unwrap_or(Expr::Ident(String::new()));
            let op = operator_text(node, src);
            Expr::Unary(op, Box::new(operand))
        }
        "binary_expression" => {
            let left = node
                .child_by_field_name("left")
                .map(|n| expr_from(n, src))
                .unwrap_or(Expr::Ident(String::new()));
            let right = node
                .child_by_field_name("right")
                .map(|n| expr_from(n, src))
                .unwrap_or(Expr::Ident(String::new()));
            let op = operator_text(node, src);
            Expr::Binary(op, Box::new(left), Box::new(right))
        }
        "call_expression" => {
            let func = node
                .child_by_field_name("function")
                .map(|n| expr_from(n, src))
                .unwrap_or(Expr::Ident(String::new()));
            let args = node
                .child_by_field_name("arguments")
                .map(|args_node| {
                    let mut c = args_node.walk();
                    args_node
                        .named_children(&mut c)
                        .map(|a| expr_from(a, src))
                        .collect()
                })
                .unwrap_or_default();
            Expr::Call(Box::new(func), args)
        }
        "parenthesized_expression" => {
            let inner = node
                .named_child(0)
                .map(|n| expr_from(n, src))
                .unwrap_or(Expr::Ident(String::new()));
            Expr::Paren(Box::new(inner))
        }
        _ => Expr::Ident(text(node, src).to_string()),
    }
}

/// Best-effort extraction of an operator symbol from a unary/binary
/// expression node when the grammar doesn't expose an `operator` field:
/// scan the node's immediate children for the first anonymous token that
/// looks like an operator.
fn operator_text(node: Node, src: &[u8]) -> String {
    if let Some(op) = node.child_by_field_name("operator") {
        return text(op, src).to_string();
    }
    const OPS: &[&str] = &[
        "+", "-", "*", "/", "%", "&", "|", "^", "<<", ">>", "&^", "==", "!=", "<", "<=", ">", ">=",
        "&&", "||", "!",
    ];
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.is_named() {
            let t = text(child, src);
            if OPS.contains(&t) {
                return t.to_string();
            }
        }
    }
    String::new()
}

fn text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn last_ident_text(node: Node, src: &[u8]) -> String {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.is_named())
        .last()
        .map(|n| text(n, src).to_string())
        .unwrap_or_default()
}

/// Exposed for `docrw-edit`'s struct/interface recursion, which needs to
/// walk a `TypeExpr::Struct`/`TypeExpr::Interface` it already has in hand
/// rather than re-parsing.
pub fn struct_fields_of(ty: &TypeExpr) -> Option<&[Field]> {
    match ty {
        TypeExpr::Struct(fields) => Some(fields),
        _ => None,
    }
}

pub fn interface_members_of(ty: &TypeExpr) -> Option<&[InterfaceMember]> {
    match ty {
        TypeExpr::Interface(members) => Some(members),
        _ => None,
    }
}

#[allow(dead_code)]
fn unused_path_hint(p: &Path) -> PathBuf {
    p.to_path_buf()
}
