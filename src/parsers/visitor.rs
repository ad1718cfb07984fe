//! Declaration visitor
//!
//! Walks the stub CST top-down and lowers class / function / assignment
//! statements into the declaration records of [`crate::models`]. The
//! class-nesting context is threaded through the recursion explicitly, so
//! per-file visits share no mutable state.

use crate::models::{
    AttributeDecl, ClassDecl, FunctionDecl, ParameterDecl, ParsedFile, ReturnDecl, Value,
};
use crate::parsers::comments::{CommentIndex, DocBlock};
use tracing::debug;
use tree_sitter::Node;

/// Enclosing class names, outermost first. Empty at module level.
type Nesting<'a> = &'a [String];

/// Visit a parsed module and collect its top-level declarations.
///
/// Function statements inside a class body become methods of that class,
/// never module-level functions; classes nested inside classes are
/// reachable only through their parent's `nested_classes`.
pub fn visit_module(root: &Node, source: &[u8], comments: &CommentIndex) -> ParsedFile {
    let mut parsed = ParsedFile::default();

    for stmt in root.children(&mut root.walk()) {
        match stmt.kind() {
            "class_definition" => {
                parsed
                    .classes
                    .push(visit_class(&stmt, source, comments, Vec::new(), &[]));
            }
            "function_definition" => {
                parsed
                    .functions
                    .push(visit_function(&stmt, source, comments, Vec::new()));
            }
            "decorated_definition" => {
                let decorators = collect_decorators(&stmt, source);
                if let Some(def) = stmt.child_by_field_name("definition") {
                    match def.kind() {
                        "class_definition" => parsed
                            .classes
                            .push(visit_class(&def, source, comments, decorators, &[])),
                        "function_definition" => parsed
                            .functions
                            .push(visit_function(&def, source, comments, decorators)),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    parsed
}

fn collect_decorators(decorated: &Node, source: &[u8]) -> Vec<Value> {
    decorated
        .children(&mut decorated.walk())
        .filter(|c| c.kind() == "decorator")
        .filter_map(|d| d.named_child(0).map(|expr| resolve_value(&expr, source)))
        .collect()
}

fn visit_class(
    node: &Node,
    source: &[u8],
    comments: &CommentIndex,
    decorators: Vec<Value>,
    nesting: Nesting,
) -> ClassDecl {
    let name = field_text(node, "name", source);
    let doc = DocBlock::for_line(comments, decl_line(node));

    if !nesting.is_empty() {
        debug!(class = %name, parent = %nesting.join("."), "nested class");
    }

    let mut class = ClassDecl {
        name: name.clone(),
        bases: collect_bases(node, source),
        decorators,
        methods: Vec::new(),
        class_attributes: Vec::new(),
        nested_classes: Vec::new(),
        comment: doc.brief,
    };

    let mut inner = nesting.to_vec();
    inner.push(name);

    if let Some(body) = node.child_by_field_name("body") {
        visit_class_body(&body, source, comments, &inner, &mut class);
    }

    class
}

fn visit_class_body(
    body: &Node,
    source: &[u8],
    comments: &CommentIndex,
    nesting: Nesting,
    class: &mut ClassDecl,
) {
    for stmt in body.children(&mut body.walk()) {
        match stmt.kind() {
            "function_definition" => {
                class
                    .methods
                    .push(visit_function(&stmt, source, comments, Vec::new()));
            }
            "class_definition" => {
                class
                    .nested_classes
                    .push(visit_class(&stmt, source, comments, Vec::new(), nesting));
            }
            "decorated_definition" => {
                let decorators = collect_decorators(&stmt, source);
                if let Some(def) = stmt.child_by_field_name("definition") {
                    match def.kind() {
                        "function_definition" => class
                            .methods
                            .push(visit_function(&def, source, comments, decorators)),
                        "class_definition" => class.nested_classes.push(visit_class(
                            &def, source, comments, decorators, nesting,
                        )),
                        _ => {}
                    }
                }
            }
            "expression_statement" => {
                if let Some(attr) = visit_attribute(&stmt, source, comments) {
                    class.class_attributes.push(attr);
                }
            }
            _ => {}
        }
    }
}

fn visit_function(
    node: &Node,
    source: &[u8],
    comments: &CommentIndex,
    decorators: Vec<Value>,
) -> FunctionDecl {
    let doc = DocBlock::for_line(comments, decl_line(node));

    let return_ty = node
        .child_by_field_name("return_type")
        .map(|t| resolve_type(&t, source))
        .unwrap_or_else(Value::no_value);

    FunctionDecl {
        name: field_text(node, "name", source),
        params: collect_parameters(node, source, &doc),
        decorators,
        return_type: ReturnDecl {
            ty: return_ty,
            comment: doc.ret.clone(),
        },
        comment: doc.brief,
    }
}

fn collect_parameters(func: &Node, source: &[u8], doc: &DocBlock) -> Vec<ParameterDecl> {
    let Some(params) = func.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for child in params.children(&mut params.walk()) {
        let decl = match child.kind() {
            "identifier" => Some(ParameterDecl {
                name: node_text(&child, source),
                ty: Value::no_value(),
                default: Value::no_default(),
                comment: String::new(),
            }),
            "typed_parameter" => {
                // No name field on this node kind; the pattern is its
                // first named child.
                let name = child
                    .named_child(0)
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| node_text(&n, source));
                name.map(|name| ParameterDecl {
                    name,
                    ty: child
                        .child_by_field_name("type")
                        .map(|t| resolve_type(&t, source))
                        .unwrap_or_else(Value::no_value),
                    default: Value::no_default(),
                    comment: String::new(),
                })
            }
            "default_parameter" | "typed_default_parameter" => {
                let name = child
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| node_text(&n, source));
                name.map(|name| ParameterDecl {
                    name,
                    ty: child
                        .child_by_field_name("type")
                        .map(|t| resolve_type(&t, source))
                        .unwrap_or_else(Value::no_value),
                    default: child
                        .child_by_field_name("value")
                        .map(|v| resolve_value(&v, source))
                        .unwrap_or_else(Value::no_default),
                    comment: String::new(),
                })
            }
            _ => None,
        };

        if let Some(mut decl) = decl {
            decl.comment = doc.param(&decl.name);
            out.push(decl);
        }
    }
    out
}

fn collect_bases(class: &Node, source: &[u8]) -> Vec<Value> {
    let Some(superclasses) = class.child_by_field_name("superclasses") else {
        return Vec::new();
    };

    superclasses
        .named_children(&mut superclasses.walk())
        .filter(|arg| arg.kind() != "keyword_argument" && arg.kind() != "comment")
        .map(|arg| resolve_value(&arg, source))
        .collect()
}

/// Lower an assignment statement to an attribute record. Assignments whose
/// target is not a plain identifier are not attribute declarations.
fn visit_attribute(stmt: &Node, source: &[u8], comments: &CommentIndex) -> Option<AttributeDecl> {
    let assign = stmt
        .named_child(0)
        .filter(|n| n.kind() == "assignment")?;
    let left = assign
        .child_by_field_name("left")
        .filter(|n| n.kind() == "identifier")?;

    let doc = DocBlock::for_line(comments, decl_line(stmt));
    Some(AttributeDecl {
        name: node_text(&left, source),
        value: assign
            .child_by_field_name("right")
            .map(|v| resolve_value(&v, source))
            .unwrap_or_else(Value::no_value),
        comment: doc.brief,
    })
}

/// Uniform name resolution for annotation / default / base / decorator
/// expressions. Anything outside the identifier / attribute / call /
/// literal grammar degrades to the no-value sentinel.
pub fn resolve_value(node: &Node, source: &[u8]) -> Value {
    match node.kind() {
        "identifier" => Value::name(node_text(node, source)),
        "attribute" => {
            let object = node
                .child_by_field_name("object")
                .map(|o| resolve_value(&o, source));
            let attr = node
                .child_by_field_name("attribute")
                .map(|a| node_text(&a, source));
            match (object, attr) {
                (Some(Value::Name(left)), Some(attr)) => Value::name(format!("{left}.{attr}")),
                _ => Value::no_value(),
            }
        }
        "call" => {
            let callable = node
                .child_by_field_name("function")
                .map(|f| resolve_value(&f, source))
                .unwrap_or_else(Value::no_value);
            let arguments = node
                .child_by_field_name("arguments")
                .map(|args| {
                    args.named_children(&mut args.walk())
                        .filter(|a| a.kind() != "keyword_argument" && a.kind() != "comment")
                        .map(|a| resolve_value(&a, source))
                        .collect()
                })
                .unwrap_or_default();
            Value::Call {
                callable: Box::new(callable),
                arguments,
            }
        }
        "string" => Value::name(string_content(node, source)),
        "integer" | "float" => Value::name(node_text(node, source)),
        "true" => Value::name("True"),
        "false" => Value::name("False"),
        "none" => Value::name("None"),
        _ => Value::no_value(),
    }
}

/// Resolve the expression wrapped by a `type` annotation node.
fn resolve_type(ty: &Node, source: &[u8]) -> Value {
    match ty.named_child(0) {
        Some(inner) => resolve_value(&inner, source),
        None => Value::no_value(),
    }
}

/// Literal text of a string node without its quotes.
fn string_content(node: &Node, source: &[u8]) -> String {
    let mut out = String::new();
    for child in node.children(&mut node.walk()) {
        if child.kind() == "string_content" {
            out.push_str(&node_text(&child, source));
        }
    }
    out
}

/// 1-based starting line of a declaration. For decorated definitions this
/// is the `class`/`def` line, matching the line the comment associator
/// scans upward from.
fn decl_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

fn field_text(node: &Node, field: &str, source: &[u8]) -> String {
    node.child_by_field_name(field)
        .map(|n| node_text(&n, source))
        .unwrap_or_default()
}
