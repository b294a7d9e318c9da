//! Render legible del árbol pendiente.
//!
//! Sólo construye texto: no resuelve nada ni toca políticas. El CLI lo usa
//! para inspeccionar un grafo antes de resolverlo.

use crate::model::node::NodeKind;
use crate::model::{Node, Operand};

const INDENT: &str = "    ";

/// Devuelve la representación indentada del árbol que cuelga de `node`.
pub fn render_tree(node: &Node) -> String {
    let mut out = String::new();
    render_node(node, 0, &mut out);
    out
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    match node.kind() {
        NodeKind::Endpoint => {
            // El slot de un endpoint nace poblado.
            match node.resolved() {
                Some(value) => line(out, depth, &value.to_string()),
                None => line(out, depth, node.hex()),
            }
        }
        NodeKind::Call { callable, args, kwargs } => {
            line(out, depth, "callable:");
            let ident = callable.ident();
            match &ident.module {
                Some(module) => line(out, depth + 1, &format!("{} ({module})", ident.qualname)),
                None => line(out, depth + 1, &ident.qualname),
            }
            if !args.is_empty() {
                line(out, depth, "args:");
                for arg in args {
                    render_operand(arg, depth + 1, out);
                }
            }
            if !kwargs.is_empty() {
                line(out, depth, "kwargs:");
                for (key, value) in kwargs {
                    line(out, depth + 1, &format!("{key}:"));
                    render_operand(value, depth + 2, out);
                }
            }
            line(out, depth, "-------");
        }
    }
}

fn render_operand(operand: &Operand, depth: usize, out: &mut String) {
    match operand {
        Operand::Node(node) => render_node(node, depth, out),
        Operand::Seq(items) => {
            for item in items {
                render_operand(item, depth, out);
            }
        }
        Operand::Map(entries) => {
            for (key, value) in entries {
                line(out, depth, &format!("{key}:"));
                render_operand(value, depth + 1, out);
            }
        }
        Operand::Value(value) => line(out, depth, &value.to_string()),
        Operand::Callable(callable) => line(out, depth, &callable.ident().qualname),
        Operand::Custom { strategy, payload } => line(out, depth, &format!("<{strategy}> {payload}")),
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}
