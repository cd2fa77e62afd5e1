use crate::scene::{Node, NodeKind, Surface};
use fecviz_common::Result;
use std::fmt::Write as _;
use std::path::Path;

pub fn to_svg(surface: &Surface) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        surface.width, surface.height
    );
    write_node(&mut out, surface.root(), 1);
    out.push_str("</svg>\n");
    out
}

pub fn write_svg(surface: &Surface, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, to_svg(surface))?;
    Ok(())
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    let tag = node.kind.tag();
    let _ = write!(out, "{indent}<{tag}");
    for (name, value) in node.attrs() {
        let _ = write!(out, r#" {name}="{}""#, escape(value));
    }
    match &node.kind {
        NodeKind::Text(content) => {
            let _ = writeln!(out, ">{}</{tag}>", escape(content));
        }
        _ if node.children().is_empty() => out.push_str("/>\n"),
        _ => {
            out.push_str(">\n");
            for child in node.children() {
                write_node(out, child, depth + 1);
            }
            let _ = writeln!(out, "{indent}</{tag}>");
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_nodes() {
        let mut s = Surface::new("#h", 330.0, 470.0);
        s.root_mut().append(
            Node::group()
                .with_class("bar")
                .with_child(Node::rect().with_attr("height", 10))
                .with_child(Node::text("a<b")),
        );
        let svg = to_svg(&s);
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="330" height="470">"#));
        assert!(svg.contains(r#"<g class="bar">"#));
        assert!(svg.contains(r#"<rect height="10"/>"#));
        assert!(svg.contains("<text>a&lt;b</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn empty_group_self_closes() {
        let s = Surface::new("#h", 10.0, 10.0);
        assert!(to_svg(&s).contains("  <g/>\n"));
    }
}
