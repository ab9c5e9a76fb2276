//! HTML 序列化，用于检查构建结果

use super::node::NodeKind;
use super::Node;

/// 无闭合标签的元素
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

impl Node {
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.child_nodes() {
            write_node(&child, &mut out);
        }
        out
    }
}

fn write_node(node: &Node, out: &mut String) {
    let data = node.0.borrow();
    match &data.kind {
        NodeKind::Text(value) => out.push_str(&escape_text(value)),
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(&el.tag_name);
            for (name, value) in &el.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(&el.tag_name)) {
                return;
            }

            for child in &data.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag_name);
            out.push('>');
        }
    }
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
