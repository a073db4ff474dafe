use crate::dag_box::num;
use crate::scene::{EdgeItem, Item, NodeItem, Scene};

/// Highlight styling matching the class names on paths and polygons.
pub const DEFAULT_STYLE: &str = "\
svg.dag path { fill: none; stroke: #c8c8c8; stroke-width: 1.5px; }
svg.dag path.in2, svg.dag path.out2 { stroke: #8a8a8a; }
svg.dag path.in, svg.dag path.out { stroke: #303030; stroke-width: 2px; }
svg.dag polygon { fill: #f4f4f4; stroke: #a0a0a0; stroke-width: 1px; cursor: pointer; }
svg.dag polygon.focus { fill: #ffe9a8; stroke: #303030; }
svg.dag polygon.in, svg.dag polygon.out { fill: #dcebff; stroke: #303030; }
svg.dag polygon.in2, svg.dag polygon.out2 { fill: #edf4ff; }
svg.dag text { font: 12px sans-serif; text-anchor: middle; cursor: pointer; }
";

pub fn render(scene: &Scene, style: bool) -> String {
    let canvas = &scene.canvas;
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"{}\" width=\"{}\" height=\"{}\">\n",
        canvas.class,
        num(canvas.width),
        num(canvas.height)
    ));
    if style {
        out.push_str("<style>\n");
        out.push_str(DEFAULT_STYLE);
        out.push_str("</style>\n");
    }

    for item in &canvas.items {
        match item {
            Item::Edge(e) => write_edge(&mut out, e),
            Item::Node(n) => write_node(&mut out, n),
        }
    }

    out.push_str("</svg>\n");
    out
}

fn write_edge(out: &mut String, e: &EdgeItem) {
    out.push_str(&format!(
        "<path id=\"{}\" class=\"{}\" d=\"{}\"/>\n",
        escape_xml(&e.key),
        e.class.class(),
        e.d
    ));
}

fn write_node(out: &mut String, n: &NodeItem) {
    out.push_str(&format!(
        "<g id=\"{}\" data-node=\"{}\">",
        escape_xml(&n.key),
        escape_xml(&n.target)
    ));
    out.push_str(&format!(
        "<polygon class=\"{}\" points=\"{}\"/>",
        n.class.class(),
        n.points.trim_end()
    ));
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\">{}</text>",
        num(n.label.x),
        num(n.label.y),
        escape_xml(&n.label.text)
    ));
    out.push_str("</g>\n");
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
