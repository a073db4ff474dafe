use serde::Serialize;

use crate::dag_box::{EdgeHighlight, NodeHighlight};

/// Renderable output of a diagram. Item order is draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub class: &'static str,
    pub canvas: Canvas,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canvas {
    pub class: &'static str,
    pub width: f64,
    pub height: f64,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Edge(EdgeItem),
    Node(NodeItem),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeItem {
    pub key: String,
    pub d: String,
    pub class: EdgeHighlight,
}

/// A box polygon and its label. `target` names the node that click and
/// hover events on either shape are routed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeItem {
    pub key: String,
    pub points: String,
    pub class: NodeHighlight,
    pub label: Label,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl Scene {
    pub fn edges(&self) -> impl Iterator<Item = &EdgeItem> {
        self.canvas.items.iter().filter_map(|item| match item {
            Item::Edge(e) => Some(e),
            Item::Node(_) => None,
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeItem> {
        self.canvas.items.iter().filter_map(|item| match item {
            Item::Node(n) => Some(n),
            Item::Edge(_) => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
