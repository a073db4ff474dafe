use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Graph data handed in by the host: named nodes placed on a cell grid.
///
/// `nodes` keeps insertion order, which is also the order boxes and edges
/// are built and drawn in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(rename = "n", default)]
    pub nodes: IndexMap<String, Node>,
    #[serde(rename = "w", default)]
    pub width: i64,
    #[serde(rename = "h", default)]
    pub height: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x: i64,
    pub y: i64,
    #[serde(rename = "o", default, skip_serializing_if = "Vec::is_empty")]
    pub outgoing: Vec<String>,
}

impl Node {
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            label: None,
            x,
            y,
            outgoing: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn to(mut self, targets: &[&str]) -> Self {
        self.outgoing.extend(targets.iter().map(|t| t.to_string()));
        self
    }
}

impl Graph {
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            nodes: IndexMap::new(),
            width,
            height,
        }
    }

    pub fn with_node(mut self, name: &str, node: Node) -> Self {
        self.nodes.insert(name.to_string(), node);
        self
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Display text of a node: its label, or its name when unlabeled.
    pub fn text<'a>(name: &'a str, node: &'a Node) -> &'a str {
        match node.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => name,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, node) in &self.nodes {
            if let Some(to) = node.outgoing.iter().find(|t| !self.nodes.contains_key(*t)) {
                return Err(Error::UnknownTarget {
                    from: name.clone(),
                    to: to.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.outgoing.len()).sum()
    }
}
