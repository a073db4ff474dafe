use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::dag_box::{
    BoxProp, Closure, EdgeHighlight, EdgeId, EdgeLink, NodeBox, NodeHighlight, NodeId,
    compute_closure,
};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::grid::GridProp;
use crate::measure::TextWidth;
use crate::scene::{Canvas, EdgeItem, Item, Label, NodeItem, Scene};

/// Canvas insets that keep box borders from being clipped.
const WIDTH_INSET: f64 = 10.0;
const HEIGHT_INSET: f64 = 7.0;

/// Asks the host to re-render the diagram.
pub trait Redraw {
    fn redraw(&mut self);
}

impl<F> Redraw for F
where
    F: FnMut(),
{
    fn redraw(&mut self) {
        self()
    }
}

/// Namespace for the identity hashes of one diagram, so several diagrams can
/// share a rendering context without key collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    /// Next id from a process-wide counter: `d0`, `d1`, ...
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(format!("d{}", COUNTER.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn node_hash(&self, name: &str) -> String {
        STANDARD.encode(format!("{}:node:{}", self.0, name))
    }

    pub fn edge_hash(&self, from: &str, to: &str) -> String {
        STANDARD.encode(format!("{}:edge:{}:{}", self.0, from, to))
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Default)]
pub struct DiagramOptions {
    pub click: Option<Box<dyn FnMut(&str)>>,
    pub text_width: Option<Box<dyn TextWidth>>,
    pub instance: InstanceId,
}

/// Host input events, already resolved to the node they landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Hover(&'a str),
    Click(&'a str),
    Leave,
}

pub struct Diagram {
    grid: GridProp,
    nodes: Vec<NodeBox>,
    edges: Vec<EdgeLink>,
    index: IndexMap<String, NodeId>,
    width: f64,
    height: f64,
    focus: Option<NodeId>,
    instance: InstanceId,
    click: Option<Box<dyn FnMut(&str)>>,
    redraw: Box<dyn Redraw>,
}

impl Diagram {
    pub fn new(
        graph: &Graph,
        options: DiagramOptions,
        redraw: impl Redraw + 'static,
    ) -> Result<Self> {
        graph.validate()?;

        let grid = GridProp::for_graph(graph, options.text_width.as_deref());
        let instance = options.instance;

        let mut nodes = Vec::with_capacity(graph.nodes.len());
        let mut index = IndexMap::with_capacity(graph.nodes.len());
        for (i, (name, node)) in graph.nodes.iter().enumerate() {
            let id = NodeId(i);
            nodes.push(NodeBox::new(
                &grid,
                BoxProp {
                    id,
                    name,
                    node,
                    text: Graph::text(name, node),
                    hash: instance.node_hash(name),
                },
            ));
            index.insert(name.clone(), id);
        }

        let mut edges = Vec::with_capacity(graph.edge_count());
        for (name, node) in &graph.nodes {
            let from = index[name.as_str()];
            for out in &node.outgoing {
                let to = index[out.as_str()];
                let id = EdgeId(edges.len());
                edges.push(EdgeLink::new(from, to, instance.edge_hash(name, out)));
                nodes[from.0].add_out(id);
                nodes[to.0].add_in(id);
            }
        }

        let closures: Vec<Closure> = (0..nodes.len())
            .map(|i| compute_closure(NodeId(i), &nodes, &edges))
            .collect();
        for (node, closure) in nodes.iter_mut().zip(closures) {
            node.closure = closure;
        }

        let width = graph.width as f64 * grid.xgrid - WIDTH_INSET;
        let height = (graph.height as f64 + 1.0) * grid.ygrid - HEIGHT_INSET;

        debug!(
            instance = instance.as_str(),
            nodes = nodes.len(),
            edges = edges.len(),
            box_width = grid.box_width,
            "built diagram {width}x{height}"
        );

        Ok(Self {
            grid,
            nodes,
            edges,
            index,
            width,
            height,
            focus: None,
            instance,
            click: options.click,
            redraw: Box::new(redraw),
        })
    }

    pub fn grid(&self) -> &GridProp {
        &self.grid
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }

    pub fn nodes(&self) -> &[NodeBox] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeLink] {
        &self.edges
    }

    pub fn node_id(&self, name: &str) -> Result<NodeId> {
        self.index.get(name).copied().ok_or_else(|| Error::UnknownNode {
            name: name.to_string(),
        })
    }

    pub fn node(&self, name: &str) -> Result<&NodeBox> {
        Ok(&self.nodes[self.node_id(name)?.0])
    }

    pub fn node_highlight(&self, name: &str) -> Result<NodeHighlight> {
        Ok(self.node(name)?.highlight)
    }

    /// Highlight of the first edge `from -> to`, if there is one.
    pub fn edge_highlight(&self, from: &str, to: &str) -> Result<Option<EdgeHighlight>> {
        let (from, to) = (self.node_id(from)?, self.node_id(to)?);
        Ok(self
            .edges
            .iter()
            .find(|e| e.from == from && e.to == to)
            .map(|e| e.highlight))
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.map(|id| self.nodes[id.0].name.as_str())
    }

    /// Move the focus to `name`. Focusing the current focus does nothing;
    /// any other change redraws exactly once.
    pub fn set_focus(&mut self, name: &str) -> Result<()> {
        let id = self.node_id(name)?;
        if self.focus == Some(id) {
            return Ok(());
        }

        if let Some(prev) = self.focus.take() {
            self.apply_focus(prev, false);
        }
        self.apply_focus(id, true);
        self.focus = Some(id);
        trace!(instance = self.instance.as_str(), node = name, "focus");
        self.redraw.redraw();
        Ok(())
    }

    /// Drop the current focus, redrawing once if there was one.
    pub fn clear_focus(&mut self) {
        let Some(prev) = self.focus.take() else {
            return;
        };
        self.apply_focus(prev, false);
        trace!(
            instance = self.instance.as_str(),
            node = self.nodes[prev.0].name.as_str(),
            "unfocus"
        );
        self.redraw.redraw();
    }

    pub fn click(&mut self, name: &str) -> Result<()> {
        self.node_id(name)?;
        if let Some(click) = self.click.as_mut() {
            click(name);
        }
        Ok(())
    }

    pub fn dispatch(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Hover(name) => self.set_focus(name),
            Event::Click(name) => self.click(name),
            Event::Leave => {
                self.clear_focus();
                Ok(())
            }
        }
    }

    fn apply_focus(&mut self, id: NodeId, on: bool) {
        let plan = self.nodes[id.0].focus_plan(on);
        for (n, hl) in plan.nodes {
            self.nodes[n.0].highlight = hl;
        }
        for (e, hl) in plan.edges {
            self.edges[e.0].highlight = hl;
        }
    }

    /// Edges grouped by highlight tier, least emphasized first, then every
    /// box on top.
    pub fn render(&self) -> Scene {
        let mut items = Vec::with_capacity(self.edges.len() + self.nodes.len());

        for tier in EdgeHighlight::RENDER_ORDER {
            for e in self.edges.iter().filter(|e| e.highlight == tier) {
                items.push(Item::Edge(EdgeItem {
                    key: e.hash.clone(),
                    d: e.path(&self.nodes),
                    class: e.highlight,
                }));
            }
        }

        for n in &self.nodes {
            items.push(Item::Node(NodeItem {
                key: n.hash.clone(),
                points: n.points(),
                class: n.highlight,
                label: Label {
                    x: n.label.x,
                    y: n.label.y,
                    text: n.text.clone(),
                },
                target: n.name.clone(),
            }));
        }

        Scene {
            class: "dagbox",
            canvas: Canvas {
                class: "dag",
                width: self.width,
                height: self.height,
                items,
            },
        }
    }
}
