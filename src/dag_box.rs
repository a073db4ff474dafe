//! Node boxes and the edges between them.
//!
//! Boxes and edges live in flat vectors owned by the diagram and refer to
//! each other through `NodeId`/`EdgeId` handles.

use indexmap::IndexSet;
use serde::Serialize;

use crate::graph::Node;
use crate::grid::GridProp;

/// Depth of the arrow notch on the sides of a box that carry edges.
pub const NOTCH: f64 = 6.0;
/// Distance left of the target box where an edge turns vertical.
pub const TURN_OFFSET: f64 = 6.0;
/// Baseline shift that vertically centers a label in its box.
pub const LABEL_BASELINE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeHighlight {
    #[default]
    None,
    Focus,
    In,
    In2,
    Out,
    Out2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeHighlight {
    #[default]
    None,
    In,
    In2,
    Out,
    Out2,
}

impl NodeHighlight {
    pub fn class(self) -> &'static str {
        match self {
            NodeHighlight::None => "none",
            NodeHighlight::Focus => "focus",
            NodeHighlight::In => "in",
            NodeHighlight::In2 => "in2",
            NodeHighlight::Out => "out",
            NodeHighlight::Out2 => "out2",
        }
    }
}

impl EdgeHighlight {
    /// Draw order, least emphasized first.
    pub const RENDER_ORDER: [EdgeHighlight; 5] = [
        EdgeHighlight::None,
        EdgeHighlight::In2,
        EdgeHighlight::Out2,
        EdgeHighlight::In,
        EdgeHighlight::Out,
    ];

    pub fn class(self) -> &'static str {
        match self {
            EdgeHighlight::None => "none",
            EdgeHighlight::In => "in",
            EdgeHighlight::In2 => "in2",
            EdgeHighlight::Out => "out",
            EdgeHighlight::Out2 => "out2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything needed to place one box.
pub struct BoxProp<'a> {
    pub id: NodeId,
    pub name: &'a str,
    pub node: &'a Node,
    pub text: &'a str,
    pub hash: String,
}

/// Upstream and downstream reach of one node.
///
/// The `2` sets hold only what is two or more hops away; anything already
/// one hop away lives in the direct sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Closure {
    pub in_nodes: IndexSet<NodeId>,
    pub out_nodes: IndexSet<NodeId>,
    pub in_nodes2: IndexSet<NodeId>,
    pub out_nodes2: IndexSet<NodeId>,
    pub in_edges2: IndexSet<EdgeId>,
    pub out_edges2: IndexSet<EdgeId>,
}

/// Highlight assignments produced by focusing or unfocusing a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusPlan {
    pub nodes: Vec<(NodeId, NodeHighlight)>,
    pub edges: Vec<(EdgeId, EdgeHighlight)>,
}

#[derive(Debug, Clone)]
pub struct NodeBox {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) hash: String,
    pub(crate) text: String,
    pub(crate) grid_x: i64,
    pub(crate) grid_y: i64,

    pub(crate) xleft: f64,
    pub(crate) xright: f64,
    pub(crate) ytop: f64,
    pub(crate) ybottom: f64,
    pub(crate) ymid: f64,
    pub(crate) label: Point,

    pub(crate) in_edges: Vec<EdgeId>,
    pub(crate) out_edges: Vec<EdgeId>,
    pub(crate) closure: Closure,

    pub(crate) highlight: NodeHighlight,
}

impl NodeBox {
    pub fn new(grid: &GridProp, prop: BoxProp<'_>) -> Self {
        let xleft = prop.node.x as f64 * grid.xgrid;
        let ytop = prop.node.y as f64 * grid.ygrid;
        Self {
            id: prop.id,
            name: prop.name.to_string(),
            hash: prop.hash,
            text: prop.text.to_string(),
            grid_x: prop.node.x,
            grid_y: prop.node.y,
            xleft,
            xright: xleft + grid.box_width,
            ytop,
            ybottom: ytop + grid.box_height,
            ymid: ytop + grid.box_height / 2.0,
            label: Point::new(
                xleft + grid.box_width / 2.0,
                ytop + grid.box_height / 2.0 + LABEL_BASELINE,
            ),
            in_edges: Vec::new(),
            out_edges: Vec::new(),
            closure: Closure::default(),
            highlight: NodeHighlight::None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn grid_pos(&self) -> (i64, i64) {
        (self.grid_x, self.grid_y)
    }

    pub fn xleft(&self) -> f64 {
        self.xleft
    }

    pub fn xright(&self) -> f64 {
        self.xright
    }

    pub fn ytop(&self) -> f64 {
        self.ytop
    }

    pub fn ybottom(&self) -> f64 {
        self.ybottom
    }

    pub fn ymid(&self) -> f64 {
        self.ymid
    }

    pub fn label_pos(&self) -> Point {
        self.label
    }

    pub fn in_edges(&self) -> &[EdgeId] {
        &self.in_edges
    }

    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    pub fn closure(&self) -> &Closure {
        &self.closure
    }

    pub fn highlight(&self) -> NodeHighlight {
        self.highlight
    }

    pub(crate) fn add_in(&mut self, e: EdgeId) {
        self.in_edges.push(e);
    }

    pub(crate) fn add_out(&mut self, e: EdgeId) {
        self.out_edges.push(e);
    }

    /// Highlights to apply when this node gains (`on`) or loses focus.
    ///
    /// Tiers are listed least emphasized first and the focus itself last,
    /// so on a cyclic graph the stronger tier wins.
    pub fn focus_plan(&self, on: bool) -> FocusPlan {
        let c = &self.closure;
        let node_tier = |hl: NodeHighlight| if on { hl } else { NodeHighlight::None };
        let edge_tier = |hl: EdgeHighlight| if on { hl } else { EdgeHighlight::None };

        let mut plan = FocusPlan::default();
        for (set, hl) in [
            (&c.in_nodes2, NodeHighlight::In2),
            (&c.out_nodes2, NodeHighlight::Out2),
            (&c.in_nodes, NodeHighlight::In),
            (&c.out_nodes, NodeHighlight::Out),
        ] {
            plan.nodes.extend(set.iter().map(|&n| (n, node_tier(hl))));
        }
        plan.nodes.push((self.id, node_tier(NodeHighlight::Focus)));

        for (set, hl) in [
            (&c.in_edges2, EdgeHighlight::In2),
            (&c.out_edges2, EdgeHighlight::Out2),
        ] {
            plan.edges.extend(set.iter().map(|&e| (e, edge_tier(hl))));
        }
        for (list, hl) in [
            (&self.in_edges, EdgeHighlight::In),
            (&self.out_edges, EdgeHighlight::Out),
        ] {
            plan.edges.extend(list.iter().map(|&e| (e, edge_tier(hl))));
        }
        plan
    }

    /// Box outline, notched inward on the left when the box has incoming
    /// edges and outward on the right when it has outgoing ones.
    pub fn outline(&self) -> Vec<Point> {
        let half = NOTCH / 2.0;
        let mut pts = Vec::with_capacity(6);

        if self.in_edges.is_empty() {
            pts.push(Point::new(self.xleft, self.ytop));
            pts.push(Point::new(self.xleft, self.ybottom));
        } else {
            pts.push(Point::new(self.xleft + half, self.ytop));
            pts.push(Point::new(self.xleft - half, self.ymid));
            pts.push(Point::new(self.xleft + half, self.ybottom));
        }

        if self.out_edges.is_empty() {
            pts.push(Point::new(self.xright, self.ybottom));
            pts.push(Point::new(self.xright, self.ytop));
        } else {
            pts.push(Point::new(self.xright - half, self.ybottom));
            pts.push(Point::new(self.xright + half, self.ymid));
            pts.push(Point::new(self.xright - half, self.ytop));
        }
        pts
    }

    /// `outline` in SVG `points` attribute form.
    pub fn points(&self) -> String {
        let mut ret = String::new();
        for p in self.outline() {
            ret.push_str(&format!("{},{} ", num(p.x), num(p.y)));
        }
        ret
    }
}

#[derive(Debug, Clone)]
pub struct EdgeLink {
    pub(crate) hash: String,
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) highlight: EdgeHighlight,
}

impl EdgeLink {
    pub fn new(from: NodeId, to: NodeId, hash: String) -> Self {
        Self {
            hash,
            from,
            to,
            highlight: EdgeHighlight::None,
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn highlight(&self) -> EdgeHighlight {
        self.highlight
    }

    /// Four-point orthogonal route: out of the source's right middle,
    /// across to just before the target, down or up to its middle, in.
    /// `nodes` must be the box list of the diagram that owns this edge.
    pub fn route(&self, nodes: &[NodeBox]) -> [Point; 4] {
        let from = &nodes[self.from.0];
        let to = &nodes[self.to.0];
        let turnx = to.xleft - TURN_OFFSET;
        [
            Point::new(from.xright, from.ymid),
            Point::new(turnx, from.ymid),
            Point::new(turnx, to.ymid),
            Point::new(to.xleft, to.ymid),
        ]
    }

    /// `route` as SVG path data, over the owning diagram's boxes.
    pub fn path(&self, nodes: &[NodeBox]) -> String {
        let [start, turn1, turn2, end] = self.route(nodes);
        format!(
            "M{} {} L{} {} L{} {} L{} {}",
            num(start.x),
            num(start.y),
            num(turn1.x),
            num(turn1.y),
            num(turn2.x),
            num(turn2.y),
            num(end.x),
            num(end.y),
        )
    }
}

#[derive(Clone, Copy)]
enum Toward {
    Upstream,
    Downstream,
}

/// Reach of `start` in both directions, given fully wired direct edges.
pub(crate) fn compute_closure(start: NodeId, nodes: &[NodeBox], edges: &[EdgeLink]) -> Closure {
    let node = &nodes[start.0];
    let in_nodes: IndexSet<NodeId> = node.in_edges.iter().map(|e| edges[e.0].from).collect();
    let out_nodes: IndexSet<NodeId> = node.out_edges.iter().map(|e| edges[e.0].to).collect();

    let (in_nodes2, in_edges2) = walk(Toward::Upstream, node, &in_nodes, nodes, edges);
    let (out_nodes2, out_edges2) = walk(Toward::Downstream, node, &out_nodes, nodes, edges);

    Closure {
        in_nodes,
        out_nodes,
        in_nodes2,
        out_nodes2,
        in_edges2,
        out_edges2,
    }
}

/// Depth-first walk out from the direct neighbors of `start`.
///
/// A node is marked reached before it is pushed, so each node is expanded
/// at most once and cycles terminate.
fn walk(
    toward: Toward,
    start: &NodeBox,
    direct: &IndexSet<NodeId>,
    nodes: &[NodeBox],
    edges: &[EdgeLink],
) -> (IndexSet<NodeId>, IndexSet<EdgeId>) {
    let direct_edges = match toward {
        Toward::Upstream => &start.in_edges,
        Toward::Downstream => &start.out_edges,
    };

    let mut reached = IndexSet::new();
    let mut traversed = IndexSet::new();
    let mut work: Vec<NodeId> = direct.iter().rev().copied().collect();

    while let Some(id) = work.pop() {
        let hops = match toward {
            Toward::Upstream => &nodes[id.0].in_edges,
            Toward::Downstream => &nodes[id.0].out_edges,
        };
        let mut next = Vec::new();
        for &e in hops {
            if !direct_edges.contains(&e) {
                traversed.insert(e);
            }
            let far = match toward {
                Toward::Upstream => edges[e.0].from,
                Toward::Downstream => edges[e.0].to,
            };
            if direct.contains(&far) || reached.contains(&far) {
                continue;
            }
            reached.insert(far);
            next.push(far);
        }
        work.extend(next.into_iter().rev());
    }

    (reached, traversed)
}

/// SVG number formatting: integral values print without a fraction and
/// negative zero prints as `0`.
pub(crate) fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let v = if v == 0.0 { 0.0 } else { v };
    v.to_string()
}
