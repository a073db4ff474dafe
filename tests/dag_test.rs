use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use dagbox::dag_box::{EdgeHighlight, NodeHighlight};
use dagbox::grid::GridProp;
use dagbox::{Diagram, DiagramOptions, Graph, InstanceId, Node};

fn build(graph: &Graph) -> (Diagram, Rc<Cell<usize>>) {
    let redraws = Rc::new(Cell::new(0));
    let r = Rc::clone(&redraws);
    let options = DiagramOptions {
        instance: InstanceId::from("it"),
        ..Default::default()
    };
    let diagram = Diagram::new(graph, options, move || r.set(r.get() + 1)).unwrap();
    (diagram, redraws)
}

fn chain() -> Graph {
    Graph::new(3, 1)
        .with_node("A", Node::at(0, 0).to(&["B"]))
        .with_node("B", Node::at(1, 0).to(&["C"]))
        .with_node("C", Node::at(2, 0))
}

/// Two sources, a shared middle, fan-out and a shortcut edge.
fn mesh() -> Graph {
    Graph::new(5, 4)
        .with_node("s1", Node::at(0, 0).to(&["m"]))
        .with_node("s2", Node::at(0, 2).to(&["m", "t2"]))
        .with_node("m", Node::at(1, 1).to(&["t1", "t2"]))
        .with_node("t1", Node::at(2, 0).to(&["z"]))
        .with_node("t2", Node::at(2, 2).to(&["z"]))
        .with_node("z", Node::at(3, 1))
        .with_node("lone", Node::at(4, 3))
}

fn all_none(d: &Diagram) -> bool {
    d.nodes().iter().all(|n| n.highlight() == NodeHighlight::None)
        && d.edges().iter().all(|e| e.highlight() == EdgeHighlight::None)
}

// =============================================================================
// Closure
// =============================================================================

#[test]
fn dag_sink_has_empty_downstream() {
    let (d, _) = build(&mesh());
    for name in ["z", "lone"] {
        let c = d.node(name).unwrap().closure();
        assert!(c.out_nodes.is_empty(), "{name} out");
        assert!(c.out_nodes2.is_empty(), "{name} out2");
        assert!(c.out_edges2.is_empty(), "{name} out edges2");
    }
}

#[test]
fn dag_direct_and_transitive_disjoint() {
    let (d, _) = build(&mesh());
    for node in d.nodes() {
        let c = node.closure();
        for n in &c.out_nodes {
            assert!(!c.out_nodes2.contains(n), "{} out overlap", node.name());
        }
        for n in &c.in_nodes {
            assert!(!c.in_nodes2.contains(n), "{} in overlap", node.name());
        }
        for e in node.out_edges() {
            assert!(!c.out_edges2.contains(e), "{} out edge overlap", node.name());
        }
        for e in node.in_edges() {
            assert!(!c.in_edges2.contains(e), "{} in edge overlap", node.name());
        }
    }
}

#[test]
fn dag_shortcut_target_stays_direct() {
    let (d, _) = build(&mesh());
    let c = d.node("s2").unwrap().closure();
    let t2 = d.node_id("t2").unwrap();
    assert!(c.out_nodes.contains(&t2));
    assert!(!c.out_nodes2.contains(&t2));
    let names: Vec<&str> = c.out_nodes2.iter().map(|id| d.nodes()[id.index()].name()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"t1") && names.contains(&"z"));
}

#[test]
fn dag_upstream_closure() {
    let (d, _) = build(&mesh());
    let c = d.node("z").unwrap().closure();
    let mut direct: Vec<&str> = c.in_nodes.iter().map(|id| d.nodes()[id.index()].name()).collect();
    let mut far: Vec<&str> = c.in_nodes2.iter().map(|id| d.nodes()[id.index()].name()).collect();
    direct.sort();
    far.sort();
    assert_eq!(direct, vec!["t1", "t2"]);
    assert_eq!(far, vec!["m", "s1", "s2"]);
}

// =============================================================================
// Highlight state machine
// =============================================================================

#[test]
fn dag_focus_then_unfocus_round_trip() {
    let (mut d, _) = build(&mesh());
    for name in ["s1", "s2", "m", "t1", "z", "lone"] {
        d.set_focus(name).unwrap();
        d.clear_focus();
        assert!(all_none(&d), "residue after {name}");
    }
}

#[test]
fn dag_switching_focus_leaves_no_residue() {
    let (mut d, _) = build(&mesh());
    d.set_focus("s1").unwrap();
    d.set_focus("lone").unwrap();
    assert_eq!(d.node_highlight("lone").unwrap(), NodeHighlight::Focus);
    let others_clear = d
        .nodes()
        .iter()
        .filter(|n| n.name() != "lone")
        .all(|n| n.highlight() == NodeHighlight::None);
    assert!(others_clear);
    assert!(d.edges().iter().all(|e| e.highlight() == EdgeHighlight::None));
}

#[test]
fn dag_redraw_counts() {
    let (mut d, redraws) = build(&chain());
    d.set_focus("A").unwrap();
    assert_eq!(redraws.get(), 1);
    d.set_focus("A").unwrap();
    assert_eq!(redraws.get(), 1, "refocusing the focus is a no-op");
    d.set_focus("B").unwrap();
    assert_eq!(redraws.get(), 2, "a new focus redraws once");
}

#[test]
fn dag_chain_focus_source() {
    let (mut d, _) = build(&chain());
    d.set_focus("A").unwrap();
    assert_eq!(d.node_highlight("A").unwrap(), NodeHighlight::Focus);
    assert_eq!(d.node_highlight("B").unwrap(), NodeHighlight::Out);
    assert_eq!(d.node_highlight("C").unwrap(), NodeHighlight::Out2);
    assert_eq!(d.edge_highlight("A", "B").unwrap(), Some(EdgeHighlight::Out));
    assert_eq!(d.edge_highlight("B", "C").unwrap(), Some(EdgeHighlight::Out2));
}

#[test]
fn dag_chain_focus_middle() {
    let (mut d, _) = build(&chain());
    d.set_focus("B").unwrap();
    assert_eq!(d.node_highlight("A").unwrap(), NodeHighlight::In);
    assert_eq!(d.node_highlight("B").unwrap(), NodeHighlight::Focus);
    assert_eq!(d.node_highlight("C").unwrap(), NodeHighlight::Out);
    let tiers: Vec<EdgeHighlight> = d.edges().iter().map(|e| e.highlight()).collect();
    assert_eq!(tiers, vec![EdgeHighlight::In, EdgeHighlight::Out]);
    assert!(
        d.nodes()
            .iter()
            .all(|n| !matches!(n.highlight(), NodeHighlight::In2 | NodeHighlight::Out2))
    );
}

#[test]
fn dag_cyclic_graph_is_safe() {
    let g = Graph::new(3, 1)
        .with_node("a", Node::at(0, 0).to(&["b"]))
        .with_node("b", Node::at(1, 0).to(&["c"]))
        .with_node("c", Node::at(2, 0).to(&["a"]));
    let (mut d, _) = build(&g);
    d.set_focus("b").unwrap();
    assert_eq!(d.node_highlight("b").unwrap(), NodeHighlight::Focus);
    // On a cycle every node is also two hops away; the direct tier wins.
    assert_eq!(d.node_highlight("a").unwrap(), NodeHighlight::In);
    assert_eq!(d.node_highlight("c").unwrap(), NodeHighlight::Out);
    d.clear_focus();
    assert!(all_none(&d));
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn dag_rectangle_from_grid() {
    let grid = GridProp::new(100.0, 22.0);
    assert_eq!(grid.xgrid, 112.0);
    assert_eq!(grid.ygrid, 16.0);

    let g = Graph::new(4, 4).with_node("n", Node::at(2, 3));
    let (d, _) = build(&g);
    assert_eq!(*d.grid(), grid);
    let n = d.node("n").unwrap();
    assert_eq!(
        (n.xleft(), n.xright(), n.ytop(), n.ybottom(), n.ymid()),
        (224.0, 324.0, 48.0, 70.0, 59.0)
    );
}

#[test]
fn dag_box_width_from_measurer() {
    let g = Graph::new(2, 1)
        .with_node("s", Node::at(0, 0).with_label("short"))
        .with_node("l", Node::at(1, 0).with_label("a very long label"));
    let options = DiagramOptions {
        text_width: Some(Box::new(|s: &str| if s == "short" { 50.0 } else { 200.0 })),
        ..Default::default()
    };
    let d = Diagram::new(&g, options, || {}).unwrap();
    assert_eq!(d.grid().box_width, 214.0);
    assert_eq!(d.grid().xgrid, 226.0);
}

#[test]
fn dag_edge_route_is_orthogonal() {
    let (d, _) = build(&mesh());
    for e in d.edges() {
        let [p0, p1, p2, p3] = e.route(d.nodes());
        let to = &d.nodes()[e.to().index()];
        assert_eq!(p0.y, p1.y);
        assert_eq!(p1.x, p2.x);
        assert_eq!(p2.y, p3.y);
        assert_eq!(p1.x, to.xleft() - 6.0);
        assert_eq!(p3.y, to.ymid());
    }
}

#[test]
fn dag_isolated_box_is_a_rectangle() {
    let (d, _) = build(&mesh());
    let lone = d.node("lone").unwrap();
    assert_eq!(lone.outline().len(), 4);
    assert_eq!(d.node("m").unwrap().outline().len(), 6);
    assert_eq!(d.node("s1").unwrap().outline().len(), 5);
}
