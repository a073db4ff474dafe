pub mod dag_box;
pub mod diagram;
pub mod error;
pub mod graph;
pub mod graph_parser;
pub mod grid;
pub mod measure;
pub mod scene;
pub mod svg;

pub use diagram::{Diagram, DiagramOptions, Event, InstanceId, Redraw};
pub use error::{Error, Result};
pub use graph::{Graph, Node};
pub use scene::Scene;

use measure::{DisplayWidth, TextWidth};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Pixel width per display column; boxes get a fixed width when unset.
    pub char_width: Option<f64>,
    pub focus: Option<String>,
    pub style: bool,
    pub instance: Option<String>,
}

/// Read a graph from JSON (`{...}`) or from the `dag` text form.
pub fn parse_input(input: &str) -> Result<Graph> {
    if input.trim_start().starts_with('{') {
        Graph::from_json(input)
    } else {
        graph_parser::parse_dag(input)
    }
}

pub fn render_scene(input: &str, options: &RenderOptions) -> Result<Scene> {
    let graph = parse_input(input)?;
    let diagram_options = DiagramOptions {
        click: None,
        text_width: options
            .char_width
            .map(|char_width| Box::new(DisplayWidth { char_width }) as Box<dyn TextWidth>),
        instance: options
            .instance
            .as_deref()
            .map(InstanceId::from)
            .unwrap_or_default(),
    };

    let mut diagram = Diagram::new(&graph, diagram_options, || {})?;
    if let Some(focus) = &options.focus {
        diagram.set_focus(focus)?;
    }
    Ok(diagram.render())
}

pub fn render(input: &str, options: &RenderOptions) -> Result<String> {
    let scene = render_scene(input, options)?;
    Ok(svg::render(&scene, options.style))
}
