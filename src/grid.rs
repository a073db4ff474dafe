use crate::graph::Graph;
use crate::measure::TextWidth;

pub const DEFAULT_BOX_WIDTH: f64 = 100.0;
pub const MIN_BOX_WIDTH: f64 = 70.0;
pub const TEXT_PADDING: f64 = 14.0;
pub const BOX_HEIGHT: f64 = 22.0;
pub const X_MARGIN: f64 = 12.0;
pub const Y_MARGIN: f64 = 10.0;

/// Pixel pitch of the layout grid and the size of every box on it.
///
/// Rows are half a box apart so edges can run between boxes that sit on
/// alternate rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridProp {
    pub xgrid: f64,
    pub ygrid: f64,
    pub box_width: f64,
    pub box_height: f64,
}

impl GridProp {
    pub fn new(box_width: f64, box_height: f64) -> Self {
        Self {
            xgrid: box_width + X_MARGIN,
            ygrid: (box_height + Y_MARGIN) / 2.0,
            box_width,
            box_height,
        }
    }

    pub fn for_graph(graph: &Graph, measurer: Option<&dyn TextWidth>) -> Self {
        Self::new(box_width(graph, measurer), BOX_HEIGHT)
    }
}

/// Widest padded label, floored at `MIN_BOX_WIDTH`. Without a measurer
/// every box gets `DEFAULT_BOX_WIDTH`.
pub fn box_width(graph: &Graph, measurer: Option<&dyn TextWidth>) -> f64 {
    let Some(measurer) = measurer else {
        return DEFAULT_BOX_WIDTH;
    };
    graph
        .nodes
        .iter()
        .map(|(name, node)| {
            let w = measurer.text_width(Graph::text(name, node));
            let w = if w.is_finite() && w > 0.0 { w } else { 0.0 };
            w + TEXT_PADDING
        })
        .fold(MIN_BOX_WIDTH, f64::max)
}
