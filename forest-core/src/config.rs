use glam::IVec2;
use std::time::Duration;

/// Geometry and pacing constants for one layout run.
///
/// Distances are pixels; `tick` is the delay between published partial
/// layouts that turns the traversal into a visible animation.
#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    /// X coordinate every root node is placed at.
    pub root_x: i32,
    /// Y coordinate of the first row; the first root lands here.
    pub root_y0: i32,
    /// Vertical spacing per leaf row.
    pub node_height: i32,
    /// Gap between a parent's label box and the connector run.
    pub inner_margin: i32,
    /// Horizontal distance from a parent's right edge to its children.
    pub node_distance: i32,
    /// X coordinate nodes stack at before layout has reached them.
    pub initial_x: i32,
    /// Fallback per-character label width used when no renderer has
    /// measured the real font yet.
    pub glyph_width: i32,
    /// Horizontal padding added around a label inside its box.
    pub label_pad: i32,
    /// Pause after each published partial layout.
    pub tick: Duration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_x: 200,
            root_y0: 30,
            node_height: 20,
            inner_margin: 10,
            node_distance: 30,
            initial_x: 10,
            glyph_width: 7,
            label_pad: 4,
            tick: Duration::from_millis(10),
        }
    }
}

impl LayoutConfig {
    /// Estimated pixel width of a rendered label.
    pub fn label_width(&self, name: &str) -> i32 {
        self.glyph_width * name.chars().count() as i32 + self.label_pad
    }

    /// Position of the `index`-th loaded node before layout has run:
    /// a column down the left edge, one `node_height` per node.
    pub fn initial_position(&self, index: usize) -> IVec2 {
        IVec2::new(self.initial_x, self.root_y0 + self.node_height * index as i32)
    }
}
