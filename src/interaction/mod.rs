//! Pointer gestures over the graph: pan, zoom, node drag, hover, selection and
//! the per-node context menu.

mod controller;
mod state;
mod transform;

use eframe::egui::Pos2;

use crate::graph::Node;

pub use controller::{InteractionContext, InteractionController};
pub use state::{ContextMenu, GraphViewState, MenuAction, Mode};
pub use transform::ViewTransform;

/// Callbacks into the embedding application. Invoked after internal state is
/// updated; return values are not awaited.
pub trait GraphHost {
    fn on_node_select(&mut self, node: Option<&Node>);

    fn on_node_drill_down(&mut self, _node: &Node) {}

    fn on_node_navigate(&mut self, _node: &Node) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Canvas-local pointer input, already separated from the windowing toolkit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Moved { pos: Pos2 },
    Pressed { pos: Pos2, button: PointerButton },
    Released { pos: Pos2, button: PointerButton },
    /// Positive `delta` zooms in.
    Wheel { pos: Pos2, delta: f32 },
    DoubleClicked { pos: Pos2 },
    Left,
}
