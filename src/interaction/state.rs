use eframe::egui::Pos2;

use crate::graph::NodeIndex;

use super::transform::ViewTransform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Ask the host to expand an aggregate node into its members.
    Expand,
    /// Ask the host to open the node's profile page.
    GoToProfile,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Expand => "Expand",
            Self::GoToProfile => "Go to profile",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenu {
    pub node: NodeIndex,
    /// Canvas-local screen position the menu opens at.
    pub anchor: Pos2,
    pub actions: Vec<MenuAction>,
}

/// What the primary pointer is currently doing. At most one gesture runs at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mode {
    #[default]
    Idle,
    Panning {
        press: Pos2,
        last: Pos2,
        moved: bool,
    },
    Dragging {
        node: NodeIndex,
        press: Pos2,
        moved: bool,
    },
    MenuOpen(ContextMenu),
}

/// Per-view interaction state: transform, selection, hover and the active gesture.
#[derive(Clone, Debug, Default)]
pub struct GraphViewState {
    pub(crate) transform: ViewTransform,
    pub(crate) selected: Option<NodeIndex>,
    pub(crate) hovered: Option<NodeIndex>,
    pub(crate) pointer: Option<Pos2>,
    pub(crate) mode: Mode,
    /// Node the hover pulse animates on; outlives `hovered` while shrinking back.
    pub(crate) pulse_node: Option<NodeIndex>,
    pub(crate) hover_pulse: f32,
    disposed: bool,
}

impl GraphViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything tied to the previous graph's node indices.
    pub fn reset(&mut self) {
        *self = Self {
            disposed: self.disposed,
            ..Self::default()
        };
    }

    pub fn dispose(&mut self) {
        self.reset();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn selected(&self) -> Option<NodeIndex> {
        self.selected
    }

    pub fn hovered(&self) -> Option<NodeIndex> {
        self.hovered
    }

    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn dragged(&self) -> Option<NodeIndex> {
        match self.mode {
            Mode::Dragging { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        match &self.mode {
            Mode::MenuOpen(menu) => Some(menu),
            _ => None,
        }
    }

    /// Pulse progress in `[0, 1]` for `index`; zero for every other node.
    pub fn pulse_for(&self, index: NodeIndex) -> f32 {
        if self.pulse_node == Some(index) {
            self.hover_pulse
        } else {
            0.0
        }
    }

    pub(crate) fn set_hovered(&mut self, hovered: Option<NodeIndex>) {
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;
        if let Some(index) = hovered
            && self.pulse_node != Some(index)
        {
            self.pulse_node = Some(index);
            self.hover_pulse = 0.0;
        }
    }

    /// Moves the hover pulse toward its target. Returns whether it is still animating.
    pub(crate) fn advance_pulse(&mut self, dt: f32, settle_secs: f32) -> bool {
        let target = if self.hovered.is_some() && self.hovered == self.pulse_node {
            1.0
        } else {
            0.0
        };
        let step = if settle_secs > 0.0 {
            dt.max(0.0) / settle_secs
        } else {
            1.0
        };

        if self.hover_pulse < target {
            self.hover_pulse = (self.hover_pulse + step).min(target);
        } else if self.hover_pulse > target {
            self.hover_pulse = (self.hover_pulse - step).max(target);
        }
        if self.hover_pulse == 0.0 && self.hovered.is_none() {
            self.pulse_node = None;
        }

        self.hover_pulse != target
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn reset_clears_everything_but_disposal() {
        let mut state = GraphViewState::new();
        state.transform.pan_by(vec2(10.0, 5.0));
        state.selected = Some(NodeIndex(2));
        state.set_hovered(Some(NodeIndex(1)));
        state.pointer = Some(pos2(3.0, 3.0));
        state.reset();

        assert_eq!(state.transform(), ViewTransform::IDENTITY);
        assert_eq!(state.selected(), None);
        assert_eq!(state.hovered(), None);
        assert_eq!(state.pulse_for(NodeIndex(1)), 0.0);
        assert!(!state.is_disposed());

        state.dispose();
        assert!(state.is_disposed());
    }

    #[test]
    fn hover_pulse_grows_then_shrinks() {
        let mut state = GraphViewState::new();
        state.set_hovered(Some(NodeIndex(0)));

        assert!(state.advance_pulse(0.05, 0.2));
        assert!((state.pulse_for(NodeIndex(0)) - 0.25).abs() < 1e-5);
        while state.advance_pulse(0.05, 0.2) {}
        assert_eq!(state.pulse_for(NodeIndex(0)), 1.0);

        state.set_hovered(None);
        assert!(state.advance_pulse(0.1, 0.2));
        assert!((state.pulse_for(NodeIndex(0)) - 0.5).abs() < 1e-5);
        while state.advance_pulse(0.1, 0.2) {}
        assert_eq!(state.pulse_for(NodeIndex(0)), 0.0);
    }

    #[test]
    fn hovering_another_node_restarts_pulse() {
        let mut state = GraphViewState::new();
        state.set_hovered(Some(NodeIndex(0)));
        state.advance_pulse(1.0, 0.2);
        state.set_hovered(Some(NodeIndex(4)));

        assert_eq!(state.pulse_for(NodeIndex(0)), 0.0);
        assert_eq!(state.pulse_for(NodeIndex(4)), 0.0);
        state.advance_pulse(0.1, 0.2);
        assert!(state.pulse_for(NodeIndex(4)) > 0.0);
    }
}
