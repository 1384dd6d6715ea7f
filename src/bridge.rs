//! Keeps overlay widgets outside the canvas in step with the canvas selection.

use crate::graph::{Graph, Node, NodeIndex};
use crate::interaction::{GraphHost, GraphViewState, InteractionController};
use crate::util::{format_count, format_value};

/// Receives the selected node record whenever the selection changes.
pub trait DetailPanel {
    fn show_node(&mut self, node: Option<&Node>);
}

/// Compact summary of the current selection for a floating card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusCard {
    pub title: String,
    pub group: String,
    pub value: Option<String>,
    pub transactions: Option<String>,
    pub degree: usize,
    pub hint: Option<String>,
}

#[derive(Debug, Default)]
pub struct OverlayBridge {
    /// `None` until the first sync, so an initially empty selection is still forwarded.
    last_synced: Option<Option<NodeIndex>>,
}

impl OverlayBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the next [`OverlayBridge::sync`] to forward, e.g. after the graph is replaced.
    pub fn invalidate(&mut self) {
        self.last_synced = None;
    }

    /// Forwards the selected node to `panel` if it changed since the last call.
    pub fn sync(
        &mut self,
        state: &GraphViewState,
        graph: &Graph,
        panel: &mut dyn DetailPanel,
    ) -> bool {
        let selected = state.selected();
        if self.last_synced == Some(selected) {
            return false;
        }
        self.last_synced = Some(selected);
        panel.show_node(selected.and_then(|index| graph.node(index)));
        true
    }

    pub fn status_card(&self, state: &GraphViewState, graph: &Graph) -> Option<StatusCard> {
        let index = state.selected()?;
        let node = graph.node(index)?;

        let hint = if state.dragged() == Some(index) {
            Some("Release to let the layout settle".to_owned())
        } else {
            state
                .hovered()
                .filter(|hovered| *hovered != index)
                .and_then(|hovered| graph.node(hovered))
                .map(|hovered| format!("Hovering {}", hovered.label()))
        };

        Some(StatusCard {
            title: node.label().to_owned(),
            group: node.group.clone(),
            value: node.value.map(format_value),
            transactions: node.transaction_count.map(format_count),
            degree: graph.degree(index),
            hint,
        })
    }

    /// Clears the selection through the controller so the host hears about it once.
    pub fn clear_selection(
        &mut self,
        controller: &mut InteractionController,
        graph: &Graph,
        host: &mut dyn GraphHost,
    ) -> bool {
        controller.clear_selection(graph, host)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::config::EngineConfig;
    use crate::graph::test_support::{graph, link, node};

    #[derive(Default)]
    struct RecordingPanel {
        shown: Vec<Option<String>>,
    }

    impl DetailPanel for RecordingPanel {
        fn show_node(&mut self, node: Option<&Node>) {
            self.shown.push(node.map(|node| node.id().to_owned()));
        }
    }

    #[derive(Default)]
    struct CountingHost {
        calls: usize,
    }

    impl GraphHost for CountingHost {
        fn on_node_select(&mut self, _node: Option<&Node>) {
            self.calls += 1;
        }
    }

    fn pair() -> Graph {
        let mut donor = node("d1", vec2(0.0, 0.0), 6.0);
        donor.name = Some("Jane Donor".to_owned());
        donor.value = Some(2_500.0);
        donor.transaction_count = Some(12);
        graph(vec![donor, node("p1", vec2(40.0, 0.0), 6.0)], vec![link(0, 1)])
    }

    #[test]
    fn sync_forwards_only_on_change() {
        let graph = pair();
        let mut state = GraphViewState::new();
        let mut bridge = OverlayBridge::new();
        let mut panel = RecordingPanel::default();

        assert!(bridge.sync(&state, &graph, &mut panel));
        assert!(!bridge.sync(&state, &graph, &mut panel));
        state.selected = Some(NodeIndex(0));
        assert!(bridge.sync(&state, &graph, &mut panel));
        assert!(!bridge.sync(&state, &graph, &mut panel));
        bridge.invalidate();
        assert!(bridge.sync(&state, &graph, &mut panel));

        assert_eq!(
            panel.shown,
            vec![None, Some("d1".to_owned()), Some("d1".to_owned())]
        );
    }

    #[test]
    fn status_card_summarises_selection() {
        let graph = pair();
        let mut state = GraphViewState::new();
        let bridge = OverlayBridge::new();
        assert!(bridge.status_card(&state, &graph).is_none());

        state.selected = Some(NodeIndex(0));
        state.set_hovered(Some(NodeIndex(1)));
        let card = bridge.status_card(&state, &graph).expect("card");
        assert_eq!(card.title, "Jane Donor");
        assert_eq!(card.value.as_deref(), Some("$2.50K"));
        assert_eq!(card.transactions.as_deref(), Some("12"));
        assert_eq!(card.degree, 1);
        assert_eq!(card.hint.as_deref(), Some("Hovering p1"));
    }

    #[test]
    fn clearing_without_selection_does_not_notify() {
        let graph = pair();
        let mut controller = InteractionController::new(&EngineConfig::default());
        let mut bridge = OverlayBridge::new();
        let mut host = CountingHost::default();

        assert!(!bridge.clear_selection(&mut controller, &graph, &mut host));
        assert_eq!(host.calls, 0);
    }
}
