use std::collections::VecDeque;

use relgraph::GraphHost;
use relgraph::graph::Node;

const ACTIVITY_LIMIT: usize = 40;

/// Receives engine callbacks and keeps a short activity log for the side panel.
#[derive(Default)]
pub(super) struct HostEvents {
    activity: VecDeque<String>,
}

impl HostEvents {
    fn push(&mut self, entry: String) {
        if self.activity.len() == ACTIVITY_LIMIT {
            self.activity.pop_back();
        }
        self.activity.push_front(entry);
    }

    /// Newest first.
    pub(super) fn activity(&self) -> impl Iterator<Item = &str> {
        self.activity.iter().map(String::as_str)
    }
}

impl GraphHost for HostEvents {
    fn on_node_select(&mut self, node: Option<&Node>) {
        match node {
            Some(node) => {
                tracing::info!(node = node.id(), "node selected");
                self.push(format!("Selected {}", node.label()));
            }
            None => {
                tracing::info!("selection cleared");
                self.push("Selection cleared".to_owned());
            }
        }
    }

    fn on_node_drill_down(&mut self, node: &Node) {
        tracing::info!(node = node.id(), group = %node.group, "expand requested");
        self.push(format!("Expand requested for {}", node.label()));
    }

    fn on_node_navigate(&mut self, node: &Node) {
        tracing::info!(node = node.id(), "profile requested");
        self.push(format!("Profile requested for {}", node.label()));
    }
}
