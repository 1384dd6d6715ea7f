use eframe::egui::{self, RichText, Ui};
use relgraph::DetailPanel;
use relgraph::graph::Node;
use relgraph::util::{format_count, format_value};
use serde_json::Value;

struct NodeRecord {
    id: String,
    label: String,
    group: String,
    party: Option<String>,
    value: Option<f64>,
    transaction_count: Option<u64>,
    is_aggregate: bool,
    attributes: Vec<(String, String)>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        let attributes = node
            .attributes
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect();

        Self {
            id: node.id().to_owned(),
            label: node.label().to_owned(),
            group: node.group.clone(),
            party: node.party.clone(),
            value: node.value,
            transaction_count: node.transaction_count,
            is_aggregate: node.is_aggregate,
            attributes,
        }
    }
}

/// Right-hand panel mirroring the canvas selection.
#[derive(Default)]
pub(in crate::app) struct NodeDetails {
    record: Option<NodeRecord>,
}

impl DetailPanel for NodeDetails {
    fn show_node(&mut self, node: Option<&Node>) {
        self.record = node.map(NodeRecord::from);
    }
}

impl NodeDetails {
    pub(in crate::app) fn draw(&self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(record) = &self.record else {
            ui.label("Click a node to inspect it. Right-click for more actions.");
            return;
        };

        ui.label(RichText::new(&record.label).strong());
        ui.small(record.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Group: {}", record.group));
        if record.is_aggregate {
            ui.label("Aggregate node (right-click to expand)");
        }
        if let Some(party) = &record.party {
            ui.label(format!("Party: {party}"));
        }
        if let Some(value) = record.value {
            ui.label(format!("Value: {}", format_value(value)));
        }
        if let Some(count) = record.transaction_count {
            ui.label(format!("Transactions: {}", format_count(count)));
        }

        if record.attributes.is_empty() {
            return;
        }

        ui.separator();
        ui.label(RichText::new("Attributes").strong());
        egui::Grid::new("node_attributes")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (key, value) in &record.attributes {
                    ui.label(key.as_str());
                    ui.label(value.as_str());
                    ui.end_row();
                }
            });
    }
}
