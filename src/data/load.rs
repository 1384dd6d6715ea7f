use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::raw::RawGraph;

pub fn load_graph_file(path: &Path) -> Result<RawGraph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    parse_graph(&raw).with_context(|| format!("failed to parse graph file {}", path.display()))
}

/// Accepts `{nodes, links}` either at the top level or wrapped in a `data`
/// envelope, which is how the REST layer returns it.
pub fn parse_graph(raw: &str) -> Result<RawGraph> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in graph payload")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("graph payload must be a JSON object"))?;

    let body = match object.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => parsed.clone(),
    };

    let graph: RawGraph =
        serde_json::from_value(body).context("graph payload does not match {nodes, links}")?;
    tracing::debug!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "parsed graph payload"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_id_and_object_endpoints() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    {"id": "A", "group": "member", "value": 1000000, "party": "D", "state": "CA"},
                    {"id": "B", "group": "asset", "transactionCount": 4}
                ],
                "links": [
                    {"source": "A", "target": {"id": "B", "group": "asset"}, "type": "owns", "value": 3}
                ]
            }"#,
        )
        .expect("payload parses");

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].party.as_deref(), Some("D"));
        assert_eq!(graph.nodes[0].attributes.get("state"), Some(&Value::from("CA")));
        assert_eq!(graph.nodes[1].transaction_count, Some(4.0));
        assert_eq!(graph.links[0].source.id(), "A");
        assert_eq!(graph.links[0].target.id(), "B");
        assert_eq!(graph.links[0].kind.as_deref(), Some("owns"));
        assert_eq!(graph.links[0].weight(), Some(3.0));
    }

    #[test]
    fn unwraps_data_envelope() {
        let graph = parse_graph(r#"{"data": {"nodes": [{"id": "A", "group": "member"}]}}"#)
            .expect("payload parses");
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn float_and_negative_counts_still_parse() {
        let graph = parse_graph(
            r#"{"nodes": [
                {"id": "A", "group": "member", "transactionCount": 3.0},
                {"id": "B", "group": "member", "transactionCount": -1}
            ]}"#,
        )
        .expect("payload parses");

        assert_eq!(graph.nodes[0].transaction_count, Some(3.0));
        assert_eq!(graph.nodes[1].transaction_count, Some(-1.0));
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(parse_graph("[1, 2, 3]").is_err());
        assert!(parse_graph("not json").is_err());
    }

    #[test]
    fn count_is_used_when_value_missing() {
        let graph = parse_graph(
            r#"{"nodes": [], "links": [{"source": "A", "target": "B", "count": 7}]}"#,
        )
        .expect("payload parses");
        assert_eq!(graph.links[0].weight(), Some(7.0));
    }
}
