use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::{Graph, NodeIndex};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Nodes whose label or id fuzzily matches a search query.
#[derive(Clone, Debug, Default)]
pub struct SearchHighlight {
    query: String,
    matches: HashSet<NodeIndex>,
}

impl SearchHighlight {
    /// `None` for a blank query.
    pub fn compute(graph: &Graph, query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        let matches = graph
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                fuzzy_match_score(&matcher, node.label(), query).is_some()
                    || fuzzy_match_score(&matcher, node.id(), query).is_some()
            })
            .map(|(index, _)| NodeIndex(index))
            .collect();

        Some(Self {
            query: query.to_owned(),
            matches,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_match(&self, index: NodeIndex) -> bool {
        self.matches.contains(&index)
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::graph::test_support::{graph, node};

    #[test]
    fn matches_label_or_id_case_insensitively() {
        let mut warren = node("S000033", vec2(0.0, 0.0), 4.0);
        warren.name = Some("Elizabeth Warren".to_owned());
        let graph = graph(
            vec![warren, node("acme-pac", vec2(1.0, 0.0), 4.0)],
            Vec::new(),
        );

        let by_name = SearchHighlight::compute(&graph, "warren").expect("query");
        assert!(by_name.is_match(NodeIndex(0)));
        assert!(!by_name.is_match(NodeIndex(1)));

        let by_id = SearchHighlight::compute(&graph, " ACME ").expect("query");
        assert_eq!(by_id.query(), "ACME");
        assert!(by_id.is_match(NodeIndex(1)));
        assert_eq!(by_id.match_count(), 1);
    }

    #[test]
    fn blank_query_highlights_nothing() {
        let graph = graph(vec![node("a", vec2(0.0, 0.0), 4.0)], Vec::new());
        assert!(SearchHighlight::compute(&graph, "   ").is_none());
    }
}
