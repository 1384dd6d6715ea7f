//! Per-frame scene description built from live node positions, and its egui painter.
//!
//! [`build_scene`] is pure: it reads the graph and the view state and yields
//! screen-space shapes plus the pick regions used for hit testing. Painting is
//! a separate step so scenes can be inspected without a GPU context.

mod paint;
mod pick;
mod search;
pub mod style;

use std::collections::HashSet;

use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2, vec2};

use crate::config::{LayoutConfig, ViewConfig};
use crate::graph::{Graph, NodeIndex};
use crate::interaction::{GraphViewState, Mode, ViewTransform};
use crate::util::{format_count, format_value, truncate_label};

pub use paint::paint;
pub use pick::{PickRegion, PickRegions};
pub use search::SearchHighlight;

use pick::displayed_radius;
use style::{blend_color, circle_visible, dim_color, ease_out_cubic, edge_visible};

pub const EMPTY_STATE_MESSAGE: &str = "No relationships to display";

const LABEL_MIN_RADIUS: f32 = 12.0;
const LABEL_ZOOM: f32 = 1.5;
const LABEL_MAX_CHARS: usize = 32;
const TOOLTIP_OFFSET: Vec2 = vec2(14.0, 14.0);

#[derive(Clone, Debug, PartialEq)]
pub struct LinkShape {
    pub from: Pos2,
    pub to: Pos2,
    pub stroke: Stroke,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
    pub node: NodeIndex,
    pub center: Pos2,
    pub radius: f32,
    pub fill: Color32,
    pub outline: Stroke,
    /// Highlight ring drawn just outside the disc.
    pub ring: Option<Stroke>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelShape {
    pub node: NodeIndex,
    /// Left-center anchor of the text.
    pub anchor: Pos2,
    pub text: String,
    pub color: Color32,
    pub halo: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub anchor: Pos2,
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub group: String,
    pub color: Color32,
}

/// Screen-space drawing list for one frame. Positions are canvas-local.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub canvas: Vec2,
    pub transform: ViewTransform,
    pub links: Vec<LinkShape>,
    pub nodes: Vec<NodeShape>,
    pub labels: Vec<LabelShape>,
    pub tooltip: Option<Tooltip>,
    pub legend: Vec<LegendEntry>,
    pub zoom_badge: String,
    pub empty_message: Option<String>,
    pub picks: PickRegions,
    /// Entrance animation still running; the host should repaint.
    pub animating: bool,
}

impl Scene {
    pub fn empty_state(canvas: Vec2) -> Self {
        Self {
            canvas,
            zoom_badge: zoom_badge(1.0),
            empty_message: Some(EMPTY_STATE_MESSAGE.to_owned()),
            ..Self::default()
        }
    }

    pub fn is_empty_state(&self) -> bool {
        self.empty_message.is_some()
    }
}

pub struct RenderOptions<'a> {
    pub canvas: Vec2,
    pub view: ViewConfig,
    pub layout: LayoutConfig,
    /// Seconds since the current graph was mounted; drives the entrance fade.
    pub elapsed_secs: f32,
    pub search: Option<&'a SearchHighlight>,
}

/// Opacity of node `index` during the staggered entrance.
pub fn fade_in_opacity(index: usize, elapsed_secs: f32, layout: &LayoutConfig) -> f32 {
    let delay = (index as f32 * layout.fade_stagger_secs).min(layout.fade_max_stagger_secs);
    if layout.fade_duration_secs <= 0.0 {
        return if elapsed_secs >= delay { 1.0 } else { 0.0 };
    }
    ease_out_cubic((elapsed_secs - delay) / layout.fade_duration_secs)
}

fn fade_in_finished(node_count: usize, elapsed_secs: f32, layout: &LayoutConfig) -> bool {
    let last_delay = (node_count.saturating_sub(1) as f32 * layout.fade_stagger_secs)
        .min(layout.fade_max_stagger_secs);
    elapsed_secs >= last_delay + layout.fade_duration_secs.max(0.0)
}

fn zoom_badge(scale: f32) -> String {
    format!("{:.0}%", scale * 100.0)
}

pub fn build_scene(graph: &Graph, state: &GraphViewState, options: &RenderOptions<'_>) -> Scene {
    if graph.is_empty() {
        return Scene::empty_state(options.canvas);
    }

    let transform = state.transform();
    let canvas_rect = Rect::from_min_size(Pos2::ZERO, options.canvas);
    let picks = PickRegions::compute(graph, state, options.view.hover_pulse_scale);

    let selected = state.selected();
    let focus: HashSet<NodeIndex> = selected
        .map(|index| graph.neighbors(index).chain(std::iter::once(index)).collect())
        .unwrap_or_default();
    let search = options
        .search
        .filter(|search| selected.is_none() && search.match_count() > 0);
    let opacity =
        |index: NodeIndex| fade_in_opacity(index.0, options.elapsed_secs, &options.layout);

    let width_scale = transform.scale.sqrt();
    let mut links = Vec::with_capacity(graph.link_count());
    for link in graph.links() {
        let (Some(source), Some(target)) = (graph.node(link.source), graph.node(link.target))
        else {
            continue;
        };
        let from = transform.world_to_screen(source.position);
        let to = transform.world_to_screen(target.position);
        if !edge_visible(canvas_rect, from, to, 2.0) {
            continue;
        }

        let incident = selected.is_some_and(|index| link.source == index || link.target == index);
        let color = if incident {
            blend_color(link.color, style::SELECTED, 0.55)
        } else if selected.is_some() || search.is_some() {
            dim_color(link.color, 0.4)
        } else {
            link.color
        };
        let fade = opacity(link.source).min(opacity(link.target));
        let width = (link.stroke_width() * width_scale).clamp(0.5, 8.0);
        links.push(LinkShape {
            from,
            to,
            stroke: Stroke::new(
                if incident { width + 0.8 } else { width },
                color.gamma_multiply(fade),
            ),
        });
    }

    let mut order = (0..graph.node_count()).map(NodeIndex).collect::<Vec<_>>();
    order.sort_by(|a, b| {
        let rank = |index: &NodeIndex| {
            (Some(*index) == selected || Some(*index) == state.hovered()) as u8
        };
        rank(a).cmp(&rank(b)).then_with(|| {
            graph.nodes()[a.0]
                .radius
                .total_cmp(&graph.nodes()[b.0].radius)
        })
    });

    let mut nodes = Vec::with_capacity(graph.node_count());
    let mut labels = Vec::new();
    for index in order {
        let Some(node) = graph.node(index) else {
            continue;
        };
        let center = transform.world_to_screen(node.position);
        let radius = displayed_radius(
            node.radius,
            transform.scale,
            state.pulse_for(index),
            options.view.hover_pulse_scale,
        );
        if !circle_visible(canvas_rect, center, radius) {
            continue;
        }

        let is_selected = selected == Some(index);
        let is_hovered = state.hovered() == Some(index);
        let is_match = search.is_some_and(|search| search.is_match(index));
        let fade = opacity(index);

        let fill = if is_selected || is_hovered {
            node.color
        } else if selected.is_some() {
            if focus.contains(&index) {
                node.color
            } else {
                dim_color(node.color, 0.35)
            }
        } else if is_match {
            blend_color(node.color, style::SEARCH_MATCH, 0.6)
        } else if search.is_some() {
            dim_color(node.color, 0.38)
        } else {
            node.color
        };
        let ring = if is_selected {
            Some(Stroke::new(2.5, style::SELECTED.gamma_multiply(fade)))
        } else if is_match {
            Some(Stroke::new(1.5, style::SEARCH_MATCH.gamma_multiply(fade)))
        } else {
            None
        };

        nodes.push(NodeShape {
            node: index,
            center,
            radius,
            fill: fill.gamma_multiply(fade),
            outline: Stroke::new(1.0, style::NODE_OUTLINE.gamma_multiply(fade)),
            ring,
        });

        let wants_label = is_selected
            || is_hovered
            || is_match
            || radius >= LABEL_MIN_RADIUS
            || transform.scale >= LABEL_ZOOM;
        if options.view.show_labels && wants_label {
            labels.push(LabelShape {
                node: index,
                anchor: center + vec2(radius + 5.0, 0.0),
                text: truncate_label(node.label(), LABEL_MAX_CHARS),
                color: style::LABEL.gamma_multiply(fade),
                halo: style::BACKGROUND.gamma_multiply(fade),
            });
        }
    }

    Scene {
        canvas: options.canvas,
        transform,
        links,
        nodes,
        labels,
        tooltip: build_tooltip(graph, state),
        legend: graph
            .groups()
            .into_iter()
            .map(|(group, color)| LegendEntry { group, color })
            .collect(),
        zoom_badge: zoom_badge(transform.scale),
        empty_message: None,
        picks,
        animating: !fade_in_finished(graph.node_count(), options.elapsed_secs, &options.layout),
    }
}

fn build_tooltip(graph: &Graph, state: &GraphViewState) -> Option<Tooltip> {
    if matches!(state.mode(), Mode::Dragging { .. } | Mode::MenuOpen(_)) {
        return None;
    }
    let node = graph.node(state.hovered()?)?;
    let pointer = state.pointer()?;

    let mut lines = vec![format!("Group: {}", node.group)];
    if let Some(party) = &node.party {
        lines.push(format!("Party: {party}"));
    }
    if let Some(value) = node.value {
        lines.push(format!("Value: {}", format_value(value)));
    }
    if let Some(count) = node.transaction_count {
        lines.push(format!("Transactions: {}", format_count(count)));
    }

    Some(Tooltip {
        anchor: pointer + TOOLTIP_OFFSET,
        title: node.label().to_owned(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::graph::test_support::{graph, link, node};

    const CANVAS: Vec2 = vec2(800.0, 600.0);

    fn settled(view: ViewConfig) -> RenderOptions<'static> {
        RenderOptions {
            canvas: CANVAS,
            view,
            layout: LayoutConfig::default(),
            elapsed_secs: 60.0,
            search: None,
        }
    }

    fn three_nodes() -> Graph {
        graph(
            vec![
                node("a", vec2(100.0, 100.0), 8.0),
                node("b", vec2(200.0, 100.0), 8.0),
                node("c", vec2(300.0, 300.0), 8.0),
            ],
            vec![link(0, 1)],
        )
    }

    #[test]
    fn empty_graph_renders_placeholder() {
        let options = settled(ViewConfig::default());
        let scene = build_scene(&Graph::default(), &GraphViewState::new(), &options);

        assert!(scene.is_empty_state());
        assert!(scene.nodes.is_empty() && scene.links.is_empty());
        assert!(scene.picks.is_empty());
    }

    #[test]
    fn links_follow_live_positions() {
        let mut graph = three_nodes();
        let options = settled(ViewConfig::default());
        let state = GraphViewState::new();

        let before = build_scene(&graph, &state, &options);
        assert_eq!(before.links.len(), 1);
        assert_eq!(before.links[0].from, pos2(100.0, 100.0));

        graph.node_mut(NodeIndex(0)).expect("a").position = vec2(150.0, 50.0);
        let after = build_scene(&graph, &state, &options);
        assert_eq!(after.links[0].from, pos2(150.0, 50.0));
        assert_eq!(after.picks.hit_test(pos2(150.0, 50.0)), Some(NodeIndex(0)));
    }

    #[test]
    fn off_canvas_shapes_are_culled() {
        let graph = graph(
            vec![
                node("a", vec2(100.0, 100.0), 8.0),
                node("far", vec2(5_000.0, 5_000.0), 8.0),
                node("farther", vec2(6_000.0, 5_000.0), 8.0),
            ],
            vec![link(1, 2)],
        );
        let options = settled(ViewConfig::default());
        let scene = build_scene(&graph, &GraphViewState::new(), &options);

        assert_eq!(scene.nodes.len(), 1);
        assert!(scene.links.is_empty());
        assert_eq!(scene.picks.regions().len(), 3);
    }

    #[test]
    fn selection_rings_target_and_dims_unrelated_nodes() {
        let graph = three_nodes();
        let options = settled(ViewConfig::default());
        let mut state = GraphViewState::new();
        state.selected = Some(NodeIndex(0));
        let scene = build_scene(&graph, &state, &options);

        let shape = |index: usize| {
            scene
                .nodes
                .iter()
                .find(|shape| shape.node == NodeIndex(index))
                .expect("visible")
        };
        assert!(shape(0).ring.is_some());
        assert_eq!(shape(1).fill, graph.nodes()[1].color);
        assert_ne!(shape(2).fill, graph.nodes()[2].color);
        assert_eq!(scene.nodes.last().map(|shape| shape.node), Some(NodeIndex(0)));
    }

    #[test]
    fn labels_respect_the_toggle() {
        let graph = three_nodes();
        let mut state = GraphViewState::new();
        state.selected = Some(NodeIndex(2));

        let shown = build_scene(&graph, &state, &settled(ViewConfig::default()));
        assert_eq!(shown.labels.len(), 1);
        assert_eq!(shown.labels[0].text, "c");
        assert_eq!(shown.labels[0].anchor, pos2(313.0, 300.0));

        let hidden_view = ViewConfig {
            show_labels: false,
            ..ViewConfig::default()
        };
        let hidden = build_scene(&graph, &state, &settled(hidden_view));
        assert!(hidden.labels.is_empty());
    }

    #[test]
    fn fade_in_is_staggered_and_capped() {
        let layout = LayoutConfig::default();
        assert_eq!(fade_in_opacity(0, 0.0, &layout), 0.0);
        assert!(fade_in_opacity(0, 0.1, &layout) > fade_in_opacity(10, 0.1, &layout));
        assert_eq!(
            fade_in_opacity(10_000, 0.6, &layout),
            fade_in_opacity(100_000, 0.6, &layout)
        );
        assert_eq!(fade_in_opacity(10_000, 5.0, &layout), 1.0);
        assert!(!fade_in_finished(3, 0.1, &layout));
        assert!(fade_in_finished(3, 5.0, &layout));
    }

    #[test]
    fn hovered_node_gets_tooltip_near_pointer() {
        let mut graph = three_nodes();
        {
            let node = graph.node_mut(NodeIndex(1)).expect("b");
            node.value = Some(12_400.0);
            node.transaction_count = Some(1_500);
        }
        let mut state = GraphViewState::new();
        state.set_hovered(Some(NodeIndex(1)));
        state.pointer = Some(pos2(200.0, 100.0));

        let scene = build_scene(&graph, &state, &settled(ViewConfig::default()));
        let tooltip = scene.tooltip.expect("tooltip");
        assert_eq!(tooltip.anchor, pos2(214.0, 114.0));
        assert_eq!(tooltip.title, "b");
        assert_eq!(
            tooltip.lines,
            vec!["Group: member", "Value: $12.4K", "Transactions: 1,500"]
        );
    }

    #[test]
    fn legend_lists_each_group_once() {
        let mut graph = three_nodes();
        graph.node_mut(NodeIndex(2)).expect("c").group = "aggregate".to_owned();
        let scene = build_scene(&graph, &GraphViewState::new(), &settled(ViewConfig::default()));

        let groups = scene
            .legend
            .iter()
            .map(|entry| entry.group.as_str())
            .collect::<Vec<_>>();
        assert_eq!(groups, vec!["member", "aggregate"]);
        assert_eq!(scene.zoom_badge, "100%");
    }
}
