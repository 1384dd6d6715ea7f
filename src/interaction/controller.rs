use eframe::egui::{Pos2, Vec2};

use crate::config::{EngineConfig, GroupConfig, ViewConfig};
use crate::graph::{Graph, Node, NodeIndex};
use crate::physics::Simulation;
use crate::render::PickRegions;

use super::state::{ContextMenu, GraphViewState, MenuAction, Mode};
use super::transform::ViewTransform;
use super::{GraphHost, PointerButton, PointerEvent};

/// Everything a pointer event may touch. `picks` must come from the current frame.
pub struct InteractionContext<'a> {
    pub graph: &'a mut Graph,
    pub simulation: &'a mut Simulation,
    pub picks: &'a PickRegions,
    pub host: &'a mut dyn GraphHost,
}

pub struct InteractionController {
    view: ViewConfig,
    groups: GroupConfig,
    drag_alpha_target: f32,
    state: GraphViewState,
}

impl InteractionController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            view: config.view,
            groups: config.groups.clone(),
            drag_alpha_target: config.simulation.drag_alpha_target,
            state: GraphViewState::new(),
        }
    }

    pub fn state(&self) -> &GraphViewState {
        &self.state
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view
    }

    pub fn set_view_config(&mut self, view: ViewConfig) {
        self.view = view;
        let transform = &mut self.state.transform;
        transform.scale = transform.scale.clamp(view.zoom_min, view.zoom_max);
    }

    pub fn set_drag_alpha_target(&mut self, target: f32) {
        self.drag_alpha_target = target;
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn dispose(&mut self) {
        self.state.dispose();
    }

    /// Advances time-based feedback. Returns whether another frame is needed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.state.advance_pulse(dt, self.view.hover_pulse_secs)
    }

    /// Applies one pointer event. Returns whether anything visible changed.
    pub fn handle(&mut self, event: PointerEvent, ctx: &mut InteractionContext<'_>) -> bool {
        if self.state.is_disposed() {
            return false;
        }

        match event {
            PointerEvent::Moved { pos } => self.pointer_moved(pos, ctx),
            PointerEvent::Pressed {
                pos,
                button: PointerButton::Primary,
            } => self.primary_pressed(pos, ctx),
            PointerEvent::Released {
                button: PointerButton::Primary,
                ..
            } => self.primary_released(ctx),
            PointerEvent::Pressed {
                pos,
                button: PointerButton::Secondary,
            } => self.open_menu(pos, ctx),
            PointerEvent::Released {
                button: PointerButton::Secondary,
                ..
            } => false,
            PointerEvent::Wheel { pos, delta } => {
                if delta == 0.0 {
                    return false;
                }
                self.state.transform.zoom_at(
                    pos,
                    ViewTransform::wheel_factor(delta),
                    self.view.zoom_min,
                    self.view.zoom_max,
                );
                true
            }
            PointerEvent::DoubleClicked { pos } => {
                if ctx.picks.hit_test(pos).is_some() {
                    return false;
                }
                if matches!(self.state.mode, Mode::MenuOpen(_)) {
                    self.state.mode = Mode::Idle;
                }
                self.state.transform.reset();
                self.select(None, ctx.graph, ctx.host);
                true
            }
            PointerEvent::Left => self.pointer_left(ctx),
        }
    }

    /// Runs `action` from the open context menu and closes it.
    pub fn choose_menu_action(
        &mut self,
        action: MenuAction,
        graph: &Graph,
        host: &mut dyn GraphHost,
    ) -> bool {
        let Mode::MenuOpen(menu) = &self.state.mode else {
            return false;
        };
        if !menu.actions.contains(&action) {
            return false;
        }
        let index = menu.node;
        self.state.mode = Mode::Idle;

        let Some(node) = graph.node(index) else {
            return false;
        };
        tracing::info!(node = node.id(), ?action, "context menu action");
        match action {
            MenuAction::Expand => host.on_node_drill_down(node),
            MenuAction::GoToProfile => host.on_node_navigate(node),
        }
        true
    }

    pub fn close_menu(&mut self) -> bool {
        if matches!(self.state.mode, Mode::MenuOpen(_)) {
            self.state.mode = Mode::Idle;
            return true;
        }
        false
    }

    pub fn clear_selection(&mut self, graph: &Graph, host: &mut dyn GraphHost) -> bool {
        self.select(None, graph, host)
    }

    pub fn menu_actions(&self, node: &Node) -> Vec<MenuAction> {
        if node.is_aggregate {
            vec![MenuAction::Expand]
        } else if self.groups.is_navigable(&node.group) {
            vec![MenuAction::GoToProfile]
        } else {
            Vec::new()
        }
    }

    fn select(
        &mut self,
        target: Option<NodeIndex>,
        graph: &Graph,
        host: &mut dyn GraphHost,
    ) -> bool {
        if self.state.selected == target {
            return false;
        }
        self.state.selected = target;

        let node = target.and_then(|index| graph.node(index));
        tracing::debug!(node = ?node.map(Node::id), "selection changed");
        host.on_node_select(node);
        true
    }

    fn primary_pressed(&mut self, pos: Pos2, ctx: &mut InteractionContext<'_>) -> bool {
        match self.state.mode {
            Mode::Idle => {}
            Mode::MenuOpen(_) => {
                self.state.mode = Mode::Idle;
                return true;
            }
            Mode::Panning { .. } | Mode::Dragging { .. } => return false,
        }

        match ctx.picks.hit_test(pos) {
            Some(index) => {
                let world = self.state.transform.screen_to_world(pos);
                pin(ctx.graph, index, world);
                ctx.simulation.reheat(self.drag_alpha_target);
                self.state.mode = Mode::Dragging {
                    node: index,
                    press: pos,
                    moved: false,
                };
                tracing::debug!(node = index.0, "drag started");
            }
            None => {
                self.state.mode = Mode::Panning {
                    press: pos,
                    last: pos,
                    moved: false,
                };
            }
        }
        true
    }

    fn pointer_moved(&mut self, pos: Pos2, ctx: &mut InteractionContext<'_>) -> bool {
        self.state.pointer = Some(pos);
        let slop = self.view.click_slop;
        let transform = self.state.transform;

        let mut changed = match &mut self.state.mode {
            Mode::Dragging { node, press, moved } => {
                if press.distance(pos) > slop {
                    *moved = true;
                }
                pin(ctx.graph, *node, transform.screen_to_world(pos));
                true
            }
            Mode::Panning { press, last, moved } => {
                let delta = pos - *last;
                *last = pos;
                if press.distance(pos) > slop {
                    *moved = true;
                }
                self.state.transform.pan_by(delta);
                delta != Vec2::ZERO
            }
            Mode::Idle | Mode::MenuOpen(_) => false,
        };

        let hovered = ctx.picks.hit_test(pos);
        if hovered != self.state.hovered {
            self.state.set_hovered(hovered);
            changed = true;
        }
        changed
    }

    fn primary_released(&mut self, ctx: &mut InteractionContext<'_>) -> bool {
        match std::mem::take(&mut self.state.mode) {
            Mode::Dragging { node, moved, .. } => {
                end_drag(ctx, node);
                if !moved {
                    self.select(Some(node), ctx.graph, ctx.host);
                }
                true
            }
            Mode::Panning { moved, .. } => {
                if !moved {
                    self.select(None, ctx.graph, ctx.host);
                }
                true
            }
            other => {
                self.state.mode = other;
                false
            }
        }
    }

    fn open_menu(&mut self, pos: Pos2, ctx: &mut InteractionContext<'_>) -> bool {
        if matches!(
            self.state.mode,
            Mode::Panning { .. } | Mode::Dragging { .. }
        ) {
            return false;
        }

        let actions = ctx
            .picks
            .hit_test(pos)
            .and_then(|index| ctx.graph.node(index).map(|node| (index, node)))
            .map(|(index, node)| (index, self.menu_actions(node)))
            .filter(|(_, actions)| !actions.is_empty());

        match actions {
            Some((node, actions)) => {
                tracing::debug!(node = node.0, "context menu opened");
                self.state.mode = Mode::MenuOpen(ContextMenu {
                    node,
                    anchor: pos,
                    actions,
                });
                true
            }
            None => self.close_menu(),
        }
    }

    fn pointer_left(&mut self, ctx: &mut InteractionContext<'_>) -> bool {
        self.state.pointer = None;
        let had_hover = self.state.hovered.is_some();
        self.state.set_hovered(None);

        match std::mem::take(&mut self.state.mode) {
            Mode::Dragging { node, .. } => {
                end_drag(ctx, node);
                true
            }
            Mode::Panning { .. } => true,
            other => {
                self.state.mode = other;
                had_hover
            }
        }
    }
}

fn pin(graph: &mut Graph, index: NodeIndex, world: Vec2) {
    if let Some(node) = graph.node_mut(index) {
        node.pinned = Some(world);
        node.position = world;
        node.velocity = Vec2::ZERO;
    }
}

fn end_drag(ctx: &mut InteractionContext<'_>, index: NodeIndex) {
    if let Some(node) = ctx.graph.node_mut(index) {
        node.pinned = None;
    }
    ctx.simulation.cool();
    tracing::debug!(node = index.0, "drag ended");
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::graph::test_support::{graph, node};

    #[derive(Default)]
    struct Recorder {
        selections: Vec<Option<String>>,
        drilled: Vec<String>,
        navigated: Vec<String>,
    }

    impl GraphHost for Recorder {
        fn on_node_select(&mut self, node: Option<&Node>) {
            self.selections.push(node.map(|node| node.id().to_owned()));
        }

        fn on_node_drill_down(&mut self, node: &Node) {
            self.drilled.push(node.id().to_owned());
        }

        fn on_node_navigate(&mut self, node: &Node) {
            self.navigated.push(node.id().to_owned());
        }
    }

    struct Harness {
        graph: Graph,
        simulation: Simulation,
        controller: InteractionController,
        host: Recorder,
    }

    impl Harness {
        fn new() -> Self {
            let mut aggregate = node("pac", vec2(200.0, 300.0), 20.0);
            aggregate.group = "aggregate".to_owned();
            aggregate.is_aggregate = true;
            let mut asset = node("asset", vec2(400.0, 300.0), 10.0);
            asset.group = "asset".to_owned();

            let graph = graph(
                vec![
                    node("a", vec2(100.0, 100.0), 10.0),
                    node("b", vec2(300.0, 100.0), 10.0),
                    aggregate,
                    asset,
                ],
                Vec::new(),
            );
            let config = EngineConfig::default();
            let simulation = Simulation::new(config.simulation, &graph, Vec2::ZERO);
            Self {
                graph,
                simulation,
                controller: InteractionController::new(&config),
                host: Recorder::default(),
            }
        }

        fn send(&mut self, event: PointerEvent) -> bool {
            let picks = PickRegions::compute(
                &self.graph,
                self.controller.state(),
                self.controller.view_config().hover_pulse_scale,
            );
            let mut ctx = InteractionContext {
                graph: &mut self.graph,
                simulation: &mut self.simulation,
                picks: &picks,
                host: &mut self.host,
            };
            self.controller.handle(event, &mut ctx)
        }

        fn click(&mut self, pos: Pos2, button: PointerButton) {
            self.send(PointerEvent::Pressed { pos, button });
            self.send(PointerEvent::Released { pos, button });
        }

        fn choose(&mut self, action: MenuAction) -> bool {
            self.controller.choose_menu_action(action, &self.graph, &mut self.host)
        }
    }

    fn ids(selections: &[Option<String>]) -> Vec<Option<&str>> {
        selections.iter().map(|id| id.as_deref()).collect()
    }

    #[test]
    fn selection_callbacks_fire_only_on_change() {
        let mut harness = Harness::new();
        harness.click(pos2(100.0, 100.0), PointerButton::Primary);
        harness.click(pos2(101.0, 100.0), PointerButton::Primary);
        harness.click(pos2(300.0, 100.0), PointerButton::Primary);
        harness.click(pos2(600.0, 500.0), PointerButton::Primary);
        harness.click(pos2(600.0, 500.0), PointerButton::Primary);

        assert_eq!(ids(&harness.host.selections), vec![Some("a"), Some("b"), None]);
        assert_eq!(harness.controller.state().selected(), None);
    }

    #[test]
    fn dragging_pins_node_to_pointer_and_release_unpins() {
        let mut harness = Harness::new();
        harness.send(PointerEvent::Pressed {
            pos: pos2(100.0, 100.0),
            button: PointerButton::Primary,
        });
        assert_eq!(harness.simulation.alpha_target(), 0.3);

        harness.send(PointerEvent::Moved {
            pos: pos2(250.0, 180.0),
        });
        let dragged = harness.graph.node(NodeIndex(0)).expect("a");
        assert_eq!(dragged.pinned, Some(vec2(250.0, 180.0)));
        assert_eq!(harness.controller.state().dragged(), Some(NodeIndex(0)));

        harness.send(PointerEvent::Released {
            pos: pos2(250.0, 180.0),
            button: PointerButton::Primary,
        });
        assert_eq!(harness.graph.node(NodeIndex(0)).expect("a").pinned, None);
        assert_eq!(harness.simulation.alpha_target(), 0.0);
        assert!(harness.host.selections.is_empty());
        assert_eq!(harness.controller.state().mode(), &Mode::Idle);
    }

    #[test]
    fn background_drag_pans_without_selecting() {
        let mut harness = Harness::new();
        harness.send(PointerEvent::Pressed {
            pos: pos2(600.0, 500.0),
            button: PointerButton::Primary,
        });
        harness.send(PointerEvent::Moved {
            pos: pos2(640.0, 470.0),
        });
        harness.send(PointerEvent::Released {
            pos: pos2(640.0, 470.0),
            button: PointerButton::Primary,
        });

        assert_eq!(harness.controller.state().transform().translation, vec2(40.0, -30.0));
        assert!(harness.host.selections.is_empty());
    }

    #[test]
    fn wheel_zoom_stays_in_range() {
        let mut harness = Harness::new();
        for _ in 0..50 {
            harness.send(PointerEvent::Wheel {
                pos: pos2(10.0, 10.0),
                delta: 5_000.0,
            });
        }
        assert_eq!(harness.controller.state().transform().scale, 8.0);

        harness.send(PointerEvent::Wheel {
            pos: pos2(10.0, 10.0),
            delta: -1e9,
        });
        assert_eq!(harness.controller.state().transform().scale, 0.1);
    }

    #[test]
    fn double_click_on_background_resets_view_and_selection() {
        let mut harness = Harness::new();
        harness.click(pos2(100.0, 100.0), PointerButton::Primary);
        harness.send(PointerEvent::Wheel {
            pos: pos2(50.0, 50.0),
            delta: 300.0,
        });

        assert!(harness.send(PointerEvent::DoubleClicked {
            pos: pos2(700.0, 20.0),
        }));
        assert_eq!(harness.controller.state().transform(), ViewTransform::IDENTITY);
        assert_eq!(ids(&harness.host.selections), vec![Some("a"), None]);
    }

    #[test]
    fn context_menu_offers_group_specific_actions() {
        let mut harness = Harness::new();

        harness.click(pos2(200.0, 300.0), PointerButton::Secondary);
        let menu = harness.controller.state().menu().expect("menu open");
        assert_eq!(menu.actions, vec![MenuAction::Expand]);
        assert!(!harness.choose(MenuAction::GoToProfile));
        assert!(harness.choose(MenuAction::Expand));
        assert_eq!(harness.host.drilled, vec!["pac".to_owned()]);
        assert!(harness.controller.state().menu().is_none());

        harness.click(pos2(100.0, 100.0), PointerButton::Secondary);
        assert!(harness.choose(MenuAction::GoToProfile));
        assert_eq!(harness.host.navigated, vec!["a".to_owned()]);

        harness.click(pos2(400.0, 300.0), PointerButton::Secondary);
        assert!(harness.controller.state().menu().is_none());
    }

    #[test]
    fn press_elsewhere_closes_menu_without_selecting() {
        let mut harness = Harness::new();
        harness.click(pos2(100.0, 100.0), PointerButton::Secondary);
        assert!(harness.controller.state().menu().is_some());

        harness.click(pos2(600.0, 500.0), PointerButton::Primary);
        assert!(harness.controller.state().menu().is_none());
        assert!(harness.host.selections.is_empty());
    }

    #[test]
    fn leaving_the_canvas_releases_drag_and_hover() {
        let mut harness = Harness::new();
        harness.send(PointerEvent::Moved {
            pos: pos2(100.0, 100.0),
        });
        assert_eq!(harness.controller.state().hovered(), Some(NodeIndex(0)));
        harness.send(PointerEvent::Pressed {
            pos: pos2(100.0, 100.0),
            button: PointerButton::Primary,
        });
        harness.send(PointerEvent::Left);

        assert_eq!(harness.controller.state().hovered(), None);
        assert_eq!(harness.controller.state().dragged(), None);
        assert_eq!(harness.graph.node(NodeIndex(0)).expect("a").pinned, None);
    }
}
