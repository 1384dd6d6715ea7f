//! One mounted graph view: arena, simulation, tick loop and interaction state
//! with a mount → frames → unmount lifecycle.

use eframe::egui::Vec2;
use rand::Rng;

use crate::bridge::{DetailPanel, OverlayBridge, StatusCard};
use crate::config::{EngineConfig, SimulationConfig, ViewConfig};
use crate::data::RawGraph;
use crate::graph::{Diagnostic, Graph, Normalized, VisualEncoder, normalize};
use crate::interaction::{
    GraphHost, GraphViewState, InteractionContext, InteractionController, MenuAction, PointerEvent,
};
use crate::physics::Simulation;
use crate::render::{PickRegions, RenderOptions, Scene, SearchHighlight, build_scene};
use crate::scheduler::{LoopState, TickLoop};

/// Energy injected when the canvas is resized or physics settings change.
const REHEAT_ALPHA: f32 = 0.3;

#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub scene: Scene,
    pub ticked: bool,
    /// Whether the host should schedule another frame.
    pub wants_frame: bool,
}

pub struct GraphInstance {
    config: EngineConfig,
    encoder: Box<dyn VisualEncoder>,
    graph: Graph,
    diagnostics: Vec<Diagnostic>,
    simulation: Simulation,
    tick_loop: TickLoop,
    controller: InteractionController,
    bridge: OverlayBridge,
    /// Hit regions of the last scene handed to the host.
    picks: PickRegions,
    canvas: Vec2,
    elapsed_secs: f32,
    search_query: String,
    search: Option<SearchHighlight>,
}

fn normalize_or_empty<R: Rng + ?Sized>(
    raw: &RawGraph,
    encoder: &dyn VisualEncoder,
    config: &EngineConfig,
    center: Vec2,
    rng: &mut R,
) -> Normalized {
    match normalize(raw, encoder, &config.groups, &config.layout, center, rng) {
        Ok(normalized) => normalized,
        Err(err) => {
            tracing::info!(%err, "nothing to lay out; showing empty state");
            Normalized {
                graph: Graph::default(),
                diagnostics: Vec::new(),
            }
        }
    }
}

impl GraphInstance {
    /// Normalizes `raw`, pre-warms the layout and starts the tick loop.
    pub fn mount<R: Rng + ?Sized>(
        raw: &RawGraph,
        encoder: Box<dyn VisualEncoder>,
        config: EngineConfig,
        canvas: Vec2,
        rng: &mut R,
    ) -> Self {
        let center = canvas * 0.5;
        let Normalized { graph, diagnostics } =
            normalize_or_empty(raw, encoder.as_ref(), &config, center, rng);
        let simulation = Simulation::new(config.simulation, &graph, center);

        let mut instance = Self {
            controller: InteractionController::new(&config),
            config,
            encoder,
            graph,
            diagnostics,
            simulation,
            tick_loop: TickLoop::new(),
            bridge: OverlayBridge::new(),
            picks: PickRegions::default(),
            canvas,
            elapsed_secs: 0.0,
            search_query: String::new(),
            search: None,
        };
        instance.warm_up();
        instance.refresh_picks();

        tracing::info!(
            nodes = instance.graph.node_count(),
            links = instance.graph.link_count(),
            diagnostics = instance.diagnostics.len(),
            "graph mounted"
        );
        instance
    }

    /// Swaps in new data. Interaction state tied to the old node indices is reset.
    pub fn replace_data<R: Rng + ?Sized>(&mut self, raw: &RawGraph, rng: &mut R) {
        if self.is_unmounted() {
            return;
        }

        let Normalized { graph, diagnostics } = normalize_or_empty(
            raw,
            self.encoder.as_ref(),
            &self.config,
            self.simulation.center(),
            rng,
        );
        self.graph = graph;
        self.diagnostics = diagnostics;
        self.simulation = Simulation::new(
            self.config.simulation,
            &self.graph,
            self.simulation.center(),
        );
        self.controller.reset();
        self.bridge.invalidate();
        self.elapsed_secs = 0.0;
        self.search = SearchHighlight::compute(&self.graph, &self.search_query);
        self.warm_up();
        self.refresh_picks();

        tracing::info!(
            nodes = self.graph.node_count(),
            links = self.graph.link_count(),
            diagnostics = self.diagnostics.len(),
            "graph data replaced"
        );
    }

    /// Cancels the tick loop and disposes interaction state. Later frames are inert.
    pub fn unmount(&mut self) {
        if self.is_unmounted() {
            return;
        }
        self.tick_loop.cancel();
        self.controller.dispose();
        tracing::info!(frames = self.tick_loop.frames(), "graph unmounted");
    }

    pub fn is_unmounted(&self) -> bool {
        self.tick_loop.state() == LoopState::Cancelled
    }

    fn warm_up(&mut self) {
        let ticks = self
            .simulation
            .pretick(&mut self.graph, self.config.simulation.pretick_limit);
        tracing::debug!(ticks, alpha = self.simulation.alpha(), "pre-ticked layout");
        self.tick_loop.start();
    }

    /// Hit regions for a layout no frame has drawn yet.
    fn refresh_picks(&mut self) {
        self.picks = PickRegions::compute(
            &self.graph,
            self.controller.state(),
            self.config.view.hover_pulse_scale,
        );
    }

    fn wake(&mut self) {
        if self.simulation.is_active(&self.graph) {
            self.tick_loop.start();
        }
    }

    pub fn resize(&mut self, canvas: Vec2) {
        if canvas == self.canvas || self.is_unmounted() {
            return;
        }
        self.canvas = canvas;
        self.simulation.set_center(canvas * 0.5);
        self.simulation.set_alpha(self.simulation.alpha().max(REHEAT_ALPHA));
        self.wake();
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, host: &mut dyn GraphHost) -> bool {
        if self.is_unmounted() {
            return false;
        }

        let mut ctx = InteractionContext {
            graph: &mut self.graph,
            simulation: &mut self.simulation,
            picks: &self.picks,
            host,
        };
        let changed = self.controller.handle(event, &mut ctx);
        self.wake();
        changed
    }

    /// One frame callback: at most one simulation tick, then a fresh scene.
    pub fn frame(&mut self, dt: f32) -> FrameOutput {
        if self.is_unmounted() {
            return FrameOutput {
                scene: Scene::empty_state(self.canvas),
                ticked: false,
                wants_frame: false,
            };
        }

        self.elapsed_secs += dt.max(0.0);
        let outcome = self.tick_loop.on_frame(&mut self.simulation, &mut self.graph);
        let pulsing = self.controller.advance(dt);
        let scene = build_scene(
            &self.graph,
            self.controller.state(),
            &RenderOptions {
                canvas: self.canvas,
                view: self.config.view,
                layout: self.config.layout,
                elapsed_secs: self.elapsed_secs,
                search: self.search.as_ref(),
            },
        );
        self.picks = scene.picks.clone();

        FrameOutput {
            wants_frame: outcome.wants_frame || pulsing || scene.animating,
            ticked: outcome.ticked,
            scene,
        }
    }

    pub fn choose_menu_action(&mut self, action: MenuAction, host: &mut dyn GraphHost) -> bool {
        self.controller.choose_menu_action(action, &self.graph, host)
    }

    pub fn close_menu(&mut self) -> bool {
        self.controller.close_menu()
    }

    pub fn clear_selection(&mut self, host: &mut dyn GraphHost) -> bool {
        self.bridge.clear_selection(&mut self.controller, &self.graph, host)
    }

    pub fn sync_overlay(&mut self, panel: &mut dyn DetailPanel) -> bool {
        self.bridge.sync(self.controller.state(), &self.graph, panel)
    }

    pub fn status_card(&self) -> Option<StatusCard> {
        self.bridge.status_card(self.controller.state(), &self.graph)
    }

    pub fn set_search(&mut self, query: &str) {
        if query == self.search_query {
            return;
        }
        self.search_query = query.to_owned();
        self.search = SearchHighlight::compute(&self.graph, query);
    }

    pub fn search(&self) -> Option<&SearchHighlight> {
        self.search.as_ref()
    }

    /// Applies new physics parameters and lets the layout re-settle.
    pub fn set_simulation_config(&mut self, simulation: SimulationConfig) {
        self.config.simulation = simulation;
        self.simulation.set_config(simulation, &self.graph);
        self.controller.set_drag_alpha_target(simulation.drag_alpha_target);
        self.simulation.set_alpha(self.simulation.alpha().max(REHEAT_ALPHA));
        self.wake();
    }

    pub fn set_view_config(&mut self, view: ViewConfig) {
        self.config.view = view;
        self.controller.set_view_config(view);
    }

    /// Restarts the layout from full energy without moving the camera.
    pub fn reheat(&mut self) {
        self.simulation.set_alpha(1.0);
        self.wake();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn tick_state(&self) -> LoopState {
        self.tick_loop.state()
    }

    pub fn state(&self) -> &GraphViewState {
        self.controller.state()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::data::{RawLink, RawNode};
    use crate::graph::{DefaultEncoder, Node, NodeIndex};
    use crate::interaction::PointerButton;

    struct NullHost;

    impl GraphHost for NullHost {
        fn on_node_select(&mut self, _node: Option<&Node>) {}
    }

    fn raw_pair() -> RawGraph {
        RawGraph {
            nodes: vec![RawNode::new("a", "member"), RawNode::new("b", "member")],
            links: vec![RawLink::new("a", "b")],
        }
    }

    fn mount(raw: &RawGraph) -> GraphInstance {
        GraphInstance::mount(
            raw,
            Box::new(DefaultEncoder),
            EngineConfig::default(),
            vec2(800.0, 600.0),
            &mut SmallRng::seed_from_u64(7),
        )
    }

    #[test]
    fn mount_prewarms_and_starts_ticking() {
        let mut instance = mount(&raw_pair());
        let pretick = instance.simulation().tick_count();
        assert!(pretick > 0);
        assert!(pretick <= instance.config().simulation.pretick_limit as u64);
        assert_eq!(instance.tick_state(), LoopState::Running);

        let output = instance.frame(1.0 / 60.0);
        assert!(output.ticked);
        assert_eq!(output.scene.nodes.len(), 2);
    }

    #[test]
    fn empty_input_mounts_empty_state() {
        let mut instance = mount(&RawGraph::default());
        let output = instance.frame(0.016);

        assert!(output.scene.is_empty_state());
        assert!(!output.ticked);
        assert!(!output.wants_frame);
    }

    #[test]
    fn unmount_cancels_further_frames() {
        let mut instance = mount(&raw_pair());
        instance.unmount();

        let output = instance.frame(0.016);
        assert!(!output.ticked && !output.wants_frame);
        assert!(instance.state().is_disposed());
        assert!(!instance.handle_pointer(PointerEvent::Left, &mut NullHost));
    }

    #[test]
    fn replacing_data_resets_selection() {
        let mut instance = mount(&raw_pair());
        let position = instance.graph().nodes()[0].position.to_pos2();
        instance.handle_pointer(
            PointerEvent::Pressed {
                pos: position,
                button: PointerButton::Primary,
            },
            &mut NullHost,
        );
        instance.handle_pointer(
            PointerEvent::Released {
                pos: position,
                button: PointerButton::Primary,
            },
            &mut NullHost,
        );
        assert!(instance.state().selected().is_some());

        let replacement = RawGraph {
            nodes: vec![RawNode::new("z", "member")],
            links: Vec::new(),
        };
        instance.replace_data(&replacement, &mut SmallRng::seed_from_u64(1));
        assert_eq!(instance.state().selected(), None);
        assert_eq!(instance.graph().node_count(), 1);
    }

    #[test]
    fn resize_recenters_the_layout() {
        let mut instance = mount(&raw_pair());
        instance.resize(vec2(1200.0, 900.0));
        assert_eq!(instance.simulation().center(), vec2(600.0, 450.0));
        assert!(instance.simulation().alpha() >= REHEAT_ALPHA);
        assert_eq!(instance.tick_state(), LoopState::Running);
    }

    #[test]
    fn pointer_hits_follow_the_last_drawn_scene() {
        let mut instance = mount(&raw_pair());
        instance.frame(1.0 / 60.0);
        let drawn = instance.graph().nodes()[0].position.to_pos2();

        // Moves the node without drawing; clicks still target what was on screen.
        instance.graph.nodes_mut()[0].position += vec2(500.0, 500.0);
        instance.handle_pointer(
            PointerEvent::Pressed {
                pos: drawn,
                button: PointerButton::Primary,
            },
            &mut NullHost,
        );
        instance.handle_pointer(
            PointerEvent::Released {
                pos: drawn,
                button: PointerButton::Primary,
            },
            &mut NullHost,
        );

        assert_eq!(instance.state().selected(), Some(NodeIndex(0)));
    }
}
