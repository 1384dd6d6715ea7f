use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Rect};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use relgraph::GraphInstance;
use relgraph::config::{EngineConfig, SimulationConfig, ViewConfig};
use relgraph::data::{RawGraph, load_graph_file};

mod canvas;
mod host;
mod ui;

use host::HostEvents;
use ui::NodeDetails;

type LoadResult = Result<RawGraph, String>;

pub struct RelGraphApp {
    source: PathBuf,
    config: EngineConfig,
    seed: u64,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    config: EngineConfig,
    rng: SmallRng,
    instance: Option<GraphInstance>,
    /// Parsed data waiting for the canvas size to be known.
    pending: Option<RawGraph>,
    host: HostEvents,
    details: NodeDetails,
    search: String,
    physics: SimulationConfig,
    view: ViewConfig,
    menu_rect: Option<Rect>,
    pointer_inside: bool,
}

impl ViewModel {
    fn new(raw: RawGraph, config: EngineConfig, seed: u64) -> Self {
        Self {
            physics: config.simulation,
            view: config.view,
            config,
            rng: SmallRng::seed_from_u64(seed),
            instance: None,
            pending: Some(raw),
            host: HostEvents::default(),
            details: NodeDetails::default(),
            search: String::new(),
            menu_rect: None,
            pointer_inside: false,
        }
    }

    fn queue_data(&mut self, raw: RawGraph) {
        self.pending = Some(raw);
    }
}

impl Drop for ViewModel {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.unmount();
        }
    }
}

impl RelGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: PathBuf,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            config,
            seed,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph_file(&source).map_err(|error| {
                tracing::error!(path = %source.display(), "{error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(&self, raw: RawGraph) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(raw, self.config.clone(), self.seed)))
    }
}

impl eframe::App for RelGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(raw)) => transition = Some(Ok(raw)),
                    Ok(Err(error)) => transition = Some(Err(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relationship graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.source.clone());
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(raw)) => {
                            model.queue_data(raw);
                            ctx.request_repaint();
                        }
                        Ok(Err(error)) => transition = Some(Err(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next) = transition {
            self.reload_rx = None;
            self.state = match next {
                Ok(raw) => self.ready(raw),
                Err(error) => AppState::Error(error),
            };
        }
    }
}
