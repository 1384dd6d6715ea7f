//! Force-directed relationship graph engine: normalizes node/link records,
//! lays them out with a cooling force simulation, and turns pointer input into
//! pan, zoom, drag, selection and context-menu actions over an egui canvas.

pub mod bridge;
pub mod config;
pub mod data;
pub mod graph;
pub mod instance;
pub mod interaction;
pub mod physics;
pub mod render;
pub mod scheduler;
pub mod util;

pub use bridge::{DetailPanel, OverlayBridge, StatusCard};
pub use config::EngineConfig;
pub use instance::{FrameOutput, GraphInstance};
pub use interaction::{GraphHost, PointerButton, PointerEvent};
