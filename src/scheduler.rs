use crate::graph::Graph;
use crate::physics::Simulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    /// Terminal. The owning instance has been torn down.
    Cancelled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub ticked: bool,
    /// Whether the host should schedule another frame callback.
    pub wants_frame: bool,
}

/// Drives one simulation tick per frame callback while the layout is warm.
#[derive(Debug)]
pub struct TickLoop {
    state: LoopState,
    frames: u64,
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl TickLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) {
        if self.state == LoopState::Stopped {
            tracing::debug!("tick loop started");
            self.state = LoopState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            tracing::debug!(frames = self.frames, "tick loop stopped");
            self.state = LoopState::Stopped;
        }
    }

    pub fn cancel(&mut self) {
        if self.state != LoopState::Cancelled {
            tracing::debug!(frames = self.frames, "tick loop cancelled");
        }
        self.state = LoopState::Cancelled;
    }

    pub fn on_frame(&mut self, simulation: &mut Simulation, graph: &mut Graph) -> FrameOutcome {
        if self.state != LoopState::Running {
            return FrameOutcome::default();
        }

        if !simulation.is_active(graph) {
            self.stop();
            return FrameOutcome::default();
        }

        simulation.step(graph);
        self.frames += 1;

        let wants_frame = simulation.is_active(graph);
        if !wants_frame {
            self.stop();
        }

        FrameOutcome {
            ticked: true,
            wants_frame,
        }
    }
}
