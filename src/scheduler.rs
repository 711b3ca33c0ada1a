/// Frame scheduling seam between the pure core and whatever drives it.
///
/// The driver owns a [`FrameScheduler`] and calls [`GameLoop::on_frame`]
/// whenever a requested frame arrives.  Each frame tail-requests the next
/// one; a finished run stops requesting until a jump restarts it.

use log::debug;
use rand::Rng;

use crate::compute::{advance_frame, apply_input, init_state};
use crate::config::Tuning;
use crate::entities::{Input, RunState, RunStatus};

pub trait FrameScheduler {
    /// Ask for one more frame callback.
    fn request_frame(&mut self);
}

/// Single-slot scheduler: remembers whether a frame is pending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingFrame {
    pending: bool,
}

impl PendingFrame {
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for PendingFrame {
    fn request_frame(&mut self) {
        self.pending = true;
    }
}

/// Owns the run state and wires it to a scheduler and an RNG.
pub struct GameLoop<S, R> {
    state: RunState,
    scheduler: S,
    rng: R,
}

impl<S: FrameScheduler, R: Rng> GameLoop<S, R> {
    /// Starts in `NotStarted`; frames are requested once the run begins.
    pub fn new(tuning: Tuning, scheduler: S, rng: R) -> Self {
        Self {
            state: init_state(tuning),
            scheduler,
            rng,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Apply an input event immediately.  Starting or restarting the run
    /// re-arms the frame chain.
    pub fn on_input(&mut self, input: Input) {
        let before = self.state.status;
        self.state = apply_input(&self.state, input);
        if before != RunStatus::Running && self.state.status == RunStatus::Running {
            debug!("frame chain armed");
            self.scheduler.request_frame();
        }
    }

    /// Run one frame at timestamp `now` (ms) and request the next one
    /// unless the run just ended.
    pub fn on_frame(&mut self, now: f64) {
        if self.state.status != RunStatus::Running {
            return;
        }
        self.state = advance_frame(&self.state, now, &mut self.rng);
        if self.state.is_game_over() {
            debug!("frame chain halted at frame {}", self.state.frame);
        } else {
            self.scheduler.request_frame();
        }
    }
}
