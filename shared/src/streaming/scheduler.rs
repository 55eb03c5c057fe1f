use std::time::Duration;

use bevy::time::{Timer, TimerMode};

/// Fixed-interval tick driven by the host loop.
///
/// The first tick after `start` fires immediately. When several intervals
/// elapse within one `advance` call only one tick is reported.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    timer: Timer,
    running: bool,
    pending_first: bool,
}

impl TickScheduler {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval_secs, TimerMode::Repeating),
            running: false,
            pending_first: false,
        }
    }

    /// Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.timer.reset();
        self.running = true;
        self.pending_first = true;
        true
    }

    /// Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.pending_first = false;
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances by one frame. Returns true when a tick is due.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }
        if self.pending_first {
            self.pending_first = false;
            return true;
        }
        self.timer.tick(delta).just_finished()
    }
}
