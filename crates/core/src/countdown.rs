/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Time remains; carries the new remaining seconds.
    Running(u32),
    /// This tick reached zero. Reported exactly once.
    Expired,
    /// The countdown already expired or was stopped; nothing changed.
    Stopped,
}

/// Whole-second countdown that saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    stopped: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            stopped: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Freeze the countdown at its current value. Later ticks are ignored.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> CountdownTick {
        if self.stopped {
            return CountdownTick::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stopped = true;
            CountdownTick::Expired
        } else {
            CountdownTick::Running(self.remaining)
        }
    }
}

/// Format seconds as `minutes:seconds` with seconds zero-padded.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}
