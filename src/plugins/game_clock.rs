// One-shot round countdown: one tick per elapsed second, terminal event once the
// remaining time drops below zero.
use std::time::Duration;

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Nothing happened (idle, or less than a second elapsed).
    Idle,
    /// `n` whole seconds elapsed while running.
    Ticked(u32),
    /// Remaining time went below zero; the clock is stopped.
    Expired,
}

#[derive(Debug, Clone)]
pub struct GameClock {
    timer: Timer,
    remaining_seconds: i32,
    running: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
            remaining_seconds: 0,
            running: false,
        }
    }
}

impl GameClock {
    pub fn is_running(&self) -> bool { self.running }

    pub fn remaining_seconds(&self) -> i32 { self.remaining_seconds }

    /// Arms the clock. Returns `false` (and changes nothing) if already running.
    pub fn start(&mut self, duration_seconds: i32) -> bool {
        if self.running {
            return false;
        }
        self.remaining_seconds = duration_seconds;
        self.timer.reset();
        self.running = true;
        true
    }

    /// Halts ticking without a terminal event.
    pub fn stop(&mut self) {
        self.running = false;
        self.timer.reset();
    }

    pub fn reset(&mut self) {
        self.stop();
        self.remaining_seconds = 0;
    }

    pub fn advance(&mut self, delta: Duration) -> ClockEvent {
        if !self.running {
            return ClockEvent::Idle;
        }
        self.timer.tick(delta);
        let ticks = self.timer.times_finished_this_tick();
        if ticks == 0 {
            return ClockEvent::Idle;
        }
        for _ in 0..ticks {
            self.remaining_seconds -= 1;
            if self.remaining_seconds < 0 {
                self.stop();
                return ClockEvent::Expired;
            }
        }
        ClockEvent::Ticked(ticks)
    }
}
