// src/engine_lib/clock.rs

pub const TICK_RATE_HZ: f32 = 60.0;
pub const MAX_TICKS_PER_FRAME: u32 = 8;

/// Turns variable frame times into a count of fixed simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick: f32,
    accumulator: f32,
    max_ticks: u32,
    total_ticks: u64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_RATE_HZ, MAX_TICKS_PER_FRAME)
    }
}

impl FixedTimestep {
    pub fn new(rate_hz: f32, max_ticks: u32) -> Self {
        Self {
            tick: 1.0 / rate_hz,
            accumulator: 0.0,
            max_ticks: max_ticks.max(1),
            total_ticks: 0,
        }
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Adds `dt` seconds and returns how many ticks are due. Time beyond
    /// `max_ticks` ticks is dropped so a stall does not cause a burst.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        let mut ticks = 0;
        while self.accumulator >= self.tick && ticks < self.max_ticks {
            self.accumulator -= self.tick;
            ticks += 1;
        }
        if ticks == self.max_ticks {
            self.accumulator = self.accumulator.min(self.tick);
        }
        self.total_ticks += u64::from(ticks);
        ticks
    }
}
