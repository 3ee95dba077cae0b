/// Who counts the delay and sound timers down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// The host calls [`CPU::tick_timers`](crate::chip8::CPU::tick_timers) at its own cadence, usually 60Hz.
    External,
    /// The machine ticks both timers once every `n` instructions executed by `step`.
    PerInstructions(u32),
}

/// Machine-wide settings fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub timer_mode: TimerMode,
    /// With [`TimerMode::PerInstructions`], whether a `step` spent waiting
    /// for a key still counts toward the next timer tick.
    pub tick_timers_while_waiting: bool,
    /// Seed for the `Cxkk` random source. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timer_mode: TimerMode::External,
            tick_timers_while_waiting: true,
            seed: None,
        }
    }
}

impl Config {
    /// Roughly 500 instructions per second against a 60Hz timer.
    pub const DEFAULT_INSTRUCTIONS_PER_TICK: u32 = 8;

    /// Choose who ticks the timers.
    pub fn with_timer_mode(mut self, timer_mode: TimerMode) -> Self {
        self.timer_mode = timer_mode;
        self
    }

    /// Make `Cxkk` repeatable.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose whether waiting on `Fx0A` counts toward timer ticks.
    pub fn with_tick_timers_while_waiting(mut self, tick: bool) -> Self {
        self.tick_timers_while_waiting = tick;
        self
    }
}
