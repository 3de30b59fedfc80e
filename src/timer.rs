use std::time::{Duration, Instant};

/// the 60 Hz-ish cadence the delay and sound timers count down at
pub const CHIP8_TIMER_PERIOD: Duration = Duration::from_millis(16);

/// Delay and sound timers. They count down by wall-clock time, not by how many
/// instructions ran, so the interpreter hands `update` the current time and
/// the timers work out how many ticks have gone by.
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
    period: Duration,
    last_tick: Instant,
}

impl Timers {
    pub fn new(period: Duration) -> Self {
        Timers {
            delay: 0,
            sound: 0,
            period,
            last_tick: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// zero both counters and start counting ticks from `now`
    pub fn reset(&mut self, now: Instant) {
        self.delay = 0;
        self.sound = 0;
        self.restart(now);
    }

    /// start counting ticks from `now`, leaving the counters alone
    pub fn restart(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// one 60 Hz tick: both counters step toward zero
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// apply every whole tick that has elapsed up to `now`; returns how many
    pub fn update(&mut self, now: Instant) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        let elapsed = now.saturating_duration_since(self.last_tick);
        let ticks = elapsed.as_nanos() / self.period.as_nanos();
        if ticks == 0 {
            return 0;
        }
        if ticks > u8::MAX as u128 {
            // both counters are empty after this many; don't bother catching up
            self.delay = 0;
            self.sound = 0;
            self.last_tick = now;
            return ticks.min(u32::MAX as u128) as u32;
        }
        let ticks = ticks as u32;
        for _ in 0..ticks {
            self.tick();
        }
        self.last_tick += self.period * ticks;
        ticks
    }

    pub fn sound_active(&self) -> bool {
        self.sound != 0
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new(CHIP8_TIMER_PERIOD)
    }
}
