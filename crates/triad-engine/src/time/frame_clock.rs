use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock started. Not clamped; drives animations.
    pub elapsed: f32,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Produces a [`FrameTime`] per tick.
///
/// Delta time is clamped so a stall (debugger, minimized window) does not
/// produce a pathological step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_numbered_from_zero() {
        let mut clock = FrameClock::new();
        let base = clock.start;
        let a = clock.tick_at(base + Duration::from_millis(16));
        let b = clock.tick_at(base + Duration::from_millis(32));
        assert_eq!((a.frame_index, b.frame_index), (0, 1));
        assert!((b.elapsed - 0.032).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_but_elapsed_is_not() {
        let mut clock = FrameClock::new();
        let base = clock.start;
        let ft = clock.tick_at(base + Duration::from_secs(2));
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert!((ft.elapsed - 2.0).abs() < 1e-6);

        let ft = clock.tick_at(base + Duration::from_secs(2));
        assert!((ft.dt - 0.0001).abs() < 1e-6);
    }
}
