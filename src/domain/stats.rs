/// Tick instrumentation counters.
///
/// Written by the collision detector and the spatial index during
/// ticks; read-and-cleared by the frame loop on a coarser cadence via
/// `take()`. Single writer, single reader, one defined handoff point —
/// nothing here is safe to share across threads, and nothing needs to
/// be.

use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct TickStats {
    /// Ticks advanced since the last `take()`.
    pub frames: u64,
    /// Time spent re-registering actors in the spatial index.
    pub index_time: Duration,
    /// Time spent inside collision queries (both phases).
    pub collision_time: Duration,
    /// Narrow-phase candidates examined, summed over calls.
    pub collision_checks: u64,
    /// Number of collision queries.
    pub collision_calls: u64,
}

impl TickStats {
    /// Hand the accumulated counters to the caller and reset to zero.
    pub fn take(&mut self) -> TickStats {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_resets() {
        let mut stats = TickStats::default();
        stats.frames = 7;
        stats.collision_calls = 3;

        let sample = stats.take();
        assert_eq!(sample.frames, 7);
        assert_eq!(sample.collision_calls, 3);
        assert_eq!(stats.frames, 0);
        assert_eq!(stats.collision_calls, 0);
    }
}
