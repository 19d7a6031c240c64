//! Time abstraction for tick-driven control code.
//!
//! The fire-control loop never sleeps; it only compares timestamps. This
//! module provides the `TimeSource` trait so that shot timers, vision
//! staleness checks and the robot tick can be driven by a hardware clock
//! on the robot and by `MockTime` on the host.

use core::cell::Cell;

/// Monotonic time source, microsecond resolution.
///
/// # Example
///
/// ```
/// use fire_control_core::traits::{MockTime, TimeSource};
///
/// fn shot_complete<T: TimeSource>(time: &T, started_us: u64, duration_us: u64) -> bool {
///     time.elapsed_since(started_us) >= duration_us
/// }
///
/// let time = MockTime::new();
/// time.advance(400_000);
/// assert!(!shot_complete(&time, 0, 500_000));
/// time.advance(100_000);
/// assert!(shot_complete(&time, 0, 500_000));
/// ```
pub trait TimeSource {
    /// Current time in microseconds since an arbitrary fixed epoch.
    fn now_us(&self) -> u64;

    /// Current time in milliseconds.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Current time in seconds.
    fn now_s(&self) -> f32 {
        self.now_us() as f32 / 1_000_000.0
    }

    /// Microseconds elapsed since `reference_us`.
    ///
    /// Saturates to zero when the reference lies in the future.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Manually advanced clock for deterministic tests and lockstep simulation.
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a clock at t = 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a clock at the given time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Jumps to an absolute time.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the clock by `us` microseconds.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get().saturating_add(us));
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
