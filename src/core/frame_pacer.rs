//=========================================================================
// Frame Pacer
//=========================================================================
//
// Tick timing for the main loop, separated from the loop so the
// decision table can be tested without a clock.
//
//   elapsed = now - last_tick
//
//   elapsed < 0                  → ClockAnomaly   (last_tick unchanged)
//   0 <= elapsed < budget        → Run, sleep (budget - elapsed)
//   budget <= elapsed <= stall   → Run, no sleep, over budget
//   elapsed > stall              → Stalled, no sleep, over budget
//                                  (last_tick = now, tick body skipped)
//
// The pacer never sleeps itself; the loop performs the sleep outside
// the guarded section.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== FrameDecision =======================================================

/// What the loop should do with the current iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// The clock went backwards. Skip the iteration entirely.
    ClockAnomaly { elapsed_ms: i64 },

    /// Too much time passed (debugger pause, window drag). Skip update and
    /// render so the state does not jump.
    Stalled { elapsed_ms: i64 },

    /// Execute the tick with `elapsed_ms`, after sleeping for `sleep` if set.
    Run {
        elapsed_ms: u32,
        sleep: Option<Duration>,
    },
}

impl FrameDecision {
    /// True when the frame used its whole budget (no pacing sleep).
    pub fn is_over_budget(&self) -> bool {
        match self {
            Self::ClockAnomaly { .. } => false,
            Self::Stalled { .. } => true,
            Self::Run { sleep, .. } => sleep.is_none(),
        }
    }
}

//=== FramePacer ==========================================================

/// Fixed-rate tick scheduler over a millisecond clock.
#[derive(Debug, Clone)]
pub struct FramePacer {
    last_tick: i64,
    budget_ms: u32,
    stall_threshold_ms: u32,
}

impl FramePacer {
    /// Starts pacing from `now`.
    ///
    /// # Panics
    ///
    /// Panics if `budget_ms == 0` or `stall_threshold_ms < budget_ms`.
    pub fn new(now: i64, budget_ms: u32, stall_threshold_ms: u32) -> Self {
        assert!(budget_ms > 0, "Frame budget must be positive");
        assert!(
            stall_threshold_ms >= budget_ms,
            "Stall threshold ({} ms) must not be below the frame budget ({} ms)",
            stall_threshold_ms,
            budget_ms
        );

        Self {
            last_tick: now,
            budget_ms,
            stall_threshold_ms,
        }
    }

    /// Timestamp of the last accepted tick.
    pub fn last_tick(&self) -> i64 {
        self.last_tick
    }

    /// Decides how to handle an iteration that observed `now`.
    pub fn advance(&mut self, now: i64) -> FrameDecision {
        let elapsed = now - self.last_tick;

        if elapsed < 0 {
            return FrameDecision::ClockAnomaly {
                elapsed_ms: elapsed,
            };
        }

        self.last_tick = now;

        if elapsed > i64::from(self.stall_threshold_ms) {
            return FrameDecision::Stalled {
                elapsed_ms: elapsed,
            };
        }

        // 0 <= elapsed <= stall threshold, fits in u32.
        let elapsed_ms = elapsed as u32;
        let sleep = (elapsed_ms < self.budget_ms)
            .then(|| Duration::from_millis(u64::from(self.budget_ms - elapsed_ms)));

        FrameDecision::Run { elapsed_ms, sleep }
    }
}

//=== FrameStats ==========================================================

/// Counters describing loop behavior since startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Iterations that executed the guarded tick body.
    pub ticks: u64,
    /// Ticks that ended in a render.
    pub rendered: u64,
    /// Ticks that ended in a scene swap.
    pub swaps: u64,
    /// Iterations that used the whole frame budget.
    pub over_budget: u64,
    /// Iterations skipped because of a stall.
    pub stalls: u64,
    /// Iterations skipped because the clock went backwards.
    pub clock_anomalies: u64,
}

//=========================================================================
// Unit Tests
//=========================================================================
