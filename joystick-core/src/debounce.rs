//! Per-line debouncing with a trailing quiet period.
//!
//! Every accepted transition re-arms a quiet period during which further
//! disagreeing samples are treated as contact bounce and ignored. Unlike an
//! N-stable-samples filter this accepts the first flip immediately, so fast
//! human input is never missed regardless of the poll rate. The trade-off is
//! that the first sample after a quiet period is trusted even if it is
//! itself bounce, which is fine for mechanical contacts whose bounce windows
//! are shorter than the quiet period.

use crate::timer::Deadline;

/// Quiet period armed after every accepted line transition.
pub const DEBOUNCE_TIMEOUT_US: u32 = 20_000;

/// Debounce state for one input line.
///
/// Lines start in the released state. Raw levels fed into
/// [`sample`](Self::sample) must already be converted to asserted polarity
/// by the caller; the core never sees electrical levels.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebouncedLine {
    stable: bool,
    quiet_until: Deadline,
}

impl DebouncedLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stable: false,
            quiet_until: Deadline::NONE,
        }
    }

    /// Stable logical state of the line.
    #[inline]
    #[must_use]
    pub const fn is_asserted(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample; returns true if the stable state flipped.
    ///
    /// A sample that agrees with the stable state is a no-op. A stale quiet
    /// period from an earlier flip is left to run out on its own, since it
    /// only gates the next disagreement.
    pub fn sample(&mut self, raw: bool, now_us: u32) -> bool {
        if raw == self.stable {
            return false;
        }
        if !self.quiet_until.has_passed(now_us) {
            // Disagreement inside the quiet period is contact bounce.
            return false;
        }
        self.stable = raw;
        self.quiet_until = Deadline::after(now_us, DEBOUNCE_TIMEOUT_US);
        true
    }
}

impl Default for DebouncedLine {
    fn default() -> Self {
        Self::new()
    }
}
