//! Status LED blink-pattern state machine.
//!
//! The LED communicates the device lifecycle: steady slow blinking while not
//! mounted (250 ms) or suspended (2.5 s), a short fast-blink pulse on mount
//! and resume, and darkness while mounted and idle. Each accepted report
//! additionally flashes the LED for a moment.

use crate::timer::Deadline;

/// Blink interval while the device is not mounted.
pub const BLINK_NOT_MOUNTED_US: u32 = 250_000;
/// Blink interval while the bus is suspended.
pub const BLINK_SUSPENDED_US: u32 = 2_500_000;
/// Blink interval inside a fast-blink pulse.
pub const BLINK_FAST_US: u32 = 50_000;
/// Blink interval of the steady mounted pattern (policy variant).
pub const BLINK_MOUNTED_US: u32 = 1_000_000;
/// Length of the attract-attention pulse after mounting.
pub const MOUNT_PULSE_US: u32 = 1_000_000;
/// Length of the pulse after resuming from suspend.
pub const RESUME_PULSE_US: u32 = 500_000;
/// How long a report flash holds the LED before it goes dark.
pub const EVENT_FLASH_US: u32 = 30_000;

/// What the LED should communicate once the device mounts.
///
/// Two behaviors exist in the field; which one a given build wants is a
/// policy question, so it is a constructor argument rather than a constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountPolicy {
    /// Fast-blink for a second, then stay dark while mounted and idle.
    ///
    /// Darkness is what distinguishes "mounted" from the not-mounted and
    /// suspended patterns, and it leaves the LED free for report flashes.
    #[default]
    PulseThenOff,
    /// Blink steadily at 1 s for as long as the device stays mounted.
    SteadyBlink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pattern {
    Off,
    Steady { interval_us: u32 },
    FastBlink { until: Deadline },
    Flash { until: Deadline },
}

/// Timer-driven blink pattern selector for the status LED.
///
/// Lifecycle callbacks and report-accepted events mutate the pattern; the
/// periodic [`tick`](Self::tick) turns the pattern into LED level changes.
/// Powers up in the not-mounted pattern.
pub struct StatusIndicator {
    policy: MountPolicy,
    pattern: Pattern,
    led_on: bool,
    next_toggle: Deadline,
}

impl StatusIndicator {
    #[must_use]
    pub const fn new(policy: MountPolicy) -> Self {
        Self {
            policy,
            pattern: Pattern::Steady {
                interval_us: BLINK_NOT_MOUNTED_US,
            },
            led_on: false,
            next_toggle: Deadline::NONE,
        }
    }

    /// Current LED level.
    #[inline]
    #[must_use]
    pub const fn led_on(&self) -> bool {
        self.led_on
    }

    fn set_steady(&mut self, interval_us: u32) {
        self.pattern = Pattern::Steady { interval_us };
        // An unset toggle deadline makes the first tick toggle immediately.
        self.next_toggle = Deadline::NONE;
    }

    fn set_pulse(&mut self, now_us: u32, length_us: u32) {
        self.pattern = Pattern::FastBlink {
            until: Deadline::after(now_us, length_us),
        };
        self.next_toggle = Deadline::NONE;
    }

    /// Device finished enumeration.
    pub fn on_mounted(&mut self, now_us: u32) {
        match self.policy {
            MountPolicy::PulseThenOff => self.set_pulse(now_us, MOUNT_PULSE_US),
            MountPolicy::SteadyBlink => self.set_steady(BLINK_MOUNTED_US),
        }
    }

    /// Device was unmounted by the host.
    pub fn on_unmounted(&mut self) {
        self.set_steady(BLINK_NOT_MOUNTED_US);
    }

    /// Bus entered suspend.
    pub fn on_suspended(&mut self) {
        self.set_steady(BLINK_SUSPENDED_US);
    }

    /// Bus resumed. `mounted` is the current mount state reported by the
    /// device stack; resuming an unmounted device falls back to the
    /// not-mounted pattern without passing through any other.
    pub fn on_resumed(&mut self, mounted: bool, now_us: u32) {
        if mounted {
            self.set_pulse(now_us, RESUME_PULSE_US);
        } else {
            self.set_steady(BLINK_NOT_MOUNTED_US);
        }
    }

    /// A report was accepted: toggle the LED once and hold it for the flash
    /// window. The flash cancels whatever pattern was active and expires to
    /// dark, it does not restore the previous pattern.
    ///
    /// Returns the new LED level so the caller can drive the pin at once.
    pub fn on_report_accepted(&mut self, now_us: u32) -> bool {
        self.led_on = !self.led_on;
        self.pattern = Pattern::Flash {
            until: Deadline::after(now_us, EVENT_FLASH_US),
        };
        self.next_toggle = Deadline::NONE;
        self.led_on
    }

    /// Advance the pattern. Returns the new LED level when it changes.
    pub fn tick(&mut self, now_us: u32) -> Option<bool> {
        // Expired pulse or flash windows decay to dark before anything else.
        if let Pattern::FastBlink { until } | Pattern::Flash { until } = self.pattern {
            if until.has_passed(now_us) {
                self.pattern = Pattern::Off;
                self.next_toggle = Deadline::NONE;
                if self.led_on {
                    self.led_on = false;
                    return Some(false);
                }
                return None;
            }
        }

        let interval_us = match self.pattern {
            Pattern::Off | Pattern::Flash { .. } => return None,
            Pattern::Steady { interval_us } => interval_us,
            Pattern::FastBlink { .. } => BLINK_FAST_US,
        };

        if !self.next_toggle.has_passed(now_us) {
            return None;
        }
        self.next_toggle = Deadline::after(now_us, interval_us);
        self.led_on = !self.led_on;
        Some(self.led_on)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    /// Ticks at a 1 ms cadence, recording every LED level change as
    /// (time, level).
    fn run_ticks(indicator: &mut StatusIndicator, from_us: u32, to_us: u32) -> Vec<(u32, bool)> {
        let mut changes = Vec::new();
        let mut now = from_us;
        while now < to_us {
            if let Some(level) = indicator.tick(now) {
                changes.push((now, level));
            }
            now += 1_000;
        }
        changes
    }

    #[test]
    fn test_powers_up_blinking_not_mounted() {
        let mut indicator = StatusIndicator::new(MountPolicy::PulseThenOff);
        let changes = run_ticks(&mut indicator, 0, 600_000);

        // First tick toggles immediately, then every 250 ms.
        assert_eq!(changes[0], (0, true));
        assert!(!changes[1].1);
        assert!(changes[1].0.abs_diff(250_000) <= 1_000);
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn test_mount_pulse_decays_to_dark() {
        let mut indicator = StatusIndicator::new(MountPolicy::PulseThenOff);
        indicator.on_mounted(0);

        let during = run_ticks(&mut indicator, 0, 1_000_000);
        // Fast blinking: a toggle roughly every 50 ms.
        assert!(during.len() >= 18);

        let after = run_ticks(&mut indicator, 1_100_000, 2_100_000);
        // At most the single decay-to-dark change, then nothing.
        assert!(after.len() <= 1);
        assert!(!indicator.led_on());
    }

    #[test]
    fn test_steady_blink_mount_policy() {
        let mut indicator = StatusIndicator::new(MountPolicy::SteadyBlink);
        indicator.on_mounted(0);

        let changes = run_ticks(&mut indicator, 0, 3_500_000);
        // Immediate toggle, then one per second, with no decay.
        assert_eq!(changes.len(), 4);
    }

    #[test]
    fn test_suspend_resume_while_mounted() {
        let mut indicator = StatusIndicator::new(MountPolicy::PulseThenOff);
        indicator.on_mounted(0);
        let _ = run_ticks(&mut indicator, 0, 2_000_000);

        indicator.on_suspended();
        let suspended = run_ticks(&mut indicator, 2_000_000, 4_400_000);
        // 2.5 s cadence: only the immediate toggle fits in this window.
        assert_eq!(suspended.len(), 1);

        // Resume while mounted goes straight to the fast pulse, never
        // through the not-mounted pattern.
        indicator.on_resumed(true, 4_400_000);
        let resumed = run_ticks(&mut indicator, 4_400_000, 4_900_000);
        assert!(resumed.len() >= 8);
        for pair in resumed.windows(2) {
            assert!(pair[1].0 - pair[0].0 <= 52_000);
        }
    }

    #[test]
    fn test_resume_while_unmounted_blinks_not_mounted() {
        let mut indicator = StatusIndicator::new(MountPolicy::PulseThenOff);
        indicator.on_suspended();
        indicator.on_resumed(false, 0);

        let changes = run_ticks(&mut indicator, 0, 600_000);
        assert_eq!(changes.len(), 3); // 250 ms cadence, not 2.5 s
    }

    #[test]
    fn test_flash_expires_to_dark_not_previous_pattern() {
        let mut indicator = StatusIndicator::new(MountPolicy::PulseThenOff);
        // Steady blinking, LED currently on.
        assert_eq!(indicator.tick(0), Some(true));

        let level = indicator.on_report_accepted(1_000);
        assert!(!level); // toggled off by the flash

        // Within the flash window the LED is frozen.
        assert_eq!(indicator.tick(10_000), None);
        assert_eq!(indicator.tick(20_000), None);

        // After the window the pattern is dark, the earlier 250 ms blink is
        // not restored.
        let after = run_ticks(&mut indicator, 40_000, 1_000_000);
        assert!(after.is_empty());
        assert!(!indicator.led_on());
    }

    #[test]
    fn test_flash_toggle_is_immediate() {
        let mut indicator = StatusIndicator::new(MountPolicy::PulseThenOff);
        assert!(!indicator.led_on());
        assert!(indicator.on_report_accepted(0));
        assert!(indicator.led_on());
    }

    #[test]
    fn test_unmount_returns_to_slow_blink() {
        let mut indicator = StatusIndicator::new(MountPolicy::PulseThenOff);
        indicator.on_mounted(0);
        let _ = run_ticks(&mut indicator, 0, 2_000_000);

        indicator.on_unmounted();
        let changes = run_ticks(&mut indicator, 2_000_000, 2_600_000);
        assert_eq!(changes.len(), 3); // immediate toggle + two at 250 ms
    }
}
