//! Debounced input engine and change-triggered report dispatcher.

use crate::debounce::DebouncedLine;
use crate::input::{PortSnapshot, Snapshot};
use crate::output::ReportSink;
use crate::types::{Direction, JoystickReport, PortId};

/// Debounce state for one port's five lines.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortEngine {
    up: DebouncedLine,
    down: DebouncedLine,
    left: DebouncedLine,
    right: DebouncedLine,
    button: DebouncedLine,
}

impl PortEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            up: DebouncedLine::new(),
            down: DebouncedLine::new(),
            left: DebouncedLine::new(),
            right: DebouncedLine::new(),
            button: DebouncedLine::new(),
        }
    }

    /// Feed one raw snapshot through the five line debouncers.
    fn update(&mut self, snap: &PortSnapshot, now_us: u32) {
        self.up.sample(snap.up, now_us);
        self.down.sample(snap.down, now_us);
        self.left.sample(snap.left, now_us);
        self.right.sample(snap.right, now_us);
        self.button.sample(snap.button, now_us);
    }

    /// Report reflecting the current stable line states.
    ///
    /// Recomputed on every poll; it is cheap and keeps no state of its own.
    #[must_use]
    pub fn report(&self) -> JoystickReport {
        JoystickReport {
            direction: Direction::from_lines(
                self.up.is_asserted(),
                self.down.is_asserted(),
                self.left.is_asserted(),
                self.right.is_asserted(),
            ),
            button: self.button.is_asserted(),
        }
    }
}

/// The debounced input-state engine for both ports.
///
/// Tracks, per port, the last report the sink *accepted*. A report only
/// counts as delivered once [`ReportSink::try_send`] succeeds, so a
/// transiently busy transport is retried on the next poll cycle and no
/// change is ever dropped silently.
pub struct InputEngine {
    ports: [PortEngine; 2],
    accepted: [JoystickReport; 2],
}

impl InputEngine {
    /// Engine with all lines released and neutral reports on record, the
    /// state a freshly enumerated host assumes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ports: [PortEngine::new(); 2],
            accepted: [JoystickReport::neutral(); 2],
        }
    }

    /// Run one poll cycle: debounce the snapshot, rebuild each port's
    /// pending report, and dispatch the ones that differ from the last
    /// accepted report. Ports are processed in fixed order (1, then 2).
    ///
    /// Returns the number of reports the sink accepted this cycle, which
    /// drives the indicator flash.
    pub fn poll<S: ReportSink>(&mut self, snap: &Snapshot, now_us: u32, sink: &mut S) -> u8 {
        let mut accepted_count = 0;
        for port in PortId::ALL {
            let i = port.index();
            self.ports[i].update(&snap.ports[i], now_us);
            let pending = self.ports[i].report();
            if pending != self.accepted[i] && sink.try_send(port, &pending).is_ok() {
                self.accepted[i] = pending;
                accepted_count += 1;
            }
        }
        accepted_count
    }

    /// Last report accepted by the sink for `port`.
    #[must_use]
    pub fn last_accepted(&self, port: PortId) -> JoystickReport {
        self.accepted[port.index()]
    }
}

impl Default for InputEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::output::SinkError;
    use std::vec::Vec;

    /// Records accepted reports; can be told to refuse the next N attempts.
    struct MockSink {
        sent: Vec<(PortId, JoystickReport)>,
        busy_for: usize,
        attempts: usize,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                busy_for: 0,
                attempts: 0,
            }
        }
    }

    impl ReportSink for MockSink {
        fn try_send(&mut self, port: PortId, report: &JoystickReport) -> Result<(), SinkError> {
            self.attempts += 1;
            if self.busy_for > 0 {
                self.busy_for -= 1;
                return Err(SinkError::Busy);
            }
            self.sent.push((port, *report));
            Ok(())
        }

        fn is_ready(&self, _port: PortId) -> bool {
            true
        }
    }

    fn snapshot(port1: PortSnapshot, port2: PortSnapshot) -> Snapshot {
        Snapshot {
            ports: [port1, port2],
        }
    }

    fn up_held() -> Snapshot {
        snapshot(
            PortSnapshot {
                up: true,
                ..Default::default()
            },
            PortSnapshot::default(),
        )
    }

    #[test]
    fn test_held_direction_sent_exactly_once() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();

        // Up held stable for well over the debounce interval, polled at 1 ms.
        for step in 0..30u32 {
            engine.poll(&up_held(), step * 1_000, &mut sink);
        }

        assert_eq!(sink.sent.len(), 1);
        let (port, report) = sink.sent[0];
        assert_eq!(port, PortId::One);
        assert_eq!(report.direction, Direction::North);
        assert!(!report.button);
    }

    #[test]
    fn test_unchanged_state_attempts_nothing() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();

        // All lines released matches the initial accepted report.
        for step in 0..10u32 {
            engine.poll(&Snapshot::default(), step * 1_000, &mut sink);
        }

        assert_eq!(sink.attempts, 0);
    }

    #[test]
    fn test_retry_until_sink_accepts() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();
        sink.busy_for = 3;

        for step in 0..6u32 {
            engine.poll(&up_held(), step * 1_000, &mut sink);
        }

        // Three refused attempts, then exactly one accepted transmission,
        // and nothing further once the report is on record.
        assert_eq!(sink.sent.len(), 1);
        assert_eq!(sink.attempts, 4);
        assert_eq!(
            engine.last_accepted(PortId::One).direction,
            Direction::North
        );
    }

    #[test]
    fn test_accepted_only_updates_on_success() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();
        sink.busy_for = 1;

        assert_eq!(engine.poll(&up_held(), 0, &mut sink), 0);
        assert_eq!(engine.last_accepted(PortId::One), JoystickReport::neutral());

        assert_eq!(engine.poll(&up_held(), 1_000, &mut sink), 1);
        assert_eq!(
            engine.last_accepted(PortId::One).direction,
            Direction::North
        );
    }

    #[test]
    fn test_button_bounce_sends_single_report() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();

        let pressed = snapshot(
            PortSnapshot {
                button: true,
                ..Default::default()
            },
            PortSnapshot::default(),
        );
        let released = snapshot(PortSnapshot::default(), PortSnapshot::default());

        // The button line flaps twice within 5 ms of the press, then holds.
        engine.poll(&pressed, 0, &mut sink);
        engine.poll(&released, 2_000, &mut sink);
        engine.poll(&pressed, 4_000, &mut sink);
        for step in 5..30u32 {
            engine.poll(&pressed, step * 1_000, &mut sink);
        }

        assert_eq!(sink.sent.len(), 1);
        assert!(sink.sent[0].1.button);
    }

    #[test]
    fn test_ports_dispatch_in_fixed_order() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();

        let both = snapshot(
            PortSnapshot {
                up: true,
                ..Default::default()
            },
            PortSnapshot {
                button: true,
                ..Default::default()
            },
        );
        let accepted = engine.poll(&both, 0, &mut sink);

        assert_eq!(accepted, 2);
        assert_eq!(sink.sent[0].0, PortId::One);
        assert_eq!(sink.sent[1].0, PortId::Two);
        assert_eq!(sink.sent[0].1.direction, Direction::North);
        assert!(sink.sent[1].1.button);
    }

    #[test]
    fn test_ports_are_independent() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();

        // Port 2 changes; port 1 must not produce traffic.
        let port2_left = snapshot(
            PortSnapshot::default(),
            PortSnapshot {
                left: true,
                ..Default::default()
            },
        );
        engine.poll(&port2_left, 0, &mut sink);

        assert_eq!(sink.sent.len(), 1);
        assert_eq!(sink.sent[0].0, PortId::Two);
        assert_eq!(sink.sent[0].1.direction, Direction::West);
        assert_eq!(engine.last_accepted(PortId::One), JoystickReport::neutral());
    }

    #[test]
    fn test_release_after_press_sends_second_report() {
        let mut engine = InputEngine::new();
        let mut sink = MockSink::new();

        engine.poll(&up_held(), 0, &mut sink);
        // Release well past the quiet period.
        engine.poll(&Snapshot::default(), 25_000, &mut sink);

        assert_eq!(sink.sent.len(), 2);
        assert_eq!(sink.sent[1].1, JoystickReport::neutral());
    }
}
