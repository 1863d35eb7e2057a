//! GPIO sampler for the two DB9 joystick ports.
//!
//! DB9 pinout (C64/Sega Master System): 1 = up, 2 = down, 3 = left,
//! 4 = right, 6 = button, 8 = ground. MSX wires a second button on pin 7,
//! which this board does not break out.

use embassy_rp::gpio::Input;
use joystick_core::{LineSampler, PortSnapshot, Snapshot};

/// The five input lines of one DB9 port.
pub struct PortPins {
    up: Input<'static>,
    down: Input<'static>,
    left: Input<'static>,
    right: Input<'static>,
    button: Input<'static>,
}

impl PortPins {
    /// Wrap five already-configured pull-up inputs.
    pub fn new(
        up: Input<'static>,
        down: Input<'static>,
        left: Input<'static>,
        right: Input<'static>,
        button: Input<'static>,
    ) -> Self {
        Self {
            up,
            down,
            left,
            right,
            button,
        }
    }

    fn sample(&self) -> PortSnapshot {
        // Asserted lines pull the pad low.
        PortSnapshot {
            up: self.up.is_low(),
            down: self.down.is_low(),
            left: self.left.is_low(),
            right: self.right.is_low(),
            button: self.button.is_low(),
        }
    }
}

/// Reads all ten lines of both ports in one call.
pub struct JoystickPorts {
    port1: PortPins,
    port2: PortPins,
}

impl JoystickPorts {
    pub fn new(port1: PortPins, port2: PortPins) -> Self {
        Self { port1, port2 }
    }
}

impl LineSampler for JoystickPorts {
    fn sample(&mut self) -> Snapshot {
        Snapshot {
            ports: [self.port1.sample(), self.port2.sample()],
        }
    }
}
