//! Dual DB9 joystick to USB HID adapter for RP2040.
//!
//! This crate provides the embedded implementation of a joystick adapter
//! that samples two 9-pin joystick ports and outputs them as two USB HID
//! joysticks.
//!
//! # Hardware Configuration
//!
//! | Function  | GPIO | Description |
//! |-----------|------|-------------|
//! | J1 up     | 5    | Port 1 direction line |
//! | J1 down   | 4    | Port 1 direction line |
//! | J1 left   | 3    | Port 1 direction line |
//! | J1 right  | 2    | Port 1 direction line |
//! | J1 button | 27   | Port 1 fire button |
//! | J2 up     | 9    | Port 2 direction line |
//! | J2 down   | 8    | Port 2 direction line |
//! | J2 left   | 7    | Port 2 direction line |
//! | J2 right  | 6    | Port 2 direction line |
//! | J2 button | 26   | Port 2 fire button |
//! | LED       | 25   | On-board status LED |
//!
//! All joystick lines idle high through the internal pull-ups and read low
//! when asserted (DB9 switches short them to ground).
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with four concurrent tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **HID Writer Tasks** (one per port): drain a depth-1 report channel
//!   into that port's HID endpoint
//! - **Control Task**: samples and debounces the lines, dispatches changed
//!   reports, and drives the status LED
//!
//! A report is handed to a writer through its channel; the channel refusing
//! a report is the "transport busy" signal and the control task retries on
//! its next 1 ms poll.
//!
//! # Modules
//!
//! - [`joy_input`]: GPIO line sampler ([`JoystickPorts`])
//! - [`usb_output`]: USB HID output ([`UsbReportSink`], descriptors, tasks)
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`mounted-steady-blink`**: Blink the LED steadily at 1 s while mounted
//!   instead of the default pulse-then-dark behavior
//!
//! # Re-exports
//!
//! This crate re-exports all public items from [`joystick_core`] for
//! convenience, so consumers only need to depend on this crate.

#![no_std]

// Re-export core types for convenience
pub use joystick_core::{
    Deadline, DebouncedLine, Direction, InputEngine, JoystickReport, LineSampler, MountPolicy,
    PortEngine, PortId, PortSnapshot, ReportSink, SinkError, Snapshot, StatusIndicator,
    DEBOUNCE_TIMEOUT_US, MAX_DELAY_US,
};

pub mod joy_input;
pub mod usb_output;

pub use joy_input::{JoystickPorts, PortPins};
pub use usb_output::{
    configure_usb_hid, hid_writer_task, lifecycle_events, JoystickRequestHandler,
    LifecycleHandler, UsbEvent, UsbReportSink, JOYSTICK1_DESCRIPTOR, JOYSTICK1_REPORT_ID,
    JOYSTICK2_DESCRIPTOR, JOYSTICK2_REPORT_ID,
};
