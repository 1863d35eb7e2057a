//! Platform-agnostic logic for a dual DB9 joystick to USB HID adapter.
//!
//! This crate holds everything that does not touch hardware: debouncing,
//! direction encoding, change-triggered report dispatch, and the status LED
//! state machine. It can be used in embedded `no_std` environments and on
//! the host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`types`]: Core data structures ([`PortId`], [`Direction`], [`JoystickReport`])
//! - [`timer`]: Wraparound-safe deadline arithmetic ([`Deadline`])
//! - [`debounce`]: Per-line trailing debounce ([`DebouncedLine`])
//! - [`input`]: Line sampler trait ([`LineSampler`])
//! - [`output`]: Report sink trait ([`ReportSink`])
//! - [`engine`]: Debounce + dispatch orchestration ([`InputEngine`])
//! - [`indicator`]: Status LED patterns ([`StatusIndicator`])
//!
//! # Data Flow
//!
//! A [`LineSampler`] produces one [`Snapshot`] of all ten lines per poll.
//! The [`InputEngine`] debounces each line, rebuilds both ports' reports,
//! and hands changed reports to a [`ReportSink`]; a report only counts as
//! delivered once the sink accepts it, so a busy transport is retried on
//! the next poll. Accepted reports and lifecycle events drive the
//! [`StatusIndicator`].
//!
//! # Example
//!
//! ```rust
//! use joystick_core::{Direction, InputEngine, PortSnapshot, Snapshot};
//!
//! let mut engine = InputEngine::new();
//! let mut snap = Snapshot::default();
//! snap.ports[0] = PortSnapshot { up: true, right: true, ..Default::default() };
//! // Feed `snap` through `engine.poll(...)` with a sink; the pending report
//! // for port 1 encodes the NE diagonal:
//! assert_eq!(Direction::from_lines(true, false, false, true), Direction::NorthEast);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod debounce;
pub mod engine;
pub mod indicator;
pub mod input;
pub mod output;
pub mod timer;
pub mod types;

// Re-export main types at crate root
pub use debounce::{DebouncedLine, DEBOUNCE_TIMEOUT_US};
pub use engine::{InputEngine, PortEngine};
pub use indicator::{MountPolicy, StatusIndicator};
pub use input::{LineSampler, PortSnapshot, Snapshot};
pub use output::{ReportSink, SinkError};
pub use timer::{Deadline, MAX_DELAY_US};
pub use types::{Direction, JoystickReport, PortId};
