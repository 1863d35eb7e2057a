//! Report sink trait and error types.

use crate::types::{JoystickReport, PortId};

/// Error type for report transmission attempts.
///
/// Neither variant is fatal: the dispatcher simply retries on a later poll
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// Transport is busy with a previous report.
    Busy,
    /// Logical channel has not finished enumerating yet.
    NotReady,
}

/// Destination for joystick reports, one logical channel per port.
///
/// This abstracts the device transport (USB HID in the firmware, mocks in
/// tests). `try_send` never blocks; a successful return means the transport
/// has accepted the report and owns its delivery from that point on.
pub trait ReportSink {
    /// Attempt one transmission on the port's channel.
    fn try_send(&mut self, port: PortId, report: &JoystickReport) -> Result<(), SinkError>;

    /// Whether the port's channel has completed enumeration and can accept
    /// reports at all.
    fn is_ready(&self, port: PortId) -> bool;
}
