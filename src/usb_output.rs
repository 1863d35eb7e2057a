//! USB HID output: report descriptors, per-port report channels, and
//! lifecycle event plumbing.
//!
//! Each joystick port is its own HID instance with its own IN endpoint and
//! report ID, so the host sees two independent single-button joysticks.

use defmt::{debug, info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_usb::class::hid::{
    Config as HidConfig, HidBootProtocol, HidSubclass, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::Builder;
use joystick_core::{JoystickReport, PortId, ReportSink, SinkError};
use portable_atomic::{AtomicBool, Ordering};

/// HID report identifier of joystick port 1.
pub const JOYSTICK1_REPORT_ID: u8 = 0x04;
/// HID report identifier of joystick port 2.
pub const JOYSTICK2_REPORT_ID: u8 = 0x05;

/// HID report descriptor for one joystick interface.
///
/// Describes a gamepad with an 8-position hat switch (the wire's 0-8
/// direction code, 0 being the out-of-range null state) followed by a
/// single button padded to a byte:
/// | hat/direction (1 byte) | button map (1 byte) |
#[must_use]
pub const fn joystick_report_descriptor(report_id: u8) -> [u8; 44] {
    [
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x09, 0x05, // Usage (Gamepad)
        0xA1, 0x01, // Collection (Application)
        0x85, report_id, //   Report ID
        //
        // --- Hat switch (direction code) ---
        0x05, 0x01, //   Usage Page (Generic Desktop)
        0x09, 0x39, //   Usage (Hat Switch)
        0x15, 0x01, //   Logical Minimum (1)
        0x25, 0x08, //   Logical Maximum (8)
        0x35, 0x00, //   Physical Minimum (0)
        0x46, 0x3B, 0x01, //   Physical Maximum (315 degrees)
        0x95, 0x01, //   Report Count (1)
        0x75, 0x08, //   Report Size (8)
        0x81, 0x02, //   Input (Data, Variable, Absolute)
        //
        // --- Button map ---
        0x05, 0x09, //   Usage Page (Button)
        0x19, 0x01, //   Usage Minimum (Button 1)
        0x29, 0x01, //   Usage Maximum (Button 1)
        0x15, 0x00, //   Logical Minimum (0)
        0x25, 0x01, //   Logical Maximum (1)
        0x95, 0x01, //   Report Count (1)
        0x75, 0x08, //   Report Size (8)
        0x81, 0x02, //   Input (Data, Variable, Absolute)
        //
        0xC0, // End Collection
    ]
}

/// Report descriptor of joystick port 1.
pub static JOYSTICK1_DESCRIPTOR: [u8; 44] = joystick_report_descriptor(JOYSTICK1_REPORT_ID);
/// Report descriptor of joystick port 2.
pub static JOYSTICK2_DESCRIPTOR: [u8; 44] = joystick_report_descriptor(JOYSTICK2_REPORT_ID);

/// HID writer type for one joystick endpoint.
pub type JoyHidWriter = HidWriter<'static, Driver<'static, USB>, 8>;

type ReportChannel = Channel<CriticalSectionRawMutex, JoystickReport, 1>;

/// One depth-1 channel per port. A full channel means the previous report
/// is still in flight; the control loop retries on its next poll.
static REPORT_CHANNELS: [ReportChannel; 2] = [Channel::new(), Channel::new()];

/// Set by each writer task once its endpoint has enumerated.
static CHANNEL_READY: [AtomicBool; 2] = [AtomicBool::new(false), AtomicBool::new(false)];

/// Change-triggered report sink backed by the per-port channels.
///
/// `try_send` succeeding means the port's writer task owns delivery from
/// that point on.
pub struct UsbReportSink;

impl UsbReportSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportSink for UsbReportSink {
    fn try_send(&mut self, port: PortId, report: &JoystickReport) -> Result<(), SinkError> {
        let i = port.index();
        if !CHANNEL_READY[i].load(Ordering::Acquire) {
            return Err(SinkError::NotReady);
        }
        REPORT_CHANNELS[i]
            .try_send(*report)
            .map_err(|_| SinkError::Busy)
    }

    fn is_ready(&self, port: PortId) -> bool {
        CHANNEL_READY[port.index()].load(Ordering::Acquire)
    }
}

impl Default for UsbReportSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure one HID joystick interface on the USB builder.
///
/// Returns the HID writer for the matching writer task.
pub fn configure_usb_hid(
    builder: &mut Builder<'static, Driver<'static, USB>>,
    state: &'static mut State<'static>,
    report_descriptor: &'static [u8],
) -> JoyHidWriter {
    let config = HidConfig {
        report_descriptor,
        request_handler: None,
        poll_ms: 5,
        max_packet_size: 8,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}

/// Drains one port's report channel into its HID endpoint.
///
/// Publishes the port's readiness after the first `ready().await`, which is
/// what the control loop gates its initial dispatch on.
#[embassy_executor::task(pool_size = 2)]
pub async fn hid_writer_task(port: PortId, mut writer: JoyHidWriter, report_id: u8) -> ! {
    let rx = REPORT_CHANNELS[port.index()].receiver();

    writer.ready().await;
    CHANNEL_READY[port.index()].store(true, Ordering::Release);
    info!("HID channel ready: {}", port);

    loop {
        let report = rx.receive().await;
        debug!("sending {} report: {}", port, report);

        let payload = report.as_bytes();
        let buf = [report_id, payload[0], payload[1]];
        match writer.write(&buf).await {
            Ok(()) => debug!("{} report complete", port),
            Err(_) => warn!("HID write failed on {}", port),
        }
    }
}

/// HID request handler (handles SET_REPORT, etc.).
///
/// A no-op handler: GET_REPORT is left to the stack's stall behavior and
/// output reports carry nothing for a joystick.
pub struct JoystickRequestHandler;

impl RequestHandler for JoystickRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// USB lifecycle notifications relevant to the control loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum UsbEvent {
    Mounted,
    Unmounted,
    Suspended,
    Resumed,
}

static LIFECYCLE_EVENTS: Channel<CriticalSectionRawMutex, UsbEvent, 4> = Channel::new();

/// Receiver half of the lifecycle event queue, for the control loop.
#[must_use]
pub fn lifecycle_events() -> Receiver<'static, CriticalSectionRawMutex, UsbEvent, 4> {
    LIFECYCLE_EVENTS.receiver()
}

/// Forwards device-stack lifecycle callbacks into [`lifecycle_events`].
///
/// Runs inside the USB task; it only queues events and never touches engine
/// state.
pub struct LifecycleHandler {
    configured: bool,
}

impl LifecycleHandler {
    #[must_use]
    pub const fn new() -> Self {
        Self { configured: false }
    }

    fn push(&self, event: UsbEvent) {
        if LIFECYCLE_EVENTS.try_send(event).is_err() {
            warn!("lifecycle event dropped: {}", event);
        }
    }
}

impl embassy_usb::Handler for LifecycleHandler {
    fn configured(&mut self, configured: bool) {
        self.configured = configured;
        self.push(if configured {
            UsbEvent::Mounted
        } else {
            UsbEvent::Unmounted
        });
    }

    fn reset(&mut self) {
        // A bus reset tears the configuration down without a configured(false).
        if self.configured {
            self.configured = false;
            self.push(UsbEvent::Unmounted);
        }
    }

    fn suspended(&mut self, suspended: bool) {
        self.push(if suspended {
            UsbEvent::Suspended
        } else {
            UsbEvent::Resumed
        });
    }
}

impl Default for LifecycleHandler {
    fn default() -> Self {
        Self::new()
    }
}
