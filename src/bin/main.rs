#![no_std]
#![no_main]

use db9_to_hid::{
    configure_usb_hid, hid_writer_task, lifecycle_events, InputEngine, JoystickPorts,
    LifecycleHandler, LineSampler, MountPolicy, PortId, PortPins, ReportSink, StatusIndicator,
    UsbEvent, UsbReportSink, JOYSTICK1_DESCRIPTOR, JOYSTICK1_REPORT_ID, JOYSTICK2_DESCRIPTOR,
    JOYSTICK2_REPORT_ID,
};
use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::{Instant, Timer};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Poll cadence of the control loop, roughly a 1 kHz sampling rate.
const POLL_INTERVAL_MS: u64 = 1;
/// Relaxed cadence while the bus is suspended, to cut power draw.
const SUSPENDED_POLL_INTERVAL_MS: u64 = 100;

/// USB device configuration buffers.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state, one per joystick interface.
static HID1_STATE: StaticCell<State> = StaticCell::new();
static HID2_STATE: StaticCell<State> = StaticCell::new();

static LIFECYCLE_HANDLER: StaticCell<LifecycleHandler> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("db9-to-hid starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Joystick port inputs (DB9 lines, active low, internal pull-ups) ---
    let port1 = PortPins::new(
        Input::new(p.PIN_5, Pull::Up),  // up
        Input::new(p.PIN_4, Pull::Up),  // down
        Input::new(p.PIN_3, Pull::Up),  // left
        Input::new(p.PIN_2, Pull::Up),  // right
        Input::new(p.PIN_27, Pull::Up), // button
    );
    let port2 = PortPins::new(
        Input::new(p.PIN_9, Pull::Up),  // up
        Input::new(p.PIN_8, Pull::Up),  // down
        Input::new(p.PIN_7, Pull::Up),  // left
        Input::new(p.PIN_6, Pull::Up),  // right
        Input::new(p.PIN_26, Pull::Up), // button
    );
    let sampler = JoystickPorts::new(port1, port2);

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("db9-to-hid");
    usb_config.product = Some("Dual DB9 Joystick Adapter");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Lifecycle callbacks feed the status LED in the control task.
    builder.handler(LIFECYCLE_HANDLER.init(LifecycleHandler::new()));

    // One HID instance per joystick port.
    let hid1 = configure_usb_hid(
        &mut builder,
        HID1_STATE.init(State::new()),
        &JOYSTICK1_DESCRIPTOR,
    );
    let hid2 = configure_usb_hid(
        &mut builder,
        HID2_STATE.init(State::new()),
        &JOYSTICK2_DESCRIPTOR,
    );

    // Build the USB device
    let usb_device = builder.build();

    // On-board LED as the status indicator.
    let led = Output::new(p.PIN_25, Level::Low);

    spawner.must_spawn(usb_task(usb_device));
    spawner.must_spawn(hid_writer_task(PortId::One, hid1, JOYSTICK1_REPORT_ID));
    spawner.must_spawn(hid_writer_task(PortId::Two, hid2, JOYSTICK2_REPORT_ID));
    spawner.must_spawn(control_task(sampler, led));

    info!("db9-to-hid initialized");
}

/// Free-running microsecond clock, wrapping at the `u32` width.
fn now_us() -> u32 {
    Instant::now().as_micros() as u32
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Applies queued lifecycle events to the indicator and the loop's view of
/// the mount/suspend state.
fn drain_lifecycle(
    events: &Receiver<'static, CriticalSectionRawMutex, UsbEvent, 4>,
    indicator: &mut StatusIndicator,
    mounted: &mut bool,
    suspended: &mut bool,
    now_us: u32,
) {
    while let Ok(event) = events.try_receive() {
        info!("usb event: {}", event);
        match event {
            UsbEvent::Mounted => {
                *mounted = true;
                indicator.on_mounted(now_us);
            }
            UsbEvent::Unmounted => {
                *mounted = false;
                indicator.on_unmounted();
            }
            UsbEvent::Suspended => {
                *suspended = true;
                indicator.on_suspended();
            }
            UsbEvent::Resumed => {
                *suspended = false;
                indicator.on_resumed(*mounted, now_us);
            }
        }
    }
}

/// Control task - the cooperative poll loop.
///
/// Each cycle handles lifecycle events, ticks the LED pattern, and runs one
/// sample/debounce/dispatch pass, then sleeps to bound the sampling rate.
/// Dispatch is held back until both HID channels have enumerated.
#[embassy_executor::task]
async fn control_task(mut sampler: JoystickPorts, mut led: Output<'static>) {
    let policy = if cfg!(feature = "mounted-steady-blink") {
        MountPolicy::SteadyBlink
    } else {
        MountPolicy::PulseThenOff
    };
    let mut indicator = StatusIndicator::new(policy);
    let mut engine = InputEngine::new();
    let mut sink = UsbReportSink::new();
    let events = lifecycle_events();
    let mut mounted = false;
    let mut suspended = false;

    while !(sink.is_ready(PortId::One) && sink.is_ready(PortId::Two)) {
        let now = now_us();
        drain_lifecycle(&events, &mut indicator, &mut mounted, &mut suspended, now);
        if let Some(level) = indicator.tick(now) {
            led.set_level(Level::from(level));
        }
        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
    info!("both joystick channels ready, polling inputs");

    loop {
        let now = now_us();
        drain_lifecycle(&events, &mut indicator, &mut mounted, &mut suspended, now);
        if let Some(level) = indicator.tick(now) {
            led.set_level(Level::from(level));
        }

        let snapshot = sampler.sample();
        let accepted = engine.poll(&snapshot, now, &mut sink);
        for _ in 0..accepted {
            let level = indicator.on_report_accepted(now);
            led.set_level(Level::from(level));
        }

        let sleep_ms = if suspended {
            SUSPENDED_POLL_INTERVAL_MS
        } else {
            POLL_INTERVAL_MS
        };
        Timer::after_millis(sleep_ms).await;
    }
}
