//! Event probe demo
//!
//! Drives the window subsystem against the simulated display binding:
//! creates a window, scripts a burst of native events, pumps the queue and
//! logs every abstract event that surfaces, then polls a scripted joystick.

use std::sync::Arc;

use prism_window::joystick::{
    AbsCode, DevicePort, DeviceProvider, DeviceReport, DeviceResult, Joystick, JoystickCaps,
};
use prism_window::native::sim::SimulatedDisplay;
use prism_window::native::{CrossingMode, NativeModMask, RawEvent, TextLookup};
use prism_window::{Event, Window, WindowConfig, WindowRegistry};

/// Key code used for the scripted "A" key press
const KEYCODE_A: u32 = 38;

struct ProbeApp {
    display: Arc<SimulatedDisplay>,
    registry: Arc<WindowRegistry>,
    window: Window,
}

impl ProbeApp {
    fn new(config: &WindowConfig) -> Self {
        log::info!("creating the probe window...");
        let display = Arc::new(SimulatedDisplay::new());
        let registry = Arc::new(WindowRegistry::new());

        let mut window = Window::new(
            display.clone(),
            registry.clone(),
            config.video_mode(),
            &config.title,
            config.style(),
        );
        window.set_key_repeat_enabled(config.key_repeat);
        log::info!("window created, open = {}", window.is_open());

        Self {
            display,
            registry,
            window,
        }
    }

    /// Queue the native events a short interactive session would produce
    fn script_session(&self) {
        let Some(handle) = self.window.native_handle() else {
            return;
        };

        self.display
            .set_keysym(KEYCODE_A, 0, 0x0061 /* latin lower a */);
        self.display
            .set_text(KEYCODE_A, TextLookup::Text(b"a".to_vec()));

        self.display
            .push_event(handle, RawEvent::Visibility { obscured: false });
        self.display.push_event(handle, RawEvent::FocusIn);
        self.display.push_event(
            handle,
            RawEvent::Configure {
                x: 100,
                y: 100,
                width: 1024,
                height: 768,
            },
        );
        self.display.push_event(
            handle,
            RawEvent::Entered {
                mode: CrossingMode::Normal,
            },
        );
        self.display
            .push_event(handle, RawEvent::Motion { x: 512, y: 384 });
        self.display.push_event(
            handle,
            RawEvent::KeyPressed {
                keycode: KEYCODE_A,
                state: NativeModMask::empty(),
                time: 1000,
            },
        );
        self.display.push_event(
            handle,
            RawEvent::KeyReleased {
                keycode: KEYCODE_A,
                state: NativeModMask::empty(),
                time: 1050,
            },
        );
        self.display.push_event(
            handle,
            RawEvent::ButtonPressed {
                button: 1,
                x: 512,
                y: 384,
                time: 1100,
            },
        );
        self.display.push_event(
            handle,
            RawEvent::ButtonReleased {
                button: 1,
                x: 512,
                y: 384,
            },
        );
        self.display.push_event(handle, RawEvent::CloseRequest);
    }

    /// Pump until the queue runs dry; returns true when a close surfaced
    fn pump(&mut self) -> bool {
        let mut closing = false;
        while let Some(event) = self.window.poll_event() {
            log::info!("event: {event:?}");
            if event == Event::Closed {
                closing = true;
            }
        }
        closing
    }
}

// -- scripted joystick -------------------------------------------------------

struct ProbePort {
    reports: Vec<DeviceReport>,
}

impl DevicePort for ProbePort {
    fn capabilities(&self) -> JoystickCaps {
        JoystickCaps {
            button_count: 8,
            axes: [true, true, false, false, false, false, true, true],
        }
    }

    fn next_report(&mut self) -> DeviceResult<Option<DeviceReport>> {
        Ok(self.reports.pop())
    }
}

struct ProbeProvider;

impl DeviceProvider for ProbeProvider {
    fn is_connected(&self, index: u32) -> bool {
        index == 0
    }

    fn open(&self, index: u32) -> Option<Box<dyn DevicePort>> {
        (index == 0).then(|| {
            Box::new(ProbePort {
                reports: vec![
                    DeviceReport::Button {
                        index: 0,
                        pressed: true,
                    },
                    DeviceReport::AbsoluteAxis {
                        code: AbsCode::X,
                        value: 16384,
                    },
                ],
            }) as Box<dyn DevicePort>
        })
    }
}

fn poll_joystick() {
    let provider = ProbeProvider;
    let Some(mut stick) = Joystick::open(&provider, 0) else {
        log::warn!("no joystick at index 0");
        return;
    };

    let caps = stick.capabilities();
    log::info!("joystick: {} buttons", caps.button_count);

    let state = stick.update();
    log::info!(
        "joystick state: connected = {}, x = {:.1}, button 0 = {}",
        state.connected,
        state.axes[0],
        state.buttons[0]
    );
}

fn main() {
    prism_window::foundation::logging::init();

    let config = WindowConfig::default();
    let mut app = ProbeApp::new(&config);

    log::info!(
        "registry holds {} window(s), focus = {}",
        app.registry.window_count(),
        app.window.has_focus()
    );

    app.script_session();
    let closed = app.pump();
    log::info!(
        "session pumped, closed = {closed}, mapped = {}, size = {:?}",
        app.window.is_mapped(),
        app.window.size()
    );

    app.window.request_focus();
    log::info!("focus after request = {}", app.window.has_focus());

    poll_joystick();
}
