//! Pull-based joystick and gamepad polling
//!
//! Deliberately decoupled from the window subsystem: no events, no queues.
//! The owner calls [`Joystick::update`] whenever it wants fresh state; the
//! call drains every device report buffered since the previous call and
//! folds them into one current-state snapshot.

use log::warn;
use thiserror::Error;

/// Number of named axes a device can expose
pub const AXIS_COUNT: usize = 8;

/// Maximum number of buttons tracked per device
pub const BUTTON_COUNT: usize = 32;

/// Raw magnitude of a full-scale stick deflection
const RAW_AXIS_MAX: f32 = 32767.0;

/// Named joystick axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Primary stick, horizontal
    X,
    /// Primary stick, vertical
    Y,
    /// Third axis, usually a throttle or trigger
    Z,
    /// Rotational axis, usually a twist or rudder
    R,
    /// First auxiliary axis
    U,
    /// Second auxiliary axis
    V,
    /// Point-of-view hat, horizontal
    PovX,
    /// Point-of-view hat, vertical
    PovY,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
            Self::R => 3,
            Self::U => 4,
            Self::V => 5,
            Self::PovX => 6,
            Self::PovY => 7,
        }
    }
}

/// Absolute-axis codes as reported by the device layer.
///
/// Several native codes alias onto one named axis; the mapping follows the
/// conventional gamepad layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsCode {
    /// Primary stick X
    X,
    /// Primary stick Y
    Y,
    /// Primary Z axis
    Z,
    /// Throttle lever
    Throttle,
    /// Rotation around X
    Rx,
    /// Rotation around Y
    Ry,
    /// Rotation around Z
    Rz,
    /// Rudder pedal
    Rudder,
    /// Hat switch, horizontal
    Hat0X,
    /// Hat switch, vertical
    Hat0Y,
}

impl AbsCode {
    /// The named axis this code folds into
    pub fn axis(self) -> Axis {
        match self {
            Self::X => Axis::X,
            Self::Y => Axis::Y,
            Self::Z | Self::Throttle => Axis::Z,
            Self::Rz | Self::Rudder => Axis::R,
            Self::Rx => Axis::U,
            Self::Ry => Axis::V,
            Self::Hat0X => Axis::PovX,
            Self::Hat0Y => Axis::PovY,
        }
    }

    /// Hat axes report direction (-1, 0, 1) rather than a deflection
    fn is_hat(self) -> bool {
        matches!(self, Self::Hat0X | Self::Hat0Y)
    }
}

/// What a device can do: how many buttons, which axes actually exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoystickCaps {
    /// Number of buttons, capped at [`BUTTON_COUNT`]
    pub button_count: u32,
    /// Per-axis presence flags, indexed like [`JoystickState::axes`]
    pub axes: [bool; AXIS_COUNT],
}

impl JoystickCaps {
    /// Whether the device exposes `axis`
    pub fn has_axis(&self, axis: Axis) -> bool {
        self.axes[axis.index()]
    }
}

/// Snapshot of a device's current state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickState {
    /// Cleared only by an explicit disconnect report, never by a read error
    pub connected: bool,
    /// Normalized axis values in [-100, 100]
    pub axes: [f32; AXIS_COUNT],
    /// Pressed flags for the first [`BUTTON_COUNT`] buttons
    pub buttons: [bool; BUTTON_COUNT],
}

impl Default for JoystickState {
    fn default() -> Self {
        Self {
            connected: false,
            axes: [0.0; AXIS_COUNT],
            buttons: [false; BUTTON_COUNT],
        }
    }
}

impl JoystickState {
    /// Current normalized value of `axis`
    pub fn axis(&self, axis: Axis) -> f32 {
        self.axes[axis.index()]
    }

    /// Whether button `index` is pressed; out-of-range indices read false
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }
}

/// One buffered change reported by a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceReport {
    /// An absolute axis moved; `value` is raw, hat axes use -1/0/1
    AbsoluteAxis {
        /// Native axis code
        code: AbsCode,
        /// Raw signed value
        value: i32,
    },
    /// A button changed state
    Button {
        /// Zero-based button index
        index: u16,
        /// New pressed state
        pressed: bool,
    },
}

/// Device-level read failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceError {
    /// The device is gone; the only condition that clears `connected`
    #[error("joystick disconnected")]
    Disconnected,
    /// A read failed for an ambiguous reason; state is kept as-is
    #[error("transient joystick read failure")]
    Transient,
}

/// Result type for device reads
pub type DeviceResult<T> = Result<T, DeviceError>;

/// An open connection to one physical device
pub trait DevicePort: Send {
    /// Query the device's capabilities
    fn capabilities(&self) -> JoystickCaps;

    /// Pop the next buffered report. `Ok(None)` means no data is pending,
    /// which is the normal idle condition and never a disconnect.
    fn next_report(&mut self) -> DeviceResult<Option<DeviceReport>>;
}

/// Enumerates and opens devices by index
pub trait DeviceProvider: Send + Sync {
    /// Whether a device is present at `index`
    fn is_connected(&self, index: u32) -> bool;

    /// Open the device at `index`
    fn open(&self, index: u32) -> Option<Box<dyn DevicePort>>;
}

/// Scale a raw axis value to the percentage range
fn normalize(code: AbsCode, value: i32) -> f32 {
    if code.is_hat() {
        value as f32 * 100.0
    } else {
        value as f32 * 100.0 / RAW_AXIS_MAX
    }
}

/// A polled joystick: an open device port plus the folded state snapshot
pub struct Joystick {
    port: Box<dyn DevicePort>,
    caps: JoystickCaps,
    state: JoystickState,
}

impl Joystick {
    /// Open the device at `index` through `provider`
    pub fn open(provider: &dyn DeviceProvider, index: u32) -> Option<Self> {
        let port = provider.open(index)?;
        let caps = port.capabilities();

        Some(Self {
            port,
            caps,
            state: JoystickState {
                connected: true,
                ..JoystickState::default()
            },
        })
    }

    /// Capabilities captured when the device was opened
    pub fn capabilities(&self) -> JoystickCaps {
        self.caps
    }

    /// The state snapshot produced by the last [`Joystick::update`]
    pub fn state(&self) -> JoystickState {
        self.state
    }

    /// Drain all pending device reports and fold them into the snapshot.
    ///
    /// Exhausting the buffer is the normal exit. A transient read failure
    /// stops draining but keeps the device connected; only an explicit
    /// disconnect report clears the `connected` flag and zeroes the state.
    pub fn update(&mut self) -> JoystickState {
        if !self.state.connected {
            return self.state;
        }

        loop {
            match self.port.next_report() {
                Ok(Some(DeviceReport::AbsoluteAxis { code, value })) => {
                    self.state.axes[code.axis().index()] = normalize(code, value);
                }
                Ok(Some(DeviceReport::Button { index, pressed })) => {
                    if let Some(slot) = self.state.buttons.get_mut(usize::from(index)) {
                        *slot = pressed;
                    }
                }
                Ok(None) => break,
                Err(DeviceError::Disconnected) => {
                    warn!("joystick disconnected");
                    self.state = JoystickState::default();
                    break;
                }
                Err(DeviceError::Transient) => {
                    warn!("joystick read failed, keeping the last known state");
                    break;
                }
            }
        }

        self.state
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use approx::assert_relative_eq;

    use super::*;

    type Feed = Arc<Mutex<VecDeque<DeviceResult<Option<DeviceReport>>>>>;

    struct ScriptedPort {
        caps: JoystickCaps,
        feed: Feed,
    }

    impl DevicePort for ScriptedPort {
        fn capabilities(&self) -> JoystickCaps {
            self.caps
        }

        fn next_report(&mut self) -> DeviceResult<Option<DeviceReport>> {
            self.feed.lock().unwrap().pop_front().unwrap_or(Ok(None))
        }
    }

    struct ScriptedProvider {
        caps: JoystickCaps,
        feed: Feed,
    }

    impl DeviceProvider for ScriptedProvider {
        fn is_connected(&self, index: u32) -> bool {
            index == 0
        }

        fn open(&self, index: u32) -> Option<Box<dyn DevicePort>> {
            (index == 0).then(|| {
                Box::new(ScriptedPort {
                    caps: self.caps,
                    feed: self.feed.clone(),
                }) as Box<dyn DevicePort>
            })
        }
    }

    fn joystick(reports: Vec<DeviceResult<Option<DeviceReport>>>) -> Joystick {
        let mut caps = JoystickCaps {
            button_count: 12,
            axes: [false; AXIS_COUNT],
        };
        caps.axes[Axis::X.index()] = true;
        caps.axes[Axis::PovX.index()] = true;

        let provider = ScriptedProvider {
            caps,
            feed: Arc::new(Mutex::new(reports.into())),
        };
        Joystick::open(&provider, 0).unwrap()
    }

    #[test]
    fn axis_extremes_normalize_to_percentages() {
        let mut stick = joystick(vec![
            Ok(Some(DeviceReport::AbsoluteAxis {
                code: AbsCode::X,
                value: 32767,
            })),
            Ok(Some(DeviceReport::AbsoluteAxis {
                code: AbsCode::Y,
                value: -32767,
            })),
            Ok(Some(DeviceReport::AbsoluteAxis {
                code: AbsCode::Hat0X,
                value: -1,
            })),
        ]);

        let state = stick.update();
        assert_relative_eq!(state.axis(Axis::X), 100.0, max_relative = 1e-4);
        assert_relative_eq!(state.axis(Axis::Y), -100.0, max_relative = 1e-4);
        assert_relative_eq!(state.axis(Axis::PovX), -100.0);
        assert_relative_eq!(state.axis(Axis::Z), 0.0);
    }

    #[test]
    fn aliased_codes_fold_onto_one_axis() {
        let mut stick = joystick(vec![
            Ok(Some(DeviceReport::AbsoluteAxis {
                code: AbsCode::Throttle,
                value: 32767,
            })),
            Ok(Some(DeviceReport::AbsoluteAxis {
                code: AbsCode::Z,
                value: 0,
            })),
        ]);

        // Later reports win: the snapshot holds the final folded value.
        let state = stick.update();
        assert_relative_eq!(state.axis(Axis::Z), 0.0);
    }

    #[test]
    fn button_changes_fold_into_the_snapshot() {
        let mut stick = joystick(vec![
            Ok(Some(DeviceReport::Button {
                index: 3,
                pressed: true,
            })),
            Ok(Some(DeviceReport::Button {
                index: 3,
                pressed: false,
            })),
            Ok(Some(DeviceReport::Button {
                index: 5,
                pressed: true,
            })),
            // Out of range: ignored, not a panic.
            Ok(Some(DeviceReport::Button {
                index: 200,
                pressed: true,
            })),
        ]);

        let state = stick.update();
        assert!(!state.button(3));
        assert!(state.button(5));
        assert!(!state.button(200));
    }

    #[test]
    fn transient_errors_do_not_disconnect() {
        let mut stick = joystick(vec![
            Ok(Some(DeviceReport::Button {
                index: 0,
                pressed: true,
            })),
            Err(DeviceError::Transient),
        ]);

        let state = stick.update();
        assert!(state.connected);
        assert!(state.button(0));
    }

    #[test]
    fn explicit_disconnect_clears_the_state() {
        let mut stick = joystick(vec![
            Ok(Some(DeviceReport::Button {
                index: 0,
                pressed: true,
            })),
            Err(DeviceError::Disconnected),
        ]);

        let state = stick.update();
        assert!(!state.connected);
        assert!(!state.button(0));

        // Further updates are inert until the device is reopened.
        let state = stick.update();
        assert!(!state.connected);
    }

    #[test]
    fn capabilities_report_named_axes_independently() {
        let stick = joystick(Vec::new());
        let caps = stick.capabilities();

        assert_eq!(caps.button_count, 12);
        assert!(caps.has_axis(Axis::X));
        assert!(caps.has_axis(Axis::PovX));
        assert!(!caps.has_axis(Axis::V));
    }
}
