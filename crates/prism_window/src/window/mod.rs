//! Window state machine and native-event translation
//!
//! A [`Window`] owns the pending raw-event queue and the translated event
//! queue. Translation happens synchronously on the thread that calls
//! [`Window::process_events`]; window, focus and fullscreen state are
//! mutated as a side effect of translation, which keeps them consistent
//! with what the native stream actually reported.

pub mod icon;
pub mod registry;

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bitflags::bitflags;
use log::{error, warn};

use crate::event::{decode_code_points, repeat, Event, Key, MouseButton, MouseWheel};
use crate::foundation::math::{Vector2i, Vector2u};
use crate::native::keysym;
use crate::native::{
    CrossingMode, NativeDisplay, NativeModMask, NativeWindowHandle, RawEvent, RenderSurface,
    TextLookup,
};
use crate::video::{VideoMode, VideoModeController};
use crate::window::icon::{IconResult, NativeIcon};
use crate::window::registry::WindowRegistry;

/// Cursor-grab attempts before giving up
const MAX_GRAB_TRIALS: u32 = 5;

/// Sleep between cursor-grab attempts
const GRAB_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Input-method text buffer capacity in bytes; longer compositions are
/// discarded rather than surfaced garbled
const TEXT_BUFFER_CAPACITY: usize = 64;

/// Modifier-group variants tried when resolving a key code
const KEYSYM_GROUPS: u8 = 4;

/// Window managers known to report a correct absolute position directly
const WM_ABS_POS_GOOD: [&str; 3] = ["Enlightenment", "FVWM", "i3"];

bitflags! {
    /// Window decoration and behavior flags, fixed at creation
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WindowStyle: u32 {
        /// Title bar with the window name
        const TITLEBAR = 1 << 0;
        /// Resizable border
        const RESIZE = 1 << 1;
        /// Close button
        const CLOSE = 1 << 2;
        /// Exclusive fullscreen; overrides the decoration flags
        const FULLSCREEN = 1 << 3;
    }
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self::TITLEBAR | Self::RESIZE | Self::CLOSE
    }
}

/// A native window plus the translation and state-tracking layer above it.
///
/// Construction failure leaves the object in a non-functional but
/// safe-to-destroy state (see [`Window::is_open`]); every operation on such
/// a window is a guarded no-op rather than an error.
pub struct Window {
    display: Arc<dyn NativeDisplay>,
    registry: Arc<WindowRegistry>,
    handle: Option<NativeWindowHandle>,
    is_external: bool,
    key_repeat: bool,
    previous_size: Option<Vector2u>,
    fullscreen: bool,
    cursor_grabbed: bool,
    window_mapped: bool,
    last_input_time: u64,
    video: VideoModeController,
    pending: VecDeque<RawEvent>,
    events: VecDeque<Event>,
}

impl Window {
    /// Create a native window of the given mode, title and style.
    ///
    /// For [`WindowStyle::FULLSCREEN`] the video mode is switched and the
    /// fullscreen protocol is negotiated; any failure there degrades to
    /// windowed mode without failing construction.
    pub fn new(
        display: Arc<dyn NativeDisplay>,
        registry: Arc<WindowRegistry>,
        mode: VideoMode,
        title: &str,
        style: WindowStyle,
    ) -> Self {
        let fullscreen = style.contains(WindowStyle::FULLSCREEN);
        let size = Vector2u::new(mode.width, mode.height);

        let handle = display.create_window(size, title, fullscreen);
        if handle.is_none() {
            error!("failed to create the native window");
        }

        let mut window = Self {
            display,
            registry,
            handle,
            is_external: false,
            key_repeat: true,
            previous_size: None,
            fullscreen,
            // Fullscreen windows start assuming grab intent.
            cursor_grabbed: fullscreen,
            window_mapped: false,
            last_input_time: 0,
            video: VideoModeController::new(),
            pending: VecDeque::new(),
            events: VecDeque::new(),
        };

        if let Some(handle) = window.handle {
            window.registry.register(handle);

            if fullscreen {
                // Min/max size hints keep some WMs from removing
                // decorations; drop them before switching.
                window.display.clear_size_limits(handle);
                window
                    .video
                    .set_mode(window.display.as_ref(), &window.registry, handle, mode);
                VideoModeController::switch_to_fullscreen(window.display.as_ref(), handle);
            }
        }

        window
    }

    /// Wrap an externally created native window.
    ///
    /// Teardown then skips native window destruction but performs every
    /// other cleanup step.
    pub fn from_raw_handle(
        display: Arc<dyn NativeDisplay>,
        registry: Arc<WindowRegistry>,
        handle: NativeWindowHandle,
    ) -> Self {
        registry.register(handle);

        Self {
            display,
            registry,
            handle: Some(handle),
            is_external: true,
            key_repeat: true,
            previous_size: None,
            fullscreen: false,
            cursor_grabbed: false,
            window_mapped: false,
            last_input_time: 0,
            video: VideoModeController::new(),
            pending: VecDeque::new(),
            events: VecDeque::new(),
        }
    }

    /// Whether construction produced a usable native window
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// The native handle, valid exactly for this object's lifetime
    pub fn native_handle(&self) -> Option<NativeWindowHandle> {
        self.handle
    }

    /// Whether the window was created in fullscreen style
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether the window is currently mapped and visible
    pub fn is_mapped(&self) -> bool {
        self.window_mapped
    }

    /// Whether keys held down generate repeated press events
    pub fn is_key_repeat_enabled(&self) -> bool {
        self.key_repeat
    }

    /// Enable or disable key-repeat press events
    pub fn set_key_repeat_enabled(&mut self, enabled: bool) {
        self.key_repeat = enabled;
    }

    /// Pump the native source, run the repeat filter and translation, then
    /// pop the next abstract event
    pub fn poll_event(&mut self) -> Option<Event> {
        self.process_events();
        self.events.pop_front()
    }

    /// Drain the native event source and translate everything buffered.
    ///
    /// Events are translated in exactly the order they arrived; the repeat
    /// filter only ever reorders by omission.
    pub fn process_events(&mut self) {
        if let Some(handle) = self.handle {
            self.pending.extend(self.display.drain_events(handle));
        }

        while let Some(raw) = self.pending.pop_front() {
            self.translate_event(raw);
        }
    }

    /// Window-manager-independent position of the window's top-left corner.
    ///
    /// Three-tier fallback: trust the absolute coordinate under known-good
    /// WMs, else subtract reported frame insets, else take the geometry of
    /// the topmost non-root ancestor (assuming everything in between is
    /// decoration; a heuristic that holds for common WMs).
    pub fn position(&self) -> Vector2i {
        let Some(handle) = self.handle else {
            return Vector2i::default();
        };
        let display = self.display.as_ref();

        let absolute = display.translate_to_root(handle);

        if display
            .window_manager_name()
            .is_some_and(|name| WM_ABS_POS_GOOD.contains(&name.as_str()))
        {
            return absolute;
        }

        if let Some(extents) = display.frame_extents(handle) {
            return Vector2i::new(absolute.x - extents.x, absolute.y - extents.y);
        }

        let root = display.root_window();
        let mut ancestor = handle;
        while display.parent_window(ancestor) != root {
            ancestor = display.parent_window(ancestor);
        }

        display
            .geometry(ancestor)
            .map_or(absolute, |geometry| geometry.position)
    }

    /// Move the window's top-left corner to `position`
    pub fn set_position(&self, position: Vector2i) {
        if let Some(handle) = self.handle {
            self.display.move_window(handle, position);
        }
    }

    /// Current client-area size
    pub fn size(&self) -> Vector2u {
        self.handle
            .and_then(|handle| self.display.geometry(handle))
            .map_or_else(Vector2u::default, |geometry| geometry.size)
    }

    /// Resize the client area
    pub fn set_size(&self, size: Vector2u) {
        if let Some(handle) = self.handle {
            self.display.resize_window(handle, size);
        }
    }

    /// Set the title shown by the window manager
    pub fn set_title(&self, title: &str) {
        if let Some(handle) = self.handle {
            self.display.set_title(handle, title);
        }
    }

    /// Set the window icon from an RGBA8 pixel buffer
    pub fn set_icon(&self, width: u32, height: u32, pixels: &[u8]) -> IconResult<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        let icon = NativeIcon::from_rgba(width, height, pixels)?;
        self.display.set_icon(handle, &icon);
        Ok(())
    }

    /// Ask for input focus; steals it from sibling windows of this process
    /// when permitted, otherwise raises an urgency hint
    pub fn request_focus(&self) {
        if let Some(handle) = self.handle {
            self.registry.request_focus(self.display.as_ref(), handle);
        }
    }

    /// Whether this window currently holds native input focus (point query)
    pub fn has_focus(&self) -> bool {
        self.handle
            .is_some_and(|handle| self.registry.has_focus(self.display.as_ref(), handle))
    }

    /// Create the opaque rendering surface for this window
    pub fn create_render_surface(&self) -> Option<Box<dyn RenderSurface>> {
        self.handle
            .and_then(|handle| self.display.create_render_surface(handle))
    }

    /// Translate one raw event into zero or more abstract events, mutating
    /// window state as a side effect
    fn translate_event(&mut self, raw: RawEvent) {
        let Some(handle) = self.handle else {
            return;
        };

        // Spurious key-releases generated by OS auto-repeat are filtered
        // against the still-buffered remainder of the stream.
        if let RawEvent::KeyReleased { keycode, time, .. } = raw {
            if repeat::filter_repeated_release(keycode, time, &mut self.pending, self.key_repeat) {
                return;
            }
        }

        match raw {
            RawEvent::Destroyed => {
                // The window is about to go away: release what we hold on
                // the desktop before the handle dies.
                self.cleanup();
            }

            RawEvent::FocusIn => {
                self.display.set_input_context_focus(handle, true);

                if self.cursor_grabbed {
                    let mut grabbed = false;
                    for _ in 0..MAX_GRAB_TRIALS {
                        if self.display.grab_pointer(handle) {
                            grabbed = true;
                            break;
                        }
                        thread::sleep(GRAB_RETRY_DELAY);
                    }

                    if !grabbed {
                        self.cursor_grabbed = false;
                        warn!("failed to grab the mouse cursor, continuing ungrabbed");
                    }
                }

                self.events.push_back(Event::GainedFocus);

                // Undo any urgency hint raised by an earlier focus request.
                self.display.set_urgency_hint(handle, false);
            }

            RawEvent::FocusOut => {
                self.display.set_input_context_focus(handle, false);

                if self.cursor_grabbed {
                    self.display.ungrab_pointer();
                }

                self.events.push_back(Event::LostFocus);
            }

            RawEvent::Configure { width, height, .. } => {
                // Geometry notifications also fire for moves and stacking
                // changes; only a real size change surfaces.
                let size = Vector2u::new(width, height);
                if self.previous_size != Some(size) {
                    self.events.push_back(Event::Resized { width, height });
                }
                self.previous_size = Some(size);
            }

            RawEvent::CloseRequest => {
                self.events.push_back(Event::Closed);
            }

            RawEvent::Ping { serial } => {
                // Liveness protocol: echo to the root window, never surface.
                self.display.reply_to_ping(serial);
            }

            RawEvent::KeyPressed {
                keycode,
                state,
                time,
            } => {
                let code = self.resolve_key(keycode);
                self.events.push_back(Event::KeyPressed {
                    code,
                    alt: state.contains(NativeModMask::MOD1),
                    control: state.contains(NativeModMask::CONTROL),
                    shift: state.contains(NativeModMask::SHIFT),
                    system: state.contains(NativeModMask::MOD4),
                });

                match self.display.lookup_text(handle, keycode, state) {
                    TextLookup::Text(bytes) if bytes.len() <= TEXT_BUFFER_CAPACITY => {
                        for unicode in decode_code_points(&bytes) {
                            self.events.push_back(Event::TextEntered { unicode });
                        }
                    }
                    TextLookup::Text(_) | TextLookup::Overflow => {
                        warn!(
                            "a text-input event exceeded the {TEXT_BUFFER_CAPACITY}-byte \
                             input-method buffer and has been discarded"
                        );
                    }
                    TextLookup::None => {}
                }

                self.update_last_input_time(time);
            }

            RawEvent::KeyReleased {
                keycode, state, ..
            } => {
                let code = self.resolve_key(keycode);
                self.events.push_back(Event::KeyReleased {
                    code,
                    alt: state.contains(NativeModMask::MOD1),
                    control: state.contains(NativeModMask::CONTROL),
                    shift: state.contains(NativeModMask::SHIFT),
                    system: state.contains(NativeModMask::MOD4),
                });
            }

            RawEvent::ButtonPressed { button, x, y, time } => {
                if let Some(button) = map_button(button) {
                    self.events
                        .push_back(Event::MouseButtonPressed { button, x, y });
                }

                self.update_last_input_time(time);
            }

            RawEvent::ButtonReleased { button, x, y } => {
                if let Some(button) = map_button(button) {
                    self.events
                        .push_back(Event::MouseButtonReleased { button, x, y });
                } else if let Some((wheel, delta)) = map_wheel(button) {
                    self.events.push_back(Event::MouseWheelScrolled {
                        wheel,
                        delta,
                        x,
                        y,
                    });
                }
            }

            RawEvent::Motion { x, y } => {
                self.events.push_back(Event::MouseMoved { x, y });
            }

            RawEvent::Entered { mode } => {
                if mode == CrossingMode::Normal {
                    self.events.push_back(Event::MouseEntered);
                }
            }

            RawEvent::Left { mode } => {
                if mode == CrossingMode::Normal {
                    self.events.push_back(Event::MouseLeft);
                }
            }

            RawEvent::Unmapped => {
                self.window_mapped = false;
            }

            RawEvent::Visibility { obscured } => {
                // Preferred over the map notification: some compositing
                // environments delay the map flag past actual visibility.
                if !obscured {
                    self.window_mapped = true;
                }
            }

            RawEvent::PropertyChanged { time } => {
                // Opportunistically seed the last-input timestamp.
                if self.last_input_time == 0 {
                    self.last_input_time = time;
                }
            }
        }
    }

    /// Ordered lookup across modifier-group variants; first resolved
    /// symbol wins, unresolved codes stay `Key::Unknown`
    fn resolve_key(&self, keycode: u32) -> Key {
        for group in 0..KEYSYM_GROUPS {
            let key = keysym::key_from_symbol(self.display.keysym(keycode, group));
            if key != Key::Unknown {
                return key;
            }
        }
        Key::Unknown
    }

    /// Publish a new last-input timestamp for focus-stealing prevention
    fn update_last_input_time(&mut self, time: u64) {
        if let Some(handle) = self.handle {
            if time != 0 && time != self.last_input_time {
                self.display.set_user_time(handle, time);
                self.last_input_time = time;
            }
        }
    }

    /// Release what this window holds on the shared desktop: restore the
    /// video mode and give the cursor back
    fn cleanup(&mut self) {
        if let Some(handle) = self.handle {
            self.video
                .reset(self.display.as_ref(), &self.registry, handle);
            self.display.show_cursor(handle);

            if self.cursor_grabbed {
                self.display.ungrab_pointer();
                self.cursor_grabbed = false;
            }
        }
    }
}

impl Drop for Window {
    /// Strict teardown order, every step best-effort: restore video mode
    /// and cursor, destroy the input context, destroy the native window
    /// (unless externally owned), close the input method and connection,
    /// and unconditionally leave the registry.
    fn drop(&mut self) {
        self.cleanup();

        if let Some(handle) = self.handle {
            self.display.destroy_input_context(handle);

            if !self.is_external {
                self.display.destroy_window(handle);
            }
        }

        self.display.close_input_method();
        self.display.close_connection();

        if let Some(handle) = self.handle {
            self.registry.unregister(handle);
        }
    }
}

/// Native button codes that surface as press/release events.
///
/// Codes 4..=7 are the wheel pairs, anything above 9 is ignored.
fn map_button(button: u32) -> Option<MouseButton> {
    match button {
        1 => Some(MouseButton::Left),
        2 => Some(MouseButton::Middle),
        3 => Some(MouseButton::Right),
        8 => Some(MouseButton::Extra1),
        9 => Some(MouseButton::Extra2),
        _ => None,
    }
}

/// Wheel button codes: 4/5 are the vertical pair, 6/7 the horizontal pair
fn map_wheel(button: u32) -> Option<(MouseWheel, i32)> {
    match button {
        4 => Some((MouseWheel::Vertical, 1)),
        5 => Some((MouseWheel::Vertical, -1)),
        6 => Some((MouseWheel::Horizontal, 1)),
        7 => Some((MouseWheel::Horizontal, -1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
