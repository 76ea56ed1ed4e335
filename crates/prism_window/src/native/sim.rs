//! Scripted in-memory display binding
//!
//! Implements [`NativeDisplay`] entirely in memory so the translation,
//! focus and fullscreen policies can be exercised without a windowing
//! system. Tests script it through the setter methods and inspect what the
//! subsystem did through the recorder methods; the `event_probe` demo uses
//! it as a stand-in platform.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::foundation::math::{Vector2i, Vector2u};
use crate::native::keysym::NO_SYMBOL;
use crate::native::{
    NativeDisplay, NativeGeometry, NativeModMask, NativeWindowHandle, RawEvent, RenderSurface,
    TextLookup,
};
use crate::video::{ModeConfig, Rotation, VideoMode};
use crate::window::icon::NativeIcon;

const ROOT: NativeWindowHandle = NativeWindowHandle(1);

#[derive(Debug)]
struct SimWindow {
    geometry: NativeGeometry,
    absolute: Vector2i,
    parent: NativeWindowHandle,
    viewable: bool,
    urgent: bool,
    title: String,
    icon: Option<NativeIcon>,
    user_times: Vec<u64>,
    grab_denials: u32,
    input_context_focused: bool,
    pending: VecDeque<RawEvent>,
}

impl SimWindow {
    fn new(size: Vector2u, title: &str) -> Self {
        Self {
            geometry: NativeGeometry {
                position: Vector2i::default(),
                size,
            },
            absolute: Vector2i::default(),
            parent: ROOT,
            viewable: false,
            urgent: false,
            title: title.to_owned(),
            icon: None,
            user_times: Vec::new(),
            grab_denials: 0,
            input_context_focused: false,
            pending: VecDeque::new(),
        }
    }
}

struct Inner {
    next_handle: u64,
    windows: HashMap<NativeWindowHandle, SimWindow>,
    focus: Option<NativeWindowHandle>,
    pointer_grab: Option<NativeWindowHandle>,
    wm_name: Option<String>,
    frame_extents: Option<Vector2i>,
    fail_next_create: bool,
    fullscreen_protocol_available: bool,
    desktop_mode: VideoMode,
    mode_switch_supported: bool,
    modes: Vec<(u32, VideoMode)>,
    active_config: ModeConfig,
    applied_configs: Vec<ModeConfig>,
    keysyms: HashMap<(u32, u8), u32>,
    text: HashMap<u32, TextLookup>,
    ping_replies: Vec<u64>,
    destroyed_windows: Vec<NativeWindowHandle>,
    destroyed_input_contexts: Vec<NativeWindowHandle>,
    cleared_size_limits: Vec<NativeWindowHandle>,
    bypass_hints: Vec<NativeWindowHandle>,
    fullscreen_requests: Vec<NativeWindowHandle>,
    close_connection_count: usize,
    close_input_method_count: usize,
}

/// In-memory [`NativeDisplay`] implementation for tests and demos
pub struct SimulatedDisplay {
    inner: Mutex<Inner>,
}

impl Default for SimulatedDisplay {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(mutex: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedDisplay {
    /// Create a display with a 1920x1080 desktop and a usable mode-switch
    /// extension
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_handle: 2,
                windows: HashMap::new(),
                focus: None,
                pointer_grab: None,
                wm_name: None,
                frame_extents: None,
                fail_next_create: false,
                fullscreen_protocol_available: true,
                desktop_mode: VideoMode::new(1920, 1080, 32),
                mode_switch_supported: true,
                modes: Vec::new(),
                active_config: ModeConfig {
                    mode_id: 1,
                    output: 1,
                    position: Vector2i::default(),
                    rotation: Rotation::Normal,
                },
                applied_configs: Vec::new(),
                keysyms: HashMap::new(),
                text: HashMap::new(),
                ping_replies: Vec::new(),
                destroyed_windows: Vec::new(),
                destroyed_input_contexts: Vec::new(),
                cleared_size_limits: Vec::new(),
                bypass_hints: Vec::new(),
                fullscreen_requests: Vec::new(),
                close_connection_count: 0,
                close_input_method_count: 0,
            }),
        }
    }

    // -- scripting ---------------------------------------------------------

    /// Make the next `create_window` call fail
    pub fn fail_next_create(&self) {
        lock(&self.inner).fail_next_create = true;
    }

    /// Queue a raw event for `window`
    pub fn push_event(&self, window: NativeWindowHandle, event: RawEvent) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.pending.push_back(event);
        }
    }

    /// Mark `window` viewable or not
    pub fn set_viewable(&self, window: NativeWindowHandle, viewable: bool) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.viewable = viewable;
        }
    }

    /// Report `name` as the running window manager
    pub fn set_window_manager_name(&self, name: &str) {
        lock(&self.inner).wm_name = Some(name.to_owned());
    }

    /// Expose frame-extent metadata
    pub fn set_frame_extents(&self, extents: Vector2i) {
        lock(&self.inner).frame_extents = Some(extents);
    }

    /// Set the absolute (root-relative) position reported for `window`
    pub fn set_absolute_position(&self, window: NativeWindowHandle, position: Vector2i) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.absolute = position;
        }
    }

    /// Insert a decoration window between `window` and the root, with the
    /// given geometry; returns the decoration handle
    pub fn add_decoration_parent(
        &self,
        window: NativeWindowHandle,
        geometry: NativeGeometry,
    ) -> NativeWindowHandle {
        let mut inner = lock(&self.inner);
        let handle = NativeWindowHandle(inner.next_handle);
        inner.next_handle += 1;

        let mut decoration = SimWindow::new(geometry.size, "decoration");
        decoration.geometry = geometry;
        decoration.viewable = true;
        inner.windows.insert(handle, decoration);

        if let Some(record) = inner.windows.get_mut(&window) {
            record.parent = handle;
        }
        handle
    }

    /// Make the next `n` grab attempts on `window` fail
    pub fn set_grab_denials(&self, window: NativeWindowHandle, denials: u32) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.grab_denials = denials;
        }
    }

    /// Script the symbol for a (keycode, group) pair
    pub fn set_keysym(&self, keycode: u32, group: u8, symbol: u32) {
        lock(&self.inner).keysyms.insert((keycode, group), symbol);
    }

    /// Script the input-method text composed for `keycode`
    pub fn set_text(&self, keycode: u32, lookup: TextLookup) {
        lock(&self.inner).text.insert(keycode, lookup);
    }

    /// Toggle availability of the mode-switch extension
    pub fn set_mode_switch_supported(&self, supported: bool) {
        lock(&self.inner).mode_switch_supported = supported;
    }

    /// Register a switchable mode under a native id
    pub fn add_mode(&self, id: u32, mode: VideoMode) {
        lock(&self.inner).modes.push((id, mode));
    }

    /// Change the reported desktop mode
    pub fn set_desktop_mode(&self, mode: VideoMode) {
        lock(&self.inner).desktop_mode = mode;
    }

    // -- inspection --------------------------------------------------------

    /// Whether the urgency hint is set on `window`
    pub fn is_urgent(&self, window: NativeWindowHandle) -> bool {
        lock(&self.inner)
            .windows
            .get(&window)
            .is_some_and(|record| record.urgent)
    }

    /// Window currently holding the pointer grab
    pub fn pointer_grab(&self) -> Option<NativeWindowHandle> {
        lock(&self.inner).pointer_grab
    }

    /// Mode configurations applied so far, oldest first
    pub fn applied_mode_configs(&self) -> Vec<ModeConfig> {
        lock(&self.inner).applied_configs.clone()
    }

    /// Ping serials echoed back to the root window
    pub fn ping_replies(&self) -> Vec<u64> {
        lock(&self.inner).ping_replies.clone()
    }

    /// User-time values published for `window`
    pub fn user_times(&self, window: NativeWindowHandle) -> Vec<u64> {
        lock(&self.inner)
            .windows
            .get(&window)
            .map(|record| record.user_times.clone())
            .unwrap_or_default()
    }

    /// Handles destroyed so far
    pub fn destroyed_windows(&self) -> Vec<NativeWindowHandle> {
        lock(&self.inner).destroyed_windows.clone()
    }

    /// Title currently set on `window`
    pub fn title(&self, window: NativeWindowHandle) -> Option<String> {
        lock(&self.inner)
            .windows
            .get(&window)
            .map(|record| record.title.clone())
    }

    /// Icon currently set on `window`
    pub fn icon(&self, window: NativeWindowHandle) -> Option<NativeIcon> {
        lock(&self.inner)
            .windows
            .get(&window)
            .and_then(|record| record.icon.clone())
    }

    /// Windows whose size limits were cleared
    pub fn cleared_size_limits(&self) -> Vec<NativeWindowHandle> {
        lock(&self.inner).cleared_size_limits.clone()
    }

    /// Windows for which the fullscreen protocol message was sent
    pub fn fullscreen_requests(&self) -> Vec<NativeWindowHandle> {
        lock(&self.inner).fullscreen_requests.clone()
    }

    /// Windows that asked the compositor to get out of the way
    pub fn bypass_hints(&self) -> Vec<NativeWindowHandle> {
        lock(&self.inner).bypass_hints.clone()
    }

    /// Windows whose input context has been destroyed
    pub fn destroyed_input_contexts(&self) -> Vec<NativeWindowHandle> {
        lock(&self.inner).destroyed_input_contexts.clone()
    }

    /// How many times the connection was released
    pub fn close_connection_count(&self) -> usize {
        lock(&self.inner).close_connection_count
    }

    /// How many times the input method was closed
    pub fn close_input_method_count(&self) -> usize {
        lock(&self.inner).close_input_method_count
    }

    /// Whether the input context of `window` has input-method focus
    pub fn input_context_focused(&self, window: NativeWindowHandle) -> bool {
        lock(&self.inner)
            .windows
            .get(&window)
            .is_some_and(|record| record.input_context_focused)
    }
}

struct SimSurface;

impl RenderSurface for SimSurface {
    fn as_any(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl NativeDisplay for SimulatedDisplay {
    fn create_window(
        &self,
        size: Vector2u,
        title: &str,
        _fullscreen: bool,
    ) -> Option<NativeWindowHandle> {
        let mut inner = lock(&self.inner);
        if inner.fail_next_create {
            inner.fail_next_create = false;
            return None;
        }

        let handle = NativeWindowHandle(inner.next_handle);
        inner.next_handle += 1;
        inner.windows.insert(handle, SimWindow::new(size, title));
        Some(handle)
    }

    fn destroy_window(&self, window: NativeWindowHandle) {
        let mut inner = lock(&self.inner);
        inner.windows.remove(&window);
        inner.destroyed_windows.push(window);
    }

    fn close_connection(&self) {
        lock(&self.inner).close_connection_count += 1;
    }

    fn drain_events(&self, window: NativeWindowHandle) -> Vec<RawEvent> {
        lock(&self.inner)
            .windows
            .get_mut(&window)
            .map(|record| record.pending.drain(..).collect())
            .unwrap_or_default()
    }

    fn input_focus(&self) -> Option<NativeWindowHandle> {
        lock(&self.inner).focus
    }

    fn set_input_focus(&self, window: NativeWindowHandle) {
        lock(&self.inner).focus = Some(window);
    }

    fn raise_window(&self, _window: NativeWindowHandle) {}

    fn set_urgency_hint(&self, window: NativeWindowHandle, urgent: bool) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.urgent = urgent;
        }
    }

    fn is_viewable(&self, window: NativeWindowHandle) -> Option<bool> {
        lock(&self.inner)
            .windows
            .get(&window)
            .map(|record| record.viewable)
    }

    fn grab_pointer(&self, window: NativeWindowHandle) -> bool {
        let mut inner = lock(&self.inner);
        match inner.windows.get_mut(&window) {
            Some(record) if record.grab_denials > 0 => {
                record.grab_denials -= 1;
                false
            }
            Some(_) => {
                inner.pointer_grab = Some(window);
                true
            }
            None => false,
        }
    }

    fn ungrab_pointer(&self) {
        lock(&self.inner).pointer_grab = None;
    }

    fn show_cursor(&self, _window: NativeWindowHandle) {}

    fn geometry(&self, window: NativeWindowHandle) -> Option<NativeGeometry> {
        lock(&self.inner)
            .windows
            .get(&window)
            .map(|record| record.geometry)
    }

    fn move_window(&self, window: NativeWindowHandle, position: Vector2i) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.geometry.position = position;
        }
    }

    fn resize_window(&self, window: NativeWindowHandle, size: Vector2u) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.geometry.size = size;
        }
    }

    fn translate_to_root(&self, window: NativeWindowHandle) -> Vector2i {
        lock(&self.inner)
            .windows
            .get(&window)
            .map(|record| record.absolute)
            .unwrap_or_default()
    }

    fn parent_window(&self, window: NativeWindowHandle) -> NativeWindowHandle {
        lock(&self.inner)
            .windows
            .get(&window)
            .map_or(ROOT, |record| record.parent)
    }

    fn root_window(&self) -> NativeWindowHandle {
        ROOT
    }

    fn frame_extents(&self, _window: NativeWindowHandle) -> Option<Vector2i> {
        lock(&self.inner).frame_extents
    }

    fn window_manager_name(&self) -> Option<String> {
        lock(&self.inner).wm_name.clone()
    }

    fn set_title(&self, window: NativeWindowHandle, title: &str) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.title = title.to_owned();
        }
    }

    fn set_icon(&self, window: NativeWindowHandle, icon: &NativeIcon) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.icon = Some(icon.clone());
        }
    }

    fn set_user_time(&self, window: NativeWindowHandle, time: u64) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.user_times.push(time);
        }
    }

    fn reply_to_ping(&self, serial: u64) {
        lock(&self.inner).ping_replies.push(serial);
    }

    fn clear_size_limits(&self, window: NativeWindowHandle) {
        lock(&self.inner).cleared_size_limits.push(window);
    }

    fn set_bypass_compositor_hint(&self, window: NativeWindowHandle) -> bool {
        lock(&self.inner).bypass_hints.push(window);
        true
    }

    fn request_fullscreen_state(&self, window: NativeWindowHandle) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.fullscreen_protocol_available {
            return false;
        }
        inner.fullscreen_requests.push(window);
        true
    }

    fn keysym(&self, keycode: u32, group: u8) -> u32 {
        lock(&self.inner)
            .keysyms
            .get(&(keycode, group))
            .copied()
            .unwrap_or(NO_SYMBOL)
    }

    fn lookup_text(
        &self,
        _window: NativeWindowHandle,
        keycode: u32,
        _state: NativeModMask,
    ) -> TextLookup {
        lock(&self.inner)
            .text
            .get(&keycode)
            .cloned()
            .unwrap_or(TextLookup::None)
    }

    fn set_input_context_focus(&self, window: NativeWindowHandle, focused: bool) {
        if let Some(record) = lock(&self.inner).windows.get_mut(&window) {
            record.input_context_focused = focused;
        }
    }

    fn destroy_input_context(&self, window: NativeWindowHandle) {
        lock(&self.inner).destroyed_input_contexts.push(window);
    }

    fn close_input_method(&self) {
        lock(&self.inner).close_input_method_count += 1;
    }

    fn desktop_mode(&self) -> VideoMode {
        lock(&self.inner).desktop_mode
    }

    fn mode_switch_supported(&self) -> bool {
        lock(&self.inner).mode_switch_supported
    }

    fn active_mode_config(&self) -> Option<ModeConfig> {
        Some(lock(&self.inner).active_config)
    }

    fn find_mode(&self, mode: VideoMode) -> Option<u32> {
        lock(&self.inner)
            .modes
            .iter()
            .find(|(_, candidate)| candidate.width == mode.width && candidate.height == mode.height)
            .map(|(id, _)| *id)
    }

    fn apply_mode_config(&self, config: &ModeConfig) -> bool {
        let mut inner = lock(&self.inner);
        inner.applied_configs.push(*config);
        inner.active_config = *config;
        true
    }

    fn create_render_surface(
        &self,
        window: NativeWindowHandle,
    ) -> Option<Box<dyn RenderSurface>> {
        lock(&self.inner)
            .windows
            .contains_key(&window)
            .then(|| Box::new(SimSurface) as Box<dyn RenderSurface>)
    }
}
