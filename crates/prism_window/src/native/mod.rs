//! Platform seam: the native display contract and raw event records
//!
//! The crate never talks to a windowing system directly. A concrete platform
//! binding implements [`NativeDisplay`] and feeds [`RawEvent`] records; the
//! translation layer in [`crate::window`] consumes them. This keeps every
//! policy decision (repeat filtering, focus arbitration, fullscreen
//! negotiation) testable against a scripted binding, see [`sim`].

pub mod keysym;
pub mod sim;

use bitflags::bitflags;

use crate::foundation::math::{Vector2i, Vector2u};
use crate::video::{ModeConfig, VideoMode};
use crate::window::icon::NativeIcon;

/// Opaque native window identifier.
///
/// Exactly one per live window object; never reused while the handle is
/// still referenced by the window registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindowHandle(pub u64);

bitflags! {
    /// Native modifier state bitmask sampled at event time
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NativeModMask: u32 {
        /// Shift held
        const SHIFT = 1 << 0;
        /// Caps lock latched
        const LOCK = 1 << 1;
        /// Control held
        const CONTROL = 1 << 2;
        /// First modifier group, conventionally Alt
        const MOD1 = 1 << 3;
        /// Second modifier group
        const MOD2 = 1 << 4;
        /// Third modifier group
        const MOD3 = 1 << 5;
        /// Fourth modifier group, conventionally the meta/system key
        const MOD4 = 1 << 6;
        /// Fifth modifier group
        const MOD5 = 1 << 7;
    }
}

/// How a pointer crossed the window boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingMode {
    /// Ordinary pointer movement
    Normal,
    /// Crossing synthesized by a pointer grab
    Grab,
    /// Crossing synthesized by a grab release
    Ungrab,
}

/// Raw native event record, as delivered by the platform binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// Key went down
    KeyPressed {
        /// Device-specific key code
        keycode: u32,
        /// Modifier bitmask at event time
        state: NativeModMask,
        /// Native timestamp
        time: u64,
    },
    /// Key went up
    KeyReleased {
        /// Device-specific key code
        keycode: u32,
        /// Modifier bitmask at event time
        state: NativeModMask,
        /// Native timestamp
        time: u64,
    },
    /// Pointer button went down
    ButtonPressed {
        /// Native button code
        button: u32,
        /// Pointer X, window-relative
        x: i32,
        /// Pointer Y, window-relative
        y: i32,
        /// Native timestamp
        time: u64,
    },
    /// Pointer button went up
    ButtonReleased {
        /// Native button code
        button: u32,
        /// Pointer X, window-relative
        x: i32,
        /// Pointer Y, window-relative
        y: i32,
    },
    /// Pointer moved
    Motion {
        /// Pointer X, window-relative
        x: i32,
        /// Pointer Y, window-relative
        y: i32,
    },
    /// Pointer entered the window
    Entered {
        /// Crossing mode
        mode: CrossingMode,
    },
    /// Pointer left the window
    Left {
        /// Crossing mode
        mode: CrossingMode,
    },
    /// Window gained native input focus
    FocusIn,
    /// Window lost native input focus
    FocusOut,
    /// Geometry notification
    Configure {
        /// Top-left X
        x: i32,
        /// Top-left Y
        y: i32,
        /// Client-area width
        width: u32,
        /// Client-area height
        height: u32,
    },
    /// Close protocol message
    CloseRequest,
    /// Liveness protocol message; must be echoed, never surfaced
    Ping {
        /// Opaque serial to echo back to the root window
        serial: u64,
    },
    /// Window was unmapped
    Unmapped,
    /// Visibility notification
    Visibility {
        /// Fully obscured, i.e. not actually visible
        obscured: bool,
    },
    /// A window property changed
    PropertyChanged {
        /// Native timestamp of the change
        time: u64,
    },
    /// The window is about to be destroyed
    Destroyed,
}

/// Result of an input-method text lookup for a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextLookup {
    /// The key press composed no text
    None,
    /// Composed UTF-8 bytes
    Text(Vec<u8>),
    /// The input-method buffer overflowed; the text is unusable
    Overflow,
}

/// Window geometry as reported by the native system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeGeometry {
    /// Top-left position, parent-relative
    pub position: Vector2i,
    /// Client-area size
    pub size: Vector2u,
}

/// Opaque rendering-surface capability handed to the renderer.
///
/// The window subsystem only brokers creation; what the surface actually is
/// (GL, EGL, a software target) is the binding's business.
pub trait RenderSurface {
    /// Type-erased access for the renderer to downcast to the concrete
    /// surface type of the active binding
    fn as_any(&mut self) -> &mut dyn std::any::Any;
}

/// Contract every platform binding implements.
///
/// All methods are best-effort: a binding reports failures through its own
/// diagnostics and returns neutral values (`None`, `false`) rather than
/// panicking. Calls may block if the windowing system hangs; no timeouts are
/// applied at this layer.
pub trait NativeDisplay: Send + Sync {
    // -- lifecycle ---------------------------------------------------------

    /// Create a native window. `None` signals a fatal construction failure;
    /// the caller degrades to a non-functional but safe-to-destroy object.
    fn create_window(
        &self,
        size: Vector2u,
        title: &str,
        fullscreen: bool,
    ) -> Option<NativeWindowHandle>;

    /// Destroy a native window previously created by this binding
    fn destroy_window(&self, window: NativeWindowHandle);

    /// Release one reference on the shared connection
    fn close_connection(&self);

    // -- event intake ------------------------------------------------------

    /// Drain the raw events buffered for `window`, in arrival order
    fn drain_events(&self, window: NativeWindowHandle) -> Vec<RawEvent>;

    // -- focus -------------------------------------------------------------

    /// Current holder of native input focus, if any
    fn input_focus(&self) -> Option<NativeWindowHandle>;

    /// Give `window` native input focus
    fn set_input_focus(&self, window: NativeWindowHandle);

    /// Bring `window` to the front of the stacking order
    fn raise_window(&self, window: NativeWindowHandle);

    /// Set or clear the urgency/attention hint.
    ///
    /// Implementations must preserve unrelated hint flags (read-modify-write
    /// of the hint block, not wholesale replacement).
    fn set_urgency_hint(&self, window: NativeWindowHandle, urgent: bool);

    /// Whether `window` is currently viewable. `None` when the attribute
    /// query itself failed.
    fn is_viewable(&self, window: NativeWindowHandle) -> Option<bool>;

    // -- pointer -----------------------------------------------------------

    /// Attempt to confine the pointer to `window`. Returns `false` on
    /// contention; callers retry with backoff.
    fn grab_pointer(&self, window: NativeWindowHandle) -> bool;

    /// Release any active pointer grab
    fn ungrab_pointer(&self);

    /// Restore cursor visibility for `window`
    fn show_cursor(&self, window: NativeWindowHandle);

    // -- geometry ----------------------------------------------------------

    /// Parent-relative geometry of `window`
    fn geometry(&self, window: NativeWindowHandle) -> Option<NativeGeometry>;

    /// Move `window` so its top-left corner sits at `position`
    fn move_window(&self, window: NativeWindowHandle, position: Vector2i);

    /// Resize the client area of `window`
    fn resize_window(&self, window: NativeWindowHandle, size: Vector2u);

    /// Absolute position of `window`'s origin relative to the root window
    fn translate_to_root(&self, window: NativeWindowHandle) -> Vector2i;

    /// Immediate parent of `window` in the window tree
    fn parent_window(&self, window: NativeWindowHandle) -> NativeWindowHandle;

    /// The root window of the connection
    fn root_window(&self) -> NativeWindowHandle;

    /// Left/top frame insets reported by the window manager, when exposed
    fn frame_extents(&self, window: NativeWindowHandle) -> Option<Vector2i>;

    /// Name of the running window manager, when discoverable
    fn window_manager_name(&self) -> Option<String>;

    // -- properties and protocol -------------------------------------------

    /// Set the window title (UTF-8)
    fn set_title(&self, window: NativeWindowHandle, title: &str);

    /// Apply a prepared icon (pixmap pixels, 1-bit mask, property words)
    fn set_icon(&self, window: NativeWindowHandle, icon: &NativeIcon);

    /// Publish the last-input timestamp used by focus-stealing prevention
    fn set_user_time(&self, window: NativeWindowHandle, time: u64);

    /// Echo a liveness ping back to the root window
    fn reply_to_ping(&self, serial: u64);

    /// Drop min/max size hints so WMs remove decorations for fullscreen
    fn clear_size_limits(&self, window: NativeWindowHandle);

    /// Ask the compositor to get out of the way. Returns `false` when the
    /// hint is not understood by the environment.
    fn set_bypass_compositor_hint(&self, window: NativeWindowHandle) -> bool;

    /// Send the fullscreen state-change protocol message to the root window.
    /// Returns `false` when the required protocol identifiers are missing.
    fn request_fullscreen_state(&self, window: NativeWindowHandle) -> bool;

    // -- keyboard and input method -----------------------------------------

    /// Resolve a device key code within one modifier group. Zero means
    /// "no symbol".
    fn keysym(&self, keycode: u32, group: u8) -> u32;

    /// Compose text for a key press through the input method
    fn lookup_text(
        &self,
        window: NativeWindowHandle,
        keycode: u32,
        state: NativeModMask,
    ) -> TextLookup;

    /// Move input-method focus onto or off `window`
    fn set_input_context_focus(&self, window: NativeWindowHandle, focused: bool);

    /// Destroy the per-window input context
    fn destroy_input_context(&self, window: NativeWindowHandle);

    /// Close the shared input method
    fn close_input_method(&self);

    // -- video modes -------------------------------------------------------

    /// The current desktop video mode
    fn desktop_mode(&self) -> VideoMode;

    /// Whether the dynamic mode-switch extension is usable
    fn mode_switch_supported(&self) -> bool;

    /// Mode, output, position and rotation currently active on the target
    /// output; `None` when the query fails
    fn active_mode_config(&self) -> Option<ModeConfig>;

    /// Find the native mode id matching `mode` on the target output
    fn find_mode(&self, mode: VideoMode) -> Option<u32>;

    /// Apply a mode configuration. Returns `false` on failure.
    fn apply_mode_config(&self, config: &ModeConfig) -> bool;

    // -- rendering ---------------------------------------------------------

    /// Create the opaque rendering surface for `window`
    fn create_render_surface(
        &self,
        window: NativeWindowHandle,
    ) -> Option<Box<dyn RenderSurface>>;
}
