//! Fullscreen video-mode negotiation
//!
//! State machine: `Windowed -> Fullscreen -> Windowed`. Only one window
//! process-wide may be fullscreen; ownership is the fullscreen token held by
//! the [`crate::window::registry::WindowRegistry`]. Every failure here
//! degrades to windowed mode and is reported through the log, never
//! propagated as an error.

use log::{debug, error, warn};

use crate::foundation::math::Vector2i;
use crate::native::{NativeDisplay, NativeWindowHandle};
use crate::window::registry::WindowRegistry;

/// A display mode a window can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMode {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color depth in bits per pixel
    pub bits_per_pixel: u32,
}

impl VideoMode {
    /// Create a mode from its components
    pub const fn new(width: u32, height: u32, bits_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
        }
    }
}

/// Output rotation reported by the mode-switch extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    Normal,
    /// Quarter turn
    Rotate90,
    /// Half turn
    Rotate180,
    /// Three-quarter turn
    Rotate270,
}

/// A concrete output configuration: which mode on which output, where,
/// rotated how. Saved before entering fullscreen so it can be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    /// Native mode identifier
    pub mode_id: u32,
    /// Native output identifier
    pub output: u32,
    /// Output position
    pub position: Vector2i,
    /// Output rotation
    pub rotation: Rotation,
}

/// Per-window fullscreen negotiation state.
///
/// Owned by each [`crate::window::Window`]; remembers the configuration that
/// was active before the switch so teardown can put the desktop back.
#[derive(Debug, Default)]
pub struct VideoModeController {
    saved: Option<ModeConfig>,
}

impl VideoModeController {
    pub(crate) fn new() -> Self {
        Self { saved: None }
    }

    /// Switch the output to `mode` for `window`.
    ///
    /// No-op when `mode` is already the desktop mode. Missing extension,
    /// failed queries and unmatched modes all fall back to windowed mode
    /// with a diagnostic; none of them are fatal.
    pub(crate) fn set_mode(
        &mut self,
        display: &dyn NativeDisplay,
        registry: &WindowRegistry,
        window: NativeWindowHandle,
        mode: VideoMode,
    ) {
        // Nothing to change if the requested mode is what the desktop runs.
        if mode == display.desktop_mode() {
            return;
        }

        if !display.mode_switch_supported() {
            warn!("fullscreen is not supported (mode-switch extension missing), switching to window mode");
            return;
        }

        let Some(active) = display.active_mode_config() else {
            warn!("failed to query the current screen configuration, switching to window mode");
            return;
        };

        let Some(mode_id) = display.find_mode(mode) else {
            warn!(
                "no matching video mode for {}x{}, switching to window mode",
                mode.width, mode.height
            );
            return;
        };

        let target = ModeConfig { mode_id, ..active };
        if !display.apply_mode_config(&target) {
            warn!("failed to apply the video mode, switching to window mode");
            return;
        }

        self.saved = Some(active);
        if let Some(previous) = registry.claim_fullscreen(window) {
            if previous != window {
                debug!("fullscreen ownership taken over from {previous:?}");
            }
        }
    }

    /// Restore the saved configuration. A no-op unless `window` currently
    /// holds the fullscreen token.
    pub(crate) fn reset(
        &mut self,
        display: &dyn NativeDisplay,
        registry: &WindowRegistry,
        window: NativeWindowHandle,
    ) {
        if !registry.owns_fullscreen(window) {
            return;
        }

        if let Some(saved) = self.saved.take() {
            if display.mode_switch_supported() && !display.apply_mode_config(&saved) {
                error!("failed to restore the desktop video mode");
            }
        }

        registry.release_fullscreen(window);
    }

    /// Ask the window manager to make `window` fullscreen: raise it, take
    /// input focus, hint the compositor away and send the state-change
    /// protocol message. Protocol failures are reported, not fatal.
    pub(crate) fn switch_to_fullscreen(display: &dyn NativeDisplay, window: NativeWindowHandle) {
        display.raise_window(window);
        display.set_input_focus(window);

        if !display.set_bypass_compositor_hint(window) {
            debug!("compositor bypass hint not understood by this environment");
        }

        if !display.request_fullscreen_state(window) {
            error!("setting fullscreen failed, could not send the state-change protocol message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vector2u;
    use crate::native::sim::SimulatedDisplay;

    fn setup() -> (SimulatedDisplay, WindowRegistry, NativeWindowHandle) {
        let display = SimulatedDisplay::new();
        let registry = WindowRegistry::new();
        let window = display
            .create_window(Vector2u::new(640, 480), "test", true)
            .unwrap();
        (display, registry, window)
    }

    #[test]
    fn desktop_mode_request_is_a_no_op() {
        let (display, registry, window) = setup();
        let mut controller = VideoModeController::new();

        controller.set_mode(&display, &registry, window, display.desktop_mode());

        assert!(registry.fullscreen_owner().is_none());
        assert!(display.applied_mode_configs().is_empty());
    }

    #[test]
    fn missing_extension_falls_back_to_windowed() {
        let (display, registry, window) = setup();
        display.set_mode_switch_supported(false);
        let mut controller = VideoModeController::new();

        controller.set_mode(
            &display,
            &registry,
            window,
            VideoMode::new(800, 600, 32),
        );

        assert!(registry.fullscreen_owner().is_none());
        assert!(display.applied_mode_configs().is_empty());
    }

    #[test]
    fn successful_switch_saves_prior_config_and_takes_token() {
        let (display, registry, window) = setup();
        display.add_mode(7, VideoMode::new(800, 600, 32));
        let mut controller = VideoModeController::new();

        controller.set_mode(
            &display,
            &registry,
            window,
            VideoMode::new(800, 600, 32),
        );

        assert_eq!(registry.fullscreen_owner(), Some(window));
        let applied = display.applied_mode_configs();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].mode_id, 7);
        assert!(controller.saved.is_some());
    }

    #[test]
    fn reset_restores_only_for_the_token_holder() {
        let (display, registry, window) = setup();
        display.add_mode(7, VideoMode::new(800, 600, 32));
        let other = display
            .create_window(Vector2u::new(100, 100), "other", false)
            .unwrap();
        let mut controller = VideoModeController::new();

        controller.set_mode(
            &display,
            &registry,
            window,
            VideoMode::new(800, 600, 32),
        );

        // A non-owner reset must not touch the configuration.
        let mut other_controller = VideoModeController::new();
        other_controller.reset(&display, &registry, other);
        assert_eq!(registry.fullscreen_owner(), Some(window));

        controller.reset(&display, &registry, window);
        assert!(registry.fullscreen_owner().is_none());
        // Original configuration applied back: two applies total.
        assert_eq!(display.applied_mode_configs().len(), 2);
        assert!(controller.saved.is_none());
    }

    #[test]
    fn unmatched_mode_stays_windowed() {
        let (display, registry, window) = setup();
        let mut controller = VideoModeController::new();

        controller.set_mode(
            &display,
            &registry,
            window,
            VideoMode::new(123, 45, 32),
        );

        assert!(registry.fullscreen_owner().is_none());
        assert!(display.applied_mode_configs().is_empty());
    }
}
