//! Process-wide window registry, focus arbiter and fullscreen token
//!
//! One registry instance is shared by every window of the process (injected,
//! not a bare global). It holds plain native handles, so no lock re-entrancy
//! can occur: focus arbitration queries the display, not other window
//! objects.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::error;

use crate::native::{NativeDisplay, NativeWindowHandle};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of all live windows plus the process-wide fullscreen token.
///
/// Invariant: a handle is present exactly while its window object has
/// completed construction and has not yet been destroyed. Removal is
/// unconditional on teardown, even on error paths.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: Mutex<Vec<NativeWindowHandle>>,
    fullscreen: Mutex<Option<NativeWindowHandle>>,
}

impl WindowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        lock(&self.windows).len()
    }

    pub(crate) fn register(&self, window: NativeWindowHandle) {
        lock(&self.windows).push(window);
    }

    pub(crate) fn unregister(&self, window: NativeWindowHandle) {
        lock(&self.windows).retain(|&handle| handle != window);
        // Safety net: a window must never leave a dangling fullscreen token.
        let mut fullscreen = lock(&self.fullscreen);
        if *fullscreen == Some(window) {
            *fullscreen = None;
        }
    }

    /// Whether `window` is currently registered
    pub fn contains(&self, window: NativeWindowHandle) -> bool {
        lock(&self.windows).contains(&window)
    }

    /// Point query against the native focus target; no caching
    pub fn has_focus(&self, display: &dyn NativeDisplay, window: NativeWindowHandle) -> bool {
        display.input_focus() == Some(window)
    }

    /// Ask for input focus on behalf of `window`.
    ///
    /// Focus is stolen only among windows of this process, never across
    /// applications: when another registered window holds native focus and
    /// `window` is viewable, it is raised and focused outright; otherwise
    /// an urgency hint is raised instead.
    pub fn request_focus(&self, display: &dyn NativeDisplay, window: NativeWindowHandle) {
        let focused = display.input_focus();
        let other_window_focused = focused
            .is_some_and(|holder| holder != window && lock(&self.windows).contains(&holder));

        let viewable = match display.is_viewable(window) {
            Some(viewable) => viewable,
            None => {
                error!("failed to check whether the window is viewable while requesting focus");
                return;
            }
        };

        if other_window_focused && viewable {
            display.raise_window(window);
            display.set_input_focus(window);
        } else {
            display.set_urgency_hint(window, true);
        }
    }

    /// Current fullscreen owner, if any
    pub fn fullscreen_owner(&self) -> Option<NativeWindowHandle> {
        *lock(&self.fullscreen)
    }

    /// Whether `window` holds the fullscreen token
    pub fn owns_fullscreen(&self, window: NativeWindowHandle) -> bool {
        *lock(&self.fullscreen) == Some(window)
    }

    /// Take the fullscreen token for `window`, clearing any prior holder
    /// first. Returns the previous holder.
    pub(crate) fn claim_fullscreen(
        &self,
        window: NativeWindowHandle,
    ) -> Option<NativeWindowHandle> {
        lock(&self.fullscreen).replace(window)
    }

    /// Release the fullscreen token if `window` holds it
    pub(crate) fn release_fullscreen(&self, window: NativeWindowHandle) {
        let mut fullscreen = lock(&self.fullscreen);
        if *fullscreen == Some(window) {
            *fullscreen = None;
        }
    }
}
