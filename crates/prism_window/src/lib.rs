//! # Prism Window
//!
//! Per-platform window and input backend for the Prism multimedia stack.
//!
//! The crate turns a raw native event stream (key reports, pointer crossings,
//! configure/visibility notifications, protocol messages) into a stable,
//! de-duplicated, ordered sequence of [`Event`]s, while keeping the window,
//! focus and fullscreen state machines consistent with what the host
//! windowing system actually did.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐
//! │  NativeDisplay impl  │ ← platform binding (native::sim ships for tests/demos)
//! └──────────┬───────────┘
//!            │ RawEvent stream
//!     ┌──────▼───────┐
//!     │ repeat filter │ ← event::repeat
//!     └──────┬───────┘
//!     ┌──────▼───────┐
//!     │  translation  │ ← window::Window (state machine side effects)
//!     └──────┬───────┘
//!            │ Event queue
//!     ┌──────▼───────┐
//!     │  application  │
//!     └──────────────┘
//! ```
//!
//! Cross-window coordination (focus stealing, the single fullscreen owner)
//! goes through a shared [`WindowRegistry`]. Joystick polling is a separate,
//! pull-based subsystem in [`joystick`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use prism_window::{Event, Window, WindowRegistry, WindowStyle, VideoMode};
//! use prism_window::native::sim::SimulatedDisplay;
//!
//! let display = Arc::new(SimulatedDisplay::new());
//! let registry = Arc::new(WindowRegistry::new());
//! let mut window = Window::new(
//!     display,
//!     registry,
//!     VideoMode::new(800, 600, 32),
//!     "demo",
//!     WindowStyle::default(),
//! );
//!
//! while let Some(event) = window.poll_event() {
//!     if let Event::Closed = event {
//!         break;
//!     }
//! }
//! ```

pub mod config;
pub mod event;
pub mod foundation;
pub mod joystick;
pub mod native;
pub mod video;
pub mod window;

pub use config::WindowConfig;
pub use event::{Event, Key, MouseButton, MouseWheel};
pub use video::VideoMode;
pub use window::registry::WindowRegistry;
pub use window::{Window, WindowStyle};
