//! Abstract input-event model
//!
//! The [`Event`] sum type is the uniform, platform-independent surface the
//! owning application consumes. Native event records never leak past the
//! translation layer in [`crate::window`]; everything the application sees
//! is one of the variants below, delivered in the order the native source
//! produced them (minus what the repeat filter intentionally drops).

pub mod repeat;

/// Abstract event delivered to the owning application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The window close protocol was triggered (close button, Alt+F4, ...)
    Closed,
    /// The window client area changed size
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// The window gained input focus
    GainedFocus,
    /// The window lost input focus
    LostFocus,
    /// A key went down
    KeyPressed {
        /// Abstract key identifier, `Key::Unknown` when unresolved
        code: Key,
        /// Alt modifier held at event time
        alt: bool,
        /// Control modifier held at event time
        control: bool,
        /// Shift modifier held at event time
        shift: bool,
        /// Meta/system modifier held at event time
        system: bool,
    },
    /// A key went up
    KeyReleased {
        /// Abstract key identifier, `Key::Unknown` when unresolved
        code: Key,
        /// Alt modifier held at event time
        alt: bool,
        /// Control modifier held at event time
        control: bool,
        /// Shift modifier held at event time
        shift: bool,
        /// Meta/system modifier held at event time
        system: bool,
    },
    /// A decoded text code point (one event per code point)
    TextEntered {
        /// Decoded Unicode scalar value
        unicode: char,
    },
    /// A mouse button went down
    MouseButtonPressed {
        /// Which button
        button: MouseButton,
        /// Pointer X, window-relative
        x: i32,
        /// Pointer Y, window-relative
        y: i32,
    },
    /// A mouse button went up
    MouseButtonReleased {
        /// Which button
        button: MouseButton,
        /// Pointer X, window-relative
        x: i32,
        /// Pointer Y, window-relative
        y: i32,
    },
    /// The wheel moved one notch
    MouseWheelScrolled {
        /// Which wheel axis
        wheel: MouseWheel,
        /// Signed unit delta (+1 or -1)
        delta: i32,
        /// Pointer X, window-relative
        x: i32,
        /// Pointer Y, window-relative
        y: i32,
    },
    /// The pointer moved inside the window
    MouseMoved {
        /// Pointer X, window-relative
        x: i32,
        /// Pointer Y, window-relative
        y: i32,
    },
    /// The pointer entered the window (normal crossing only)
    MouseEntered,
    /// The pointer left the window (normal crossing only)
    MouseLeft,
}

/// Mouse buttons that surface as press/release events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button
    Left,
    /// Right button
    Right,
    /// Middle (wheel) button
    Middle,
    /// First extended button
    Extra1,
    /// Second extended button
    Extra2,
}

/// Wheel axes for scroll events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseWheel {
    /// Vertical wheel
    Vertical,
    /// Horizontal wheel
    Horizontal,
}

/// Abstract key identifiers
///
/// Unresolvable native key codes map to `Unknown`, never to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Unhandled key
    Unknown,
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Top-row 0
    Num0,
    /// Top-row 1
    Num1,
    /// Top-row 2
    Num2,
    /// Top-row 3
    Num3,
    /// Top-row 4
    Num4,
    /// Top-row 5
    Num5,
    /// Top-row 6
    Num6,
    /// Top-row 7
    Num7,
    /// Top-row 8
    Num8,
    /// Top-row 9
    Num9,
    /// Escape key
    Escape,
    /// Left Control
    LControl,
    /// Left Shift
    LShift,
    /// Left Alt
    LAlt,
    /// Left meta/system key
    LSystem,
    /// Right Control
    RControl,
    /// Right Shift
    RShift,
    /// Right Alt
    RAlt,
    /// Right meta/system key
    RSystem,
    /// Menu key
    Menu,
    /// [ key
    LBracket,
    /// ] key
    RBracket,
    /// ; key
    Semicolon,
    /// , key
    Comma,
    /// . key
    Period,
    /// ' key
    Quote,
    /// / key
    Slash,
    /// \ key
    Backslash,
    /// ` key
    Tilde,
    /// = key
    Equal,
    /// - key
    Hyphen,
    /// Space bar
    Space,
    /// Enter / keypad Enter
    Enter,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// End key
    End,
    /// Home key
    Home,
    /// Insert key
    Insert,
    /// Delete key
    Delete,
    /// Keypad +
    Add,
    /// Keypad -
    Subtract,
    /// Keypad *
    Multiply,
    /// Keypad /
    Divide,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Keypad 0
    Numpad0,
    /// Keypad 1
    Numpad1,
    /// Keypad 2
    Numpad2,
    /// Keypad 3
    Numpad3,
    /// Keypad 4
    Numpad4,
    /// Keypad 5
    Numpad5,
    /// Keypad 6
    Numpad6,
    /// Keypad 7
    Numpad7,
    /// Keypad 8
    Numpad8,
    /// Keypad 9
    Numpad9,
    /// F1 key
    F1,
    /// F2 key
    F2,
    /// F3 key
    F3,
    /// F4 key
    F4,
    /// F5 key
    F5,
    /// F6 key
    F6,
    /// F7 key
    F7,
    /// F8 key
    F8,
    /// F9 key
    F9,
    /// F10 key
    F10,
    /// F11 key
    F11,
    /// F12 key
    F12,
    /// F13 key
    F13,
    /// F14 key
    F14,
    /// F15 key
    F15,
    /// Pause key
    Pause,
}

/// Decode sequential UTF-8 code points from an input-method byte buffer.
///
/// Invalid sequences skip one byte and resync; NUL code points are dropped.
/// Used by the translator to fan one raw key event out into zero or more
/// `TextEntered` events.
pub(crate) fn decode_code_points(bytes: &[u8]) -> Vec<char> {
    let mut out = Vec::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.extend(valid.chars().filter(|&c| c != '\0'));
                break;
            }
            Err(error) => {
                let valid_len = error.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&rest[..valid_len]) {
                    out.extend(valid.chars().filter(|&c| c != '\0'));
                }
                let skip = error.error_len().unwrap_or(1).max(1);
                rest = &rest[valid_len + skip..];
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ascii_and_multibyte() {
        assert_eq!(decode_code_points(b"ab"), vec!['a', 'b']);
        assert_eq!(decode_code_points("é€".as_bytes()), vec!['é', '€']);
    }

    #[test]
    fn decode_skips_invalid_bytes_and_resyncs() {
        let bytes = [b'a', 0xFF, b'b'];
        assert_eq!(decode_code_points(&bytes), vec!['a', 'b']);
    }

    #[test]
    fn decode_drops_nul_code_points() {
        let bytes = [b'a', 0, b'b'];
        assert_eq!(decode_code_points(&bytes), vec!['a', 'b']);
    }

    #[test]
    fn decode_empty_buffer_yields_nothing() {
        assert!(decode_code_points(&[]).is_empty());
    }
}
