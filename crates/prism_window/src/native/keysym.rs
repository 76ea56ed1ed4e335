//! Key symbol constants and the symbol-to-key table
//!
//! Symbol values follow the conventional X11 keysym encoding so a real
//! platform binding can pass its lookups through unchanged.

use crate::event::Key;

/// Absence of a symbol for a (keycode, group) pair
pub const NO_SYMBOL: u32 = 0;

// Latin-1 block: the symbol value is the character code itself.
pub(crate) const SPACE: u32 = 0x0020;
pub(crate) const APOSTROPHE: u32 = 0x0027;
pub(crate) const COMMA: u32 = 0x002C;
pub(crate) const MINUS: u32 = 0x002D;
pub(crate) const PERIOD: u32 = 0x002E;
pub(crate) const SLASH: u32 = 0x002F;
pub(crate) const NUM_0: u32 = 0x0030;
pub(crate) const NUM_9: u32 = 0x0039;
pub(crate) const SEMICOLON: u32 = 0x003B;
pub(crate) const EQUAL: u32 = 0x003D;
pub(crate) const BRACKET_LEFT: u32 = 0x005B;
pub(crate) const BACKSLASH: u32 = 0x005C;
pub(crate) const BRACKET_RIGHT: u32 = 0x005D;
pub(crate) const GRAVE: u32 = 0x0060;
pub(crate) const LOWER_A: u32 = 0x0061;
pub(crate) const LOWER_Z: u32 = 0x007A;

// Function and control symbols.
pub(crate) const BACKSPACE: u32 = 0xFF08;
pub(crate) const TAB: u32 = 0xFF09;
pub(crate) const RETURN: u32 = 0xFF0D;
pub(crate) const PAUSE: u32 = 0xFF13;
pub(crate) const ESCAPE: u32 = 0xFF1B;
pub(crate) const HOME: u32 = 0xFF50;
pub(crate) const ARROW_LEFT: u32 = 0xFF51;
pub(crate) const ARROW_UP: u32 = 0xFF52;
pub(crate) const ARROW_RIGHT: u32 = 0xFF53;
pub(crate) const ARROW_DOWN: u32 = 0xFF54;
pub(crate) const PAGE_UP: u32 = 0xFF55;
pub(crate) const PAGE_DOWN: u32 = 0xFF56;
pub(crate) const END: u32 = 0xFF57;
pub(crate) const INSERT: u32 = 0xFF63;
pub(crate) const MENU: u32 = 0xFF67;
pub(crate) const KP_ENTER: u32 = 0xFF8D;
pub(crate) const KP_HOME: u32 = 0xFF95;
pub(crate) const KP_LEFT: u32 = 0xFF96;
pub(crate) const KP_UP: u32 = 0xFF97;
pub(crate) const KP_RIGHT: u32 = 0xFF98;
pub(crate) const KP_DOWN: u32 = 0xFF99;
pub(crate) const KP_PAGE_UP: u32 = 0xFF9A;
pub(crate) const KP_PAGE_DOWN: u32 = 0xFF9B;
pub(crate) const KP_END: u32 = 0xFF9C;
pub(crate) const KP_BEGIN: u32 = 0xFF9D;
pub(crate) const KP_INSERT: u32 = 0xFF9E;
pub(crate) const KP_MULTIPLY: u32 = 0xFFAA;
pub(crate) const KP_ADD: u32 = 0xFFAB;
pub(crate) const KP_SUBTRACT: u32 = 0xFFAD;
pub(crate) const KP_DIVIDE: u32 = 0xFFAF;
pub(crate) const F1: u32 = 0xFFBE;
pub(crate) const F15: u32 = 0xFFCC;
pub(crate) const SHIFT_L: u32 = 0xFFE1;
pub(crate) const SHIFT_R: u32 = 0xFFE2;
pub(crate) const CONTROL_L: u32 = 0xFFE3;
pub(crate) const CONTROL_R: u32 = 0xFFE4;
pub(crate) const ALT_L: u32 = 0xFFE9;
pub(crate) const ALT_R: u32 = 0xFFEA;
pub(crate) const SUPER_L: u32 = 0xFFEB;
pub(crate) const SUPER_R: u32 = 0xFFEC;
pub(crate) const DELETE: u32 = 0xFFFF;

/// Map a native key symbol to the abstract key identifier.
///
/// Unhandled symbols map to [`Key::Unknown`]; this is a default, never an
/// error.
pub fn key_from_symbol(symbol: u32) -> Key {
    match symbol {
        SHIFT_L => Key::LShift,
        SHIFT_R => Key::RShift,
        CONTROL_L => Key::LControl,
        CONTROL_R => Key::RControl,
        ALT_L => Key::LAlt,
        ALT_R => Key::RAlt,
        SUPER_L => Key::LSystem,
        SUPER_R => Key::RSystem,
        MENU => Key::Menu,
        ESCAPE => Key::Escape,
        SEMICOLON => Key::Semicolon,
        SLASH => Key::Slash,
        EQUAL => Key::Equal,
        MINUS => Key::Hyphen,
        BRACKET_LEFT => Key::LBracket,
        BRACKET_RIGHT => Key::RBracket,
        COMMA => Key::Comma,
        PERIOD => Key::Period,
        APOSTROPHE => Key::Quote,
        BACKSLASH => Key::Backslash,
        GRAVE => Key::Tilde,
        SPACE => Key::Space,
        RETURN | KP_ENTER => Key::Enter,
        BACKSPACE => Key::Backspace,
        TAB => Key::Tab,
        PAGE_UP => Key::PageUp,
        PAGE_DOWN => Key::PageDown,
        END => Key::End,
        HOME => Key::Home,
        INSERT => Key::Insert,
        DELETE => Key::Delete,
        KP_ADD => Key::Add,
        KP_SUBTRACT => Key::Subtract,
        KP_MULTIPLY => Key::Multiply,
        KP_DIVIDE => Key::Divide,
        PAUSE => Key::Pause,
        ARROW_LEFT => Key::Left,
        ARROW_RIGHT => Key::Right,
        ARROW_UP => Key::Up,
        ARROW_DOWN => Key::Down,
        // Numpad keys report their navigation symbols when NumLock is off.
        KP_INSERT => Key::Numpad0,
        KP_END => Key::Numpad1,
        KP_DOWN => Key::Numpad2,
        KP_PAGE_DOWN => Key::Numpad3,
        KP_LEFT => Key::Numpad4,
        KP_BEGIN => Key::Numpad5,
        KP_RIGHT => Key::Numpad6,
        KP_HOME => Key::Numpad7,
        KP_UP => Key::Numpad8,
        KP_PAGE_UP => Key::Numpad9,
        s if (F1..=F15).contains(&s) => function_key(s),
        s if (LOWER_A..=LOWER_Z).contains(&s) => letter_key(s),
        s if (NUM_0..=NUM_9).contains(&s) => digit_key(s),
        _ => Key::Unknown,
    }
}

fn function_key(symbol: u32) -> Key {
    const TABLE: [Key; 15] = [
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::F13,
        Key::F14,
        Key::F15,
    ];
    TABLE[(symbol - F1) as usize]
}

fn letter_key(symbol: u32) -> Key {
    const TABLE: [Key; 26] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];
    TABLE[(symbol - LOWER_A) as usize]
}

fn digit_key(symbol: u32) -> Key {
    const TABLE: [Key; 10] = [
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];
    TABLE[(symbol - NUM_0) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_digits_and_function_keys() {
        assert_eq!(key_from_symbol(LOWER_A), Key::A);
        assert_eq!(key_from_symbol(LOWER_Z), Key::Z);
        assert_eq!(key_from_symbol(NUM_0), Key::Num0);
        assert_eq!(key_from_symbol(NUM_9), Key::Num9);
        assert_eq!(key_from_symbol(F1), Key::F1);
        assert_eq!(key_from_symbol(F15), Key::F15);
    }

    #[test]
    fn numpad_navigation_aliases() {
        assert_eq!(key_from_symbol(KP_INSERT), Key::Numpad0);
        assert_eq!(key_from_symbol(KP_BEGIN), Key::Numpad5);
        assert_eq!(key_from_symbol(KP_PAGE_UP), Key::Numpad9);
    }

    #[test]
    fn enter_covers_both_variants() {
        assert_eq!(key_from_symbol(RETURN), Key::Enter);
        assert_eq!(key_from_symbol(KP_ENTER), Key::Enter);
    }

    #[test]
    fn unhandled_symbols_default_to_unknown() {
        assert_eq!(key_from_symbol(NO_SYMBOL), Key::Unknown);
        assert_eq!(key_from_symbol(0xFFFE), Key::Unknown);
    }
}
