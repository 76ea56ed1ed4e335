//! Key-repeat de-duplication
//!
//! The native key-repeat model redundantly emits release+press pairs while a
//! key is held. The abstract model wants either continuous presses (repeat
//! enabled) or a single press/release pair (repeat disabled), so spurious
//! releases are detected by scanning the still-buffered portion of the raw
//! stream for the matching press that the auto-repeat generated right after.

use std::collections::VecDeque;

use crate::native::RawEvent;

/// Maximum native-clock delta between a release and the auto-repeat press
/// that follows it for the pair to be classified as a repeat artifact.
pub const REPEAT_THRESHOLD: u64 = 2;

/// Decide whether a key-release is an auto-repeat artifact.
///
/// `pending` holds the raw events buffered after the release being examined,
/// in arrival order. Returns `true` when the release must be suppressed; in
/// that case, if `repeat_enabled` is `false`, the matching future press has
/// also been removed from the queue so neither half of the pair surfaces.
pub fn filter_repeated_release(
    keycode: u32,
    time: u64,
    pending: &mut VecDeque<RawEvent>,
    repeat_enabled: bool,
) -> bool {
    let matching_press = pending.iter().position(|event| {
        matches!(
            event,
            RawEvent::KeyPressed {
                keycode: pressed_code,
                time: pressed_time,
                ..
            } if *pressed_code == keycode
                && pressed_time.wrapping_sub(time) < REPEAT_THRESHOLD
        )
    });

    match matching_press {
        Some(index) => {
            if !repeat_enabled {
                pending.remove(index);
            }
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeModMask;

    fn press(keycode: u32, time: u64) -> RawEvent {
        RawEvent::KeyPressed {
            keycode,
            state: NativeModMask::empty(),
            time,
        }
    }

    #[test]
    fn genuine_release_is_forwarded() {
        let mut pending = VecDeque::from([press(38, 100)]);
        // Same key but far in the future: a real release followed by a new press.
        assert!(!filter_repeated_release(38, 10, &mut pending, true));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn repeat_release_is_suppressed_with_repeat_enabled() {
        let mut pending = VecDeque::from([press(38, 11)]);
        assert!(filter_repeated_release(38, 10, &mut pending, true));
        // The press stays queued so repeat produces press-only semantics.
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn repeat_pair_is_dropped_entirely_with_repeat_disabled() {
        let mut pending = VecDeque::from([press(38, 11), press(40, 11)]);
        assert!(filter_repeated_release(38, 10, &mut pending, false));
        // Only the matching press was removed, unrelated events are untouched.
        assert_eq!(pending.len(), 1);
        assert!(matches!(
            pending[0],
            RawEvent::KeyPressed { keycode: 40, .. }
        ));
    }

    #[test]
    fn other_keycodes_do_not_match() {
        let mut pending = VecDeque::from([press(40, 10)]);
        assert!(!filter_repeated_release(38, 10, &mut pending, false));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut pending = VecDeque::from([press(38, 12)]);
        // Delta of exactly 2 ticks is already a genuine pair.
        assert!(!filter_repeated_release(38, 10, &mut pending, false));
    }

    #[test]
    fn timestamp_wraparound_does_not_misclassify() {
        let mut pending = VecDeque::from([press(38, 5)]);
        // Release timestamped after the press: delta wraps and exceeds the
        // threshold, so the release is genuine.
        assert!(!filter_repeated_release(38, 6, &mut pending, true));
    }
}
