use std::sync::Arc;

use super::*;
use crate::event::{Event, Key, MouseButton, MouseWheel};
use crate::foundation::math::{Vector2i, Vector2u};
use crate::native::sim::SimulatedDisplay;
use crate::native::{keysym, CrossingMode, NativeGeometry, NativeModMask, RawEvent, TextLookup};
use crate::video::VideoMode;

fn setup() -> (Arc<SimulatedDisplay>, Arc<WindowRegistry>) {
    (
        Arc::new(SimulatedDisplay::new()),
        Arc::new(WindowRegistry::new()),
    )
}

fn open(
    display: &Arc<SimulatedDisplay>,
    registry: &Arc<WindowRegistry>,
    style: WindowStyle,
) -> Window {
    Window::new(
        display.clone(),
        registry.clone(),
        VideoMode::new(640, 480, 32),
        "test",
        style,
    )
}

fn handle(window: &Window) -> NativeWindowHandle {
    window.native_handle().unwrap()
}

fn drain(window: &mut Window) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = window.poll_event() {
        events.push(event);
    }
    events
}

#[test]
fn new_window_registers_and_teardown_unwinds() {
    let (display, registry) = setup();
    let h;
    {
        let window = open(&display, &registry, WindowStyle::default());
        assert!(window.is_open());
        assert!(!window.is_fullscreen());
        assert!(!window.is_mapped());
        h = handle(&window);
        assert!(registry.contains(h));
    }

    assert!(!registry.contains(h));
    assert_eq!(display.destroyed_input_contexts(), vec![h]);
    assert_eq!(display.destroyed_windows(), vec![h]);
    assert_eq!(display.close_connection_count(), 1);
    assert_eq!(display.close_input_method_count(), 1);
}

#[test]
fn failed_construction_degrades_to_a_safe_no_op_object() {
    let (display, registry) = setup();
    display.fail_next_create();

    let mut window = open(&display, &registry, WindowStyle::default());

    assert!(!window.is_open());
    assert!(window.native_handle().is_none());
    assert_eq!(registry.window_count(), 0);
    assert!(window.poll_event().is_none());
    assert_eq!(window.position(), Vector2i::default());
    assert_eq!(window.size(), Vector2u::default());

    // Operations on the degraded object must not reach the display.
    window.set_title("ignored");
    window.set_position(Vector2i::new(1, 2));
    window.request_focus();
    assert!(window.create_render_surface().is_none());

    drop(window);
    assert!(display.destroyed_windows().is_empty());
}

#[test]
fn external_windows_are_never_destroyed_on_drop() {
    let (display, registry) = setup();
    let native = display
        .create_window(Vector2u::new(100, 100), "host", false)
        .unwrap();

    {
        let window = Window::from_raw_handle(display.clone(), registry.clone(), native);
        assert!(window.is_open());
        assert!(registry.contains(native));
    }

    assert!(!registry.contains(native));
    assert!(display.destroyed_windows().is_empty());
    // Everything except window destruction still runs.
    assert_eq!(display.close_connection_count(), 1);
}

#[test]
fn visibility_drives_the_mapped_flag() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.push_event(h, RawEvent::Visibility { obscured: true });
    window.process_events();
    assert!(!window.is_mapped());

    display.push_event(h, RawEvent::Visibility { obscured: false });
    window.process_events();
    assert!(window.is_mapped());

    display.push_event(h, RawEvent::Unmapped);
    window.process_events();
    assert!(!window.is_mapped());
}

#[test]
fn resize_events_are_deduplicated_by_size() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    let configure = |width, height| RawEvent::Configure {
        x: 0,
        y: 0,
        width,
        height,
    };
    display.push_event(h, configure(640, 480));
    display.push_event(h, configure(640, 480)); // move, same size
    display.push_event(h, configure(800, 600));

    assert_eq!(
        drain(&mut window),
        vec![
            Event::Resized {
                width: 640,
                height: 480
            },
            Event::Resized {
                width: 800,
                height: 600
            },
        ]
    );
}

#[test]
fn close_request_surfaces_closed() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());

    display.push_event(handle(&window), RawEvent::CloseRequest);
    assert_eq!(drain(&mut window), vec![Event::Closed]);
}

#[test]
fn pings_are_echoed_and_never_surfaced() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());

    display.push_event(handle(&window), RawEvent::Ping { serial: 77 });
    assert!(drain(&mut window).is_empty());
    assert_eq!(display.ping_replies(), vec![77]);
}

#[test]
fn key_press_resolves_symbol_groups_and_modifiers() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    // Group 0 has no symbol; the lookup must fall through to group 1.
    display.set_keysym(10, 1, keysym::LOWER_A);
    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 10,
            state: NativeModMask::SHIFT | NativeModMask::MOD1,
            time: 5,
        },
    );

    assert_eq!(
        drain(&mut window),
        vec![Event::KeyPressed {
            code: Key::A,
            alt: true,
            control: false,
            shift: true,
            system: false,
        }]
    );
    assert_eq!(display.user_times(h), vec![5]);
}

#[test]
fn key_release_carries_modifiers_too() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.set_keysym(24, 0, keysym::ESCAPE);
    display.push_event(
        h,
        RawEvent::KeyReleased {
            keycode: 24,
            state: NativeModMask::CONTROL | NativeModMask::MOD4,
            time: 9,
        },
    );

    assert_eq!(
        drain(&mut window),
        vec![Event::KeyReleased {
            code: Key::Escape,
            alt: false,
            control: true,
            shift: false,
            system: true,
        }]
    );
}

#[test]
fn composed_text_fans_out_one_event_per_code_point() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.set_keysym(30, 0, keysym::LOWER_A);
    display.set_text(30, TextLookup::Text("é!".as_bytes().to_vec()));
    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 30,
            state: NativeModMask::empty(),
            time: 1,
        },
    );

    assert_eq!(
        drain(&mut window),
        vec![
            Event::KeyPressed {
                code: Key::A,
                alt: false,
                control: false,
                shift: false,
                system: false,
            },
            Event::TextEntered { unicode: 'é' },
            Event::TextEntered { unicode: '!' },
        ]
    );
}

#[test]
fn oversized_compositions_are_discarded_whole() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.set_text(31, TextLookup::Text(vec![b'a'; TEXT_BUFFER_CAPACITY + 1]));
    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 31,
            state: NativeModMask::empty(),
            time: 1,
        },
    );
    display.set_text(32, TextLookup::Overflow);
    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 32,
            state: NativeModMask::empty(),
            time: 2,
        },
    );

    // Only the two presses surface; no TextEntered at all.
    let events = drain(&mut window);
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|event| matches!(event, Event::KeyPressed { .. })));
}

#[test]
fn auto_repeat_release_is_filtered_with_repeat_enabled() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.set_keysym(40, 0, keysym::LOWER_A);
    display.push_event(
        h,
        RawEvent::KeyReleased {
            keycode: 40,
            state: NativeModMask::empty(),
            time: 100,
        },
    );
    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 40,
            state: NativeModMask::empty(),
            time: 101,
        },
    );

    // The spurious release disappears; the repeated press surfaces.
    assert_eq!(
        drain(&mut window),
        vec![Event::KeyPressed {
            code: Key::A,
            alt: false,
            control: false,
            shift: false,
            system: false,
        }]
    );
}

#[test]
fn auto_repeat_pair_is_swallowed_with_repeat_disabled() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);
    window.set_key_repeat_enabled(false);

    display.set_keysym(40, 0, keysym::LOWER_A);
    display.push_event(
        h,
        RawEvent::KeyReleased {
            keycode: 40,
            state: NativeModMask::empty(),
            time: 100,
        },
    );
    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 40,
            state: NativeModMask::empty(),
            time: 101,
        },
    );

    assert!(drain(&mut window).is_empty());
}

#[test]
fn genuine_release_passes_the_repeat_filter() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.set_keysym(40, 0, keysym::LOWER_A);
    // No follow-up press buffered: a real key-up.
    display.push_event(
        h,
        RawEvent::KeyReleased {
            keycode: 40,
            state: NativeModMask::empty(),
            time: 100,
        },
    );

    assert_eq!(
        drain(&mut window),
        vec![Event::KeyReleased {
            code: Key::A,
            alt: false,
            control: false,
            shift: false,
            system: false,
        }]
    );
}

#[test]
fn buttons_and_wheels_map_by_native_code() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.push_event(
        h,
        RawEvent::ButtonPressed {
            button: 1,
            x: 10,
            y: 20,
            time: 3,
        },
    );
    display.push_event(
        h,
        RawEvent::ButtonReleased {
            button: 9,
            x: 10,
            y: 20,
        },
    );
    display.push_event(
        h,
        RawEvent::ButtonReleased {
            button: 5,
            x: 1,
            y: 2,
        },
    );
    display.push_event(
        h,
        RawEvent::ButtonReleased {
            button: 6,
            x: 3,
            y: 4,
        },
    );
    // Unknown code: silently ignored.
    display.push_event(
        h,
        RawEvent::ButtonReleased {
            button: 10,
            x: 0,
            y: 0,
        },
    );

    assert_eq!(
        drain(&mut window),
        vec![
            Event::MouseButtonPressed {
                button: MouseButton::Left,
                x: 10,
                y: 20,
            },
            Event::MouseButtonReleased {
                button: MouseButton::Extra2,
                x: 10,
                y: 20,
            },
            Event::MouseWheelScrolled {
                wheel: MouseWheel::Vertical,
                delta: -1,
                x: 1,
                y: 2,
            },
            Event::MouseWheelScrolled {
                wheel: MouseWheel::Horizontal,
                delta: 1,
                x: 3,
                y: 4,
            },
        ]
    );
}

#[test]
fn grab_synthesized_crossings_are_filtered() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.push_event(
        h,
        RawEvent::Entered {
            mode: CrossingMode::Grab,
        },
    );
    display.push_event(
        h,
        RawEvent::Entered {
            mode: CrossingMode::Normal,
        },
    );
    display.push_event(
        h,
        RawEvent::Left {
            mode: CrossingMode::Ungrab,
        },
    );
    display.push_event(
        h,
        RawEvent::Left {
            mode: CrossingMode::Normal,
        },
    );

    assert_eq!(
        drain(&mut window),
        vec![Event::MouseEntered, Event::MouseLeft]
    );
}

#[test]
fn focus_gain_retries_the_cursor_grab_and_clears_urgency() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::FULLSCREEN);
    let h = handle(&window);

    display.set_urgency_hint(h, true);
    display.set_grab_denials(h, 2);
    display.push_event(h, RawEvent::FocusIn);

    assert_eq!(drain(&mut window), vec![Event::GainedFocus]);
    assert_eq!(display.pointer_grab(), Some(h));
    assert!(!display.is_urgent(h));
    assert!(display.input_context_focused(h));
}

#[test]
fn exhausted_grab_retries_continue_ungrabbed() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::FULLSCREEN);
    let h = handle(&window);

    display.set_grab_denials(h, MAX_GRAB_TRIALS);
    display.push_event(h, RawEvent::FocusIn);

    // Focus still gained; the window just runs without the grab.
    assert_eq!(drain(&mut window), vec![Event::GainedFocus]);
    assert!(display.pointer_grab().is_none());

    // The grab intent was dropped: a later focus cycle does not retry.
    display.push_event(h, RawEvent::FocusOut);
    display.push_event(h, RawEvent::FocusIn);
    assert_eq!(
        drain(&mut window),
        vec![Event::LostFocus, Event::GainedFocus]
    );
    assert!(display.pointer_grab().is_none());
}

#[test]
fn focus_loss_releases_the_grab() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::FULLSCREEN);
    let h = handle(&window);

    display.push_event(h, RawEvent::FocusIn);
    window.process_events();
    assert_eq!(display.pointer_grab(), Some(h));

    display.push_event(h, RawEvent::FocusOut);
    assert_eq!(drain(&mut window), vec![Event::GainedFocus, Event::LostFocus]);
    assert!(display.pointer_grab().is_none());
    assert!(!display.input_context_focused(h));
}

#[test]
fn position_trusts_known_good_window_managers() {
    let (display, registry) = setup();
    let window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.set_window_manager_name("i3");
    display.set_absolute_position(h, Vector2i::new(30, 40));

    assert_eq!(window.position(), Vector2i::new(30, 40));
}

#[test]
fn position_subtracts_reported_frame_extents() {
    let (display, registry) = setup();
    let window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.set_window_manager_name("Mutter");
    display.set_absolute_position(h, Vector2i::new(30, 40));
    display.set_frame_extents(Vector2i::new(5, 20));

    assert_eq!(window.position(), Vector2i::new(25, 20));
}

#[test]
fn position_falls_back_to_the_decoration_ancestor() {
    let (display, registry) = setup();
    let window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    // No WM name, no frame extents: walk up to the decoration frame.
    display.add_decoration_parent(
        h,
        NativeGeometry {
            position: Vector2i::new(7, 8),
            size: Vector2u::new(660, 510),
        },
    );

    assert_eq!(window.position(), Vector2i::new(7, 8));
}

#[test]
fn property_change_seeds_the_input_timestamp() {
    let (display, registry) = setup();
    let mut window = open(&display, &registry, WindowStyle::default());
    let h = handle(&window);

    display.push_event(h, RawEvent::PropertyChanged { time: 42 });
    // Same timestamp as the seed: nothing to publish.
    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 50,
            state: NativeModMask::empty(),
            time: 42,
        },
    );
    window.process_events();
    assert!(display.user_times(h).is_empty());

    display.push_event(
        h,
        RawEvent::KeyPressed {
            keycode: 50,
            state: NativeModMask::empty(),
            time: 43,
        },
    );
    window.process_events();
    assert_eq!(display.user_times(h), vec![43]);
}

#[test]
fn fullscreen_construction_negotiates_the_protocol() {
    let (display, registry) = setup();
    display.add_mode(9, VideoMode::new(640, 480, 32));

    let window = open(&display, &registry, WindowStyle::FULLSCREEN);
    let h = handle(&window);

    assert!(window.is_fullscreen());
    assert_eq!(display.cleared_size_limits(), vec![h]);
    assert_eq!(display.bypass_hints(), vec![h]);
    assert_eq!(display.fullscreen_requests(), vec![h]);
    assert_eq!(registry.fullscreen_owner(), Some(h));

    let applied = display.applied_mode_configs();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].mode_id, 9);
}

#[test]
fn destroy_notification_restores_the_desktop() {
    let (display, registry) = setup();
    display.add_mode(9, VideoMode::new(640, 480, 32));

    let mut window = open(&display, &registry, WindowStyle::FULLSCREEN);
    let h = handle(&window);
    display.push_event(h, RawEvent::FocusIn);
    window.process_events();

    display.push_event(h, RawEvent::Destroyed);
    window.process_events();

    assert!(registry.fullscreen_owner().is_none());
    assert!(display.pointer_grab().is_none());
    // Switch out, then restore: two mode applications.
    assert_eq!(display.applied_mode_configs().len(), 2);
}

#[test]
fn dropping_a_fullscreen_window_restores_the_desktop() {
    let (display, registry) = setup();
    display.add_mode(9, VideoMode::new(640, 480, 32));

    {
        let window = open(&display, &registry, WindowStyle::FULLSCREEN);
        assert_eq!(registry.fullscreen_owner(), window.native_handle());
    }

    assert!(registry.fullscreen_owner().is_none());
    assert_eq!(display.applied_mode_configs().len(), 2);
}

#[test]
fn set_icon_rejects_mismatched_buffers() {
    let (display, registry) = setup();
    let window = open(&display, &registry, WindowStyle::default());

    assert!(window.set_icon(2, 2, &[0u8; 4]).is_err());
    assert!(display.icon(handle(&window)).is_none());

    assert!(window.set_icon(1, 1, &[1, 2, 3, 4]).is_ok());
    assert!(display.icon(handle(&window)).is_some());
}
