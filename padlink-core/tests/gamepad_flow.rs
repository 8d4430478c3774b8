//! The on-screen gamepad driven end to end against a
//! recording transport: stick lifecycle, button bitmasks, timers, cancel
//! and teardown, and the single-task session loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use padlink_core::{
    ButtonFlags, ControllerArrival, ControllerFrame, ControllerTransport, GamepadInputHandler,
    GamepadSession, GamepadTimer, InputConfig, InputHandler, KeyCode, KeyboardSink, Notifier,
    PadError, Protocol, StickAxes, StickSide, TouchAction, TouchEvent, TouchPointer,
};
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

// ── Helpers ──────────────────────────────────────────────────────

/// Records everything the handler sends outward.
#[derive(Default)]
struct Wire {
    arrivals: Mutex<Vec<ControllerArrival>>,
    frames: Mutex<Vec<ControllerFrame>>,
    toasts: Mutex<Vec<String>>,
    keys: Mutex<Vec<(KeyCode, bool)>>,
}

impl Wire {
    fn frames(&self) -> Vec<ControllerFrame> {
        self.frames.lock().unwrap().clone()
    }

    fn last_frame(&self) -> ControllerFrame {
        *self.frames.lock().unwrap().last().expect("no frame sent")
    }

    fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    fn toast_count(&self) -> usize {
        self.toasts.lock().unwrap().len()
    }

    fn last_arrival(&self) -> ControllerArrival {
        *self.arrivals.lock().unwrap().last().expect("no arrival sent")
    }
}

impl ControllerTransport for Wire {
    fn send_controller_arrival(&self, arrival: &ControllerArrival) {
        self.arrivals.lock().unwrap().push(*arrival);
    }

    fn send_controller_input(&self, frame: &ControllerFrame) {
        self.frames.lock().unwrap().push(*frame);
    }
}

impl Notifier for Wire {
    fn notify(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }
}

impl KeyboardSink for Wire {
    fn key_event(&self, key: KeyCode, down: bool) {
        self.keys.lock().unwrap().push((key, down));
    }
}

/// Config with no on-screen buttons, so every touch is a stick touch.
fn sticks_only() -> InputConfig {
    let mut config = InputConfig::default();
    config.buttons.layout.clear();
    config
}

fn build(protocol: Protocol, config: &InputConfig) -> (GamepadInputHandler, Arc<Wire>) {
    let wire = Arc::new(Wire::default());
    let handler =
        GamepadInputHandler::new(protocol, wire.clone(), wire.clone(), wire.clone(), config)
            .unwrap();
    (handler, wire)
}

fn touch(action: TouchAction, id: i32, x: f32, y: f32) -> TouchEvent {
    TouchEvent::single(action, id, x, y, 0)
}

fn multi(action: TouchAction, index: usize, pointers: &[(i32, f32, f32)]) -> TouchEvent {
    let pointers = pointers
        .iter()
        .map(|&(id, x, y)| TouchPointer::new(id, x, y))
        .collect();
    TouchEvent::new(action, index, pointers, 0)
}

fn center_of(handler: &GamepadInputHandler, key: KeyCode) -> (f32, f32) {
    let index = handler.layout().find_key(key).unwrap();
    let rect = handler.layout().button(index).unwrap().rect;
    (rect.left + rect.width / 2.0, rect.top + rect.height / 2.0)
}

// ── Sticks ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn stick_binds_clamps_and_releases() {
    let (mut h, wire) = build(Protocol::NvStream, &sticks_only());
    let radius = InputConfig::default().stick_radius_px();

    assert!(h.on_touch_event(&touch(TouchAction::Down, 0, 100.0, 100.0)));
    let left = h.sticks().stick(StickSide::Left);
    assert_eq!(left.pointer_id, Some(0));
    assert_eq!((left.center_x, left.center_y), (100.0, 100.0));
    assert_eq!(h.stick_axes(), StickAxes::CENTERED);

    h.on_touch_event(&touch(TouchAction::Move, 0, 100.0 + radius * 2.0, 100.0));
    let axes = h.stick_axes();
    assert!((axes.left_x - 1.0).abs() < 1e-5);
    assert_eq!(axes.left_y, 0.0);
    assert_eq!(wire.last_frame().left_stick_x, 32767);
    assert!(h.is_timer_armed(GamepadTimer::StickRepeat));

    let before = wire.frame_count();
    h.on_touch_event(&touch(TouchAction::Up, 0, 100.0 + radius * 2.0, 100.0));
    assert!(!h.sticks().any_bound());
    assert_eq!(h.stick_axes(), StickAxes::CENTERED);
    assert_eq!(wire.frame_count(), before + 1);
    let last = wire.last_frame();
    assert_eq!((last.left_stick_x, last.left_stick_y), (0, 0));
    assert!(!h.is_timer_armed(GamepadTimer::StickRepeat));
}

#[tokio::test(start_paused = true)]
async fn every_frame_carries_both_sticks_and_all_buttons() {
    let (mut h, wire) = build(Protocol::NvStream, &sticks_only());
    let r = InputConfig::default().stick_radius_px();

    // Right stick pushed fully up.
    h.on_touch_event(&touch(TouchAction::Down, 1, 1500.0, 500.0));
    h.on_touch_event(&touch(TouchAction::Move, 1, 1500.0, 500.0 - r));
    assert_eq!(wire.last_frame().right_stick_y, 32767);

    // Left stick moves: the right stick value rides along unchanged.
    h.on_touch_event(&multi(
        TouchAction::PointerDown,
        1,
        &[(1, 1500.0, 500.0 - r), (2, 300.0, 500.0)],
    ));
    h.on_touch_event(&multi(
        TouchAction::Move,
        0,
        &[(1, 1500.0, 500.0 - r), (2, 300.0 + r, 500.0)],
    ));
    let f = wire.last_frame();
    assert_eq!(f.left_stick_x, 32767);
    assert_eq!(f.right_stick_y, 32767);

    // A button press keeps both sticks.
    h.send_gamepad_button(KeyCode::BUTTON_X, false);
    let f = wire.last_frame();
    assert_eq!(f.buttons, ButtonFlags::X);
    assert_eq!(f.left_stick_x, 32767);
    assert_eq!(f.right_stick_y, 32767);

    // A stick move keeps the held button.
    h.on_touch_event(&multi(
        TouchAction::Move,
        0,
        &[(1, 1500.0, 500.0 - r), (2, 300.0, 500.0 + r)],
    ));
    let f = wire.last_frame();
    assert_eq!(f.buttons, ButtonFlags::X);
    assert_eq!((f.left_stick_x, f.left_stick_y), (0, -32767));
    assert_eq!(f.right_stick_y, 32767);
}

#[tokio::test(start_paused = true)]
async fn repeat_timer_resends_while_stick_held() {
    let (mut h, wire) = build(Protocol::NvStream, &sticks_only());
    h.on_touch_event(&touch(TouchAction::Down, 0, 200.0, 400.0));
    h.on_touch_event(&touch(TouchAction::Move, 0, 260.0, 400.0));
    let sent = wire.frame_count();

    let start = Instant::now();
    assert_eq!(h.run_next_timer().await, Some(GamepadTimer::StickRepeat));
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(wire.frame_count(), sent + 1);
    assert_eq!(wire.last_frame().left_stick_x, wire.frames()[sent - 1].left_stick_x);
    assert!(h.is_timer_armed(GamepadTimer::StickRepeat));
}

#[tokio::test(start_paused = true)]
async fn stick_pointer_moving_onto_button_releases_stick_and_presses() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (bx, by) = center_of(&h, KeyCode::BUTTON_THUMBL);

    h.on_touch_event(&touch(TouchAction::Down, 0, bx, by - 200.0));
    assert!(h.sticks().any_bound());
    h.on_touch_event(&touch(TouchAction::Move, 0, bx, by));

    assert!(!h.sticks().any_bound());
    assert_eq!(h.held_key(0), Some(KeyCode::BUTTON_THUMBL));
    let f = wire.last_frame();
    assert_eq!(f.buttons, ButtonFlags::LS_CLK);
    assert_eq!((f.left_stick_x, f.left_stick_y), (0, 0));
}

// ── Buttons ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn overlapping_presses_accumulate_bitmask() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);
    let (bx, by) = center_of(&h, KeyCode::BUTTON_B);

    h.on_touch_event(&touch(TouchAction::Down, 0, ax, ay));
    assert_eq!(wire.last_frame().buttons, ButtonFlags::A);

    h.on_touch_event(&multi(TouchAction::PointerDown, 1, &[(0, ax, ay), (1, bx, by)]));
    assert_eq!(wire.last_frame().buttons, ButtonFlags::A | ButtonFlags::B);
    assert_eq!(wire.last_frame().buttons.bits(), 0x3000);

    h.on_touch_event(&multi(TouchAction::PointerUp, 0, &[(0, ax, ay), (1, bx, by)]));
    assert_eq!(wire.last_frame().buttons, ButtonFlags::B);
    assert_eq!(h.button_state().buttons, ButtonFlags::B);
}

#[tokio::test(start_paused = true)]
async fn sliding_between_buttons() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);
    let (bx, by) = center_of(&h, KeyCode::BUTTON_B);

    h.on_touch_event(&touch(TouchAction::Down, 0, ax, ay));
    h.on_touch_event(&touch(TouchAction::Move, 0, bx, by));
    let buttons: Vec<ButtonFlags> = wire.frames().iter().map(|f| f.buttons).collect();
    assert_eq!(buttons, vec![ButtonFlags::A, ButtonFlags::empty(), ButtonFlags::B]);
    assert_eq!(h.held_key(0), Some(KeyCode::BUTTON_B));
}

#[tokio::test(start_paused = true)]
async fn held_button_is_not_pressed_twice() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);

    h.on_touch_event(&touch(TouchAction::Down, 0, ax, ay));
    h.on_touch_event(&multi(TouchAction::PointerDown, 1, &[(0, ax, ay), (1, ax + 2.0, ay)]));
    assert_eq!(wire.frame_count(), 1);

    // The second pointer lifting must not release the first one's press.
    h.on_touch_event(&multi(TouchAction::PointerUp, 1, &[(0, ax, ay), (1, ax + 2.0, ay)]));
    assert_eq!(h.button_state().buttons, ButtonFlags::A);
}

#[tokio::test(start_paused = true)]
async fn triggers_are_analog() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    h.send_gamepad_button(KeyCode::BUTTON_L2, false);
    let f = wire.last_frame();
    assert_eq!(f.left_trigger, 0xFF);
    assert!(f.buttons.is_empty());
    h.release_gamepad_button(KeyCode::BUTTON_L2);
    assert_eq!(wire.last_frame().left_trigger, 0);
}

// ── Repeated downs ───────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn repeated_down_on_other_button_releases_first() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);
    let (bx, by) = center_of(&h, KeyCode::BUTTON_B);

    h.on_touch_event(&touch(TouchAction::Down, 0, ax, ay));
    // Up for pointer 0 never arrived.
    h.on_touch_event(&touch(TouchAction::Down, 0, bx, by));
    assert_eq!(h.held_key(0), Some(KeyCode::BUTTON_B));
    assert_eq!(wire.last_frame().buttons, ButtonFlags::B);

    h.on_touch_event(&touch(TouchAction::Up, 0, bx, by));
    assert!(h.button_state().buttons.is_empty());
    assert!(wire.last_frame().buttons.is_empty());
}

#[tokio::test(start_paused = true)]
async fn repeated_down_on_button_unbinds_stick() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);

    h.on_touch_event(&touch(TouchAction::Down, 0, 1300.0, 300.0));
    h.on_touch_event(&touch(TouchAction::Move, 0, 1340.0, 300.0));
    assert_eq!(h.sticks().side_of(0), Some(StickSide::Right));

    h.on_touch_event(&touch(TouchAction::Down, 0, ax, ay));
    assert!(!h.sticks().any_bound());
    assert!(!h.is_timer_armed(GamepadTimer::StickRepeat));
    assert_eq!(h.held_key(0), Some(KeyCode::BUTTON_A));

    h.on_touch_event(&touch(TouchAction::Up, 0, ax, ay));
    assert!(!h.sticks().any_bound());
    assert!(h.button_state().buttons.is_empty());
    let last = wire.last_frame();
    assert!(last.buttons.is_empty());
    assert_eq!((last.right_stick_x, last.right_stick_y), (0, 0));
}

#[tokio::test(start_paused = true)]
async fn repeated_down_on_stick_recentres_it() {
    let (mut h, wire) = build(Protocol::NvStream, &sticks_only());

    h.on_touch_event(&touch(TouchAction::Down, 0, 100.0, 400.0));
    h.on_touch_event(&touch(TouchAction::Move, 0, 140.0, 400.0));
    assert!(h.stick_axes().left_x > 0.0);

    h.on_touch_event(&touch(TouchAction::Down, 0, 300.0, 400.0));
    let left = h.sticks().stick(StickSide::Left);
    assert_eq!(left.pointer_id, Some(0));
    assert_eq!((left.center_x, left.center_y), (300.0, 400.0));
    assert_eq!(h.stick_axes(), StickAxes::CENTERED);
    assert_eq!(wire.last_frame().left_stick_x, 0);
}

// ── Resize ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn resize_moves_buttons_and_stick_split() {
    let (mut h, _wire) = build(Protocol::NvStream, &InputConfig::default());
    h.on_touch_event(&touch(TouchAction::Down, 0, 100.0, 400.0));

    h.resize(1280, 720);
    assert!(!h.sticks().any_bound());
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);
    assert!((ax - 1088.0).abs() < 0.01 && (ay - 504.0).abs() < 0.01);
    assert_eq!(h.sticks().side_for(700.0), StickSide::Right);

    h.on_touch_event(&touch(TouchAction::Down, 1, ax, ay));
    assert_eq!(h.held_key(1), Some(KeyCode::BUTTON_A));
}

// ── Timers ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn auto_release_fires_after_delay() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let start = Instant::now();
    h.send_gamepad_button(KeyCode::BUTTON_A, true);
    assert_eq!(wire.last_frame().buttons, ButtonFlags::A);

    let fired = h.run_next_timer().await;
    assert_eq!(fired, Some(GamepadTimer::AutoRelease(KeyCode::BUTTON_A)));
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert!(wire.last_frame().buttons.is_empty());
}

#[tokio::test(start_paused = true)]
async fn repeated_short_press_rearms_release() {
    let (mut h, _wire) = build(Protocol::NvStream, &InputConfig::default());
    let start = Instant::now();
    h.send_gamepad_button(KeyCode::BUTTON_B, true);
    tokio::time::advance(Duration::from_millis(30)).await;
    h.send_gamepad_button(KeyCode::BUTTON_B, true);

    let fired = h.run_next_timer().await;
    assert_eq!(fired, Some(GamepadTimer::AutoRelease(KeyCode::BUTTON_B)));
    assert!(start.elapsed() >= Duration::from_millis(80));
}

#[tokio::test(start_paused = true)]
async fn explicit_release_cancels_auto_release() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    h.send_gamepad_button(KeyCode::BUTTON_A, true);
    h.release_gamepad_button(KeyCode::BUTTON_A);
    assert!(!h.is_timer_armed(GamepadTimer::AutoRelease(KeyCode::BUTTON_A)));
    assert_eq!(wire.frame_count(), 2);

    // Only the keep-alive is left.
    assert_eq!(h.run_next_timer().await, Some(GamepadTimer::KeepAlive));
}

#[tokio::test(start_paused = true)]
async fn auto_release_leaves_key_held_on_screen() {
    let mut config = InputConfig::default();
    config.stick.keepalive_ms = 0;
    let (mut h, wire) = build(Protocol::NvStream, &config);
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);

    h.on_touch_event(&touch(TouchAction::Down, 0, ax, ay));
    h.send_gamepad_button(KeyCode::BUTTON_A, true);
    assert_eq!(
        h.run_next_timer().await,
        Some(GamepadTimer::AutoRelease(KeyCode::BUTTON_A))
    );
    assert_eq!(h.button_state().buttons, ButtonFlags::A);
    assert_eq!(wire.last_frame().buttons, ButtonFlags::A);

    h.on_touch_event(&touch(TouchAction::Up, 0, ax, ay));
    assert!(wire.last_frame().buttons.is_empty());
}

#[tokio::test(start_paused = true)]
async fn timer_intervals_past_the_cap_are_rejected() {
    let mut config = InputConfig::default();
    config.stick.keepalive_ms = 100_000_000_000;
    let wire = Arc::new(Wire::default());
    let result = GamepadInputHandler::new(
        Protocol::NvStream,
        wire.clone(),
        wire.clone(),
        wire.clone(),
        &config,
    );
    assert!(matches!(result, Err(PadError::InvalidConfig(_))));
    assert!(wire.arrivals.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn long_press_on_select_enters_edit_mode() {
    let mut config = InputConfig::default();
    config.stick.keepalive_ms = 0;
    let (mut h, wire) = build(Protocol::NvStream, &config);
    let (sx, sy) = center_of(&h, KeyCode::BUTTON_SELECT);

    h.on_touch_event(&touch(TouchAction::Down, 0, sx, sy));
    assert_eq!(wire.last_frame().buttons, ButtonFlags::BACK);
    assert!(h.is_timer_armed(GamepadTimer::LongPress(0)));

    let start = Instant::now();
    assert_eq!(h.run_next_timer().await, Some(GamepadTimer::LongPress(0)));
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert!(h.is_edit_mode());
    assert!(wire.last_frame().buttons.is_empty());
    assert!(!h.on_touch_event(&touch(TouchAction::Up, 0, sx, sy)));
}

#[tokio::test(start_paused = true)]
async fn short_select_tap_does_not_enter_edit_mode() {
    let mut config = InputConfig::default();
    config.stick.keepalive_ms = 0;
    let (mut h, _wire) = build(Protocol::NvStream, &config);
    let (sx, sy) = center_of(&h, KeyCode::BUTTON_SELECT);

    h.on_touch_event(&touch(TouchAction::Down, 0, sx, sy));
    h.on_touch_event(&touch(TouchAction::Up, 0, sx, sy));
    assert!(!h.is_timer_armed(GamepadTimer::LongPress(0)));
    assert!(!h.has_pending_timers());
    assert!(!h.is_edit_mode());
}

// ── Cancel and teardown ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn cancel_unwinds_buttons_and_sticks() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (ax, ay) = center_of(&h, KeyCode::BUTTON_A);

    h.on_touch_event(&touch(TouchAction::Down, 0, ax, ay));
    h.on_touch_event(&multi(TouchAction::PointerDown, 1, &[(0, ax, ay), (1, 300.0, 400.0)]));
    h.on_touch_event(&multi(TouchAction::Move, 0, &[(0, ax, ay), (1, 340.0, 400.0)]));
    assert_eq!(wire.last_frame().buttons, ButtonFlags::A);
    assert_ne!(wire.last_frame().left_stick_x, 0);

    h.on_touch_event(&multi(TouchAction::Cancel, 0, &[(0, ax, ay), (1, 340.0, 400.0)]));
    let f = wire.last_frame();
    assert!(f.buttons.is_empty());
    assert_eq!((f.left_stick_x, f.left_stick_y), (0, 0));
    assert!(h.button_state().is_idle());
    assert!(!h.sticks().any_bound());
    assert_eq!(h.held_key(0), None);
    assert!(!h.is_timer_armed(GamepadTimer::StickRepeat));
}

#[tokio::test(start_paused = true)]
async fn cleanup_cancels_timers_and_announces_removal() {
    let (mut h, wire) = build(Protocol::NvStream, &sticks_only());
    assert_eq!(wire.last_arrival(), ControllerArrival::xbox());

    h.send_gamepad_button(KeyCode::BUTTON_A, true);
    h.on_touch_event(&touch(TouchAction::Down, 0, 200.0, 400.0));
    h.on_touch_event(&touch(TouchAction::Move, 0, 250.0, 400.0));
    assert!(h.has_pending_timers());

    h.cleanup();
    assert!(wire.last_arrival().is_removal());
    assert!(!h.has_pending_timers());
    assert!(!h.sticks().any_bound());

    // Nothing scheduled before cleanup fires afterwards.
    let sent = wire.frame_count();
    assert_eq!(h.next_timer().await, None);
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(wire.frame_count(), sent);

    // Touches after teardown are refused.
    assert!(!h.on_touch_event(&touch(TouchAction::Down, 0, 200.0, 400.0)));
}

#[tokio::test(start_paused = true)]
async fn show_overlay_reannounces_after_cleanup() {
    let (mut h, wire) = build(Protocol::NvStream, &InputConfig::default());
    h.show_overlay();
    assert_eq!(wire.arrivals.lock().unwrap().len(), 1);

    h.cleanup();
    h.show_overlay();
    let arrivals = wire.arrivals.lock().unwrap().clone();
    assert_eq!(
        arrivals,
        vec![
            ControllerArrival::xbox(),
            ControllerArrival::removal(),
            ControllerArrival::xbox()
        ]
    );
    assert!(h.is_overlay_attached());
    assert!(h.is_timer_armed(GamepadTimer::KeepAlive));
}

// ── Legacy protocols ─────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn legacy_stick_updates_notify_once() {
    for protocol in [Protocol::Rdp, Protocol::Vnc] {
        let (mut h, wire) = build(protocol, &sticks_only());
        h.on_touch_event(&touch(TouchAction::Down, 0, 200.0, 400.0));
        h.on_touch_event(&touch(TouchAction::Move, 0, 250.0, 400.0));
        h.on_touch_event(&touch(TouchAction::Move, 0, 260.0, 400.0));
        assert_eq!(wire.toast_count(), 1, "{protocol}");
        assert!(wire.frames().is_empty());
        assert!(!h.is_timer_armed(GamepadTimer::KeepAlive));
    }
}

#[tokio::test(start_paused = true)]
async fn unsupported_protocol_is_rejected() {
    let wire = Arc::new(Wire::default());
    let result = GamepadInputHandler::new(
        Protocol::Spice,
        wire.clone(),
        wire.clone(),
        wire.clone(),
        &InputConfig::default(),
    );
    assert!(matches!(result, Err(PadError::UnsupportedProtocol(_))));
}

// ── Session loop ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn session_serializes_commands_and_timers() {
    let (h, wire) = build(Protocol::NvStream, &sticks_only());
    let (session, handle) = GamepadSession::new(h, 16);
    let task = session.spawn();

    assert_ok!(handle.touch(touch(TouchAction::Down, 0, 200.0, 400.0)).await);
    assert_ok!(handle.touch(touch(TouchAction::Move, 0, 300.0, 400.0)).await);
    tokio::time::sleep(Duration::from_millis(120)).await;

    // One frame for the move plus at least one repeat.
    let frames = wire.frames();
    assert!(frames.len() >= 2, "frames: {}", frames.len());
    assert!(frames.iter().all(|f| f.left_stick_x == 32767));

    assert_ok!(handle.press(KeyCode::BUTTON_Y, true).await);
    assert_ok!(handle.shutdown().await);
    let h = task.await.unwrap();

    assert!(!h.has_pending_timers());
    assert!(!h.is_overlay_attached());
    assert!(wire.last_arrival().is_removal());
    assert!(handle.is_closed());
    assert!(matches!(
        assert_err!(handle.show_overlay().await),
        PadError::ChannelClosed
    ));
}

#[tokio::test(start_paused = true)]
async fn session_stops_when_handles_drop() {
    let (h, wire) = build(Protocol::NvStream, &InputConfig::default());
    let (session, handle) = GamepadSession::new(h, 4);
    let task = session.spawn();
    drop(handle);
    let h = task.await.unwrap();
    assert!(!h.is_overlay_attached());
    assert!(wire.last_arrival().is_removal());
}
