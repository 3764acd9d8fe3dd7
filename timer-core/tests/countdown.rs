mod common;

use common::Rig;
use timer_core::arbiter::RunState;
use timer_core::clock::WallClock;
use timer_core::hw::{StatusColor, WallClockSource};
use timer_core::input::JoystickMask;
use timer_core::telemetry::TimerEvent;
use timer_core::tone::SongReport;

fn armed() -> Rig {
    let mut rig = Rig::fast();
    rig.push_joystick(JoystickMask::CENTER);
    assert_eq!(rig.controller.context().run_state(), RunState::Armed);
    rig
}

#[test]
fn remaining_time_follows_the_wall_clock() {
    let mut rig = armed();
    assert!(rig.events().contains(&TimerEvent::Armed {
        duration: 10,
        started_at: WallClock::from_hms(12, 59, 55).seconds_of_day(),
    }));

    rig.board.advance_clock(4);
    rig.step(5);

    assert_eq!(rig.controller.context().duration(), 6);
    assert_eq!(rig.board.text_at(43, 1), Some("00:06"));
    assert_eq!(rig.board.text_at(22, 50), Some("12:59:59"));
}

#[test]
fn manual_stop_keeps_what_was_left() {
    let mut rig = armed();
    rig.board.advance_clock(3);
    rig.push_joystick(JoystickMask::CENTER);

    assert_eq!(rig.controller.context().run_state(), RunState::Idle);
    assert!(rig.events().contains(&TimerEvent::Stopped { remaining: 7 }));

    rig.push_joystick(JoystickMask::RIGHT);
    assert_eq!(rig.controller.context().duration(), 8);
}

#[test]
fn stop_pressed_as_time_runs_out_still_expires() {
    let mut rig = armed();
    rig.board.advance_clock(10);
    rig.push_joystick(JoystickMask::CENTER);

    assert_eq!(rig.controller.context().run_state(), RunState::Idle);
    let events = rig.events();
    assert!(events.contains(&TimerEvent::Expired { lux: 0 }));
    assert!(events.contains(&TimerEvent::AlarmSuppressed { lux: 0 }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, TimerEvent::Stopped { .. })));
}

#[test]
fn expiry_in_the_dark_suppresses_the_alarm() {
    let mut rig = armed();
    rig.board.set_lux(30);
    rig.board.advance_clock(10);
    rig.step(1);

    let context = rig.controller.context();
    assert_eq!(context.run_state(), RunState::Idle);
    assert_eq!(context.duration(), 0);
    assert_eq!(rig.board.status(), StatusColor::STOPPED);
    assert_eq!(rig.board.pwm_compare(), Some(300));
    assert_eq!(rig.board.tone_edges(), 0);
    assert_eq!(rig.board.text_at(43, 1), Some("00:00"));

    let events = rig.events();
    assert!(events.contains(&TimerEvent::Expired { lux: 30 }));
    assert!(events.contains(&TimerEvent::AlarmSuppressed { lux: 30 }));
}

#[test]
fn expiry_in_the_light_plays_four_bursts() {
    let mut rig = armed();
    rig.board.set_lux(31);
    rig.board.advance_clock(10);
    rig.step(1);

    // Four E notes of 133 cycles each, two edges per cycle.
    assert_eq!(rig.board.tone_edges(), 4 * 133 * 2);
    assert_eq!(rig.board.waited_ns(), 4 * (133 * 2 * 1_515 + 5_000) * 1_000);
    assert_eq!(rig.board.clock(), WallClock::from_hms(13, 0, 6));
    assert_eq!(
        rig.events().last(),
        Some(&TimerEvent::AlarmPlayed(SongReport {
            bursts: 4,
            rests: 0,
            skipped: 0,
        }))
    );
}

#[test]
fn expired_countdown_cannot_rearm_until_edited() {
    let mut rig = armed();
    rig.board.advance_clock(10);
    rig.step(1);

    rig.push_joystick(JoystickMask::CENTER);
    assert_eq!(rig.controller.context().run_state(), RunState::Idle);
    assert_eq!(rig.events().last(), Some(&TimerEvent::ArmRejected));

    rig.push_joystick(JoystickMask::UP);
    rig.push_joystick(JoystickMask::CENTER);
    assert_eq!(rig.controller.context().run_state(), RunState::Armed);
}

#[test]
fn countdown_survives_midnight() {
    let mut rig = Rig::fast();
    rig.board.set_time(WallClock::from_hms(23, 59, 58));
    rig.push_joystick(JoystickMask::CENTER);

    rig.board.advance_clock(5);
    rig.step(1);
    assert_eq!(rig.board.clock(), WallClock::from_hms(0, 0, 3));
    assert_eq!(rig.controller.context().duration(), 5);

    rig.board.advance_clock(5);
    rig.step(1);
    assert_eq!(rig.controller.context().run_state(), RunState::Idle);
    assert!(rig.events().contains(&TimerEvent::Expired { lux: 0 }));
}
