//! Switching integration tests: full schedule, scripted input.

use std::sync::{Arc, Mutex};

use glam::DVec2;

use shadowswap::components::character::{CharacterId, MovementState};
use shadowswap::game::Simulation;
use shadowswap::resources::gameconfig::GameConfig;
use shadowswap::resources::input::{Action, HeldActions};
use shadowswap::resources::level::LevelLayout;

fn make_sim() -> Simulation {
    Simulation::new(GameConfig::new(), LevelLayout::reference(), HeldActions::new())
}

fn record_switches(sim: &mut Simulation) -> Arc<Mutex<Vec<CharacterId>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    sim.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.active_character));
    seen
}

fn tick_with(sim: &mut Simulation, held: HeldActions) {
    sim.set_input(held);
    sim.tick();
}

fn press_switch(sim: &mut Simulation) {
    tick_with(sim, HeldActions::new().with(Action::Switch));
    tick_with(sim, HeldActions::new());
}

fn assert_single_active(sim: &Simulation) {
    let main = sim.character(CharacterId::Main).unwrap().is_active();
    let shadow = sim.character(CharacterId::Shadow).unwrap().is_active();
    assert!(main ^ shadow, "exactly one character must be active");
    let expected = if main {
        CharacterId::Main
    } else {
        CharacterId::Shadow
    };
    assert_eq!(sim.coordinator().active(), expected);
    assert_eq!(sim.snapshot().active_character, expected);
    // Shadow follows exactly when it is not in control.
    assert_eq!(sim.follow(CharacterId::Shadow).unwrap().is_following(), main);
}

#[test]
fn test_switch_to_shadow_notifies_once() {
    let mut sim = make_sim();
    let seen = record_switches(&mut sim);

    tick_with(&mut sim, HeldActions::new().with(Action::Switch));

    assert_eq!(sim.coordinator().active(), CharacterId::Shadow);
    assert!(!sim.character(CharacterId::Main).unwrap().is_active());
    assert!(sim.character(CharacterId::Shadow).unwrap().is_active());
    assert!(!sim.follow(CharacterId::Shadow).unwrap().is_following());
    assert!(sim.body(CharacterId::Shadow).unwrap().enabled);
    assert_eq!(sim.snapshot().active_character, CharacterId::Shadow);
    assert_eq!(*seen.lock().unwrap(), vec![CharacterId::Shadow]);
}

#[test]
fn test_second_press_inside_cooldown_is_dropped() {
    let mut sim = make_sim();
    let seen = record_switches(&mut sim);

    press_switch(&mut sim);
    press_switch(&mut sim);
    assert_eq!(sim.coordinator().switch_count(), 1);
    assert_eq!(sim.coordinator().active(), CharacterId::Shadow);

    // Well past 200ms.
    sim.run(15);
    press_switch(&mut sim);
    assert_eq!(sim.coordinator().switch_count(), 2);
    assert_eq!(sim.coordinator().active(), CharacterId::Main);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![CharacterId::Shadow, CharacterId::Main]
    );
}

#[test]
fn test_switch_accepted_when_cooldown_just_expired() {
    let mut sim = make_sim();
    tick_with(&mut sim, HeldActions::new().with(Action::Switch));
    // 200ms at 60 ticks per second: the 12th tick after the switch is free.
    for _ in 0..11 {
        tick_with(&mut sim, HeldActions::new());
    }
    assert!(sim.coordinator().cooldown().is_active());
    tick_with(&mut sim, HeldActions::new().with(Action::Switch));
    assert_eq!(sim.coordinator().switch_count(), 2);
    assert_eq!(sim.coordinator().active(), CharacterId::Main);
}

#[test]
fn test_held_switch_does_not_retrigger_after_cooldown() {
    let mut sim = make_sim();
    for _ in 0..30 {
        tick_with(&mut sim, HeldActions::new().with(Action::Switch));
    }
    assert_eq!(sim.coordinator().switch_count(), 1);
}

#[test]
fn test_switching_back_reengages_follow_immediately() {
    let mut sim = make_sim();
    press_switch(&mut sim);
    sim.run(15);
    tick_with(&mut sim, HeldActions::new().with(Action::Switch));

    let follow = sim.follow(CharacterId::Shadow).unwrap();
    assert!(follow.is_following());
    assert_eq!(follow.target(), sim.entity(CharacterId::Main));
    assert!(!sim.body(CharacterId::Shadow).unwrap().enabled);
}

#[test]
fn test_exactly_one_active_through_mashing() {
    let mut sim = make_sim();
    assert_single_active(&sim);
    for i in 0..240 {
        let mut held = HeldActions::new();
        if i % 3 == 0 {
            held.set(Action::Switch, true);
        }
        if i % 7 < 4 {
            held.set(Action::Right, true);
        }
        tick_with(&mut sim, held);
        assert_single_active(&sim);
    }
    assert!(sim.coordinator().switch_count() > 1);
}

#[test]
fn test_far_shadow_snaps_next_to_main() {
    let mut sim = make_sim();
    sim.set_position(CharacterId::Main, DVec2::new(500.0, 500.0));
    sim.set_position(CharacterId::Shadow, DVec2::new(720.0, 495.0));
    sim.tick();
    assert_eq!(
        sim.position(CharacterId::Shadow).unwrap(),
        DVec2::new(520.0, 495.0)
    );
}

#[test]
fn test_inactive_main_keeps_its_place_while_shadow_runs() {
    let mut sim = make_sim();
    sim.run(120);
    press_switch(&mut sim);
    let main_before = sim.position(CharacterId::Main).unwrap();
    let shadow_before = sim.position(CharacterId::Shadow).unwrap();

    for _ in 0..60 {
        tick_with(&mut sim, HeldActions::new().with(Action::Right));
    }

    let main_after = sim.position(CharacterId::Main).unwrap();
    let shadow_after = sim.position(CharacterId::Shadow).unwrap();
    assert!((main_after.x - main_before.x).abs() < 1e-9);
    assert!(shadow_after.x > shadow_before.x + 50.0);
    assert!(sim.body(CharacterId::Shadow).unwrap().velocity.x <= 180.0);
}

#[test]
fn test_shadow_cannot_jump_in_air_on_reactivation() {
    let mut sim = make_sim();
    press_switch(&mut sim);
    sim.run(120);
    assert!(sim.character(CharacterId::Shadow).unwrap().is_grounded());

    press_switch(&mut sim);
    assert_eq!(sim.coordinator().active(), CharacterId::Main);
    assert!(!sim.character(CharacterId::Shadow).unwrap().is_grounded());

    // Main jumps and drags the follower up with it.
    tick_with(&mut sim, HeldActions::new().with(Action::Jump));
    for _ in 0..15 {
        tick_with(&mut sim, HeldActions::new());
    }
    tick_with(
        &mut sim,
        HeldActions::new().with(Action::Switch).with(Action::Jump),
    );

    assert_eq!(sim.coordinator().active(), CharacterId::Shadow);
    let shadow = sim.character(CharacterId::Shadow).unwrap();
    assert_ne!(shadow.movement_state(), MovementState::Jumping);
    assert!(sim.body(CharacterId::Shadow).unwrap().velocity.y > -100.0);
}

#[test]
fn test_pause_freezes_switching() {
    let mut sim = make_sim();
    sim.toggle_pause();
    press_switch(&mut sim);
    assert_eq!(sim.coordinator().active(), CharacterId::Main);

    sim.toggle_pause();
    press_switch(&mut sim);
    assert_eq!(sim.coordinator().active(), CharacterId::Shadow);
}
