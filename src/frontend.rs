//! Raylib window frontend.
//!
//! Samples the keyboard through the configured [`KeyBindings`], steps the
//! [`Simulation`] at its fixed tick rate and draws the level with both
//! characters as flat rectangles. The active/inactive label is driven by a
//! [`GameStateStore`](crate::resources::gamestate::GameStateStore)
//! subscription rather than by reading the coordinator directly.
//!
//! Only built with the `window` feature.

use std::sync::{Arc, Mutex};

use log::{info, warn};
use raylib::ffi::KeyboardKey;
use raylib::prelude::*;
use smallvec::SmallVec;

use crate::components::boxcollider::BoxCollider;
use crate::components::character::CharacterId;
use crate::game::Simulation;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameSnapshot, PlayState};
use crate::resources::input::{Action, HeldActions, KeyBindings};
use crate::resources::level::{LevelLayout, PlatformKind};

/// Upper bound on catch-up ticks after a stalled frame.
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Map a binding name (`"A"`, `"SPACE"`, `"LEFT"`, ...) to a raylib key.
pub fn key_from_name(name: &str) -> Option<KeyboardKey> {
    use KeyboardKey::*;
    let key = match name {
        "A" => KEY_A,
        "B" => KEY_B,
        "C" => KEY_C,
        "D" => KEY_D,
        "E" => KEY_E,
        "F" => KEY_F,
        "G" => KEY_G,
        "H" => KEY_H,
        "I" => KEY_I,
        "J" => KEY_J,
        "K" => KEY_K,
        "L" => KEY_L,
        "M" => KEY_M,
        "N" => KEY_N,
        "O" => KEY_O,
        "P" => KEY_P,
        "Q" => KEY_Q,
        "R" => KEY_R,
        "S" => KEY_S,
        "T" => KEY_T,
        "U" => KEY_U,
        "V" => KEY_V,
        "W" => KEY_W,
        "X" => KEY_X,
        "Y" => KEY_Y,
        "Z" => KEY_Z,
        "LEFT" => KEY_LEFT,
        "RIGHT" => KEY_RIGHT,
        "UP" => KEY_UP,
        "DOWN" => KEY_DOWN,
        "SPACE" => KEY_SPACE,
        "ENTER" => KEY_ENTER,
        "TAB" => KEY_TAB,
        "LEFT_SHIFT" => KEY_LEFT_SHIFT,
        "RIGHT_SHIFT" => KEY_RIGHT_SHIFT,
        "LEFT_CONTROL" => KEY_LEFT_CONTROL,
        "RIGHT_CONTROL" => KEY_RIGHT_CONTROL,
        _ => return None,
    };
    Some(key)
}

/// Keyboard resolved from [`KeyBindings`] once at startup.
struct Keyboard {
    keys: Vec<(Action, SmallVec<[KeyboardKey; 2]>)>,
}

impl Keyboard {
    fn new(bindings: &KeyBindings) -> Self {
        let keys = Action::ALL
            .into_iter()
            .map(|action| {
                let resolved: SmallVec<[KeyboardKey; 2]> = bindings
                    .keys(action)
                    .iter()
                    .filter_map(|name| {
                        let key = key_from_name(name);
                        if key.is_none() {
                            warn!("Unknown key {:?} bound to {}; ignoring", name, action.name());
                        }
                        key
                    })
                    .collect();
                (action, resolved)
            })
            .collect();
        Self { keys }
    }

    fn sample(&self, rl: &RaylibHandle) -> HeldActions {
        let mut held = HeldActions::new();
        for (action, keys) in &self.keys {
            held.set(*action, keys.iter().any(|k| rl.is_key_down(*k)));
        }
        held
    }
}

fn body_color(id: CharacterId, active: bool) -> Color {
    let alpha = if active { 255 } else { 110 };
    match id {
        CharacterId::Main => Color::new(0x4c, 0xaf, 0x50, alpha),
        CharacterId::Shadow => Color::new(0x8e, 0x44, 0xad, alpha),
    }
}

fn platform_color(kind: PlatformKind) -> Color {
    match kind {
        PlatformKind::Ground => Color::new(0x3e, 0x2c, 0x23, 255),
        PlatformKind::Float => Color::new(0x6d, 0x4c, 0x41, 255),
    }
}

/// Camera centred on the active character, kept inside the level.
fn follow_camera(
    sim: &Simulation,
    level: &LevelLayout,
    screen_w: f32,
    screen_h: f32,
) -> Camera2D {
    let active = sim.coordinator().active();
    let pos = sim.position(active).unwrap_or(level.main_spawn);
    let half_w = f64::from(screen_w) / 2.0;
    let half_h = f64::from(screen_h) / 2.0;
    Camera2D {
        target: Vector2 {
            x: pos.x.max(half_w).min(level.bounds.x - half_w) as f32,
            y: pos.y.max(half_h).min(level.bounds.y - half_h) as f32,
        },
        offset: Vector2 {
            x: screen_w / 2.0,
            y: screen_h / 2.0,
        },
        rotation: 0.0,
        zoom: 1.0,
    }
}

fn draw(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    sim: &Simulation,
    level: &LevelLayout,
    shown: &GameSnapshot,
) {
    let screen_w = rl.get_screen_width();
    let screen_h = rl.get_screen_height();
    let camera = follow_camera(sim, level, screen_w as f32, screen_h as f32);

    let mut d = rl.begin_drawing(thread);
    d.clear_background(Color::new(0x1a, 0x1a, 0x2e, 255));
    {
        let mut d2 = d.begin_mode2D(camera);
        for p in &level.platforms {
            d2.draw_rectangle(
                p.x as i32,
                p.y as i32,
                p.width as i32,
                p.height as i32,
                platform_color(p.kind),
            );
        }
        // Shadow first so Main is drawn on top when they overlap.
        for id in [CharacterId::Shadow, CharacterId::Main] {
            let Some(pos) = sim.position(id) else {
                continue;
            };
            let active = sim.character(id).is_some_and(|c| c.is_active());
            let (min, max) = BoxCollider::character().aabb(pos);
            d2.draw_rectangle(
                min.x as i32,
                min.y as i32,
                (max.x - min.x) as i32,
                (max.y - min.y) as i32,
                body_color(id, active),
            );
        }
    }

    for (i, id) in [CharacterId::Main, CharacterId::Shadow].into_iter().enumerate() {
        let selected = shown.active_character == id;
        let color = if selected {
            Color::WHITE
        } else {
            Color::DARKGRAY
        };
        let label = id.name().to_uppercase();
        d.draw_text(&label, 20 + 140 * i as i32, 20, 24, color);
    }
    d.draw_text(
        "WASD/arrows move, SPACE jump, F switch, P pause",
        20,
        56,
        16,
        Color::LIGHTGRAY,
    );
    if shown.play_state == PlayState::Paused {
        d.draw_text("PAUSED", screen_w / 2 - 60, screen_h / 2 - 20, 40, Color::WHITE);
    }
    d.draw_text(&sim.debug_line(), 20, screen_h - 30, 16, Color::LIGHTGRAY);
}

/// Open a window and run until it is closed.
pub fn run(config: GameConfig) {
    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .title("Shadow Swap")
        .build();
    rl.set_target_fps(config.target_fps);

    let keyboard = Keyboard::new(&config.bindings);
    let tick = config.tick_seconds();
    let level = LevelLayout::reference();
    let mut sim = Simulation::new(config, level.clone(), HeldActions::new());

    let shown = Arc::new(Mutex::new(sim.snapshot()));
    {
        let shown = Arc::clone(&shown);
        sim.subscribe(move |snapshot| {
            if let Ok(mut current) = shown.lock() {
                *current = *snapshot;
            }
        });
    }

    let mut accumulator = 0.0_f64;
    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_P) {
            sim.toggle_pause();
        }
        sim.set_input(keyboard.sample(&rl));

        accumulator += f64::from(rl.get_frame_time());
        accumulator = accumulator.min(tick * f64::from(MAX_TICKS_PER_FRAME));
        while accumulator >= tick {
            sim.tick();
            accumulator -= tick;
        }

        let snapshot = shown.lock().map(|s| *s).unwrap_or_default();
        draw(&mut rl, &thread, &sim, &level, &snapshot);
    }
    info!("Window closed after {} ticks", sim.frame());
}
