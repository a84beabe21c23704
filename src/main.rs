//! Balloon Dodge headless driver
//!
//! Runs one seeded round with a simple autopilot at a fixed frame rate and
//! prints the last render frame as JSON. Useful for replaying seeds.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::Cell;
    use std::rc::Rc;

    use balloon_dodge::AppearanceConfig;
    use balloon_dodge::consts::SIM_DT;
    use balloon_dodge::render::RenderFrame;
    use balloon_dodge::sim::{GameEvent, GameSession, RoundStatus};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    log::info!("Balloon Dodge (headless) starting with seed {}", seed);

    let mut session = GameSession::new(seed);
    let final_score = Rc::new(Cell::new(None));
    let sink = Rc::clone(&final_score);
    session.set_game_over_handler(move |score| sink.set(Some(score)));
    session.start(Some(AppearanceConfig {
        trail_enabled: true,
        ..Default::default()
    }));

    const FRAME_DT: f32 = SIM_DT;
    const MAX_SECONDS: f32 = 120.0;
    const TAP_COOLDOWN: f32 = 0.3;

    let mut since_tap = TAP_COOLDOWN;
    let mut clock = 0.0;
    while session.status() == RoundStatus::Running && clock < MAX_SECONDS {
        since_tap += FRAME_DT;
        if since_tap >= TAP_COOLDOWN {
            if let Some(tap) = autopilot_tap(&session) {
                if session.on_pointer_impulse(tap) {
                    since_tap = 0.0;
                }
            }
        }

        session.update(FRAME_DT);
        clock += FRAME_DT;

        for event in session.drain_events() {
            match event {
                GameEvent::GameOver { final_score } => log::info!("Game over, score {}", final_score),
                other => log::debug!("{:?}", other),
            }
        }
    }

    match final_score.get() {
        Some(score) => println!("Final score: {}", score),
        None => println!("Survived {:.0} s with score {}", clock, session.score()),
    }

    match serde_json::to_string_pretty(&RenderFrame::capture(&session)) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize frame: {}", e),
    }
}

/// Tap beside the balloon so it drifts out of the closest incoming arrow's
/// line, leaning toward the middle of the screen.
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_tap(session: &balloon_dodge::sim::GameSession) -> Option<glam::Vec2> {
    const DANGER_RANGE: f32 = 220.0;
    const TAP_OFFSET: f32 = 20.0;

    let world = session.world();
    let player = world.player.pos;

    let threat = world
        .projectiles
        .iter()
        .filter(|p| {
            let to_player = player - p.body.pos;
            to_player.length() < DANGER_RANGE && p.body.vel.dot(to_player) > 0.0
        })
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(player)
                .total_cmp(&b.body.pos.distance_squared(player))
        })?;

    let heading = threat.body.vel.normalize_or_zero();
    let mut away = heading.perp();
    if away.dot(world.center() - player) < 0.0 {
        away = -away;
    }
    // The impulse pushes away from the tap point
    Some(player - away * TAP_OFFSET)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host page drives GameSession directly
}
