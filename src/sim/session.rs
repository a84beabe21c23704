//! One round of play
//!
//! `GameSession` is the single writer of the world. Per step it runs, in
//! order: physics integration, tether solve, contact resolution, expiry and
//! scoring, spawners, cosmetics. Bodies created by the spawners are therefore
//! first checked for contact on the following step.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{ContactEvent, classify, detect_contacts};
use super::spawner::{PowerUpSpawner, ThreatSpawner, Warning};
use super::state::{BodyCategory, BodyId, GameEvent, PowerUpKind, RoundStatus, ShieldState, World};
use super::tick::StepClock;
use crate::appearance::AppearanceConfig;
use crate::consts::MAX_STEP_DT;
use crate::render::trail::Trail;
use crate::tuning::Tuning;
use crate::{direction_from_angle, heading_angle};

type GameOverHandler = Box<dyn FnMut(u64)>;

pub struct GameSession {
    seed: u64,
    tuning: Tuning,
    appearance: AppearanceConfig,
    /// Set once a config has been supplied, by `apply_appearance` or `start`
    appearance_locked: bool,
    status: RoundStatus,
    score: u64,
    shield: ShieldState,
    world: World,
    threats: ThreatSpawner,
    pickups: PowerUpSpawner,
    trail: Trail,
    rng: Pcg32,
    clock: StepClock,
    /// Seconds of simulated play
    elapsed: f32,
    time_ticks: u64,
    events: Vec<GameEvent>,
    on_game_over: Option<GameOverHandler>,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("seed", &self.seed)
            .field("status", &self.status)
            .field("score", &self.score)
            .field("shielded", &self.shield.active)
            .field("elapsed", &self.elapsed)
            .field("projectiles", &self.world.projectiles.len())
            .field("power_ups", &self.world.power_ups.len())
            .finish()
    }
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            world: World::new(&tuning),
            tuning,
            appearance: AppearanceConfig::default(),
            appearance_locked: false,
            status: RoundStatus::Ready,
            score: 0,
            shield: ShieldState::default(),
            threats: ThreatSpawner::default(),
            pickups: PowerUpSpawner::default(),
            trail: Trail::default(),
            rng: Pcg32::seed_from_u64(seed),
            clock: StepClock::default(),
            elapsed: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            on_game_over: None,
        }
    }

    // === Lifecycle ===

    /// Set the round's look. Honoured once, before `start`.
    pub fn apply_appearance(&mut self, config: AppearanceConfig) {
        if self.status != RoundStatus::Ready {
            log::warn!("Appearance change ignored: round already started");
            return;
        }
        if self.appearance_locked {
            log::warn!("Appearance change ignored: already applied");
            return;
        }
        self.appearance = config;
        self.appearance_locked = true;
    }

    /// Register the callback invoked once with the final score
    pub fn set_game_over_handler(&mut self, handler: impl FnMut(u64) + 'static) {
        self.on_game_over = Some(Box::new(handler));
    }

    /// Begin the round: balloon at center, fresh tether, score 0, spawners on.
    /// `appearance` is used unless `apply_appearance` already supplied one;
    /// `None` keeps the applied (or default) look.
    pub fn start(&mut self, appearance: Option<AppearanceConfig>) {
        if self.status != RoundStatus::Ready {
            log::warn!("start() ignored: session is {:?}", self.status);
            return;
        }

        match appearance {
            Some(config) if !self.appearance_locked => self.appearance = config,
            Some(_) => log::warn!("Appearance passed to start() ignored: already applied"),
            None => {}
        }
        self.appearance_locked = true;
        self.world = World::new(&self.tuning);
        self.score = 0;
        self.shield = ShieldState::default();
        self.threats = ThreatSpawner::default();
        self.pickups = PowerUpSpawner::default();
        self.trail = Trail::default();
        self.clock = StepClock::default();
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.status = RoundStatus::Running;
        self.events.push(GameEvent::RoundStarted);

        log::info!("Round started (seed {})", self.seed);
    }

    // === Input ===

    /// Push the balloon away from a touch that lands on it. The velocity is
    /// replaced, not added to. Returns whether the touch hit.
    pub fn on_pointer_impulse(&mut self, point: Vec2) -> bool {
        if self.status != RoundStatus::Running {
            return false;
        }

        let player = &mut self.world.player;
        let reach = player.radius + self.tuning.touch_slop;
        if point.distance_squared(player.pos) > reach * reach {
            return false;
        }

        let angle = heading_angle(player.pos - point);
        player.vel = direction_from_angle(angle) * self.tuning.impulse_speed;
        true
    }

    // === Simulation ===

    /// Run as many fixed steps as `frame_dt` of real time covers
    pub fn update(&mut self, frame_dt: f32) {
        let substeps = self.clock.advance(frame_dt);
        let dt = self.clock.step();
        for _ in 0..substeps {
            self.step(dt);
        }
    }

    /// Advance the round by one tick. Does nothing unless running.
    pub fn step(&mut self, dt: f32) {
        if self.status != RoundStatus::Running {
            return;
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_STEP_DT) } else { 0.0 };

        self.time_ticks += 1;
        self.elapsed += dt;

        // Free-body integration
        self.world
            .integrate_player(dt, self.tuning.player_damping, self.tuning.boundary_restitution);
        for projectile in &mut self.world.projectiles {
            projectile.advance(dt);
        }
        for power_up in &mut self.world.power_ups {
            power_up.advance(dt);
        }
        self.world.tether.integrate(dt);

        // Constraints
        let anchor = self.world.player.attach_point();
        self.world.tether.solve(anchor, dt);

        // Contacts among bodies that existed at the start of the step
        for contact in detect_contacts(&self.world) {
            self.on_contact(contact.a, contact.b);
            if self.status == RoundStatus::Over {
                return;
            }
        }

        // Expiry and scoring
        self.expire_projectiles();
        self.expire_power_ups();
        self.shield.advance(dt);

        // Emitters
        let now = self.elapsed;
        self.threats
            .advance(dt, now, &mut self.world, &mut self.rng, &self.tuning, &mut self.events);
        self.pickups
            .advance(dt, now, &mut self.world, &mut self.rng, &self.tuning, &mut self.events);

        // Cosmetics
        self.trail
            .advance(dt, self.world.player.pos, self.appearance.trail_enabled);
    }

    /// Resolve a contact between two bodies. Pairs that are not meaningful,
    /// or that name bodies which no longer exist, are ignored.
    pub fn on_contact(&mut self, a: BodyId, b: BodyId) {
        if self.status != RoundStatus::Running {
            return;
        }
        let (Some(cat_a), Some(cat_b)) = (self.world.category_of(a), self.world.category_of(b)) else {
            return;
        };
        let other = |wanted: BodyCategory| if cat_a == wanted { a } else { b };

        match classify(cat_a, cat_b) {
            ContactEvent::PlayerHitPowerUp => {
                let id = other(BodyCategory::PowerUp);
                let Some(kind) = self.world.power_up(id).map(|p| p.kind) else {
                    return;
                };
                self.world.remove(id);
                self.events.push(GameEvent::PowerUpConsumed { id, kind });

                match kind {
                    PowerUpKind::Shield => {
                        if self.shield.activate() {
                            log::debug!("Shield up");
                            self.events.push(GameEvent::ShieldActivated);
                        }
                    }
                    PowerUpKind::SlowMo => {
                        log::debug!("SlowMo picked up (no effect)");
                    }
                }
            }
            ContactEvent::PlayerHitProjectile => {
                let id = other(BodyCategory::Projectile);
                if self.shield.absorb() {
                    self.world.remove(id);
                    self.score += 1;
                    log::debug!("Shield absorbed arrow {:?}, score {}", id, self.score);
                    self.events.push(GameEvent::ShieldAbsorbed { projectile: id });
                } else {
                    self.end_round();
                }
            }
            ContactEvent::NoOp => {}
        }
    }

    /// The single cancellation point: stops spawners, physics and input
    fn end_round(&mut self) {
        self.status = RoundStatus::Over;
        log::info!("Round over with score {} after {:.1}s", self.score, self.elapsed);
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
        });
        if let Some(handler) = self.on_game_over.as_mut() {
            handler(self.score);
        }
    }

    /// Arrows past their TTL leave play and count as dodged
    fn expire_projectiles(&mut self) {
        let events = &mut self.events;
        let mut survived = 0;
        self.world.projectiles.retain(|p| {
            if p.expired() {
                events.push(GameEvent::ProjectileSurvived { id: p.body.id });
                survived += 1;
                false
            } else {
                true
            }
        });
        self.score += survived;
    }

    fn expire_power_ups(&mut self) {
        let events = &mut self.events;
        self.world.power_ups.retain(|p| {
            if p.expired() {
                events.push(GameEvent::PowerUpExpired { id: p.body.id });
                false
            } else {
                true
            }
        });
    }

    // === Scripted spawns ===

    /// Fire an arrow from `from` at the balloon's current position
    pub fn spawn_projectile(&mut self, from: Vec2) -> BodyId {
        let target = self.world.player.pos;
        let id = self
            .world
            .spawn_projectile(from, target, self.elapsed, self.tuning.arrow_speed, self.tuning.arrow_ttl);
        self.events.push(GameEvent::ProjectileFired { id, from });
        id
    }

    /// Place a pickup at `at`
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, at: Vec2) -> BodyId {
        let id = self
            .world
            .spawn_power_up(kind, at, self.elapsed, self.tuning.power_up_timeout);
        self.events.push(GameEvent::PowerUpSpawned { id, kind });
        id
    }

    // === Accessors ===

    /// Take everything that happened since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_shielded(&self) -> bool {
        self.shield.active
    }

    pub fn shield(&self) -> &ShieldState {
        &self.shield
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn warnings(&self) -> &[Warning] {
        self.threats.warnings()
    }

    pub fn appearance(&self) -> &AppearanceConfig {
        &self.appearance
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Fraction of a fixed step banked by `update`, for render interpolation
    pub fn interpolation_alpha(&self) -> f32 {
        self.clock.alpha()
    }
}
