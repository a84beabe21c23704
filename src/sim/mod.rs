//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies beyond reading cosmetics config

pub mod collision;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tether;
pub mod tick;

pub use collision::{Contact, ContactEvent, classify, detect_contacts};
pub use session::GameSession;
pub use spawner::{Edge, PowerUpSpawner, ThreatSpawner, Warning};
pub use state::{
    Body, BodyCategory, BodyId, GameEvent, PowerUp, PowerUpKind, Projectile, RoundStatus,
    ShieldState, World,
};
pub use tether::{Tether, TetherLink};
pub use tick::StepClock;
