//! Presentation-side projection of simulation state
//!
//! Strictly one-way: everything here reads the session and nothing here
//! feeds back into physics, contacts or scoring.

pub mod frame;
pub mod path;
pub mod shapes;
pub mod trail;
pub mod vertex;

pub use frame::RenderFrame;
pub use path::{PathCommand, flatten, rope_path};
pub use trail::{Trail, TrailDot};
pub use vertex::Vertex;
