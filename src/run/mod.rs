// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

//! Runtime
//!
//! The per-tick side of the engine: live shots, the scheduler which steps them, the gateway
//! which creates them and the collaborators they talk to.

mod config;
mod engine;
mod gateway;
mod handle;
mod library;
mod patterns;
mod physics;
mod registry;
mod shot;
mod step;
pub mod util;
mod world;

#[cfg(test)]
mod testing;

pub use self::config::EngineConfig;
pub use self::engine::{ShotEngine, TickSummary};
pub use self::gateway::{Gateway, SpawnError};
pub use self::handle::{Arena, Handle};
pub use self::library::StepLibrary;
pub use self::patterns::{
    Accelerate, Aimed, Anchor, Angled, Burst, Cascade, Curve, Fan, Flower, Fractal, Homing,
    Launch, Laser, LaserBurst, LaserHeading, Orbit, Rain, Ramp, Scatter, Segment, Spiral, Stream,
    Sway, Volley, Wobble, Zigzag,
};
pub use self::physics::{Body, BodyDesc, BodyId, CollisionList, Physics, SimplePhysics};
pub use self::registry::{Registry, SpawnQueue};
pub use self::shot::{Shot, ShotId, Signal};
pub use self::step::{Step, StepContext};
pub use self::world::{resolve_owner, EmptyWorld, OwnerRef, World};
