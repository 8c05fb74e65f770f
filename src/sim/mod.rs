//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by position in `World::pieces`)
//! - No rendering, clock or platform dependencies

pub mod collision;
pub mod drag;
pub mod friction;
pub mod piece;
pub mod scheduler;
pub mod tick;
pub mod vector;
pub mod world;

pub use collision::{CollisionOutcome, CollisionPolicy, Proposal, overlaps, resolve_collisions};
pub use drag::{DragController, DragState};
pub use friction::{CourseSample, Friction, FrictionModel, friction_course};
pub use piece::{Piece, PieceKind};
pub use scheduler::Scheduler;
pub use tick::{PhysicsParams, TickSummary, tick};
pub use world::World;
