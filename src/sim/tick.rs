//! Fixed timestep simulation tick
//!
//! One call advances every piece by exactly `dt`:
//! 1. Moving pieces propose `pos + vel * dt` and lose speed to friction.
//! 2. Proposed positions are checked pairwise; colliding pairs are frozen and
//!    their velocities resolved.
//! 3. Pieces that were not frozen commit their proposed position.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionPolicy, Proposal, resolve_collisions};
use super::friction::Friction;
use super::vector;
use super::world::World;

/// Physics parameters that stay fixed for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub collision_policy: CollisionPolicy,
    pub friction: Friction,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Pieces that committed a new position
    pub moved: usize,
    /// Pieces whose move was rejected
    pub frozen: usize,
    /// Colliding pairs resolved
    pub collisions: usize,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, params: &PhysicsParams, dt: f32) -> TickSummary {
    let proposed: Vec<Proposal> = world
        .pieces
        .iter_mut()
        .map(|piece| {
            if !piece.is_moving() {
                // Resting pieces neither move nor feel friction
                return Proposal {
                    pos: piece.pos,
                    moving: false,
                };
            }
            let pos = vector::add(piece.pos, vector::scale(dt, piece.vel));
            piece.vel = params.friction.apply(piece.vel, dt);
            Proposal { pos, moving: true }
        })
        .collect();

    let outcome = resolve_collisions(&mut world.pieces, &proposed, params.collision_policy);

    let mut summary = TickSummary {
        collisions: outcome.pairs.len(),
        ..Default::default()
    };
    for ((piece, proposal), frozen) in world
        .pieces
        .iter_mut()
        .zip(&proposed)
        .zip(&outcome.frozen)
    {
        if *frozen {
            summary.frozen += 1;
        } else if proposal.moving {
            piece.pos = proposal.pos;
            summary.moved += 1;
        }
    }

    world.time_ticks += 1;
    summary
}
