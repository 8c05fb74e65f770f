//! Circle-circle collision detection and velocity resolution
//!
//! Detection runs on the positions pieces *want* to move to this tick. Any
//! pair that would overlap is frozen in place and has its velocities resolved,
//! so the bounce shows up as movement on the following tick.
//!
//! Only pairs are considered. A piece overlapping two others on the same tick
//! is resolved once per pair, in pair order, and the last pair wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::vector::{distance, project_onto, signed_length_along};

/// How velocities change when two pieces collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// 1-D elastic collision along the line between the two centres
    #[default]
    ElasticExchange,
    /// Each piece hands its velocity component toward the other piece over
    /// to it. Does not conserve momentum when masses differ.
    ComponentTransfer,
}

impl CollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionPolicy::ElasticExchange => "elastic",
            CollisionPolicy::ComponentTransfer => "transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "elastic" | "elastic_exchange" => Some(CollisionPolicy::ElasticExchange),
            "transfer" | "component_transfer" => Some(CollisionPolicy::ComponentTransfer),
            _ => None,
        }
    }
}

/// Where a piece wants to be at the end of this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    pub pos: Vec2,
    /// Whether the piece had a non-zero velocity when the move was proposed
    pub moving: bool,
}

/// Result of resolving one tick's proposed moves
#[derive(Debug, Clone, Default)]
pub struct CollisionOutcome {
    /// Per piece: reject the proposed move this tick
    pub frozen: Vec<bool>,
    /// Index pairs (i < j) that collided, in resolution order
    pub pairs: Vec<(usize, usize)>,
}

impl CollisionOutcome {
    pub fn frozen_count(&self) -> usize {
        self.frozen.iter().filter(|f| **f).count()
    }
}

/// Do two circles overlap? Touching exactly does not count.
#[inline]
pub fn overlaps(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    distance(pos_a, pos_b) < radius_a + radius_b
}

/// Outgoing 1-D velocities for an elastic collision
/// (see https://en.wikipedia.org/wiki/Elastic_collision)
#[inline]
pub fn elastic_1d(u1: f32, u2: f32, m1: f32, m2: f32) -> (f32, f32) {
    let total = m1 + m2;
    let v1 = (m1 - m2) / total * u1 + 2.0 * m2 / total * u2;
    let v2 = 2.0 * m1 / total * u1 + (m2 - m1) / total * u2;
    (v1, v2)
}

/// Elastic exchange along the line from `a`'s centre to `b`'s centre.
///
/// Returns false (velocities untouched) when the centres coincide.
pub fn elastic_exchange(a: &mut Piece, b: &mut Piece) -> bool {
    let d = b.pos - a.pos;
    let (Some(p1), Some(p2), Some(u1), Some(u2)) = (
        project_onto(a.vel, d),
        project_onto(b.vel, d),
        signed_length_along(a.vel, d),
        signed_length_along(b.vel, d),
    ) else {
        return false;
    };

    let (v1, v2) = elastic_1d(u1, u2, a.mass, b.mass);
    // `d` is non-zero here: `project_onto` returned `None` otherwise
    let dir = d.normalize_or_zero();

    a.vel = a.vel - p1 + v1 * dir;
    b.vel = b.vel - p2 + v2 * dir;
    true
}

/// Component transfer: the part of each velocity pointing at the other piece
/// moves to the other piece. Both transfers use pre-collision velocities.
///
/// Returns false (velocities untouched) when the centres coincide.
pub fn component_transfer(a: &mut Piece, b: &mut Piece) -> bool {
    let (Some(a_toward_b), Some(b_toward_a)) =
        (project_onto(a.vel, b.pos - a.pos), project_onto(b.vel, a.pos - b.pos))
    else {
        return false;
    };

    a.vel = a.vel - a_toward_b + b_toward_a;
    b.vel = b.vel - b_toward_a + a_toward_b;
    true
}

/// Check every unordered pair of proposed positions and resolve collisions.
///
/// `proposed` must be index-aligned with `pieces`.
pub fn resolve_collisions(
    pieces: &mut [Piece],
    proposed: &[Proposal],
    policy: CollisionPolicy,
) -> CollisionOutcome {
    debug_assert_eq!(pieces.len(), proposed.len());

    let n = pieces.len().min(proposed.len());
    let mut outcome = CollisionOutcome {
        frozen: vec![false; pieces.len()],
        pairs: Vec::new(),
    };

    for i in 0..n {
        for j in (i + 1)..n {
            // Resting pieces only react under component transfer
            if policy == CollisionPolicy::ComponentTransfer
                && !proposed[i].moving
                && !proposed[j].moving
            {
                continue;
            }

            if !overlaps(
                proposed[i].pos,
                pieces[i].radius,
                proposed[j].pos,
                pieces[j].radius,
            ) {
                continue;
            }

            outcome.frozen[i] = true;
            outcome.frozen[j] = true;
            outcome.pairs.push((i, j));

            let (head, tail) = pieces.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            let resolved = match policy {
                CollisionPolicy::ElasticExchange => elastic_exchange(a, b),
                CollisionPolicy::ComponentTransfer => component_transfer(a, b),
            };
            if resolved {
                log::debug!("Collision between pieces {} and {}", a.id, b.id);
            } else {
                log::debug!(
                    "Pieces {} and {} share a centre, skipping velocity resolution",
                    a.id,
                    b.id
                );
            }
        }
    }

    outcome
}
