//! Sliding friction
//!
//! Mass is not taken into account: every piece slows down at the same rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector;

/// How friction removes velocity each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionModel {
    /// `v -= v * dt * (1 - c)`; decay rate scales with the tick length
    #[default]
    ContinuousDecay,
    /// `v *= c` once per tick, whatever the tick length
    DiscretePerTick,
}

impl FrictionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrictionModel::ContinuousDecay => "continuous",
            FrictionModel::DiscretePerTick => "discrete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "continuous" | "continuous_decay" => Some(FrictionModel::ContinuousDecay),
            "discrete" | "discrete_per_tick" => Some(FrictionModel::DiscretePerTick),
            _ => None,
        }
    }
}

/// Friction parameters for one simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Friction {
    pub model: FrictionModel,
    /// 0 = stop dead, 1 = frictionless
    pub coefficient: f32,
    /// Speeds below this snap to exactly zero
    pub velocity_floor: f32,
}

impl Friction {
    /// Velocity after one tick of friction
    pub fn apply(&self, vel: Vec2, dt: f32) -> Vec2 {
        let slowed = match self.model {
            FrictionModel::ContinuousDecay => {
                vector::sub(vel, vector::scale(dt * (1.0 - self.coefficient), vel))
            }
            FrictionModel::DiscretePerTick => vector::scale(self.coefficient, vel),
        };

        if vector::length(slowed) < self.velocity_floor {
            Vec2::ZERO
        } else {
            slowed
        }
    }
}

/// One row of a friction course: where a single sliding piece is after `tick`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourseSample {
    pub tick: u32,
    pub distance: f32,
    pub speed: f32,
}

/// Distance travelled by a lone piece launched at `v0`, one sample per tick.
///
/// Used to tune the friction coefficient against launch speeds.
pub fn friction_course(friction: &Friction, v0: f32, dt: f32, ticks: u32) -> Vec<CourseSample> {
    let mut vel = Vec2::new(v0, 0.0);
    let mut distance = 0.0;
    let mut samples = Vec::with_capacity(ticks as usize);

    for tick in 1..=ticks {
        distance += dt * vel.length();
        vel = friction.apply(vel, dt);
        samples.push(CourseSample {
            tick,
            distance,
            speed: vel.length(),
        });
    }

    samples
}
