//! Pieces: the circular bodies that slide around the board

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector;

/// Which side a piece belongs to. Only used for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    LightPawn,
    DarkPawn,
}

impl PieceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::LightPawn => "light pawn",
            PieceKind::DarkPawn => "dark pawn",
        }
    }
}

/// A moving circular body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub id: u32,
    pub kind: PieceKind,
    /// Centre in world units (y up)
    pub pos: Vec2,
    /// World units per second
    pub vel: Vec2,
    /// Collision radius, always > 0
    pub radius: f32,
    /// Always > 0
    pub mass: f32,
}

impl Piece {
    pub fn new(id: u32, kind: PieceKind, pos: Vec2, radius: f32, mass: f32) -> Self {
        debug_assert!(radius > 0.0, "piece radius must be positive");
        debug_assert!(mass > 0.0, "piece mass must be positive");
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
        }
    }

    /// True unless the velocity is exactly zero
    #[inline]
    pub fn is_moving(&self) -> bool {
        !vector::is_zero(self.vel)
    }

    /// Hit test: is `point` strictly inside this piece?
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        vector::distance(self.pos, point) < self.radius
    }

    /// Add an instantaneous velocity change
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel = vector::add(self.vel, impulse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_strict() {
        let piece = Piece::new(1, PieceKind::LightPawn, Vec2::new(10.0, 10.0), 5.0, 1.0);
        assert!(piece.contains(Vec2::new(10.0, 10.0)));
        assert!(piece.contains(Vec2::new(14.9, 10.0)));
        assert!(!piece.contains(Vec2::new(15.0, 10.0)));
    }

    #[test]
    fn test_impulses_compose() {
        let mut piece = Piece::new(1, PieceKind::DarkPawn, Vec2::ZERO, 5.0, 1.0);
        assert!(!piece.is_moving());
        piece.apply_impulse(Vec2::new(3.0, 0.0));
        piece.apply_impulse(Vec2::new(0.0, -2.0));
        assert_eq!(piece.vel, Vec2::new(3.0, -2.0));
        assert!(piece.is_moving());
    }
}
