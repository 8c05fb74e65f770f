//! The simulation world: an ordered, fixed population of pieces

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceKind};
use crate::consts::*;

/// All simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Pieces in stable iteration order
    pub pieces: Vec<Piece>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Empty world
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// The starting position: a light pawn in the middle of the board and a
    /// heavier dark pawn one square to its right.
    pub fn standard() -> Self {
        let mut world = Self::new();
        let centre = Vec2::splat(WORLD_WIDTH / 2.0);
        world.spawn(PieceKind::LightPawn, centre, SQUARE_WIDTH / 4.0, 1.0);
        world.spawn(
            PieceKind::DarkPawn,
            centre + Vec2::new(SQUARE_WIDTH, 0.0),
            SQUARE_WIDTH / 5.0,
            3.0,
        );
        world
    }

    /// Place up to `count` pawns on distinct board squares.
    ///
    /// Squares are `SQUARE_WIDTH` apart and radii never exceed a quarter of
    /// a square, so the layout starts with no overlaps.
    pub fn scattered(seed: u64, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut squares: Vec<(u32, u32)> = (0..BOARD_SQUARES)
            .flat_map(|row| (0..BOARD_SQUARES).map(move |col| (col, row)))
            .collect();
        squares.shuffle(&mut rng);

        let mut world = Self::new();
        for (i, (col, row)) in squares.into_iter().take(count).enumerate() {
            let pos = square_centre(col, row);
            let radius = rng.random_range(SQUARE_WIDTH / 5.0..=SQUARE_WIDTH / 4.0);
            let (kind, mass) = if i % 2 == 0 {
                (PieceKind::LightPawn, 1.0)
            } else {
                (PieceKind::DarkPawn, 3.0)
            };
            world.spawn(kind, pos, radius, mass);
        }
        log::debug!("Scattered {} pieces (seed {})", world.pieces.len(), seed);
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a resting piece, returning its ID
    pub fn spawn(&mut self, kind: PieceKind, pos: Vec2, radius: f32, mass: f32) -> u32 {
        let id = self.next_entity_id();
        self.pieces.push(Piece::new(id, kind, pos, radius, mass));
        id
    }

    pub fn piece(&self, id: u32) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn piece_mut(&mut self, id: u32) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    /// First piece (in iteration order) containing `point`
    pub fn piece_at(&self, point: Vec2) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.contains(point))
    }

    /// True once every piece has exactly zero velocity
    pub fn is_at_rest(&self) -> bool {
        self.pieces.iter().all(|p| !p.is_moving())
    }
}

/// World-space centre of board square (`col`, `row`), (0, 0) being bottom left
pub fn square_centre(col: u32, row: u32) -> Vec2 {
    Vec2::new(
        BOARD_OFFSET + (col as f32 + 0.5) * SQUARE_WIDTH,
        BOARD_OFFSET + (row as f32 + 0.5) * SQUARE_WIDTH,
    )
}
