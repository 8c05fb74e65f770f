//! Geometry for one frame, in pixel space (y down)
//!
//! Everything is emitted as plain triangle lists so a single pipeline can draw
//! the whole frame.

use glam::{IVec2, Vec2};
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use super::viewport::Viewport;
use crate::consts::*;
use crate::session::Frame;
use crate::sim::{PieceKind, vector};

/// Segments used to approximate a circle
const CIRCLE_SEGMENTS: usize = 32;
/// Piece outline thickness in pixels
const OUTLINE_PX: f32 = 1.5;

/// Two triangles covering a pixel rectangle
pub fn rect(top_left: IVec2, width: i32, height: i32, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0) = (top_left.x as f32, top_left.y as f32);
    let (x1, y1) = (x0 + width as f32, y0 + height as f32);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
        Vertex::new(x0, y1, color),
    ]
}

/// Filled circle as a triangle fan, vertices snapped to whole pixels
pub fn disc(center: Vec2, radius: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let point = |i: usize| {
        let theta = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
        vector::round(center + radius * Vec2::new(theta.cos(), theta.sin()))
    };
    for i in 0..CIRCLE_SEGMENTS {
        let (a, b) = (point(i), point(i + 1));
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

/// Circle outline as a band between `radius - thickness` and `radius`
pub fn ring(center: Vec2, radius: f32, thickness: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let inner = (radius - thickness).max(0.0);
    let point = |i: usize, r: f32| {
        let theta = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
        center + r * Vec2::new(theta.cos(), theta.sin())
    };
    for i in 0..CIRCLE_SEGMENTS {
        let (o1, o2) = (point(i, radius), point(i + 1, radius));
        let (i1, i2) = (point(i, inner), point(i + 1, inner));
        out.push(Vertex::new(o1.x, o1.y, color));
        out.push(Vertex::new(o2.x, o2.y, color));
        out.push(Vertex::new(i1.x, i1.y, color));
        out.push(Vertex::new(o2.x, o2.y, color));
        out.push(Vertex::new(i2.x, i2.y, color));
        out.push(Vertex::new(i1.x, i1.y, color));
    }
}

/// Thin quad from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let (a1, a2, b1, b2) = (a + perp, a - perp, b + perp, b - perp);
    out.extend_from_slice(&[
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]);
}

/// The 8x8 board. The bottom-left square is dark.
pub fn board(viewport: &Viewport, out: &mut Vec<Vertex>) {
    let side = viewport.to_pixels(SQUARE_WIDTH);
    for row in 0..BOARD_SQUARES {
        for col in 0..BOARD_SQUARES {
            let color = if (row + col) % 2 == 0 {
                colors::DARK_SQUARE
            } else {
                colors::LIGHT_SQUARE
            };
            // Top-left corner of the square in world space
            let corner = Vec2::new(
                BOARD_OFFSET + col as f32 * SQUARE_WIDTH,
                BOARD_OFFSET + (row + 1) as f32 * SQUARE_WIDTH,
            );
            out.extend_from_slice(&rect(viewport.world_to_pixel(corner), side, side, color));
        }
    }
}

fn piece_colors(kind: PieceKind) -> ([f32; 4], [f32; 4]) {
    match kind {
        PieceKind::LightPawn => (colors::LIGHT_PIECE, colors::DEBUG_LIGHT),
        PieceKind::DarkPawn => (colors::DARK_PIECE, colors::DEBUG_DARK),
    }
}

/// All geometry for one frame: background, board, pieces, drag line
pub fn frame_vertices(frame: &Frame<'_>, viewport: &Viewport) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(
        6 + 6 * (BOARD_SQUARES * BOARD_SQUARES) as usize
            + frame.pieces.len() * CIRCLE_SEGMENTS * 15,
    );

    let size = viewport.size_px as i32;
    out.extend_from_slice(&rect(IVec2::ZERO, size, size, colors::BACKGROUND));
    board(viewport, &mut out);

    for piece in frame.pieces {
        let center = viewport.world_to_pixel(piece.pos).as_vec2();
        let radius = viewport.to_pixels(piece.radius) as f32;
        let (fill, debug) = piece_colors(piece.kind);
        disc(center, radius, fill, &mut out);
        ring(center, radius, OUTLINE_PX, colors::PIECE_OUTLINE, &mut out);
        if frame.debug_collision_circles {
            ring(center, radius, OUTLINE_PX * 2.0, debug, &mut out);
        }
    }

    if let Some(drag) = frame.drag {
        if let Some(piece) = frame.pieces.iter().find(|p| p.id == drag.target) {
            let from = viewport.world_to_pixel(drag.press).as_vec2();
            let to = viewport.world_to_pixel(piece.pos).as_vec2();
            line(from, to, 2.0, colors::DRAG_LINE, &mut out);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DragState, World};

    fn frame<'a>(world: &'a World, drag: Option<&'a DragState>, debug: bool) -> Frame<'a> {
        Frame {
            pieces: &world.pieces,
            world_width: WORLD_WIDTH,
            drag,
            time_ticks: world.time_ticks,
            debug_collision_circles: debug,
        }
    }

    #[test]
    fn test_board_squares_alternate() {
        let viewport = Viewport::new(1000, WORLD_WIDTH);
        let mut out = Vec::new();
        board(&viewport, &mut out);
        assert_eq!(out.len(), 64 * 6);

        // First square is the bottom-left one: dark, spanning x 100..200,
        // rows 799..899 (y flipped)
        assert_eq!(out[0].color, colors::DARK_SQUARE);
        assert_eq!(out[0].position, [100.0, 799.0]);
        assert_eq!(out[4].position, [200.0, 899.0]);
        // Its right-hand neighbour is light
        assert_eq!(out[6].color, colors::LIGHT_SQUARE);
    }

    #[test]
    fn test_frame_vertex_counts() {
        let world = World::standard();
        let viewport = Viewport::new(800, WORLD_WIDTH);
        let base = 6 + 64 * 6;
        let per_piece = CIRCLE_SEGMENTS * (3 + 6);

        let plain = frame_vertices(&frame(&world, None, false), &viewport);
        assert_eq!(plain.len(), base + 2 * per_piece);

        let debug = frame_vertices(&frame(&world, None, true), &viewport);
        assert_eq!(debug.len(), base + 2 * (per_piece + CIRCLE_SEGMENTS * 6));
    }

    #[test]
    fn test_drag_line_drawn_for_live_target() {
        let world = World::standard();
        let viewport = Viewport::new(800, WORLD_WIDTH);
        let drag = DragState {
            target: 1,
            press: Vec2::new(400.0, 500.0),
        };
        let plain = frame_vertices(&frame(&world, None, false), &viewport);
        let dragging = frame_vertices(&frame(&world, Some(&drag), false), &viewport);
        assert_eq!(dragging.len(), plain.len() + 6);
        assert_eq!(dragging.last().map(|v| v.color), Some(colors::DRAG_LINE));
    }

    #[test]
    fn test_disc_is_centred() {
        let mut out = Vec::new();
        disc(Vec2::new(50.0, 60.0), 10.0, colors::LIGHT_PIECE, &mut out);
        assert_eq!(out.len(), CIRCLE_SEGMENTS * 3);
        assert!(out.iter().all(|v| {
            let d = Vec2::from(v.position) - Vec2::new(50.0, 60.0);
            d.length() <= 11.0
        }));
    }
}
