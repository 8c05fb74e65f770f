//! Drag-to-launch input
//!
//! Press on a piece, release somewhere else: the piece receives an impulse of
//! `velocity_scale * (press - release)` on top of whatever velocity it has.

use glam::Vec2;

use super::vector;
use super::world::World;

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// ID of the piece that was pressed
    pub target: u32,
    /// World-space press position
    pub press: Vec2,
}

/// Single-pointer drag tracking
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    /// Start a drag on the first piece containing `at`.
    ///
    /// Returns the target ID. Pressing empty board starts nothing and leaves
    /// any existing drag alone.
    pub fn pointer_down(&mut self, world: &World, at: Vec2) -> Option<u32> {
        let target = world.piece_at(at)?.id;
        self.state = Some(DragState { target, press: at });
        log::debug!("Drag started on piece {} at ({:.1}, {:.1})", target, at.x, at.y);
        Some(target)
    }

    /// Finish the drag, applying the impulse to the target.
    ///
    /// Always clears the drag. Returns the impulse that was applied, or `None`
    /// when there was nothing to launch.
    pub fn pointer_up(&mut self, world: &mut World, at: Vec2, velocity_scale: f32) -> Option<Vec2> {
        let drag = self.state.take()?;
        let piece = world.piece_mut(drag.target)?;

        let impulse = vector::scale(velocity_scale, vector::sub(drag.press, at));
        piece.apply_impulse(impulse);
        log::debug!(
            "Launched piece {} with impulse ({:.1}, {:.1})",
            piece.id,
            impulse.x,
            impulse.y
        );
        Some(impulse)
    }

    /// Drop any drag in progress without launching
    pub fn cancel(&mut self) {
        self.state = None;
    }
}
