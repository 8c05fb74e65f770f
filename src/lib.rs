//! Slingshot Board - flick pieces across a checkerboard
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pieces, collisions, friction, scheduling)
//! - `session`: One running board: world, drag input, scheduler, render sink
//! - `renderer`: Viewport projection, board geometry, WebGPU pipeline
//! - `settings`: Physics/timing configuration

pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Frame, RenderSink, Session, Wake};
pub use settings::Settings;

/// Board and physics constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICKS_PER_SECOND: u32 = 30;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Most ticks one scheduler wake-up may run before rendering
    pub const MAX_CATCHUP_TICKS: u32 = 5;

    /// Board geometry, in world units (y up, origin bottom left)
    pub const SQUARE_WIDTH: f32 = 100.0;
    pub const BOARD_SQUARES: u32 = 8;
    /// Margin around the board on every side
    pub const BOUNDARY_WIDTH: f32 = 100.0;
    pub const BOARD_OFFSET: f32 = BOUNDARY_WIDTH;
    pub const WORLD_WIDTH: f32 = 2.0 * BOUNDARY_WIDTH + BOARD_SQUARES as f32 * SQUARE_WIDTH;

    /// 1 = frictionless, 0 = stop dead
    pub const FRICTION_COEFFICIENT: f32 = 0.6;
    /// Impulse per world unit of drag
    pub const VELOCITY_SCALE: f32 = 0.666;
    /// Speeds below this snap to zero
    pub const VELOCITY_FLOOR: f32 = 0.01;
}
