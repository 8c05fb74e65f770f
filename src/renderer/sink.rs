//! Render sinks: the drawing end of a session

use glam::{IVec2, Vec2};

use super::pipeline::RenderState;
use super::shapes::frame_vertices;
use super::viewport::Viewport;
use crate::session::{Frame, RenderSink};

/// Draws into a WebGPU surface
pub struct GpuSink {
    pub state: RenderState,
    viewport: Viewport,
}

impl GpuSink {
    pub fn new(state: RenderState, world_width: f32) -> Self {
        let (w, h) = state.size;
        Self {
            viewport: Viewport::fit(w, h, world_width),
            state,
        }
    }

    /// The canvas changed size; keep the board square and fitted
    pub fn resize(&mut self, width: u32, height: u32, world_width: f32) {
        self.state.resize(width, height);
        self.viewport = Viewport::fit(width, height, world_width);
    }
}

impl RenderSink for GpuSink {
    fn render(&mut self, frame: &Frame<'_>) {
        let vertices = frame_vertices(frame, &self.viewport);
        match self.state.render(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = self.state.size;
                self.state.surface.configure(&self.state.device, &self.state.config);
                log::warn!("Surface lost, reconfigured at {}x{}", w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    fn viewport_to_world(&self, x: f32, y: f32) -> Vec2 {
        self.viewport.pixel_to_world(x, y)
    }
}

/// Headless sink: projects each frame and logs it
#[derive(Debug, Clone)]
pub struct TraceSink {
    viewport: Viewport,
    frames: u64,
    last: Vec<(u32, IVec2)>,
}

impl TraceSink {
    pub fn new(size_px: u32, world_width: f32) -> Self {
        Self {
            viewport: Viewport::new(size_px, world_width),
            frames: 0,
            last: Vec::new(),
        }
    }

    /// Follow the canvas so pointer positions keep projecting correctly
    pub fn resize(&mut self, size_px: u32, world_width: f32) {
        self.viewport = Viewport::new(size_px, world_width);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Piece IDs and pixel positions from the latest frame
    pub fn last_frame(&self) -> &[(u32, IVec2)] {
        &self.last
    }
}

impl RenderSink for TraceSink {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        self.last.clear();
        self.last.extend(
            frame
                .pieces
                .iter()
                .map(|p| (p.id, self.viewport.world_to_pixel(p.pos))),
        );
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Frame {} (tick {}): {:?}", self.frames, frame.time_ticks, self.last);
        }
    }

    fn viewport_to_world(&self, x: f32, y: f32) -> Vec2 {
        self.viewport.pixel_to_world(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WORLD_WIDTH;
    use crate::settings::Settings;
    use crate::session::Session;
    use crate::sim::World;

    #[test]
    fn test_trace_sink_projects_pieces() {
        let mut session = Session::new(World::standard(), Settings::default(), 0.0);
        let mut sink = TraceSink::new(1000, WORLD_WIDTH);

        session.wake(0.0, &mut sink);
        assert_eq!(sink.frames(), 1);
        assert_eq!(
            sink.last_frame(),
            &[(1, IVec2::new(500, 499)), (2, IVec2::new(600, 499))]
        );
    }

    #[test]
    fn test_trace_sink_pointer_round_trip() {
        let mut session = Session::new(World::standard(), Settings::default(), 0.0);
        let sink = TraceSink::new(500, WORLD_WIDTH);

        // Pixel (250, 249) is the centre of the light pawn
        assert_eq!(session.pointer_down(&sink, 250.0, 249.5), Some(1));
        let impulse = session.pointer_up(&sink, 200.0, 249.5);
        let impulse = impulse.unwrap_or_default();
        assert!(impulse.x > 0.0);
        assert!(impulse.y.abs() < 1e-3);
    }

    #[test]
    fn test_trace_sink_resize_updates_pointer_projection() {
        let mut session = Session::new(World::standard(), Settings::default(), 0.0);
        let mut sink = TraceSink::new(500, WORLD_WIDTH);
        sink.resize(1000, WORLD_WIDTH);

        // At 1000 px the light pawn sits at pixel (500, 499); at the old
        // 500 px size that pixel would be world (1000, 0), off the board
        assert_eq!(session.pointer_down(&sink, 500.0, 499.0), Some(1));
        session.wake(0.0, &mut sink);
        assert_eq!(sink.last_frame()[0], (1, IVec2::new(500, 499)));
    }
}
