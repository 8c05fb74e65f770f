//! A running board
//!
//! `Session` owns everything one board needs: the world, the drag controller,
//! the scheduler and the settings they were built from. The host calls
//! `wake` whenever its timer fires and forwards pointer events; drawing goes
//! through a `RenderSink`, which is also the only place that knows how
//! viewport pixels map to world units.

use glam::Vec2;

use crate::consts::WORLD_WIDTH;
use crate::settings::Settings;
use crate::sim::{DragController, DragState, PhysicsParams, Piece, Scheduler, World, tick};

/// Everything a sink needs to draw one frame, in world coordinates
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Pieces in iteration order
    pub pieces: &'a [Piece],
    /// Side length of the square world
    pub world_width: f32,
    /// Drag in progress, if any
    pub drag: Option<&'a DragState>,
    pub time_ticks: u64,
    pub debug_collision_circles: bool,
}

/// Drawing side of the host (canvas, GPU surface, log...)
pub trait RenderSink {
    /// Draw one frame
    fn render(&mut self, frame: &Frame<'_>);

    /// Inverse projection: viewport pixel to world position
    fn viewport_to_world(&self, x: f32, y: f32) -> Vec2;
}

/// Time source for the blocking native loop. Seconds.
pub trait Clock {
    fn now(&self) -> f64;
    fn sleep(&self, seconds: f64);
}

/// Wall clock measured from construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn sleep(&self, seconds: f64) {
        if seconds > 0.0 {
            std::thread::sleep(std::time::Duration::from_secs_f64(seconds));
        }
    }
}

/// Result of one wake-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wake {
    /// Simulation ticks run before rendering
    pub ticks: u32,
    /// Seconds until the next tick is due
    pub sleep_for: f64,
}

/// One board
#[derive(Debug, Clone)]
pub struct Session {
    world: World,
    drag: DragController,
    scheduler: Scheduler,
    settings: Settings,
    physics: PhysicsParams,
    frames: u64,
}

impl Session {
    /// Start a session at time `now` (seconds, host clock)
    pub fn new(world: World, settings: Settings, now: f64) -> Self {
        let settings = settings.sanitized();
        let scheduler = Scheduler::new(now, settings.dt(), settings.max_catchup_ticks);
        log::info!(
            "Session started: {} pieces, {} ticks/s, {} collisions, {} friction",
            world.pieces.len(),
            settings.ticks_per_second,
            settings.collision_policy.as_str(),
            settings.friction_model.as_str()
        );
        Self {
            world,
            drag: DragController::new(),
            scheduler,
            physics: settings.physics(),
            settings,
            frames: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.active()
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Catch up on due ticks, then render once
    pub fn wake<S: RenderSink + ?Sized>(&mut self, now: f64, sink: &mut S) -> Wake {
        let dt = self.scheduler.dt() as f32;
        let world = &mut self.world;
        let physics = &self.physics;
        let ticks = self.scheduler.catch_up(now, || {
            let summary = tick(world, physics, dt);
            if summary.collisions > 0 {
                log::trace!("Tick {}: {:?}", world.time_ticks, summary);
            }
        });

        sink.render(&self.frame());
        self.frames += 1;

        Wake {
            ticks,
            sleep_for: self.scheduler.sleep_for(now),
        }
    }

    /// Snapshot for the render sink
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            pieces: &self.world.pieces,
            world_width: WORLD_WIDTH,
            drag: self.drag.active(),
            time_ticks: self.world.time_ticks,
            debug_collision_circles: self.settings.debug_collision_circles,
        }
    }

    /// Pointer pressed at a world position
    pub fn press(&mut self, at: Vec2) -> Option<u32> {
        self.drag.pointer_down(&self.world, at)
    }

    /// Pointer released at a world position
    pub fn release(&mut self, at: Vec2) -> Option<Vec2> {
        self.drag
            .pointer_up(&mut self.world, at, self.settings.velocity_scale)
    }

    /// The pointer left the page mid-drag; forget the drag without launching
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.active() {
            log::debug!("Drag on piece {} cancelled", drag.target);
        }
        self.drag.cancel();
    }

    /// Pointer pressed at viewport pixel (`x`, `y`)
    pub fn pointer_down<S: RenderSink + ?Sized>(&mut self, sink: &S, x: f32, y: f32) -> Option<u32> {
        self.press(sink.viewport_to_world(x, y))
    }

    /// Pointer released at viewport pixel (`x`, `y`)
    pub fn pointer_up<S: RenderSink + ?Sized>(&mut self, sink: &S, x: f32, y: f32) -> Option<Vec2> {
        self.release(sink.viewport_to_world(x, y))
    }

    /// Blocking loop: wake, sleep until the next deadline, repeat.
    ///
    /// `stop` is polled between wake-ups only, never during a tick.
    pub fn run_until<C, S, F>(&mut self, clock: &C, sink: &mut S, mut stop: F)
    where
        C: Clock + ?Sized,
        S: RenderSink + ?Sized,
        F: FnMut(&Session) -> bool,
    {
        while !stop(self) {
            let wake = self.wake(clock.now(), sink);
            clock.sleep(wake.sleep_for);
        }
        log::debug!(
            "Session stopped after {} ticks, {} frames",
            self.world.time_ticks,
            self.frames
        );
    }
}
