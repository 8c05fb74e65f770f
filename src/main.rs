//! Slingshot Board entry point
//!
//! Web: runs the board in a canvas, driven by `setTimeout` deadlines.
//! Native: headless demo that flicks random pieces, or prints a friction table.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use slingshot_board::consts::WORLD_WIDTH;
    use slingshot_board::renderer::{GpuSink, RenderState, TraceSink};
    use slingshot_board::sim::World;
    use slingshot_board::{Session, Settings};

    /// Everything the page keeps alive
    struct App {
        session: Session,
        canvas: HtmlCanvasElement,
        gpu: Option<GpuSink>,
        /// Used when WebGPU is unavailable, so the board still simulates
        fallback: TraceSink,
    }

    impl App {
        /// Seconds since page load
        fn now() -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now() / 1000.0)
                .unwrap_or_else(|| js_sys::Date::now() / 1000.0)
        }

        /// Keep the canvas square and as large as the window allows
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let side = w.min(h).max(1.0) as u32;
            if self.canvas.width() != side || self.canvas.height() != side {
                self.canvas.set_width(side);
                self.canvas.set_height(side);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(side, side, WORLD_WIDTH);
                }
                self.fallback.resize(side, WORLD_WIDTH);
                log::info!("Canvas resized to {}px", side);
            }
        }

        /// Pointer position relative to the canvas
        fn canvas_point(&self, event: &MouseEvent) -> (f32, f32) {
            let rect = self.canvas.get_bounding_client_rect();
            (
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            )
        }

        /// One scheduler wake-up; returns milliseconds until the next
        fn wake(&mut self) -> i32 {
            self.fit_canvas();
            let now = Self::now();
            let App {
                session,
                gpu,
                fallback,
                ..
            } = self;
            let wake = match gpu {
                Some(gpu) => session.wake(now, gpu),
                None => session.wake(now, fallback),
            };
            (wake.sleep_for * 1000.0).ceil() as i32
        }

        fn pointer_down(&mut self, event: &MouseEvent) {
            let (x, y) = self.canvas_point(event);
            let App {
                session,
                gpu,
                fallback,
                ..
            } = self;
            match gpu {
                Some(gpu) => session.pointer_down(&*gpu, x, y),
                None => session.pointer_down(&*fallback, x, y),
            };
        }

        fn pointer_up(&mut self, event: &MouseEvent) {
            let (x, y) = self.canvas_point(event);
            let App {
                session,
                gpu,
                fallback,
                ..
            } = self;
            match gpu {
                Some(gpu) => session.pointer_up(&*gpu, x, y),
                None => session.pointer_up(&*fallback, x, y),
            };
        }
    }

    async fn init_gpu(canvas: &HtmlCanvasElement) -> Option<GpuSink> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, canvas.width(), canvas.height()).await {
            Ok(state) => Some(GpuSink::new(state, WORLD_WIDTH)),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
        }

        log::info!("Slingshot Board starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let gpu = init_gpu(&canvas).await;
        if gpu.is_none() {
            log::warn!("Rendering disabled; the board will simulate without drawing");
        }

        let app = Rc::new(RefCell::new(App {
            session: Session::new(World::standard(), settings, App::now()),
            canvas: canvas.clone(),
            gpu,
            fallback: TraceSink::new(canvas.width().max(1), WORLD_WIDTH),
        }));

        setup_input_handlers(&window, app.clone())?;
        schedule_wake(app, 0);

        log::info!("Slingshot Board running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer_down(&event);
            });
            window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer_up(&event);
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // A release outside the window never arrives
        {
            let closure = Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().session.cancel_drag();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Suspend until the next deadline, then wake the session again
    fn schedule_wake(app: Rc<RefCell<App>>, delay_ms: i32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || {
            let delay = app.borrow_mut().wake();
            schedule_wake(app, delay);
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms.max(0),
        ) {
            log::error!("Failed to schedule wake-up: {:?}", e);
        }
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use slingshot_board::consts::*;
    use slingshot_board::renderer::{TraceSink, Viewport};
    use slingshot_board::session::{Clock, SystemClock};
    use slingshot_board::sim::{CollisionPolicy, Friction, FrictionModel, World, friction_course};
    use slingshot_board::{RenderSink, Session, Settings};

    /// Side of the headless viewport in pixels
    const VIEWPORT_PX: u32 = 800;

    fn parse_collision(s: &str) -> Result<CollisionPolicy, String> {
        CollisionPolicy::from_str(s).ok_or_else(|| format!("unknown collision policy '{}'", s))
    }

    fn parse_friction(s: &str) -> Result<FrictionModel, String> {
        FrictionModel::from_str(s).ok_or_else(|| format!("unknown friction model '{}'", s))
    }

    /// Headless slingshot board: flicks random pieces and logs where they land
    #[derive(Parser, Debug, Clone, PartialEq)]
    #[command(name = "slingshot-board", version)]
    pub struct Args {
        /// Collision response: elastic or transfer
        #[arg(long, value_parser = parse_collision)]
        pub collision: Option<CollisionPolicy>,
        /// Friction model: continuous or discrete
        #[arg(long, value_parser = parse_friction)]
        pub friction: Option<FrictionModel>,
        /// Settings JSON (falls back to $SLINGSHOT_CONFIG)
        #[arg(long)]
        pub config: Option<PathBuf>,
        /// Demo length in seconds
        #[arg(long, default_value_t = 10.0)]
        pub seconds: f64,
        /// Scatter this many pieces instead of the two pawns
        #[arg(long, default_value_t = 0)]
        pub pieces: usize,
        /// RNG seed for scatter and launches
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Print distance-over-time for tuning and exit
        #[arg(long)]
        pub friction_table: bool,
    }

    pub fn settings_for(args: &Args) -> Settings {
        let mut settings = match &args.config {
            Some(path) => Settings::load_file(path),
            None => Settings::load(),
        };
        if let Some(policy) = args.collision {
            settings.collision_policy = policy;
        }
        if let Some(model) = args.friction {
            settings.friction_model = model;
        }
        settings
    }

    /// Distance travelled over time for a few coefficients and launch speeds
    pub fn print_friction_table(settings: &Settings) {
        const COEFFICIENTS: [f32; 3] = [0.4, 0.6, 0.8];
        const SPEEDS: [f32; 3] = [80.0, 120.0, 200.0];
        const TICKS: u32 = 1000;
        const EVERY: usize = 30;

        let dt = settings.dt() as f32;
        println!(
            "# {} friction, {} ticks/s, floor {}",
            settings.friction_model.as_str(),
            settings.ticks_per_second,
            settings.velocity_floor
        );
        for c in COEFFICIENTS {
            for v0 in SPEEDS {
                let friction = Friction {
                    model: settings.friction_model,
                    coefficient: c,
                    velocity_floor: settings.velocity_floor,
                };
                let course = friction_course(&friction, v0, dt, TICKS);
                let stops = course.iter().find(|s| s.speed == 0.0).map(|s| s.tick);
                let samples: Vec<String> = course
                    .iter()
                    .step_by(EVERY)
                    .map(|s| format!("{:.0}", s.distance))
                    .collect();
                println!(
                    "c={:.1} v0={:>3.0} stops_at={:>5} distance/s: {}",
                    c,
                    v0,
                    stops.map_or_else(|| "-".to_string(), |t| t.to_string()),
                    samples.join(" ")
                );
            }
        }
    }

    /// Drag a random piece through the sink's pixel space, like a user would
    fn flick_random_piece(session: &mut Session, sink: &TraceSink, viewport: &Viewport, rng: &mut Pcg32) {
        let pieces = &session.world().pieces;
        if pieces.is_empty() {
            return;
        }
        let piece = &pieces[rng.random_range(0..pieces.len())];
        let press = viewport.world_to_pixel(piece.pos).as_vec2();
        let pull = Vec2::new(rng.random_range(-150.0..150.0), rng.random_range(-150.0..150.0));
        let release = press + pull * viewport.pixels_per_unit;

        if session.pointer_down(sink, press.x, press.y).is_some() {
            if let Some(impulse) = session.pointer_up(sink, release.x, release.y) {
                log::info!(
                    "Tick {}: flicked a piece with impulse ({:.1}, {:.1})",
                    session.world().time_ticks,
                    impulse.x,
                    impulse.y
                );
            }
        }
    }

    pub fn run_demo(settings: Settings, args: &Args) {
        let world = if args.pieces > 0 {
            World::scattered(args.seed, args.pieces)
        } else {
            World::standard()
        };
        let clock = SystemClock::new();
        let mut session = Session::new(world, settings, clock.now());
        let viewport = Viewport::new(VIEWPORT_PX, WORLD_WIDTH);
        let mut sink = TraceSink::new(VIEWPORT_PX, WORLD_WIDTH);
        let mut rng = Pcg32::seed_from_u64(args.seed);

        let end = clock.now() + args.seconds.max(0.0);
        while clock.now() < end {
            flick_random_piece(&mut session, &sink, &viewport, &mut rng);
            session.run_until(&clock, &mut sink, |s| {
                s.world().is_at_rest() || clock.now() >= end
            });
            for piece in &session.world().pieces {
                log::info!(
                    "  piece {} ({}) at ({:.1}, {:.1})",
                    piece.id,
                    piece.kind.as_str(),
                    piece.pos.x,
                    piece.pos.y
                );
            }
        }

        log::info!(
            "Demo finished: {} ticks, {} frames",
            session.world().time_ticks,
            sink.frames()
        );
        // Projection sanity check for the log reader
        let centre = sink.viewport_to_world(VIEWPORT_PX as f32 / 2.0, VIEWPORT_PX as f32 / 2.0);
        log::debug!("Viewport centre maps to ({:.1}, {:.1})", centre.x, centre.y);
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Result<Args, clap::Error> {
            Args::try_parse_from(std::iter::once("slingshot-board").chain(list.iter().copied()))
        }

        #[test]
        fn test_parse_defaults() {
            let parsed = args(&[]).unwrap();
            assert_eq!(parsed.collision, None);
            assert_eq!(parsed.friction, None);
            assert_eq!(parsed.config, None);
            assert_eq!(parsed.seconds, 10.0);
            assert_eq!(parsed.pieces, 0);
            assert_eq!(parsed.seed, 1);
            assert!(!parsed.friction_table);
        }

        #[test]
        fn test_parse_flags() {
            let parsed = args(&[
                "--collision",
                "transfer",
                "--friction",
                "discrete",
                "--pieces",
                "12",
                "--seconds",
                "2.5",
                "--config",
                "board.json",
                "--friction-table",
            ])
            .unwrap();
            assert_eq!(parsed.collision, Some(CollisionPolicy::ComponentTransfer));
            assert_eq!(parsed.friction, Some(FrictionModel::DiscretePerTick));
            assert_eq!(parsed.pieces, 12);
            assert_eq!(parsed.seconds, 2.5);
            assert_eq!(parsed.config, Some(PathBuf::from("board.json")));
            assert!(parsed.friction_table);
        }

        #[test]
        fn test_parse_equals_form() {
            let parsed = args(&["--seconds=5", "--seed=42", "--collision=elastic"]).unwrap();
            assert_eq!(parsed.seconds, 5.0);
            assert_eq!(parsed.seed, 42);
            assert_eq!(parsed.collision, Some(CollisionPolicy::ElasticExchange));
        }

        #[test]
        fn test_parse_errors() {
            assert!(args(&["--collision"]).is_err());
            assert!(args(&["--collision", "sticky"]).is_err());
            assert!(args(&["--pieces", "lots"]).is_err());
            assert!(args(&["--bogus"]).is_err());
        }

        #[test]
        fn test_help_is_generated() {
            let err = args(&["--help"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
            assert!(err.to_string().contains("--friction-table"));
        }

        #[test]
        fn test_overrides_win_over_defaults() {
            let parsed = args(&["--collision", "transfer"]).unwrap();
            let settings = settings_for(&parsed);
            assert_eq!(settings.collision_policy, CollisionPolicy::ComponentTransfer);
            assert_eq!(settings.friction_model, FrictionModel::ContinuousDecay);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = native::Args::parse();

    let settings = native::settings_for(&args);
    if args.friction_table {
        native::print_friction_table(&settings);
        return;
    }

    log::info!("Slingshot Board (native) starting...");
    native::run_demo(settings, &args);
}
