//! Tremolo - a painting re-rendered as an audio-reactive point field
//!
//! The canvas holds still until you click. Then the music takes over:
//! sky points sway with the treble, water ripples with the mids, the
//! dark figure trembles on the bass, and loud passages surge the whole
//! field.

use std::sync::Arc;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use tremolo::assets;
use tremolo::audio::{AudioSystem, FeatureExtractor};
use tremolo::classify::{MaskClassifier, MaskLayer, RegionClassifier};
use tremolo::cli::Args;
use tremolo::error::TremoloResult;
use tremolo::field::PointField;
use tremolo::motion::MotionResolver;
use tremolo::params::{
    AnalyzerConfig, AudioParams, FieldParams, HeuristicThresholds, MaskParams, MotionParams,
    OverlayPlacement, RenderConfig, SessionParams,
};
use tremolo::rendering::RenderSystem;
use tremolo::session::{FrameSketch, Session, SessionState};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    session: Session,
    audio: AudioSystem,
    extractor: FeatureExtractor,
    sketch: FrameSketch,

    // Configuration fixed at startup
    render_config: RenderConfig,
    image_size: (u32, u32),
    overlay_placement: OverlayPlacement,
    field_points: usize,
    overlay_points: usize,
}

impl App {
    /// Load assets and wire every subsystem that can fail, before the
    /// event loop starts
    fn build(args: &Args) -> TremoloResult<Self> {
        let painting = assets::load_rgba(&args.image)?;
        let image_size = painting.dimensions();

        let mask_rules = args.parse_masks();
        let classifier = if mask_rules.is_empty() {
            RegionClassifier::Heuristic(HeuristicThresholds::default())
        } else {
            let mask_params = MaskParams::default();
            let mut layers = Vec::new();
            for (region, path) in &mask_rules {
                let image = assets::load_mask(path, image_size)?;
                layers.push(MaskLayer {
                    region: *region,
                    image,
                    brightness_min: mask_params.brightness_min,
                });
            }
            RegionClassifier::Masks(MaskClassifier::new(layers, args.parse_default_region()))
        };

        let field_params = FieldParams {
            spacing_px: args.spacing,
            ..FieldParams::default()
        };

        let mut rng = match args.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let field = PointField::build(&painting, &field_params, &classifier, &mut rng)?;
        info!(
            "Point field: {} points over {}x{}",
            field.points.len(),
            image_size.0,
            image_size.1
        );
        for (region, count) in field.region_counts() {
            if count > 0 {
                info!("  {}: {}", region, count);
            }
        }

        let overlay = match &args.overlay {
            Some(path) => {
                let image = assets::load_rgba(path)?;
                let overlay_params = FieldParams {
                    spacing_px: args.spacing,
                    min_alpha: Some(8),
                    ..FieldParams::default()
                };
                let overlay_field =
                    PointField::build(&image, &overlay_params, &classifier, &mut rng)?;
                info!("Overlay field: {} points", overlay_field.points.len());
                Some(overlay_field)
            }
            None => None,
        };

        // Mask-classified runs keep colors literal
        let mut motion = MotionParams::default();
        motion.warm_shift.enabled = classifier.is_heuristic();

        let field_points = field.points.len();
        let overlay_points = overlay.as_ref().map_or(0, |f| f.points.len());

        let session = Session::new(
            field,
            overlay,
            MotionResolver::new(motion),
            SessionParams::default(),
            rng,
        );

        let extractor = FeatureExtractor::new(AudioParams::default())?;
        let audio = AudioSystem::new(&args.audio, AnalyzerConfig::default())?;

        Ok(Self {
            window: None,
            render_system: None,
            session,
            audio,
            extractor,
            sketch: FrameSketch::default(),
            render_config: RenderConfig::default(),
            image_size,
            overlay_placement: args.parse_overlay_placement(),
            field_points,
            overlay_points,
        })
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Window sized to the painting; the view never moves
        let window_attributes = Window::default_attributes()
            .with_title("Tremolo")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.image_size.0,
                self.image_size.1,
            ))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.field_points,
            self.overlay_points,
            self.image_size,
            &self.overlay_placement,
            self.render_config.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        info!("Click the painting to start; R restarts, Escape quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::KeyR),
                        ..
                    },
                ..
            } => self.restart(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.toggle_session(),
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Click: idle starts the music, active returns to the still prompt
    fn toggle_session(&mut self) {
        match self.session.toggle() {
            SessionState::Active => {
                if let Err(e) = self.audio.play() {
                    error!("Failed to start playback: {}", e);
                }
            }
            SessionState::Idle => {
                if let Err(e) = self.audio.pause() {
                    error!("Failed to pause playback: {}", e);
                }
                self.audio.rewind();
                self.audio.set_gain(0.0);
            }
        }
    }

    /// R: back to the top of the track with a fresh fade-in
    fn restart(&mut self) {
        self.session.reset();
        self.audio.rewind();
        self.audio.set_gain(0.0);
        self.session.begin();
        if let Err(e) = self.audio.play() {
            error!("Failed to start playback: {}", e);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(ref mut render_system) = self.render_system else {
            return;
        };

        self.session
            .tick(&self.audio, &self.extractor, &mut self.sketch);
        self.audio.set_gain(self.session.volume());

        render_system.prepare(&self.sketch);
        if let Err(e) = render_system.render() {
            error!("Render error: {:?}", e);
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut app = match App::build(&args) {
        Ok(app) => app,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
