//! Hero scene host: window, frame loop and the renderer/field stage.
//!
//! [`HeroScene`] is the entry point. It owns the configuration and the list
//! of shapes the `S` key cycles through, and hands both to a winit
//! application that drives the field once per redraw.
//!
//! # Example
//!
//! ```ignore
//! use prism_field::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     HeroScene::new(FieldConfig::default())
//!         .with_shape(Shape::aperture_with_halo())
//!         .run()
//! }
//! ```

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::{FieldConfig, ShapeSpec};
use crate::error::{AppError, ShapeError};
use crate::field::ParticleField;
use crate::gpu::FieldRenderer;
use crate::input::{Input, KeyCode};
use crate::sampler::FieldSampler;
use crate::shape::Shape;
use crate::time::FrameClock;

/// Shape presets the `S` key cycles through, in order.
fn preset_specs() -> [ShapeSpec; 3] {
    [
        ShapeSpec::Halo,
        ShapeSpec::Logo { diameter: 900.0 },
        ShapeSpec::LogoWithHalo,
    ]
}

/// Builder and runner for the interactive particle field.
pub struct HeroScene {
    config: FieldConfig,
    shapes: Vec<Shape>,
    shape_index: usize,
}

impl HeroScene {
    /// Scene with the given settings, starting on the halo preset.
    ///
    /// `config.shape` is not consulted; use [`HeroScene::from_config`] for that.
    pub fn new(config: FieldConfig) -> Self {
        let shapes = preset_specs()
            .iter()
            .filter_map(|spec| spec.to_shape().ok())
            .collect();
        Self {
            config,
            shapes,
            shape_index: 0,
        }
    }

    /// Scene starting on the shape named by `config.shape`.
    pub fn from_config(config: FieldConfig) -> Result<Self, ShapeError> {
        let shape = config.shape.to_shape()?;
        let preset = preset_specs().iter().position(|spec| *spec == config.shape);
        let mut scene = Self::new(config);
        match preset {
            Some(index) => scene.shape_index = index,
            None => scene = scene.with_shape(shape),
        }
        Ok(scene)
    }

    /// Start on a custom shape. The presets stay reachable with `S`.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.insert(0, shape);
        self.shape_index = 0;
        self
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The shape the field is sampled from first.
    pub fn shape(&self) -> &Shape {
        &self.shapes[self.shape_index]
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), AppError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Everything that holds GPU resources or particle state.
///
/// Dropped as one value so nothing can render from a torn-down surface.
struct Stage {
    window: Arc<Window>,
    renderer: FieldRenderer,
    field: ParticleField,
}

struct App {
    scene: HeroScene,
    stage: Option<Stage>,
    input: Input,
    clock: FrameClock,
    rng: SmallRng,
    error: Option<AppError>,
}

impl App {
    fn new(scene: HeroScene) -> Self {
        let rng = match scene.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            scene,
            stage: None,
            input: Input::new(),
            clock: FrameClock::new(),
            rng,
            error: None,
        }
    }

    fn create_stage(&mut self, event_loop: &ActiveEventLoop) -> Result<Stage, AppError> {
        let render = &self.scene.config.render;
        let window_attrs = Window::default_attributes()
            .with_title(render.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                render.window_width,
                render.window_height,
            ))
            .with_transparent(true);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let count = self.scene.config.particle_count;
        let renderer = pollster::block_on(FieldRenderer::new(window.clone(), render, count))?;

        let field = ParticleField::new(
            self.scene.shape(),
            count,
            FieldSampler::new(self.scene.config.raster),
            self.scene.config.physics,
            &mut self.rng,
        )
        .with_opacity(render.opacity);

        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);
        self.clock.restart();

        Ok(Stage {
            window,
            renderer,
            field,
        })
    }

    /// Resample the current shape and replay the entry animation.
    fn rebuild(&mut self) {
        if let Some(stage) = &mut self.stage {
            stage
                .field
                .rebuild(self.scene.shape(), self.scene.config.particle_count, &mut self.rng);
            self.clock.restart();
        }
    }

    fn reseed(&mut self) {
        let seed: u64 = self.rng.gen();
        self.rng = SmallRng::seed_from_u64(seed);
        log::info!("reseeded field with {seed}");
        self.rebuild();
    }

    fn next_shape(&mut self) {
        self.scene.shape_index = (self.scene.shape_index + 1) % self.scene.shapes.len();
        log::debug!("switched to shape {}", self.scene.shape_index);
        self.rebuild();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.stage = None;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            self.shutdown(event_loop);
            return;
        }
        let rebuild = self.input.key_pressed(KeyCode::R) || self.input.key_pressed(KeyCode::S);
        if self.input.key_pressed(KeyCode::R) {
            self.reseed();
        }
        if self.input.key_pressed(KeyCode::S) {
            self.next_shape();
        }
        if self.input.key_pressed(KeyCode::Space) {
            self.clock.toggle_pause();
        }
        self.input.end_frame();

        let Some(stage) = &mut self.stage else {
            return;
        };

        // While paused the last batch is redrawn as-is, unless the field was just rebuilt.
        if !self.clock.is_paused() || rebuild {
            self.clock.update();
            let instances = stage.field.step(self.clock.elapsed(), self.input.pointer().ndc());
            stage.renderer.upload(instances);
        }

        match stage.renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                stage.renderer.reconfigure()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.shutdown(event_loop);
                return;
            }
            Err(e) => log::warn!("dropped frame: {e}"),
        }

        if !self.clock.is_paused() && self.clock.frame() % 30 == 0 {
            let title = format!(
                "{} - {:.0} FPS",
                self.scene.config.render.window_title,
                self.clock.fps()
            );
            stage.window.set_title(&title);
        }

        stage.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.stage.is_some() {
            return;
        }
        match self.create_stage(event_loop) {
            Ok(stage) => {
                stage.window.request_redraw();
                self.stage = Some(stage);
            }
            Err(err) => {
                log::error!("{err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(physical_size) => {
                if let Some(stage) = &mut self.stage {
                    stage.renderer.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("suspended, releasing stage");
        self.stage = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_new_starts_on_halo() {
        let scene = HeroScene::new(FieldConfig::default());
        assert_eq!(scene.shapes.len(), 3);
        assert_eq!(scene.shape().coverage(crate::shape::canvas_center()), 255);
    }

    #[test]
    fn test_from_config_selects_preset() {
        let config = FieldConfig {
            shape: ShapeSpec::LogoWithHalo,
            ..FieldConfig::default()
        };
        let scene = HeroScene::from_config(config).unwrap();
        assert_eq!(scene.shapes.len(), 3);
        assert_eq!(scene.shape_index, 2);
    }

    #[test]
    fn test_custom_shape_is_prepended() {
        let config = FieldConfig {
            shape: ShapeSpec::Circle { radius: 200.0 },
            ..FieldConfig::default()
        };
        let scene = HeroScene::from_config(config).unwrap();
        assert_eq!(scene.shapes.len(), 4);
        assert_eq!(scene.shape_index, 0);
        assert!(matches!(scene.shape(), Shape::Circle { radius, .. } if *radius == 200.0));
    }

    #[test]
    fn test_run_rejects_oversized_field() {
        let config = FieldConfig {
            particle_count: crate::config::MAX_PARTICLE_COUNT + 1,
            ..FieldConfig::default()
        };
        let err = HeroScene::new(config).run().unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_mask_is_error() {
        let config = FieldConfig {
            shape: ShapeSpec::Image {
                path: "no/such/mask.png".into(),
            },
            ..FieldConfig::default()
        };
        assert!(HeroScene::from_config(config).is_err());
    }
}
