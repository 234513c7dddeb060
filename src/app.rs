//! The winit application shell.
//!
//! [`ViewerApp`] starts pending, builds the full viewer state on `resumed`,
//! then drives the load-screen/render-loop state machine from window events.
//! The effect chain only exists once the model and LUT have both loaded;
//! until then redraws show the progress overlay. The environment map attaches
//! whenever its load completes, before or after assembly, with a black
//! fallback in the meantime.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::driver::FrameDriver;
use crate::environment::EnvironmentMap;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::loader::{AssetLoader, LoadedAsset};
use crate::lut::Lut3d;
use crate::model::ModelData;
use crate::orbit::OrbitControls;
use crate::overlay::ProgressOverlay;
use crate::pipeline::{
    BloomLutPass, BloomSettings, EffectChain, GeometryPass, LensDistortionPass,
    LensDistortionSettings, MotionBlurPass, MotionBlurSettings, PassRegistry, SharpenPass,
    SharpenSettings, SsgiPass, SsgiSettings, TraaPass, TraaSettings, VignettePass,
    VignetteSettings,
};
use crate::progress::LoadProgress;
use crate::scene::fit_to_bounds;

/// Rendering never exceeds this device pixel ratio; HiDPI displays above it
/// render at 2x and let the compositor upscale.
const MAX_PIXEL_RATIO: f64 = 2.0;

/// Render dimensions for a physical window size with the pixel ratio clamped.
fn clamped_render_size(width: u32, height: u32, scale_factor: f64) -> (u32, u32) {
    let scale = scale_factor.min(MAX_PIXEL_RATIO) / scale_factor;
    (
        (width as f64 * scale) as u32,
        (height as f64 * scale) as u32,
    )
}

/// Top-level application, pending until the event loop delivers `resumed`.
pub enum ViewerApp {
    Pending { config: ViewerConfig },
    Running(Box<Viewer>),
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self::Pending { config }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let ViewerApp::Pending { config } = self {
            let attributes = Window::default_attributes()
                .with_title(&config.window.title)
                .with_inner_size(LogicalSize::new(config.window.width, config.window.height));
            let window = Arc::new(
                event_loop
                    .create_window(attributes)
                    .expect("Failed to create window"),
            );

            let viewer = Viewer::new(config.clone(), window);
            *self = ViewerApp::Running(Box::new(viewer));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let ViewerApp::Running(viewer) = self else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                viewer.driver.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                viewer.resize();
            }
            WindowEvent::RedrawRequested => {
                viewer.frame();
            }
            other => viewer.input.handle_event(&other),
        }
    }
}

/// All live viewer state once the window exists.
pub struct Viewer {
    config: ViewerConfig,
    window: Arc<Window>,
    gpu: GpuContext,
    camera: Camera,
    controls: OrbitControls,
    input: Input,
    driver: FrameDriver,
    overlay: ProgressOverlay,
    progress: LoadProgress,
    loader: Option<AssetLoader>,
    failed: bool,
    start_time: Instant,
    // Assets staged until the chain can assemble.
    pending_model: Option<ModelData>,
    pending_environment: Option<EnvironmentMap>,
    pending_lut: Option<Lut3d>,
    chain: Option<EffectChain>,
}

impl Viewer {
    fn new(config: ViewerConfig, window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());

        let camera = Camera::new(
            config.camera.fov_degrees,
            gpu.aspect(),
            config.camera.near,
            config.camera.far,
        );
        let controls = OrbitControls::new()
            .target(Vec3::new(0.0, config.camera.eye_height, 0.0))
            .min_distance(config.camera.min_distance)
            .distance(config.camera.distance);

        let overlay = ProgressOverlay::new(&gpu);
        let loader = AssetLoader::spawn(&config.assets);

        window.request_redraw();

        Self {
            config,
            window,
            gpu,
            camera,
            controls,
            input: Input::new(),
            driver: FrameDriver::new(),
            overlay,
            progress: LoadProgress::new(AssetLoader::EXPECTED),
            loader: Some(loader),
            failed: false,
            start_time: Instant::now(),
            pending_model: None,
            pending_environment: None,
            pending_lut: None,
            chain: None,
        }
    }

    /// Apply window size changes, clamping the device pixel ratio.
    fn resize(&mut self) {
        let physical = self.window.inner_size();
        let (width, height) =
            clamped_render_size(physical.width, physical.height, self.window.scale_factor());

        self.gpu.resize(width, height);
        self.camera.set_aspect(self.gpu.aspect());
        if let Some(chain) = &mut self.chain {
            chain.resize(&self.gpu);
        }
    }

    /// One redraw: apply finished loads, then either run the chain or show
    /// the progress overlay.
    fn frame(&mut self) {
        self.poll_loads();

        if let Some(chain) = &mut self.chain {
            if let Some(dt) = self.driver.tick() {
                self.controls.update(&self.input, dt);
                self.controls.apply_to(&mut self.camera);

                let time = self.start_time.elapsed().as_secs_f32();
                chain.execute(&self.gpu, time, &self.camera);
                self.camera.commit();
            }
        } else {
            self.overlay.render(&self.gpu, &self.progress, self.failed);
        }

        self.input.begin_frame();
        self.window.request_redraw();
    }

    fn poll_loads(&mut self) {
        loop {
            let result = match &mut self.loader {
                Some(loader) => loader.poll(),
                None => return,
            };
            match result {
                Some(Ok(asset)) => {
                    log::info!("{} ready", asset.kind());
                    self.progress.complete_one();
                    self.stage(asset);
                }
                Some(Err(e)) => {
                    log::error!("startup load failed: {e}");
                    self.failed = true;
                    self.loader = None;
                    return;
                }
                None => break,
            }
        }

        if self.progress.is_done() {
            self.loader = None;
        }
        self.try_assemble();
    }

    fn stage(&mut self, asset: LoadedAsset) {
        match asset {
            LoadedAsset::Model(model) => self.pending_model = Some(model),
            LoadedAsset::Lut(lut) => self.pending_lut = Some(lut),
            LoadedAsset::Environment(data) => {
                let environment = data.upload(&self.gpu);
                match &mut self.chain {
                    Some(chain) => {
                        if let Some(geometry) = chain.pass_mut::<GeometryPass>() {
                            geometry.set_environment(&self.gpu, &environment);
                        }
                    }
                    None => self.pending_environment = Some(environment),
                }
            }
        }
    }

    /// Assemble the effect chain once the model and LUT are both in. The
    /// environment is optional here; the geometry pass keeps its black
    /// fallback until the map arrives.
    fn try_assemble(&mut self) {
        if self.chain.is_some() || self.pending_model.is_none() || self.pending_lut.is_none() {
            return;
        }
        let model = self.pending_model.take().expect("checked above");
        let lut = self.pending_lut.take().expect("checked above");

        let bounds = model.bounds();
        let fit = match fit_to_bounds(&bounds, self.config.fit.width, self.config.fit.height) {
            Ok(fit) => fit,
            Err(e) => {
                log::error!("cannot frame the model: {e}");
                self.failed = true;
                return;
            }
        };

        let meshes = model.upload(&self.gpu);
        let mut geometry = GeometryPass::new(&self.gpu, self.config.tone_mapping_exposure);
        geometry.set_scene(&self.gpu, meshes, fit.matrix());
        if let Some(environment) = self.pending_environment.take() {
            geometry.set_environment(&self.gpu, &environment);
        }

        let lut_texture = lut.upload(&self.gpu);

        let effects = &self.config.effects;
        let mut registry = PassRegistry::new();
        registry
            .register(Box::new(geometry), true)
            .register(
                Box::new(SsgiPass::new(&self.gpu, SsgiSettings::default())),
                effects.ssgi,
            )
            .register(
                Box::new(TraaPass::new(&self.gpu, TraaSettings::default())),
                effects.traa,
            )
            .register(
                Box::new(SharpenPass::new(&self.gpu, SharpenSettings::default())),
                effects.sharpen,
            )
            .register(
                Box::new(BloomLutPass::new(
                    &self.gpu,
                    BloomSettings::default(),
                    lut_texture,
                )),
                effects.bloom_lut,
            )
            .register(
                Box::new(MotionBlurPass::new(&self.gpu, MotionBlurSettings::default())),
                effects.motion_blur,
            )
            .register(
                Box::new(LensDistortionPass::new(
                    &self.gpu,
                    LensDistortionSettings::default(),
                )),
                effects.lens_distortion,
            )
            .register(
                Box::new(VignettePass::new(&self.gpu, VignetteSettings::default())),
                effects.vignette,
            );

        match registry.into_chain(&self.gpu) {
            Ok(chain) => {
                self.chain = Some(chain);
                self.driver.start();
            }
            Err(e) => {
                log::error!("effect chain assembly failed: {e}");
                self.failed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_density_displays_render_at_native_size() {
        assert_eq!(clamped_render_size(1280, 720, 1.0), (1280, 720));
        assert_eq!(clamped_render_size(2560, 1440, 2.0), (2560, 1440));
    }

    #[test]
    fn pixel_ratio_above_two_is_clamped() {
        // A 3x display renders at 2x: physical size scaled by 2/3.
        assert_eq!(clamped_render_size(3840, 2160, 3.0), (2560, 1440));
    }
}
