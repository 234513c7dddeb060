//! # Lustre
//!
//! A glTF turntable viewer with a filmic post-processing stack, built on
//! [wgpu](https://wgpu.rs) and [winit](https://docs.rs/winit).
//!
//! On startup the viewer loads three assets concurrently — a glTF model, an
//! equirectangular HDR environment, and a 3D grading LUT — behind a progress
//! screen. The model is scaled and grounded to a canonical footprint, then
//! rendered each frame through a fixed effect chain:
//!
//! geometry → SSGI + tone mapping → TRAA → sharpen → bloom + LUT grading
//!
//! with damped orbit controls on the mouse. Motion blur and lens distortion
//! passes ship constructed but disabled; a config toggle attaches them.
//!
//! ## Example
//!
//! ```ignore
//! use lustre::{ViewerApp, ViewerConfig};
//! use winit::event_loop::EventLoop;
//!
//! let event_loop = EventLoop::new()?;
//! let mut app = ViewerApp::new(ViewerConfig::default());
//! event_loop.run_app(&mut app)?;
//! ```

pub mod app;
pub mod camera;
pub mod config;
pub mod driver;
pub mod environment;
pub mod error;
pub mod gpu;
pub mod input;
pub mod loader;
pub mod lut;
pub mod mesh;
pub mod model;
pub mod orbit;
pub mod overlay;
pub mod pipeline;
pub mod progress;
pub mod scene;

pub use app::ViewerApp;
pub use camera::Camera;
pub use config::ViewerConfig;
pub use driver::FrameDriver;
pub use error::{LoadError, PipelineError};
pub use gpu::GpuContext;
pub use orbit::OrbitControls;
pub use pipeline::{EffectChain, PassRegistry};
pub use scene::{fit_to_bounds, Aabb, FitResult};
