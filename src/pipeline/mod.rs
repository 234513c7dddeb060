//! The post-processing effect pipeline.
//!
//! The viewer presents every frame through a fixed chain of passes:
//!
//! ```text
//! ┌──────────────┐   ┌──────┐   ┌──────┐   ┌─────────┐   ┌───────────┐
//! │ GeometryPass │──▶│ SSGI │──▶│ TRAA │──▶│ Sharpen │──▶│ Bloom+LUT │──▶ surface
//! └──────────────┘   └──────┘   └──────┘   └─────────┘   └───────────┘
//!        │ produces      ▲          ▲
//!        ▼               │          │
//!   velocity / depth / normal buffers (shared)
//! ```
//!
//! The geometry pass rasterizes the scene and fills the shared
//! velocity/depth/normal buffers every downstream consumer samples; the
//! registry guarantees it runs first regardless of registration order.
//! Between passes the chain ping-pongs two half-float render targets, and a
//! final blit resolves the last HDR target onto the sRGB surface.
//!
//! Motion blur, lens distortion, and vignette passes are constructed with
//! their full parameter sets but registered disabled; flipping the config
//! toggle is all it takes to attach them.

mod bloom_lut;
mod chain;
mod fullscreen;
mod geometry;
mod lens_distortion;
mod motion_blur;
mod pass;
mod registry;
mod sharpen;
mod ssgi;
mod target;
mod traa;
mod vignette;

pub use bloom_lut::{BloomLutPass, BloomSettings};
pub use chain::EffectChain;
pub use geometry::GeometryPass;
pub use lens_distortion::{LensDistortionPass, LensDistortionSettings};
pub use motion_blur::{MotionBlurPass, MotionBlurSettings};
pub use pass::{EffectPass, FrameContext};
pub use registry::PassRegistry;
pub use sharpen::{SharpenPass, SharpenSettings};
pub use ssgi::{SsgiPass, SsgiSettings};
pub use target::{GeometryBuffers, RenderTarget};
pub use traa::{TraaPass, TraaSettings};
pub use vignette::{VignettePass, VignetteSettings};
