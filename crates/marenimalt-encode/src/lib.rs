//! # marenimalt-encode
//!
//! Turns a Marenimalt project into an artifact on disk: audio probing,
//! the [`SceneRenderer`] backends, the render cache and the export pipeline.

pub mod cache;
pub mod export;
pub mod ffmpeg;
pub mod manifest;
pub mod preview;
pub mod probe;
pub mod renderer;

pub use export::{export, ExportReport, Exporter};
pub use ffmpeg::FfmpegRenderer;
pub use manifest::ManifestRenderer;
pub use probe::{FfprobeProbe, FixedProbe};
pub use renderer::{RenderJob, RenderSettings, SceneRenderer};
