use std::path::Path;

use serde::Serialize;

use marenimalt_core::{MarenimaltResult, RenderConfig, StyleConfig};
use marenimalt_ir::{Directive, Timeline};

/// Everything a renderer needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSettings {
    pub style: StyleConfig,
    pub render: RenderConfig,
}

impl RenderSettings {
    pub fn new(style: StyleConfig, render: RenderConfig) -> Self {
        Self { style, render }
    }

    /// Output `(width, height)` in pixels.
    pub fn resolution(&self) -> (u32, u32) {
        self.render.quality.resolution()
    }

    pub fn fps(&self) -> u32 {
        self.render.quality.fps()
    }
}

/// One render request: the directives, their lowered timeline and the target.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub directives: &'a [Directive],
    pub timeline: &'a Timeline,
    pub settings: &'a RenderSettings,
    pub output: &'a Path,
}

/// Turns a scene into an artifact on disk.
pub trait SceneRenderer {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Write the artifact for `job` to `job.output`. Either the whole
    /// artifact is written or the previous file at that path is left alone.
    fn render(&mut self, job: &RenderJob<'_>) -> MarenimaltResult<()>;
}

impl<R: SceneRenderer + ?Sized> SceneRenderer for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn render(&mut self, job: &RenderJob<'_>) -> MarenimaltResult<()> {
        (**self).render(job)
    }
}
