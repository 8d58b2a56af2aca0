//! JSON render manifest.
//!
//! Writes the directives, their lowered timeline and the render settings to a
//! single JSON document, for external renderers or for inspecting a plan.

use serde::Serialize;

use marenimalt_core::{Duration, MarenimaltResult};
use marenimalt_ir::{Directive, Timeline};

use crate::renderer::{RenderJob, RenderSettings, SceneRenderer};

/// Bumped whenever the manifest layout changes.
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub version: u32,
    pub duration: Duration,
    pub settings: &'a RenderSettings,
    pub timeline: &'a Timeline,
    pub directives: &'a [Directive],
}

impl<'a> Manifest<'a> {
    pub fn from_job(job: &RenderJob<'a>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            duration: job.timeline.duration,
            settings: job.settings,
            timeline: job.timeline,
            directives: job.directives,
        }
    }
}

/// Renders a scene to its JSON manifest.
#[derive(Debug, Default)]
pub struct ManifestRenderer;

impl SceneRenderer for ManifestRenderer {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn render(&mut self, job: &RenderJob<'_>) -> MarenimaltResult<()> {
        let json = serde_json::to_string_pretty(&Manifest::from_job(job))?;

        if let Some(parent) = job.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(job.output, json)?;

        tracing::info!(
            "wrote manifest with {} directives to {}",
            job.directives.len(),
            job.output.display()
        );
        Ok(())
    }
}
