//! The export pipeline: plan, lower, validate, render, cache, preview.

use std::path::{Path, PathBuf};

use serde::Serialize;

use marenimalt_core::{
    sanitize_filename, Duration, MarenimaltError, MarenimaltResult, RenderConfig,
    DEFAULT_MAX_FILENAME_LEN,
};
use marenimalt_ir::validate::validate_timeline;
use marenimalt_ir::{AudioProbe, Marenimalt, SequenceMode, Timeline};

use crate::cache;
use crate::ffmpeg::FfmpegRenderer;
use crate::preview;
use crate::probe::FfprobeProbe;
use crate::renderer::{RenderJob, RenderSettings, SceneRenderer};

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub output: PathBuf,
    pub directives: usize,
    pub duration: Duration,
    /// The artifact was already up to date and nothing was rendered.
    pub cached: bool,
}

/// Runs a project through a probe and a renderer.
pub struct Exporter<P, R> {
    probe: P,
    renderer: R,
}

impl Exporter<FfprobeProbe, FfmpegRenderer> {
    /// The default pipeline: `ffprobe` for clip lengths, `ffmpeg` for output.
    pub fn ffmpeg() -> Self {
        Self::new(FfprobeProbe::new(), FfmpegRenderer)
    }
}

impl<P: AudioProbe, R: SceneRenderer> Exporter<P, R> {
    pub fn new(probe: P, renderer: R) -> Self {
        Self { probe, renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn export(
        &mut self,
        project: &Marenimalt,
        output: &Path,
        render: &RenderConfig,
        mode: SequenceMode,
    ) -> MarenimaltResult<ExportReport> {
        let output = sanitized_output(output)?;

        let directives = project.plan(&mut self.probe, mode)?;
        let timeline = Timeline::from_directives(&directives)?;
        validate_timeline(&timeline).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            MarenimaltError::TimelineValidation(messages.join("; "))
        })?;

        let settings = RenderSettings::new(project.config().style.clone(), render.clone());
        let hash = cache::plan_hash(&directives, &settings)?;

        let mut report = ExportReport {
            output: output.clone(),
            directives: directives.len(),
            duration: timeline.duration,
            cached: false,
        };

        if !render.disable_caching && cache::is_fresh(&output, &hash) {
            tracing::info!("{} is up to date ({})", output.display(), hash);
            report.cached = true;
            return Ok(report);
        }

        tracing::info!(
            "rendering {} directives ({}) with {}",
            directives.len(),
            timeline.duration,
            self.renderer.name()
        );
        self.renderer.render(&RenderJob {
            directives: &directives,
            timeline: &timeline,
            settings: &settings,
            output: &output,
        })?;

        if !render.disable_caching {
            cache::record(&output, &hash)?;
        }

        if render.preview {
            if let Err(e) = preview::open_in_viewer(&output) {
                tracing::warn!("preview failed: {}", e);
            }
        }

        Ok(report)
    }
}

/// Export with the default ffprobe/ffmpeg pipeline.
pub fn export(
    project: &Marenimalt,
    output: &Path,
    render: &RenderConfig,
    ordered: bool,
) -> MarenimaltResult<ExportReport> {
    let mode = if ordered {
        SequenceMode::Ordered
    } else {
        SequenceMode::Grouped
    };
    Exporter::ffmpeg().export(project, output, render, mode)
}

/// `output` with its file stem passed through the filename sanitizer.
/// The directory and extension are kept. A name such as `.mp4` is read as an
/// empty stem with an extension, so it becomes `default_filename.mp4`.
pub fn sanitized_output(output: &Path) -> MarenimaltResult<PathBuf> {
    let file_name = output
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| {
            MarenimaltError::InvalidArgument(format!("output path has no file name: {}", output.display()))
        })?;

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (file_name.as_str(), None),
    };

    let mut name = sanitize_filename(stem, DEFAULT_MAX_FILENAME_LEN);
    if let Some(ext) = ext {
        name.push('.');
        name.push_str(ext);
    }
    if name != file_name {
        tracing::debug!("output name sanitized to {}", name);
    }

    Ok(match output.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    })
}
