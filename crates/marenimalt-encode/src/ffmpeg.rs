use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use marenimalt_core::{Duration, MarenimaltError, MarenimaltResult, Timestamp};
use marenimalt_ir::{ElementContent, ElementSpan, Slot, Timeline};

use crate::renderer::{RenderJob, RenderSettings, SceneRenderer};

/// Caption margin from the top or bottom edge, as a fraction of frame height.
const CAPTION_MARGIN: f64 = 0.08;

/// Frame height the configured font size is expressed against.
const FONT_REFERENCE_HEIGHT: f64 = 480.0;

/// A fully planned ffmpeg invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FfmpegPlan {
    /// Arguments after the `ffmpeg` program name.
    pub args: Vec<String>,
    /// Caption text files the filter graph reads, with their contents.
    pub captions: Vec<(PathBuf, String)>,
}

/// Renderer that composites the timeline with a single FFmpeg filter graph
/// and encodes it to H.264/AAC.
#[derive(Debug, Default)]
pub struct FfmpegRenderer;

impl FfmpegRenderer {
    /// Check if FFmpeg is available on the system.
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl SceneRenderer for FfmpegRenderer {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn render(&mut self, job: &RenderJob<'_>) -> MarenimaltResult<()> {
        if job.timeline.duration.is_zero() {
            return Err(MarenimaltError::Render("nothing to render: timeline is empty".into()));
        }

        if !Self::is_available() {
            return Err(MarenimaltError::Render(
                "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html".into(),
            ));
        }

        let parent = match job.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        // The encode lands next to the target and is renamed over it at the end,
        // so a failed run never leaves a truncated file behind.
        let suffix = job
            .output
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| ".mp4".to_string());
        let staging = tempfile::Builder::new()
            .prefix(".marenimalt-")
            .suffix(&suffix)
            .tempfile_in(&parent)?
            .into_temp_path();

        let caption_dir = tempfile::tempdir()?;
        let plan = plan_command(job.timeline, job.settings, caption_dir.path(), &staging)?;
        for (path, text) in &plan.captions {
            std::fs::write(path, text)?;
        }

        tracing::debug!("ffmpeg {}", plan.args.join(" "));

        let output = Command::new("ffmpeg")
            .arg("-y")
            .args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| MarenimaltError::Render(format!("failed to start ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MarenimaltError::Render(format!(
                "ffmpeg failed with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        staging.persist(job.output).map_err(|e| {
            MarenimaltError::Render(format!(
                "failed to move render into {}: {}",
                job.output.display(),
                e
            ))
        })?;

        let (width, height) = job.settings.resolution();
        tracing::info!(
            "Encoded {} to {} ({}x{} @ {}fps)",
            job.timeline.duration,
            job.output.display(),
            width,
            height,
            job.settings.fps()
        );

        Ok(())
    }
}

/// Build the ffmpeg arguments for `timeline`, writing to `output`.
///
/// Input 0 is a solid background for the whole duration. Each image span gets
/// its own looped input and each audio cue its own input. Caption files are
/// planned under `caption_dir` but not written.
pub fn plan_command(
    timeline: &Timeline,
    settings: &RenderSettings,
    caption_dir: &Path,
    output: &Path,
) -> MarenimaltResult<FfmpegPlan> {
    if timeline.duration.is_zero() {
        return Err(MarenimaltError::Render("nothing to render: timeline is empty".into()));
    }

    let (width, height) = settings.resolution();
    let fps = settings.fps();
    let total = seconds(timeline.duration);
    let background = ffmpeg_color(&settings.style.background);
    let text_color = ffmpeg_color(&settings.style.text_color);
    let font_size = (settings.style.font_size * height as f64 / FONT_REFERENCE_HEIGHT).round();

    let mut args: Vec<String> = vec![
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        format!("color=c={}:s={}x{}:r={}:d={}", background, width, height, fps, total),
    ];
    let mut next_input = 1usize;
    let mut graph = String::new();
    let mut captions = Vec::new();
    let mut current = "0:v".to_string();

    for (i, span) in timeline.elements.iter().enumerate() {
        let label = format!("v{}", i);
        match &span.content {
            ElementContent::Image { image, scale } => {
                args.extend([
                    "-loop".into(),
                    "1".into(),
                    "-framerate".into(),
                    fps.to_string(),
                    "-t".into(),
                    total.clone(),
                    "-i".into(),
                    image.clone(),
                ]);
                let input = next_input;
                next_input += 1;

                let target_height = even((height as f64 * scale).round() as u32);
                let _ = write!(
                    graph,
                    "[{}:v]scale=-2:{},format=rgba{}[img{}];",
                    input,
                    target_height,
                    image_fades(span),
                    i
                );
                let _ = write!(
                    graph,
                    "[{}][img{}]overlay=x=(W-w)/2:y=(H-h)/2:enable='{}'[{}];",
                    current,
                    i,
                    enable_between(span),
                    label
                );
            }
            ElementContent::Text { slot, text } => {
                let path = caption_dir.join(format!("caption_{}.txt", i));
                let y = match slot {
                    Slot::Top => format!("h*{}", CAPTION_MARGIN),
                    Slot::Bottom => format!("h-text_h-h*{}", CAPTION_MARGIN),
                };
                let _ = write!(
                    graph,
                    "[{}]drawtext=textfile={}:expansion=none:fontsize={}:fontcolor={}:x=(w-text_w)/2:y={}:alpha='{}':enable='{}'[{}];",
                    current,
                    escape_filter_path(&path),
                    font_size,
                    text_color,
                    y,
                    text_alpha(span),
                    enable_between(span),
                    label
                );
                captions.push((path, text.clone()));
            }
        }
        current = label;
    }
    let _ = write!(graph, "[{}]format=yuv420p[vout]", current);

    if !timeline.audio.is_empty() {
        let mut mix_inputs = String::new();
        for (j, cue) in timeline.audio.iter().enumerate() {
            args.push("-i".into());
            args.push(cue.path.to_string_lossy().into_owned());
            let delay_ms = cue.start.whole_millis();
            let _ = write!(
                graph,
                ";[{}:a]adelay={}|{}:all=1[a{}]",
                next_input, delay_ms, delay_ms, j
            );
            let _ = write!(mix_inputs, "[a{}]", j);
            next_input += 1;
        }
        let _ = write!(
            graph,
            ";{}amix=inputs={}:duration=longest:normalize=0[aout]",
            mix_inputs,
            timeline.audio.len()
        );
    }

    args.extend(["-filter_complex".into(), graph, "-map".into(), "[vout]".into()]);
    if !timeline.audio.is_empty() {
        args.extend([
            "-map".into(),
            "[aout]".into(),
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            "192k".into(),
        ]);
    }
    args.extend([
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-preset".into(),
        "medium".into(),
        "-crf".into(),
        "23".into(),
        "-movflags".into(),
        "+faststart".into(),
        "-t".into(),
        total,
        output.to_string_lossy().into_owned(),
    ]);

    Ok(FfmpegPlan { args, captions })
}

fn seconds(d: Duration) -> String {
    format!("{:.3}", d.as_seconds())
}

fn at(t: Timestamp) -> String {
    format!("{:.3}", t.as_seconds())
}

fn even(n: u32) -> u32 {
    (n.max(2) / 2) * 2
}

/// `#rrggbb` to ffmpeg's `0xrrggbb`. Named colors pass through.
fn ffmpeg_color(color: &str) -> String {
    match color.strip_prefix('#') {
        Some(hex) => format!("0x{}", hex),
        None => color.to_string(),
    }
}

fn escape_filter_path(path: &Path) -> String {
    let mut escaped = String::new();
    for c in path.to_string_lossy().chars() {
        if matches!(c, '\\' | ':' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn enable_between(span: &ElementSpan) -> String {
    format!("between(t,{},{})", at(span.start), at(span.end))
}

fn image_fades(span: &ElementSpan) -> String {
    let mut fades = String::new();
    if !span.fade_in.is_zero() {
        let _ = write!(
            fades,
            ",fade=t=in:st={}:d={}:alpha=1",
            at(span.start),
            seconds(span.fade_in)
        );
    }
    if !span.fade_out.is_zero() {
        let start = span.end.as_seconds() - span.fade_out.as_seconds();
        let _ = write!(
            fades,
            ",fade=t=out:st={:.3}:d={}:alpha=1",
            start,
            seconds(span.fade_out)
        );
    }
    fades
}

/// Opacity ramp for drawtext: up over the fade-in, down over the fade-out.
fn text_alpha(span: &ElementSpan) -> String {
    let mut expr = "1".to_string();
    if !span.fade_out.is_zero() {
        let start = span.end.as_seconds() - span.fade_out.as_seconds();
        expr = format!(
            "if(gt(t,{:.3}),({}-t)/{},{})",
            start,
            at(span.end),
            seconds(span.fade_out),
            expr
        );
    }
    if !span.fade_in.is_zero() {
        let ramp_end = span.start.as_seconds() + span.fade_in.as_seconds();
        expr = format!(
            "if(lt(t,{:.3}),(t-{})/{},{})",
            ramp_end,
            at(span.start),
            seconds(span.fade_in),
            expr
        );
    }
    expr
}
