//! Audio clip lengths.
//! Uses an `ffprobe` subprocess to read the container duration of each clip.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use marenimalt_core::{Duration, MarenimaltError, MarenimaltResult};
use marenimalt_ir::AudioProbe;

/// An audio probe backed by `ffprobe`. Lengths are cached per path.
#[derive(Debug, Default)]
pub struct FfprobeProbe {
    cache: HashMap<PathBuf, Duration>,
}

impl FfprobeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if ffprobe is available on the system.
    pub fn is_available() -> bool {
        Command::new("ffprobe")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn probe(path: &Path) -> MarenimaltResult<Duration> {
        if !path.exists() {
            return Err(MarenimaltError::audio("audio file not found", path));
        }

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| MarenimaltError::audio(format!("failed to run ffprobe: {}", e), path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MarenimaltError::audio(
                format!("ffprobe failed: {}", stderr.trim()),
                path,
            ));
        }

        parse_duration_output(&String::from_utf8_lossy(&output.stdout), path)
    }
}

impl AudioProbe for FfprobeProbe {
    fn duration(&mut self, path: &Path) -> MarenimaltResult<Duration> {
        if let Some(length) = self.cache.get(path) {
            return Ok(*length);
        }
        let length = Self::probe(path)?;
        tracing::debug!("probed {} = {}", path.display(), length);
        self.cache.insert(path.to_path_buf(), length);
        Ok(length)
    }
}

/// Parse the single `format=duration` value ffprobe prints.
pub fn parse_duration_output(stdout: &str, path: &Path) -> MarenimaltResult<Duration> {
    let value = stdout.trim();
    let seconds: f64 = value.parse().map_err(|_| {
        MarenimaltError::audio(format!("unreadable duration '{}' from ffprobe", value), path)
    })?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(MarenimaltError::audio(
            format!("invalid duration {} from ffprobe", seconds),
            path,
        ));
    }
    Ok(Duration::from_seconds(seconds))
}

/// Every clip has the same length. Useful for dry runs without media.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Duration);

impl AudioProbe for FixedProbe {
    fn duration(&mut self, _path: &Path) -> MarenimaltResult<Duration> {
        Ok(self.0)
    }
}
