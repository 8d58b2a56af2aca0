use std::path::Path;
use std::process::{Command, Stdio};

use marenimalt_core::{MarenimaltError, MarenimaltResult};

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

/// Open `path` with the platform's default viewer without waiting for it.
pub fn open_in_viewer(path: &Path) -> MarenimaltResult<()> {
    if !path.exists() {
        return Err(MarenimaltError::InvalidArgument(format!(
            "cannot preview missing file {}",
            path.display()
        )));
    }
    Command::new(OPENER)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| MarenimaltError::Render(format!("failed to launch {}: {}", OPENER, e)))?;
    tracing::debug!("opened {} with {}", path.display(), OPENER);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_missing_file() {
        let err = open_in_viewer(Path::new("/nonexistent/marenimalt.mp4")).unwrap_err();
        assert!(matches!(err, MarenimaltError::InvalidArgument(_)));
    }
}
