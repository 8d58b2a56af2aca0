//! Render cache.
//!
//! Each rendered artifact gets a `<output>.sha256` sidecar holding the plan
//! hash it was rendered from. An export whose plan hashes to the same value
//! as the sidecar can reuse the existing artifact.

use std::path::{Path, PathBuf};

use marenimalt_core::hash::hash_sections;
use marenimalt_core::{ContentHash, MarenimaltResult};
use marenimalt_ir::Directive;

use crate::renderer::RenderSettings;

/// Hash the directives together with the settings that shape their render.
///
/// Referenced media is identified by path only.
pub fn plan_hash(directives: &[Directive], settings: &RenderSettings) -> MarenimaltResult<ContentHash> {
    let directives = serde_json::to_vec(directives)?;
    let style = serde_json::to_vec(&settings.style)?;
    let quality = serde_json::to_vec(&settings.render.quality)?;
    Ok(hash_sections([
        directives.as_slice(),
        style.as_slice(),
        quality.as_slice(),
    ]))
}

pub fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Whether `output` exists and was rendered from `hash`.
pub fn is_fresh(output: &Path, hash: &ContentHash) -> bool {
    if !output.exists() {
        return false;
    }
    std::fs::read_to_string(sidecar_path(output))
        .ok()
        .and_then(|s| ContentHash::from_hex(&s))
        .is_some_and(|stored| &stored == hash)
}

pub fn record(output: &Path, hash: &ContentHash) -> MarenimaltResult<()> {
    std::fs::write(sidecar_path(output), format!("{}\n", hash.to_hex()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marenimalt_core::{Duration, Quality, RenderConfig, StyleConfig};
    use marenimalt_ir::{DirectiveBuilder, Slot};

    fn directives(text: &str) -> Vec<Directive> {
        let mut b = DirectiveBuilder::new(Duration::from_seconds(0.5), 0.3);
        b.show_text(Slot::Top, text).hide_text(Slot::Top);
        b.build()
    }

    fn settings() -> RenderSettings {
        RenderSettings::new(StyleConfig::default(), RenderConfig::default())
    }

    #[test]
    fn test_plan_hash_is_stable() {
        let a = plan_hash(&directives("Hi"), &settings()).unwrap();
        let b = plan_hash(&directives("Hi"), &settings()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plan_hash_tracks_content_and_quality() {
        let base = plan_hash(&directives("Hi"), &settings()).unwrap();
        assert_ne!(base, plan_hash(&directives("Ho"), &settings()).unwrap());

        let mut high = settings();
        high.render.quality = Quality::High;
        assert_ne!(base, plan_hash(&directives("Hi"), &high).unwrap());
    }

    #[test]
    fn test_plan_hash_ignores_preview_flag() {
        let mut quiet = settings();
        quiet.render.preview = false;
        assert_eq!(
            plan_hash(&directives("Hi"), &settings()).unwrap(),
            plan_hash(&directives("Hi"), &quiet).unwrap()
        );
    }

    #[test]
    fn test_sidecar_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("video.mp4");
        let hash = plan_hash(&directives("Hi"), &settings()).unwrap();

        assert!(!is_fresh(&output, &hash));
        std::fs::write(&output, b"fake").unwrap();
        assert!(!is_fresh(&output, &hash));

        record(&output, &hash).unwrap();
        assert_eq!(sidecar_path(&output), dir.path().join("video.mp4.sha256"));
        assert!(is_fresh(&output, &hash));

        let other = plan_hash(&directives("Ho"), &settings()).unwrap();
        assert!(!is_fresh(&output, &other));
    }
}
