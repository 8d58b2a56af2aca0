use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LookupMap, MarenimaltError, MarenimaltResult};
use crate::text::DEFAULT_WRAP_WIDTH;

/// File name looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "marenimalt.toml";

/// Names of the record fields read from each input row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldKeys {
    pub content_key: String,
    pub type_key: String,
    pub image_key: String,
    pub audio_file_key: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            content_key: "utterance".to_string(),
            type_key: "model".to_string(),
            image_key: "character".to_string(),
            audio_file_key: "audio_file".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Character budget per caption line.
    pub wrap_width: usize,
    pub font_size: f64,
    /// Character images are drawn at this fraction of the frame height.
    pub image_scale: f64,
    /// Run time of every fade/write, in seconds.
    pub transition_secs: f64,
    /// Background color, `#rrggbb`.
    pub background: String,
    pub text_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            font_size: 24.0,
            image_scale: 0.3,
            transition_secs: 0.5,
            background: "#000000".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

/// Product switches for the sequencers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Start a fresh caption scope for every speaker instead of every content.
    pub reset_caption_per_speaker: bool,
    /// The order-preserving walk plays each record's audio and waits for it.
    pub ordered_plays_audio: bool,
    /// The order-preserving walk writes content and type into the bottom slot.
    pub shared_caption_slot: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            reset_caption_per_speaker: false,
            ordered_plays_audio: true,
            shared_caption_slot: false,
        }
    }
}

/// Output quality presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Low,
    Medium,
    High,
    Production,
    Fourk,
}

impl Quality {
    /// Output `(width, height)` in pixels.
    pub fn resolution(self) -> (u32, u32) {
        match self {
            Quality::Low => (854, 480),
            Quality::Medium => (1280, 720),
            Quality::High => (1920, 1080),
            Quality::Production => (2560, 1440),
            Quality::Fourk => (3840, 2160),
        }
    }

    pub fn fps(self) -> u32 {
        match self {
            Quality::Low => 15,
            Quality::Medium => 30,
            Quality::High | Quality::Production | Quality::Fourk => 60,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
            Quality::Production => "production",
            Quality::Fourk => "fourk",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Quality {
    type Err = MarenimaltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_end_matches("_quality") {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            "production" => Ok(Quality::Production),
            "fourk" | "4k" => Ok(Quality::Fourk),
            other => Err(MarenimaltError::InvalidArgument(format!(
                "unknown quality '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub quality: Quality,
    /// Open the artifact once it has been written.
    pub preview: bool,
    /// Always re-render, ignoring a matching cache sidecar.
    pub disable_caching: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quality: Quality::Low,
            preview: true,
            disable_caching: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MarenimaltConfig {
    #[serde(default)]
    pub fields: FieldKeys,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_map: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_map: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl MarenimaltConfig {
    pub fn from_toml_str(contents: &str) -> MarenimaltResult<Self> {
        toml::from_str(contents).map_err(|e| MarenimaltError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &Path) -> MarenimaltResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|e| MarenimaltError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to_file(&self, path: &Path) -> MarenimaltResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| MarenimaltError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Display image for a raw speaker value.
    pub fn resolve_image<'a>(&'a self, speaker: &'a str) -> MarenimaltResult<&'a str> {
        resolve(self.image_map.as_ref(), LookupMap::Image, speaker)
    }

    /// Display label for a raw type value.
    pub fn resolve_type<'a>(&'a self, kind: &'a str) -> MarenimaltResult<&'a str> {
        resolve(self.type_map.as_ref(), LookupMap::Type, kind)
    }
}

fn resolve<'a>(
    table: Option<&'a BTreeMap<String, String>>,
    map: LookupMap,
    key: &'a str,
) -> MarenimaltResult<&'a str> {
    match table {
        None => Ok(key),
        Some(table) => table
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| MarenimaltError::unmapped(map, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = MarenimaltConfig::default();
        assert_eq!(cfg.fields.content_key, "utterance");
        assert_eq!(cfg.fields.type_key, "model");
        assert_eq!(cfg.fields.image_key, "character");
        assert_eq!(cfg.fields.audio_file_key, "audio_file");
        assert_eq!(cfg.style.wrap_width, 50);
        assert!(cfg.render.disable_caching);
        assert!(cfg.sequence.ordered_plays_audio);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg = MarenimaltConfig::from_toml_str(
            r#"
            [fields]
            content_key = "line"

            [image_map]
            twilight = "img/twilight.png"

            [render]
            quality = "high"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.fields.content_key, "line");
        assert_eq!(cfg.fields.type_key, "model");
        assert_eq!(cfg.render.quality, Quality::High);
        assert!(cfg.render.preview);
        assert!(cfg.type_map.is_none());
        assert_eq!(cfg.resolve_image("twilight").unwrap(), "img/twilight.png");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("marenimalt_test_config.toml");
        let mut cfg = MarenimaltConfig::default();
        cfg.type_map = Some(BTreeMap::from([("rvc".to_string(), "RVC v2".to_string())]));
        cfg.sequence.shared_caption_slot = true;
        cfg.save_to_file(&path).unwrap();

        let loaded = MarenimaltConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, cfg);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = MarenimaltConfig::from_toml_str("[render]\nquality = 7").unwrap_err();
        assert!(matches!(err, MarenimaltError::Config(_)));
    }

    #[test]
    fn test_resolve_without_map_is_identity() {
        let cfg = MarenimaltConfig::default();
        assert_eq!(cfg.resolve_type("rvc").unwrap(), "rvc");
    }

    #[test]
    fn test_resolve_unmapped_key() {
        let cfg = MarenimaltConfig {
            type_map: Some(BTreeMap::new()),
            ..Default::default()
        };
        let err = cfg.resolve_type("rvc").unwrap_err();
        assert!(matches!(
            err,
            MarenimaltError::UnmappedKey { map: LookupMap::Type, .. }
        ));
    }

    #[test]
    fn test_quality_parsing() {
        assert_eq!("low_quality".parse::<Quality>().unwrap(), Quality::Low);
        assert_eq!("4k".parse::<Quality>().unwrap(), Quality::Fourk);
        assert!("ultra".parse::<Quality>().is_err());
        assert_eq!(Quality::Medium.resolution(), (1280, 720));
        assert_eq!(Quality::Low.fps(), 15);
    }
}
