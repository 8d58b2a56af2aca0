use std::path::Path;

use marenimalt_core::{MarenimaltConfig, MarenimaltResult};

use crate::data::RecordSet;
use crate::directive::Directive;
use crate::group::GroupedContents;
use crate::record::{resolve_rows, RawRecord, Record};
use crate::sequence::{self, AudioProbe, SequenceMode};

/// A dialogue video: the resolved records plus the config they are read with.
#[derive(Debug, Clone)]
pub struct Marenimalt {
    records: Vec<Record>,
    config: MarenimaltConfig,
}

impl Marenimalt {
    pub fn new(records: Vec<Record>, config: MarenimaltConfig) -> Self {
        Self { records, config }
    }

    /// Resolve raw rows through the configured field keys.
    pub fn from_rows(rows: &[RawRecord], config: MarenimaltConfig) -> MarenimaltResult<Self> {
        let records = resolve_rows(rows, &config.fields)?;
        Ok(Self::new(records, config))
    }

    /// Load a .json or .csv record file.
    pub fn load(path: &Path, config: MarenimaltConfig) -> MarenimaltResult<Self> {
        let set = RecordSet::load(path)?;
        tracing::debug!("loaded {} rows from {}", set.len(), path.display());
        Self::from_rows(&set.rows, config)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn config(&self) -> &MarenimaltConfig {
        &self.config
    }

    pub fn grouped(&self) -> GroupedContents {
        GroupedContents::group(&self.records)
    }

    /// Build the directive sequence for this video.
    pub fn plan(
        &self,
        probe: &mut dyn AudioProbe,
        mode: SequenceMode,
    ) -> MarenimaltResult<Vec<Directive>> {
        sequence::sequence(&self.records, &self.config, probe, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::test_support::TableProbe;
    use marenimalt_core::MarenimaltError;

    #[test]
    fn test_load_and_plan_json() {
        let path = std::env::temp_dir().join("marenimalt_test_project.json");
        std::fs::write(
            &path,
            r#"[
                {"character": "twilight.png", "utterance": "Letting the mares go by.", "model": "rvc", "audio_file": "twilight.flac"},
                {"character": "fluttershy.png", "utterance": "Letting the mares go by.", "model": "rvc", "audio_file": "fluttershy.flac"},
                {"character": "rarity.png", "utterance": "Letting the mares go by too.", "model": "rvc", "audio_file": "rarity.flac"}
            ]"#,
        )
        .unwrap();

        let project = Marenimalt::load(&path, MarenimaltConfig::default()).unwrap();
        assert_eq!(project.records().len(), 3);
        assert_eq!(project.grouped().contents.len(), 2);

        let mut probe = TableProbe::with(&[
            ("twilight.flac", 1.0),
            ("fluttershy.flac", 1.5),
            ("rarity.flac", 2.0),
        ]);
        let grouped = project.plan(&mut probe, SequenceMode::Grouped).unwrap();
        let ordered = project.plan(&mut probe, SequenceMode::Ordered).unwrap();
        assert!(!grouped.is_empty());
        assert!(!ordered.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_from_rows_reports_missing_field() {
        let mut row = RawRecord::new();
        row.insert("utterance".into(), "Hi".into());
        let err = Marenimalt::from_rows(&[row], MarenimaltConfig::default()).unwrap_err();
        assert!(matches!(err, MarenimaltError::MissingField { record: 0, .. }));
    }
}
