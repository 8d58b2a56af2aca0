use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use marenimalt_core::{FieldKeys, MarenimaltError, MarenimaltResult};

/// A single input row before field mapping (key → value).
pub type RawRecord = BTreeMap<String, String>;

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Utterance text shown at the top of the frame.
    pub content: String,
    /// Raw speaker value; resolves to an image through the image map.
    pub speaker: String,
    /// Raw type value; resolves to the bottom caption through the type map.
    pub kind: String,
    /// Audio clip played while the line is on screen.
    pub audio: PathBuf,
}

impl Record {
    pub fn new(
        content: impl Into<String>,
        speaker: impl Into<String>,
        kind: impl Into<String>,
        audio: impl Into<PathBuf>,
    ) -> Self {
        Self {
            content: content.into(),
            speaker: speaker.into(),
            kind: kind.into(),
            audio: audio.into(),
        }
    }

    /// Read a record out of a raw row using the configured key names.
    ///
    /// `index` is the row's position in the input and only feeds error messages.
    pub fn from_row(row: &RawRecord, keys: &FieldKeys, index: usize) -> MarenimaltResult<Self> {
        let field = |key: &str| {
            row.get(key)
                .cloned()
                .ok_or_else(|| MarenimaltError::missing_field(index, key))
        };

        Ok(Self {
            content: field(&keys.content_key)?,
            speaker: field(&keys.image_key)?,
            kind: field(&keys.type_key)?,
            audio: PathBuf::from(field(&keys.audio_file_key)?),
        })
    }
}

/// Resolve every row, stopping at the first missing field.
pub fn resolve_rows(rows: &[RawRecord], keys: &FieldKeys) -> MarenimaltResult<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| Record::from_row(row, keys, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_row_default_keys() {
        let raw = row(&[
            ("utterance", "Hi"),
            ("character", "twilight"),
            ("model", "rvc"),
            ("audio_file", "clips/a.flac"),
        ]);
        let record = Record::from_row(&raw, &FieldKeys::default(), 0).unwrap();
        assert_eq!(record, Record::new("Hi", "twilight", "rvc", "clips/a.flac"));
    }

    #[test]
    fn test_from_row_custom_keys() {
        let keys = FieldKeys {
            content_key: "line".into(),
            type_key: "voice".into(),
            image_key: "who".into(),
            audio_file_key: "wav".into(),
        };
        let raw = row(&[("line", "Hi"), ("who", "A"), ("voice", "t1"), ("wav", "a.wav")]);
        let record = Record::from_row(&raw, &keys, 0).unwrap();
        assert_eq!(record.speaker, "A");
        assert_eq!(record.kind, "t1");
    }

    #[test]
    fn test_missing_field_names_row_and_key() {
        let rows = vec![
            row(&[("utterance", "Hi"), ("character", "A"), ("model", "t1"), ("audio_file", "a")]),
            row(&[("utterance", "Hi"), ("character", "A"), ("audio_file", "b")]),
        ];
        let err = resolve_rows(&rows, &FieldKeys::default()).unwrap_err();
        match err {
            MarenimaltError::MissingField { record, key } => {
                assert_eq!(record, 1);
                assert_eq!(key, "model");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
