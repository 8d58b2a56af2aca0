use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::record::Record;

/// One spoken line within a speaker group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub audio: PathBuf,
    pub kind: String,
}

/// All lines a speaker contributes to one content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerGroup {
    pub speaker: String,
    /// Lines in input order.
    pub lines: Vec<Line>,
}

/// All speakers that say one content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentGroup {
    pub content: String,
    /// Speakers in first-seen order.
    pub speakers: Vec<SpeakerGroup>,
    #[serde(skip)]
    speaker_index: HashMap<String, usize>,
}

impl ContentGroup {
    fn new(content: String) -> Self {
        Self {
            content,
            speakers: Vec::new(),
            speaker_index: HashMap::new(),
        }
    }

    fn speaker_mut(&mut self, speaker: &str) -> &mut SpeakerGroup {
        let idx = match self.speaker_index.get(speaker) {
            Some(&idx) => idx,
            None => {
                self.speakers.push(SpeakerGroup {
                    speaker: speaker.to_string(),
                    lines: Vec::new(),
                });
                let idx = self.speakers.len() - 1;
                self.speaker_index.insert(speaker.to_string(), idx);
                idx
            }
        };
        &mut self.speakers[idx]
    }

    pub fn get_speaker(&self, speaker: &str) -> Option<&SpeakerGroup> {
        self.speaker_index.get(speaker).map(|&idx| &self.speakers[idx])
    }
}

/// Records grouped two levels deep: content → speaker → lines.
///
/// Contents and speakers keep first-seen order; lines keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedContents {
    pub contents: Vec<ContentGroup>,
    #[serde(skip)]
    content_index: HashMap<String, usize>,
}

impl GroupedContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `records` in a single pass. Identical `(content, speaker)` pairs
    /// accumulate; nothing is deduplicated.
    pub fn group<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut grouped = Self::new();
        for record in records {
            grouped.push(record);
        }
        grouped
    }

    /// Append one record to its group, creating groups as needed.
    pub fn push(&mut self, record: &Record) {
        let idx = match self.content_index.get(&record.content) {
            Some(&idx) => idx,
            None => {
                self.contents.push(ContentGroup::new(record.content.clone()));
                let idx = self.contents.len() - 1;
                self.content_index.insert(record.content.clone(), idx);
                idx
            }
        };
        self.contents[idx]
            .speaker_mut(&record.speaker)
            .lines
            .push(Line {
                audio: record.audio.clone(),
                kind: record.kind.clone(),
            });
    }

    pub fn get(&self, content: &str) -> Option<&ContentGroup> {
        self.content_index.get(content).map(|&idx| &self.contents[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentGroup> {
        self.contents.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Total number of lines across every group.
    pub fn line_count(&self) -> usize {
        self.contents
            .iter()
            .flat_map(|c| c.speakers.iter())
            .map(|s| s.lines.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn scenario() -> Vec<Record> {
        vec![
            Record::new("Hi", "A", "t1", "a.wav"),
            Record::new("Hi", "A", "t1", "b.wav"),
            Record::new("Hi", "B", "t2", "c.wav"),
        ]
    }

    fn line(audio: &str, kind: &str) -> Line {
        Line {
            audio: PathBuf::from(audio),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn test_group_scenario() {
        let grouped = GroupedContents::group(&scenario());
        assert_eq!(grouped.contents.len(), 1);
        let hi = grouped.get("Hi").unwrap();
        assert_eq!(hi.speakers.len(), 2);
        assert_eq!(
            hi.get_speaker("A").unwrap().lines,
            vec![line("a.wav", "t1"), line("b.wav", "t1")]
        );
        assert_eq!(hi.get_speaker("B").unwrap().lines, vec![line("c.wav", "t2")]);
    }

    #[test]
    fn test_group_empty() {
        let grouped = GroupedContents::group(&Vec::<Record>::new());
        assert!(grouped.is_empty());
        assert_eq!(grouped.line_count(), 0);
    }

    #[test]
    fn test_first_seen_order() {
        let records = vec![
            Record::new("second?", "Z", "t", "1"),
            Record::new("first?", "Y", "t", "2"),
            Record::new("second?", "A", "t", "3"),
            Record::new("second?", "Z", "t", "4"),
        ];
        let grouped = GroupedContents::group(&records);
        let contents: Vec<&str> = grouped.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["second?", "first?"]);
        let speakers: Vec<&str> = grouped.contents[0]
            .speakers
            .iter()
            .map(|s| s.speaker.as_str())
            .collect();
        assert_eq!(speakers, vec!["Z", "A"]);
    }

    #[test]
    fn test_pairs_and_counts_match_input() {
        let records: Vec<Record> = (0..40)
            .map(|i| {
                Record::new(
                    format!("c{}", i % 3),
                    format!("s{}", (i * 7) % 4),
                    format!("t{}", i % 2),
                    format!("{i}.wav"),
                )
            })
            .collect();
        let grouped = GroupedContents::group(&records);

        let expected: HashSet<(String, String)> = records
            .iter()
            .map(|r| (r.content.clone(), r.speaker.clone()))
            .collect();
        let mut actual = HashSet::new();
        for content in grouped.iter() {
            for speaker in &content.speakers {
                actual.insert((content.content.clone(), speaker.speaker.clone()));
                let in_order: Vec<PathBuf> = records
                    .iter()
                    .filter(|r| r.content == content.content && r.speaker == speaker.speaker)
                    .map(|r| r.audio.clone())
                    .collect();
                let got: Vec<PathBuf> = speaker.lines.iter().map(|l| l.audio.clone()).collect();
                assert_eq!(got, in_order);
            }
        }
        assert_eq!(actual, expected);
        assert_eq!(grouped.line_count(), records.len());
    }
}
