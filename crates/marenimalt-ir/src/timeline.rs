//! Lowering a directive sequence onto absolute time.
//!
//! Renderers that composite by time range (ffmpeg filter graphs, manifests)
//! consume a [`Timeline`] instead of replaying directives one by one.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use marenimalt_core::{Duration, MarenimaltError, MarenimaltResult, Timestamp};

use crate::directive::{Directive, Slot};

/// What an element span draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementContent {
    Text { slot: Slot, text: String },
    Image { image: String, scale: f64 },
}

/// An element visible from `start` to `end`, fading at both edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpan {
    pub content: ElementContent,
    pub start: Timestamp,
    pub end: Timestamp,
    pub fade_in: Duration,
    pub fade_out: Duration,
}

/// An audio clip starting at `start` and playing to its natural end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCue {
    pub path: PathBuf,
    pub start: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ElementKey {
    Text(Slot),
    Image,
}

/// Element spans and audio cues on one clock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub duration: Duration,
    /// Spans in the order they were shown.
    pub elements: Vec<ElementSpan>,
    /// Cues in the order they were started.
    pub audio: Vec<AudioCue>,
}

impl Timeline {
    /// Replay `directives` against a clock starting at zero.
    ///
    /// Showing into an occupied slot cuts the previous element. Hiding an
    /// empty slot is an error. Elements still shown at the end close at the
    /// final time without a fade.
    pub fn from_directives(directives: &[Directive]) -> MarenimaltResult<Self> {
        let mut clock = Timestamp::zero();
        let mut open: HashMap<ElementKey, usize> = HashMap::new();
        let mut timeline = Timeline::default();

        for (index, directive) in directives.iter().enumerate() {
            match directive {
                Directive::ShowText { slot, text, transition } => {
                    timeline.open(
                        &mut open,
                        ElementKey::Text(*slot),
                        ElementContent::Text {
                            slot: *slot,
                            text: text.clone(),
                        },
                        clock,
                        *transition,
                    );
                }
                Directive::ShowImage {
                    image,
                    scale,
                    transition,
                } => {
                    timeline.open(
                        &mut open,
                        ElementKey::Image,
                        ElementContent::Image {
                            image: image.clone(),
                            scale: *scale,
                        },
                        clock,
                        *transition,
                    );
                }
                Directive::HideText { slot, transition } => {
                    timeline.close(&mut open, ElementKey::Text(*slot), clock, *transition, index)?;
                }
                Directive::HideImage { transition } => {
                    timeline.close(&mut open, ElementKey::Image, clock, *transition, index)?;
                }
                Directive::PlayAudio { path } => timeline.audio.push(AudioCue {
                    path: path.clone(),
                    start: clock,
                }),
                Directive::Wait { .. } => {}
            }
            clock = clock + directive.advance();
        }

        for (_, idx) in open {
            timeline.elements[idx].end = clock;
        }
        timeline.duration = Duration::from_seconds(clock.as_seconds());
        Ok(timeline)
    }

    fn open(
        &mut self,
        open: &mut HashMap<ElementKey, usize>,
        key: ElementKey,
        content: ElementContent,
        at: Timestamp,
        fade_in: Duration,
    ) {
        if let Some(prev) = open.remove(&key) {
            self.elements[prev].end = at;
        }
        self.elements.push(ElementSpan {
            content,
            start: at,
            end: at + fade_in,
            fade_in,
            fade_out: Duration::zero(),
        });
        open.insert(key, self.elements.len() - 1);
    }

    fn close(
        &mut self,
        open: &mut HashMap<ElementKey, usize>,
        key: ElementKey,
        at: Timestamp,
        fade_out: Duration,
        index: usize,
    ) -> MarenimaltResult<()> {
        let idx = open.remove(&key).ok_or_else(|| {
            let what = match key {
                ElementKey::Text(slot) => format!("{} text", slot),
                ElementKey::Image => "image".to_string(),
            };
            MarenimaltError::TimelineValidation(format!(
                "directive {} hides the {} but nothing is shown",
                index, what
            ))
        })?;
        let span = &mut self.elements[idx];
        span.end = at + fade_out;
        span.fade_out = fade_out;
        Ok(())
    }

    /// Spans visible at time `t`.
    pub fn visible_at(&self, t: Timestamp) -> impl Iterator<Item = &ElementSpan> {
        self.elements
            .iter()
            .filter(move |span| span.start <= t && t < span.end)
    }
}
