use marenimalt_core::{wrap_text, MarenimaltConfig, MarenimaltResult};

use super::{builder_for, AudioProbe};
use crate::directive::{Directive, DirectiveBuilder, Slot};
use crate::group::GroupedContents;

/// Bottom-caption state for one caption scope.
///
/// A caption is redrawn only when the raw type differs from the last one drawn
/// in the current scope. Resetting the scope forces the next caption to be
/// redrawn but leaves the current one on screen until it is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionTracker {
    last_kind: Option<String>,
    on_screen: bool,
}

impl CaptionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_redraw(&self, kind: &str) -> bool {
        self.last_kind.as_deref() != Some(kind)
    }

    pub fn reset_scope(&mut self) {
        self.last_kind = None;
    }

    /// Replace the bottom caption with `text`.
    pub fn draw(&mut self, builder: &mut DirectiveBuilder, kind: &str, text: String) {
        if self.on_screen {
            builder.hide_text(Slot::Bottom);
        }
        builder.show_text(Slot::Bottom, text);
        self.last_kind = Some(kind.to_string());
        self.on_screen = true;
    }

    /// Hide the caption if one is shown and forget the last type.
    pub fn clear(&mut self, builder: &mut DirectiveBuilder) {
        if self.on_screen {
            builder.hide_text(Slot::Bottom);
        }
        *self = Self::default();
    }
}

/// Walk grouped contents content by content, speaker by speaker.
///
/// The caption scope is the whole content unless
/// `sequence.reset_caption_per_speaker` is set, so by default a type repeated
/// by the next speaker stays on screen without a redraw.
pub fn sequence_grouped(
    grouped: &GroupedContents,
    cfg: &MarenimaltConfig,
    probe: &mut dyn AudioProbe,
) -> MarenimaltResult<Vec<Directive>> {
    let width = cfg.style.wrap_width;
    let mut builder = builder_for(cfg);

    for content in grouped.iter() {
        builder.show_text(Slot::Top, wrap_text(&content.content, width));
        let mut captions = CaptionTracker::new();

        for speaker in &content.speakers {
            let image = cfg.resolve_image(&speaker.speaker)?;
            builder.show_image(image);
            if cfg.sequence.reset_caption_per_speaker {
                captions.reset_scope();
            }

            for line in &speaker.lines {
                let label = cfg.resolve_type(&line.kind)?;
                if captions.needs_redraw(&line.kind) {
                    captions.draw(&mut builder, &line.kind, wrap_text(label, width));
                }
                let length = probe.duration(&line.audio)?;
                builder.play_audio(line.audio.clone()).wait(length);
            }

            builder.hide_image();
        }

        captions.clear(&mut builder);
        builder.hide_text(Slot::Top);
    }

    Ok(builder.build())
}
