use marenimalt_core::{wrap_text, MarenimaltConfig, MarenimaltResult};

use super::{builder_for, AudioProbe};
use crate::directive::{Directive, DirectiveBuilder, Slot};
use crate::record::Record;

/// What the previous record put on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedState {
    pub image: Option<String>,
    pub kind: Option<String>,
    pub content: Option<String>,
}

impl OrderedState {
    pub fn image_changed(&self, record: &Record) -> bool {
        self.image.as_deref() != Some(record.speaker.as_str())
    }

    pub fn kind_changed(&self, record: &Record) -> bool {
        self.kind.as_deref() != Some(record.kind.as_str())
    }

    pub fn content_changed(&self, record: &Record) -> bool {
        self.content.as_deref() != Some(record.content.as_str())
    }

    /// State after `record` has been shown.
    pub fn next(&self, record: &Record) -> OrderedState {
        OrderedState {
            image: Some(record.speaker.clone()),
            kind: Some(record.kind.clone()),
            content: Some(record.content.clone()),
        }
    }
}

#[derive(Default)]
struct Screen {
    image: bool,
    top: bool,
    bottom: bool,
}

impl Screen {
    fn occupied(&mut self, slot: Slot) -> &mut bool {
        match slot {
            Slot::Top => &mut self.top,
            Slot::Bottom => &mut self.bottom,
        }
    }

    fn replace_text(&mut self, builder: &mut DirectiveBuilder, slot: Slot, text: String) {
        let occupied = self.occupied(slot);
        if *occupied {
            builder.hide_text(slot);
        }
        builder.show_text(slot, text);
        *occupied = true;
    }
}

/// Walk records in input order, redrawing only what changed.
///
/// One transition-length pause follows every record that changed something
/// on screen. With `sequence.ordered_plays_audio` each record then plays its
/// clip and waits for it. Everything still shown is hidden at the end.
pub fn sequence_ordered(
    records: &[Record],
    cfg: &MarenimaltConfig,
    probe: &mut dyn AudioProbe,
) -> MarenimaltResult<Vec<Directive>> {
    let width = cfg.style.wrap_width;
    let content_slot = if cfg.sequence.shared_caption_slot {
        Slot::Bottom
    } else {
        Slot::Top
    };

    let mut builder = builder_for(cfg);
    let mut screen = Screen::default();
    let mut state = OrderedState::default();

    for record in records {
        let image = cfg.resolve_image(&record.speaker)?;
        let label = cfg.resolve_type(&record.kind)?;
        let mut changed = false;

        if state.image_changed(record) {
            if screen.image {
                builder.hide_image();
            }
            builder.show_image(image);
            screen.image = true;
            changed = true;
        }

        if state.kind_changed(record) {
            screen.replace_text(&mut builder, Slot::Bottom, wrap_text(label, width));
            changed = true;
        }

        if state.content_changed(record) {
            screen.replace_text(&mut builder, content_slot, wrap_text(&record.content, width));
            changed = true;
        }

        if changed {
            builder.pause();
        }

        if cfg.sequence.ordered_plays_audio {
            let length = probe.duration(&record.audio)?;
            builder.play_audio(record.audio.clone()).wait(length);
        }

        state = state.next(record);
    }

    if screen.image {
        builder.hide_image();
    }
    if screen.bottom {
        builder.hide_text(Slot::Bottom);
    }
    if screen.top {
        builder.hide_text(Slot::Top);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use marenimalt_core::Duration;

    use super::*;
    use crate::sequence::test_support::TableProbe;

    fn scenario() -> Vec<Record> {
        vec![
            Record::new("Hi", "A", "t1", "a.wav"),
            Record::new("Hi", "A", "t1", "b.wav"),
            Record::new("Hi", "B", "t2", "c.wav"),
        ]
    }

    fn probe() -> TableProbe {
        TableProbe::with(&[("a.wav", 1.0), ("b.wav", 2.0), ("c.wav", 3.0)])
    }

    fn t() -> Duration {
        Duration::from_seconds(0.5)
    }

    fn show(slot: Slot, text: &str) -> Directive {
        Directive::ShowText {
            slot,
            text: text.into(),
            transition: t(),
        }
    }

    fn hide(slot: Slot) -> Directive {
        Directive::HideText {
            slot,
            transition: t(),
        }
    }

    fn image(name: &str) -> Directive {
        Directive::ShowImage {
            image: name.into(),
            scale: 0.3,
            transition: t(),
        }
    }

    fn wait(secs: f64) -> Directive {
        Directive::Wait {
            duration: Duration::from_seconds(secs),
        }
    }

    fn play(path: &str) -> Directive {
        Directive::PlayAudio {
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_scenario_exact_sequence() {
        let directives =
            sequence_ordered(&scenario(), &MarenimaltConfig::default(), &mut probe()).unwrap();
        let hide_image = Directive::HideImage { transition: t() };
        let expected = vec![
            image("A"),
            show(Slot::Bottom, "t1"),
            show(Slot::Top, "Hi"),
            wait(0.5),
            play("a.wav"),
            wait(1.0),
            play("b.wav"),
            wait(2.0),
            hide_image.clone(),
            image("B"),
            hide(Slot::Bottom),
            show(Slot::Bottom, "t2"),
            wait(0.5),
            play("c.wav"),
            wait(3.0),
            hide_image,
            hide(Slot::Bottom),
            hide(Slot::Top),
        ];
        assert_eq!(directives, expected);
    }

    #[test]
    fn test_content_change_redraws_only_top() {
        let records = vec![
            Record::new("Hi", "A", "t1", "a.wav"),
            Record::new("Bye", "A", "t1", "b.wav"),
        ];
        let directives =
            sequence_ordered(&records, &MarenimaltConfig::default(), &mut probe()).unwrap();
        let expected = vec![
            image("A"),
            show(Slot::Bottom, "t1"),
            show(Slot::Top, "Hi"),
            wait(0.5),
            play("a.wav"),
            wait(1.0),
            hide(Slot::Top),
            show(Slot::Top, "Bye"),
            wait(0.5),
            play("b.wav"),
            wait(2.0),
            Directive::HideImage { transition: t() },
            hide(Slot::Bottom),
            hide(Slot::Top),
        ];
        assert_eq!(directives, expected);
    }

    #[test]
    fn test_empty_input() {
        let directives = sequence_ordered(&[], &MarenimaltConfig::default(), &mut probe()).unwrap();
        assert!(directives.is_empty());
    }

    #[test]
    fn test_without_audio_only_transition_waits() {
        let mut cfg = MarenimaltConfig::default();
        cfg.sequence.ordered_plays_audio = false;
        let mut probe = probe();
        let directives = sequence_ordered(&scenario(), &cfg, &mut probe).unwrap();
        assert!(probe.calls.is_empty());
        assert!(!directives.iter().any(|d| matches!(d, Directive::PlayAudio { .. })));
        // the unchanged second record adds nothing at all
        let waits = directives.iter().filter(|d| **d == wait(0.5)).count();
        assert_eq!(waits, 2);
    }

    #[test]
    fn test_shared_slot_replaces_type_with_content() {
        let mut cfg = MarenimaltConfig::default();
        cfg.sequence.shared_caption_slot = true;
        let records = vec![Record::new("Hi", "A", "t1", "a.wav")];
        let directives = sequence_ordered(&records, &cfg, &mut probe()).unwrap();
        assert_eq!(
            &directives[..4],
            &[
                image("A"),
                show(Slot::Bottom, "t1"),
                hide(Slot::Bottom),
                show(Slot::Bottom, "Hi"),
            ]
        );
        assert!(!directives.iter().any(|d| matches!(d, Directive::ShowText { slot: Slot::Top, .. })));
    }

    #[test]
    fn test_state_is_replaced_each_step() {
        let state = OrderedState::default();
        let record = Record::new("Hi", "A", "t1", "a.wav");
        assert!(state.image_changed(&record));
        let next = state.next(&record);
        assert_eq!(state, OrderedState::default());
        assert!(!next.image_changed(&record));
        assert!(!next.kind_changed(&record));
        assert!(!next.content_changed(&record));
        assert!(next.content_changed(&Record::new("Bye", "A", "t1", "b.wav")));
    }
}
