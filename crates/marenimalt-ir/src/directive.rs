use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use marenimalt_core::Duration;

/// Screen region a caption is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Top edge: the utterance.
    Top,
    /// Bottom edge: the type caption.
    Bottom,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Top => write!(f, "top"),
            Slot::Bottom => write!(f, "bottom"),
        }
    }
}

/// One atomic scene instruction for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Directive {
    /// Write `text` into `slot` over `transition`.
    ShowText {
        slot: Slot,
        text: String,
        transition: Duration,
    },
    /// Fade out whatever `slot` holds.
    HideText { slot: Slot, transition: Duration },
    /// Fade in the character image.
    ShowImage {
        image: String,
        scale: f64,
        transition: Duration,
    },
    /// Fade out the character image.
    HideImage { transition: Duration },
    /// Start an audio clip at the current time.
    PlayAudio { path: PathBuf },
    /// Hold the current frame.
    Wait { duration: Duration },
}

impl Directive {
    /// Time this directive advances the scene clock by.
    pub fn advance(&self) -> Duration {
        match self {
            Directive::ShowText { transition, .. }
            | Directive::HideText { transition, .. }
            | Directive::ShowImage { transition, .. }
            | Directive::HideImage { transition } => *transition,
            Directive::Wait { duration } => *duration,
            Directive::PlayAudio { .. } => Duration::zero(),
        }
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::ShowText { slot, text, .. } => {
                write!(f, "show-text  {:<6} {:?}", slot.to_string(), text)
            }
            Directive::HideText { slot, .. } => write!(f, "hide-text  {}", slot),
            Directive::ShowImage { image, .. } => write!(f, "show-image {}", image),
            Directive::HideImage { .. } => write!(f, "hide-image"),
            Directive::PlayAudio { path } => write!(f, "play-audio {}", path.display()),
            Directive::Wait { duration } => write!(f, "wait       {}", duration),
        }
    }
}

/// Accumulates directives with a shared transition time and image scale.
pub struct DirectiveBuilder {
    directives: Vec<Directive>,
    transition: Duration,
    image_scale: f64,
}

impl DirectiveBuilder {
    pub fn new(transition: Duration, image_scale: f64) -> Self {
        Self {
            directives: Vec::new(),
            transition,
            image_scale,
        }
    }

    pub fn show_text(&mut self, slot: Slot, text: impl Into<String>) -> &mut Self {
        self.directives.push(Directive::ShowText {
            slot,
            text: text.into(),
            transition: self.transition,
        });
        self
    }

    pub fn hide_text(&mut self, slot: Slot) -> &mut Self {
        self.directives.push(Directive::HideText {
            slot,
            transition: self.transition,
        });
        self
    }

    pub fn show_image(&mut self, image: impl Into<String>) -> &mut Self {
        self.directives.push(Directive::ShowImage {
            image: image.into(),
            scale: self.image_scale,
            transition: self.transition,
        });
        self
    }

    pub fn hide_image(&mut self) -> &mut Self {
        self.directives.push(Directive::HideImage {
            transition: self.transition,
        });
        self
    }

    pub fn play_audio(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.directives.push(Directive::PlayAudio { path: path.into() });
        self
    }

    pub fn wait(&mut self, duration: Duration) -> &mut Self {
        self.directives.push(Directive::Wait { duration });
        self
    }

    /// Hold for one transition time.
    pub fn pause(&mut self) -> &mut Self {
        let transition = self.transition;
        self.wait(transition)
    }

    /// Build and return the directive list.
    pub fn build(self) -> Vec<Directive> {
        self.directives
    }
}
