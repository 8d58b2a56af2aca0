//! Scene sequencing: records in, directives out.
//!
//! Two walks are available. The grouped walk plays every line of a content
//! together, speaker by speaker. The ordered walk keeps the input order and
//! only redraws elements that changed since the previous record.

mod grouped;
mod ordered;

use std::path::Path;

use marenimalt_core::{Duration, MarenimaltConfig, MarenimaltResult};

use crate::directive::DirectiveBuilder;
use crate::group::GroupedContents;
use crate::record::Record;

pub use grouped::{sequence_grouped, CaptionTracker};
pub use ordered::{sequence_ordered, OrderedState};

/// Source of audio clip lengths.
pub trait AudioProbe {
    /// Decoded length of the clip at `path`.
    fn duration(&mut self, path: &Path) -> MarenimaltResult<Duration>;
}

impl<P: AudioProbe + ?Sized> AudioProbe for &mut P {
    fn duration(&mut self, path: &Path) -> MarenimaltResult<Duration> {
        (**self).duration(path)
    }
}

/// Which walk produces the directive sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceMode {
    #[default]
    Grouped,
    Ordered,
}

/// Run the walk selected by `mode` over `records`.
pub fn sequence(
    records: &[Record],
    cfg: &MarenimaltConfig,
    probe: &mut dyn AudioProbe,
    mode: SequenceMode,
) -> MarenimaltResult<Vec<crate::directive::Directive>> {
    let directives = match mode {
        SequenceMode::Grouped => sequence_grouped(&GroupedContents::group(records), cfg, probe)?,
        SequenceMode::Ordered => sequence_ordered(records, cfg, probe)?,
    };
    tracing::debug!(
        "sequenced {} records into {} directives ({:?})",
        records.len(),
        directives.len(),
        mode
    );
    Ok(directives)
}

fn builder_for(cfg: &MarenimaltConfig) -> DirectiveBuilder {
    DirectiveBuilder::new(
        Duration::from_seconds(cfg.style.transition_secs),
        cfg.style.image_scale,
    )
}
