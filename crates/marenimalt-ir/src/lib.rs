//! # marenimalt-ir
//!
//! The Marenimalt intermediate representation. Dialogue records are grouped
//! and walked into a flat list of scene [`Directive`]s, which can then be
//! lowered onto a [`Timeline`] for renderers that work in absolute time.

pub mod data;
pub mod directive;
pub mod group;
pub mod project;
pub mod record;
pub mod sequence;
pub mod timeline;
pub mod validate;

pub use data::RecordSet;
pub use directive::{Directive, DirectiveBuilder, Slot};
pub use group::{ContentGroup, GroupedContents, Line, SpeakerGroup};
pub use project::Marenimalt;
pub use record::{RawRecord, Record};
pub use sequence::{AudioProbe, SequenceMode};
pub use timeline::{AudioCue, ElementContent, ElementSpan, Timeline};
