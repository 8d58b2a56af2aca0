//! # marenimalt-core
//!
//! Core types and primitives shared by every Marenimalt crate:
//! configuration, errors, durations, caption wrapping, filename
//! sanitizing and content hashing.

pub mod config;
pub mod error;
pub mod filename;
pub mod hash;
pub mod text;
pub mod time;

pub use config::*;

pub use error::{LookupMap, MarenimaltError, MarenimaltResult};
pub use filename::{sanitize_filename, DEFAULT_MAX_FILENAME_LEN};
pub use hash::ContentHash;
pub use text::{wrap_text, DEFAULT_WRAP_WIDTH};
pub use time::{Duration, Timestamp};
