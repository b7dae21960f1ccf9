//! # mailcorpus-core
//!
//! Conversion of a labeled email tree into newline-delimited JSON.
//!
//! This crate provides:
//! - **Key normalization** - hyphenated header names to camel case
//! - **Category parsing** - `.cats` sidecar files into two-level labels
//! - **Email normalization** - one raw message into a flat record with
//!   UTC dates and split recipient lists
//! - **Group resolution** - sibling files paired by base name while walking
//!   a directory tree
//! - **Pipeline** - per-group fault isolation and JSON-lines output

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod categories;
pub mod config;
pub mod date;
mod error;
pub mod group;
pub mod keys;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod source;

pub use categories::{CategoryLabel, parse_categories};
pub use config::Options;
pub use date::normalize_date;
pub use error::{Error, Result};
pub use group::{FileGroup, FileGroups, GroupFiles, SkipReason};
pub use keys::to_camel_case;
pub use pipeline::{Outcome, Pipeline, RunSummary};
pub use record::{EmailRecord, Normalized, normalize_email};
pub use sink::JsonLinesWriter;
pub use source::{ContentSource, FsSource, MemorySource};
