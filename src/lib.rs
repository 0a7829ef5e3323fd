#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Circularly-indexable sequence wrapper used for fold windowing.
pub mod circular;
/// CLI surface for the `corpus-splitter` binary.
pub mod cli;
/// Splitting and reader configuration types.
pub mod config;
/// Centralized constants used across reader, folds, and outputs.
pub mod constants;
/// Destination labels and deterministic fold assignment.
pub mod folds;
/// Metadata snapshots and incremental per-destination diff state.
pub mod metadata;
/// Input-file resolution and output naming helpers.
pub mod paths;
/// Lazy corpus sample reading.
pub mod reader;
/// Split orchestration.
pub mod splitter;
/// Shared type aliases.
pub mod types;

mod errors;

pub use circular::CircularIndex;
pub use config::{ReaderConfig, SplitConfig};
pub use errors::SplitterError;
pub use folds::{Destination, FoldAssigner};
pub use metadata::{MetadataSnapshot, MetadataState};
pub use reader::{CorpusSampleReader, SampleIter};
pub use splitter::{split_corpus, SplitSummary};
pub use types::{
    AttrName, AttrValue, FoldIndex, LineIndex, RawLine, SampleIndex, SampleText,
};
