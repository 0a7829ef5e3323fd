use std::path::PathBuf;

use crate::constants::reader::{
    DEFAULT_COMMENT_PATTERN, DEFAULT_IGNORED_ATTRIBUTES, DEFAULT_SAMPLE_START_PATTERN,
    DEFAULT_TERMINATOR_PATTERN,
};
use crate::constants::splits::{DEFAULT_DEV_RATIO, DEFAULT_TEST_RATIO};
use crate::types::AttrName;

/// Controls how raw corpus lines are segmented into samples and metadata.
#[derive(Clone, Debug)]
pub struct ReaderConfig {
    /// Pattern matching the first line of a sample.
    pub sample_start_pattern: String,
    /// Pattern matching the line that closes an open sample, applied to
    /// newline-stripped lines.
    pub terminator_pattern: String,
    /// Pattern matching a metadata comment line; must expose the
    /// `attr_name` capture group and may expose `attr_value`.
    pub comment_pattern: String,
    /// Attribute names excluded from metadata capture.
    pub ignore_attributes: Vec<AttrName>,
    /// Append a trailing newline to every emitted sample.
    pub append_newline: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            sample_start_pattern: DEFAULT_SAMPLE_START_PATTERN.to_string(),
            terminator_pattern: DEFAULT_TERMINATOR_PATTERN.to_string(),
            comment_pattern: DEFAULT_COMMENT_PATTERN.to_string(),
            ignore_attributes: DEFAULT_IGNORED_ATTRIBUTES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            append_newline: true,
        }
    }
}

impl ReaderConfig {
    /// Override the sample-start pattern.
    pub fn with_sample_start_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.sample_start_pattern = pattern.into();
        self
    }

    /// Override the sample terminator pattern.
    pub fn with_terminator_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.terminator_pattern = pattern.into();
        self
    }

    /// Override the metadata comment pattern.
    pub fn with_comment_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.comment_pattern = pattern.into();
        self
    }

    /// Replace the attribute ignore-list.
    pub fn with_ignore_attributes(mut self, attributes: Vec<AttrName>) -> Self {
        self.ignore_attributes = attributes;
        self
    }

    /// Control trailing-newline appending on emitted samples.
    pub fn with_append_newline(mut self, append_newline: bool) -> Self {
        self.append_newline = append_newline;
        self
    }
}

/// Top-level splitting configuration consumed by
/// [`split_corpus`](crate::splitter::split_corpus).
#[derive(Clone, Debug)]
pub struct SplitConfig {
    /// Source corpus file, or a folder whose immediate files are read in
    /// sorted filename order.
    pub source: PathBuf,
    /// Folder receiving the output files (and fold subfolders).
    pub output_dir: PathBuf,
    /// Test set proportion in `[0, 1)`.
    pub test: f64,
    /// Dev set proportion in `[0, 1)`.
    pub dev: f64,
    /// Explicit random seed; derived from the sample count when absent.
    pub seed: Option<u64>,
    /// Produce k-fold cross-validation datasets instead of a single split.
    pub cross_validation: bool,
    /// Suppress metadata line emission in the outputs.
    pub omit_metadata: bool,
    /// Filename used for output files; derived from the source name when
    /// absent.
    pub output_filename: Option<String>,
    /// Sample/metadata parsing configuration.
    pub reader: ReaderConfig,
}

impl SplitConfig {
    /// Configuration with default ratios for `source` and `output_dir`.
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            test: DEFAULT_TEST_RATIO,
            dev: DEFAULT_DEV_RATIO,
            seed: None,
            cross_validation: false,
            omit_metadata: false,
            output_filename: None,
            reader: ReaderConfig::default(),
        }
    }

    /// Override the test set proportion.
    pub fn with_test(mut self, test: f64) -> Self {
        self.test = test;
        self
    }

    /// Override the dev set proportion.
    pub fn with_dev(mut self, dev: f64) -> Self {
        self.dev = dev;
        self
    }

    /// Set an explicit random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable k-fold cross-validation.
    pub fn with_cross_validation(mut self, cross_validation: bool) -> Self {
        self.cross_validation = cross_validation;
        self
    }

    /// Enable or disable metadata suppression.
    pub fn with_omit_metadata(mut self, omit_metadata: bool) -> Self {
        self.omit_metadata = omit_metadata;
        self
    }

    /// Set an explicit output filename.
    pub fn with_output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = Some(name.into());
        self
    }

    /// Replace the reader configuration.
    pub fn with_reader(mut self, reader: ReaderConfig) -> Self {
        self.reader = reader;
        self
    }
}
