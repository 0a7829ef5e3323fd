use crate::folds::Destination;

/// Constants used by corpus reading and metadata capture.
pub mod reader {
    /// Default pattern marking the first line of a sample.
    pub const DEFAULT_SAMPLE_START_PATTERN: &str = r"^#\ssent_id\s?=";
    /// Default pattern marking the end of a sample, applied to
    /// newline-stripped lines (a blank line).
    pub const DEFAULT_TERMINATOR_PATTERN: &str = r"^$";
    /// Default pattern matching a metadata comment line, with named capture
    /// groups for the attribute name and its optional value.
    pub const DEFAULT_COMMENT_PATTERN: &str =
        r"^#\s?(?P<attr_name>[^=]+?)(?:\s?=\s?(?P<attr_value>.+))?$";
    /// Capture group holding the attribute name in the comment pattern.
    pub const ATTR_NAME_GROUP: &str = "attr_name";
    /// Capture group holding the attribute value in the comment pattern.
    pub const ATTR_VALUE_GROUP: &str = "attr_value";
    /// Attribute names excluded from metadata capture by default.
    pub const DEFAULT_IGNORED_ATTRIBUTES: [&str; 1] = ["global.columns"];
}

/// Constants used by fold assignment and output naming.
pub mod splits {
    use super::Destination;

    /// Default test set proportion.
    pub const DEFAULT_TEST_RATIO: f64 = 0.3;
    /// Default dev set proportion.
    pub const DEFAULT_DEV_RATIO: f64 = 0.0;
    /// Canonical destination iteration order used when opening output
    /// streams and indexing per-destination state.
    pub const ALL_DESTINATIONS: [Destination; 3] =
        [Destination::Train, Destination::Dev, Destination::Test];
    /// Filename suffix inserted before the extension for train outputs.
    pub const TRAIN_SUFFIX: &str = "_train";
    /// Filename suffix inserted before the extension for dev outputs.
    pub const DEV_SUFFIX: &str = "_dev";
    /// Filename suffix inserted before the extension for test outputs.
    pub const TEST_SUFFIX: &str = "_test";
}
