/// Metadata attribute name parsed from a comment line.
/// Examples: `doc_id`, `newpar`, `global.columns`
pub type AttrName = String;
/// Metadata attribute value, when the comment line carries one.
/// Examples: `A`, `essay-2014-01`
pub type AttrValue = String;
/// Raw source line text as matched, without the trailing newline.
/// Example: `# doc_id = essay-2014-01`
pub type RawLine = String;
/// Accumulated text of one sample, newlines included.
pub type SampleText = String;
/// 0-based line position across all input files (monotonic, never resets).
pub type LineIndex = usize;
/// 0-based sample position within the full concatenated corpus.
pub type SampleIndex = usize;
/// 0-based fold position within a cross-validation run.
pub type FoldIndex = usize;
