use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use regex::Regex;
use tracing::info;

use crate::config::ReaderConfig;
use crate::constants::reader::{ATTR_NAME_GROUP, ATTR_VALUE_GROUP};
use crate::errors::SplitterError;
use crate::metadata::{MetadataSnapshot, MetadataState};
use crate::types::{LineIndex, SampleText};

/// Single-pass reader over a corpus composed of one or more files.
///
/// Produces a lazy sequence of `(sample text, metadata snapshot)` pairs via
/// [`samples`](Self::samples) and a cached total via
/// [`sample_count`](Self::sample_count). The two passes observe the same
/// file list in the same order, which keeps fold assignment and sample
/// iteration aligned.
#[derive(Debug)]
pub struct CorpusSampleReader {
    paths: Vec<PathBuf>,
    sample_start: Regex,
    terminator: Regex,
    comment: Regex,
    ignore_attributes: Vec<String>,
    append_newline: bool,
    cached_sample_count: Option<usize>,
}

fn compile(pattern: &str) -> Result<Regex, SplitterError> {
    Regex::new(pattern).map_err(|source| SplitterError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl CorpusSampleReader {
    /// Build a reader over `paths`, compiling the configured patterns.
    ///
    /// An empty path list is a configuration error; unreadable paths
    /// surface as I/O errors on first access.
    pub fn new(paths: Vec<PathBuf>, config: ReaderConfig) -> Result<Self, SplitterError> {
        if paths.is_empty() {
            return Err(SplitterError::Configuration(
                "no input files found".to_string(),
            ));
        }
        Ok(Self {
            paths,
            sample_start: compile(&config.sample_start_pattern)?,
            terminator: compile(&config.terminator_pattern)?,
            comment: compile(&config.comment_pattern)?,
            ignore_attributes: config.ignore_attributes,
            append_newline: config.append_newline,
            cached_sample_count: None,
        })
    }

    /// Input files in reading order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Total number of samples in the corpus.
    ///
    /// Runs a dedicated scan that only matches the sample-start pattern;
    /// the result is cached, so repeated calls are free and side-effect
    /// free.
    pub fn sample_count(&mut self) -> Result<usize, SplitterError> {
        if let Some(count) = self.cached_sample_count {
            return Ok(count);
        }
        info!(files = self.paths.len(), "counting samples");
        let mut count = 0;
        for path in &self.paths {
            let file = File::open(path)?;
            for line in BufReader::new(file).lines() {
                if self.sample_start.is_match(&line?) {
                    count += 1;
                }
            }
        }
        info!(samples = count, "corpus counted");
        self.cached_sample_count = Some(count);
        Ok(count)
    }

    /// Lazy, non-restartable iteration over `(sample text, metadata)` pairs.
    ///
    /// All input files are opened up front and held for the iterator's
    /// lifetime.
    pub fn samples(&self) -> Result<SampleIter<'_>, SplitterError> {
        let mut files = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            files.push(BufReader::new(File::open(path)?));
        }
        Ok(SampleIter {
            reader: self,
            files: files.into_iter(),
            current: None,
            line_index: 0,
            buffer: String::new(),
            metadata: MetadataState::new(),
            reading: false,
        })
    }
}

/// Iterator state for one pass over the corpus.
///
/// The text buffer, working metadata, and `reading` flag reset at every
/// file boundary, so an unterminated sample at end-of-file is dropped. The
/// line index is global and never resets.
pub struct SampleIter<'r> {
    reader: &'r CorpusSampleReader,
    files: std::vec::IntoIter<BufReader<File>>,
    current: Option<io::Lines<BufReader<File>>>,
    line_index: LineIndex,
    buffer: SampleText,
    metadata: MetadataState,
    reading: bool,
}

impl SampleIter<'_> {
    fn handle_line(&mut self, line: String) -> Option<(SampleText, MetadataState)> {
        let line_no = self.line_index;
        self.line_index += 1;

        if self.reading && self.reader.terminator.is_match(&line) {
            let mut text = std::mem::take(&mut self.buffer);
            if self.reader.append_newline {
                text.push('\n');
            }
            let metadata = std::mem::take(&mut self.metadata);
            self.reading = false;
            return Some((text, metadata));
        }
        if self.reading {
            self.buffer.push_str(&line);
            self.buffer.push('\n');
            return None;
        }
        if self.reader.sample_start.is_match(&line) {
            self.reading = true;
            self.buffer.push_str(&line);
            self.buffer.push('\n');
            return None;
        }
        if let Some(caps) = self.reader.comment.captures(&line) {
            let Some(name) = caps.name(ATTR_NAME_GROUP) else {
                return None;
            };
            let name = name.as_str();
            if self.reader.ignore_attributes.iter().any(|a| a == name) {
                return None;
            }
            let snapshot = MetadataSnapshot {
                value: caps.name(ATTR_VALUE_GROUP).map(|m| m.as_str().to_string()),
                text: caps
                    .get(0)
                    .map_or_else(|| line.clone(), |m| m.as_str().to_string()),
                line_no,
            };
            self.metadata.insert(name.to_string(), snapshot);
        }
        None
    }
}

impl Iterator for SampleIter<'_> {
    type Item = Result<(SampleText, MetadataState), SplitterError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                match self.files.next() {
                    Some(file) => {
                        // New file: an open sample never crosses a file
                        // boundary, and working metadata starts fresh.
                        self.buffer.clear();
                        self.metadata = MetadataState::new();
                        self.reading = false;
                        self.current = Some(file.lines());
                    }
                    None => return None,
                }
            }
            let Some(lines) = self.current.as_mut() else {
                continue;
            };
            match lines.next() {
                None => {
                    self.current = None;
                }
                Some(Err(err)) => return Some(Err(err.into())),
                Some(Ok(line)) => {
                    if let Some(sample) = self.handle_line(line) {
                        return Some(Ok(sample));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_corpus(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn reader_for(paths: Vec<PathBuf>) -> CorpusSampleReader {
        CorpusSampleReader::new(paths, ReaderConfig::default()).unwrap()
    }

    const SIMPLE: &str = "\
# doc_id = A
# sent_id = s1
1\tHello
2\tworld

# sent_id = s2
1\tBye

";

    #[test]
    fn yields_samples_with_accumulated_metadata() {
        let dir = tempdir().unwrap();
        let path = write_corpus(dir.path(), "simple.conllu", SIMPLE);
        let reader = reader_for(vec![path]);

        let samples: Vec<_> = reader
            .samples()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(samples.len(), 2);

        let (text, meta) = &samples[0];
        assert_eq!(text, "# sent_id = s1\n1\tHello\n2\tworld\n\n");
        assert_eq!(meta.get("doc_id").unwrap().value.as_deref(), Some("A"));
        assert_eq!(meta.get("doc_id").unwrap().text, "# doc_id = A");
        assert_eq!(meta.get("doc_id").unwrap().line_no, 0);

        // Working metadata resets after each emitted sample.
        let (_, meta2) = &samples[1];
        assert!(meta2.is_empty());
    }

    #[test]
    fn unterminated_trailing_sample_is_dropped() {
        let dir = tempdir().unwrap();
        let path = write_corpus(
            dir.path(),
            "tail.conllu",
            "# sent_id = s1\n1\tdone\n\n# sent_id = s2\n1\topen",
        );
        let reader = reader_for(vec![path]);
        let samples: Vec<_> = reader
            .samples()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert!(samples[0].0.starts_with("# sent_id = s1\n"));
    }

    #[test]
    fn ignored_attributes_are_not_captured() {
        let dir = tempdir().unwrap();
        let path = write_corpus(
            dir.path(),
            "ignored.conllu",
            "# global.columns = ID FORM\n# doc_id = A\n# sent_id = s1\n1\tx\n\n",
        );
        let reader = reader_for(vec![path]);
        let samples: Vec<_> = reader
            .samples()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let (_, meta) = &samples[0];
        assert!(meta.get("global.columns").is_none());
        assert!(meta.get("doc_id").is_some());
    }

    #[test]
    fn value_less_attributes_are_captured_without_a_value() {
        let dir = tempdir().unwrap();
        let path = write_corpus(
            dir.path(),
            "newpar.conllu",
            "# newpar\n# sent_id = s1\n1\tx\n\n",
        );
        let reader = reader_for(vec![path]);
        let samples: Vec<_> = reader
            .samples()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let snapshot = samples[0].1.get("newpar").unwrap();
        assert_eq!(snapshot.value, None);
        assert_eq!(snapshot.text, "# newpar");
    }

    #[test]
    fn line_numbering_spans_files_and_state_resets_per_file() {
        let dir = tempdir().unwrap();
        let first = write_corpus(
            dir.path(),
            "a.conllu",
            "# doc_id = A\n# sent_id = s1\n1\tx\n\n# sent_id = partial\n1\topen",
        );
        let second = write_corpus(dir.path(), "b.conllu", "# doc_id = B\n# sent_id = s2\n1\ty\n\n");
        let reader = reader_for(vec![first, second]);

        let samples: Vec<_> = reader
            .samples()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        // The partial sample at the end of the first file is dropped.
        assert_eq!(samples.len(), 2);

        // First file has 6 lines, so the second file's doc_id sits at
        // global line 6.
        assert_eq!(samples[1].1.get("doc_id").unwrap().line_no, 6);
        assert_eq!(samples[1].1.get("doc_id").unwrap().value.as_deref(), Some("B"));
    }

    #[test]
    fn sample_count_is_cached_and_matches_iteration() {
        let dir = tempdir().unwrap();
        let path = write_corpus(dir.path(), "count.conllu", SIMPLE);
        let mut reader = reader_for(vec![path]);

        assert_eq!(reader.sample_count().unwrap(), 2);
        assert_eq!(reader.sample_count().unwrap(), 2);
        let iterated = reader.samples().unwrap().count();
        assert_eq!(iterated, 2);
    }

    #[test]
    fn empty_file_list_is_a_configuration_error() {
        let err = CorpusSampleReader::new(Vec::new(), ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, SplitterError::Configuration(_)));
    }

    #[test]
    fn missing_file_surfaces_as_io_error_on_access() {
        let reader = reader_for(vec![PathBuf::from("/nonexistent/corpus.conllu")]);
        assert!(matches!(reader.samples(), Err(SplitterError::Io(_))));
    }

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        let config = ReaderConfig::default().with_comment_pattern("([unclosed");
        let err = CorpusSampleReader::new(vec![PathBuf::from("x")], config).unwrap_err();
        assert!(matches!(err, SplitterError::Pattern { .. }));
    }
}
