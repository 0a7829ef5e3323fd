use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SplitConfig;
use crate::constants::splits::ALL_DESTINATIONS;
use crate::errors::SplitterError;
use crate::folds::{Destination, FoldAssigner};
use crate::metadata::MetadataState;
use crate::paths::{resolve_input_files, OutputTemplate};
use crate::reader::CorpusSampleReader;

/// Counts and output locations reported after a completed split.
#[derive(Clone, Debug, Serialize)]
pub struct SplitSummary {
    /// Total samples read from the corpus.
    pub sample_count: usize,
    /// Number of folds written.
    pub fold_count: usize,
    /// Samples per fold routed to the test set.
    pub test_count: usize,
    /// Samples per fold routed to the dev set.
    pub dev_count: usize,
    /// Samples per fold routed to the training set.
    pub train_count: usize,
    /// Every output file written, in (fold, destination) order.
    pub output_files: Vec<PathBuf>,
}

type DestinationWriters = [Option<BufWriter<File>>; 3];

/// Split the configured corpus into train/dev/test outputs.
///
/// Pass 1 counts samples; pass 2 re-reads the same file list, routing each
/// sample to its per-fold destination and prefixing it with any metadata
/// lines that destination has not seen in their current form. All output
/// streams stay open for the whole of pass 2 and are released together on
/// every exit path.
pub fn split_corpus(config: &SplitConfig) -> Result<SplitSummary, SplitterError> {
    let input_files = resolve_input_files(&config.source)?;
    let template = match &config.output_filename {
        Some(name) => OutputTemplate::from_override(name),
        None => OutputTemplate::from_source(&config.source),
    };

    let mut reader = CorpusSampleReader::new(input_files, config.reader.clone())?;
    let sample_count = reader.sample_count()?;
    let assigner = FoldAssigner::new(
        sample_count,
        config.test,
        config.dev,
        config.seed,
        config.cross_validation,
    )?;
    let table = assigner.assign()?;

    let mut writers: Vec<DestinationWriters> = Vec::with_capacity(assigner.fold_count());
    let mut output_files = Vec::new();
    for fold in 0..assigner.fold_count() {
        let fold_dir = if assigner.fold_count() == 1 {
            config.output_dir.clone()
        } else {
            config.output_dir.join((fold + 1).to_string())
        };
        fs::create_dir_all(&fold_dir)?;

        let mut fold_writers: DestinationWriters = [None, None, None];
        for destination in ALL_DESTINATIONS {
            // No DEV stream when the dev window is empty.
            if destination == Destination::Dev && assigner.dev_count() == 0 {
                continue;
            }
            let path = fold_dir.join(template.file_name(destination.suffix()));
            let file = File::create(&path)?;
            fold_writers[destination.index()] = Some(BufWriter::new(file));
            output_files.push(path);
        }
        writers.push(fold_writers);
    }

    let mut global_state = MetadataState::new();
    let mut local_states: Vec<[MetadataState; 3]> = (0..assigner.fold_count())
        .map(|_| {
            [
                MetadataState::new(),
                MetadataState::new(),
                MetadataState::new(),
            ]
        })
        .collect();

    for (sample_index, item) in reader.samples()?.enumerate() {
        let (text, metadata) = item?;
        let row = table.get(sample_index).ok_or_else(|| {
            SplitterError::Invariant(format!(
                "sample {sample_index} exceeds the counted corpus size {sample_count}"
            ))
        })?;
        global_state.merge(&metadata);

        for (fold, destination) in row.iter().enumerate() {
            let diff = local_states[fold][destination.index()].diff_and_update(&global_state);
            debug!(sample_index, fold, ?destination, "routing sample");
            let writer = writers[fold][destination.index()].as_mut().ok_or_else(|| {
                SplitterError::Invariant(format!(
                    "no open output stream for {destination:?} in fold {fold}"
                ))
            })?;
            if !config.omit_metadata {
                for (_, snapshot) in diff.iter() {
                    writeln!(writer, "{}", snapshot.text)?;
                }
            }
            writer.write_all(text.as_bytes())?;
        }
    }

    for fold_writers in &mut writers {
        for writer in fold_writers.iter_mut().flatten() {
            writer.flush()?;
        }
    }
    info!(
        samples = sample_count,
        folds = assigner.fold_count(),
        "corpus split complete"
    );

    Ok(SplitSummary {
        sample_count,
        fold_count: assigner.fold_count(),
        test_count: assigner.test_count(),
        dev_count: assigner.dev_count(),
        train_count: assigner.train_count(),
        output_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn invalid_ratios_abort_before_any_output_is_created() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("corpus.conllu");
        fs::write(&source, "# sent_id = s1\n1\tx\n\n").unwrap();
        let out = dir.path().join("out");

        let config = SplitConfig::new(&source, &out).with_test(0.8).with_dev(0.4);
        let err = split_corpus(&config).unwrap_err();
        assert!(matches!(err, SplitterError::Configuration(_)));
        assert!(!out.exists());
    }

    #[test]
    fn empty_corpus_produces_empty_outputs() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("empty.conllu");
        fs::write(&source, "just prose, no samples\n").unwrap();
        let out = dir.path().join("out");

        let summary = split_corpus(&SplitConfig::new(&source, &out)).unwrap();
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.output_files.len(), 2);
        for path in &summary.output_files {
            assert_eq!(fs::read_to_string(path).unwrap(), "");
        }
    }
}
