use std::path::PathBuf;

use clap::Parser;

use crate::config::{ReaderConfig, SplitConfig};
use crate::constants::splits::{DEFAULT_DEV_RATIO, DEFAULT_TEST_RATIO};
use crate::errors::SplitterError;
use crate::splitter::{split_corpus, SplitSummary};
use crate::types::AttrName;

/// CLI for the `corpus-splitter` binary.
///
/// Common usage:
/// - Single split with defaults: `corpus-splitter corpus.conllu -o out/`
/// - Dev set included: `corpus-splitter corpus.conllu -o out/ -t 0.2 -d 0.1`
/// - Cross-validation: `corpus-splitter corpus.conllu -o out/ --cross-validation`
#[derive(Debug, Parser)]
#[command(
    name = "corpus-splitter",
    disable_help_subcommand = true,
    about = "Reproducibly split an annotated corpus into train, dev, and test sets",
    long_about = "Split a line-oriented annotated corpus into train, dev, and test sets, \
optionally as k-fold cross-validation datasets, carrying incremental document and \
paragraph metadata into every output file.",
    after_help = "Without an explicit seed the split is seeded from the sample count, so \
repeat runs over the same corpus produce identical outputs."
)]
pub struct SplitCli {
    #[arg(value_name = "SOURCE", help = "Path to the source file or folder")]
    source: PathBuf,
    #[arg(
        short = 'o',
        long = "output-folder",
        value_name = "PATH",
        help = "Output folder (defaults to the current directory)"
    )]
    output_folder: Option<PathBuf>,
    #[arg(
        short = 't',
        long,
        default_value_t = DEFAULT_TEST_RATIO,
        help = "Test set size, expressed as a decimal proportion"
    )]
    test: f64,
    #[arg(
        short = 'd',
        long,
        default_value_t = DEFAULT_DEV_RATIO,
        help = "Dev set size, expressed as a decimal proportion"
    )]
    dev: f64,
    #[arg(short = 's', long, help = "Explicit random seed")]
    seed: Option<u64>,
    #[arg(
        short = 'f',
        long = "output-filename",
        value_name = "NAME",
        help = "Filename used for output files (derived from the source name by default)"
    )]
    output_filename: Option<String>,
    #[arg(
        long = "cross-validation",
        help = "Create k-fold cross-validation datasets"
    )]
    cross_validation: bool,
    #[arg(
        long = "omit-metadata",
        help = "Do not write document or paragraph metadata to output files"
    )]
    omit_metadata: bool,
    #[arg(
        long = "ignore-attribute",
        value_name = "NAME",
        help = "Metadata attribute excluded from capture, repeat as needed (replaces the default list)"
    )]
    ignore_attributes: Vec<AttrName>,
}

impl SplitCli {
    fn into_config(self) -> Result<SplitConfig, SplitterError> {
        let output_dir = match self.output_folder {
            Some(path) => path,
            None => std::env::current_dir()?,
        };
        let mut reader = ReaderConfig::default();
        if !self.ignore_attributes.is_empty() {
            reader = reader.with_ignore_attributes(self.ignore_attributes);
        }
        let mut config = SplitConfig::new(self.source, output_dir)
            .with_test(self.test)
            .with_dev(self.dev)
            .with_cross_validation(self.cross_validation)
            .with_omit_metadata(self.omit_metadata)
            .with_reader(reader);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(name) = self.output_filename {
            config = config.with_output_filename(name);
        }
        Ok(config)
    }
}

fn print_summary(summary: &SplitSummary) {
    println!(
        "Split {} samples into {} train / {} dev / {} test per fold ({} fold{}).",
        summary.sample_count,
        summary.train_count,
        summary.dev_count,
        summary.test_count,
        summary.fold_count,
        if summary.fold_count == 1 { "" } else { "s" }
    );
    for path in &summary.output_files {
        println!("  {}", path.display());
    }
}

/// Parse arguments from the environment and run the split.
pub fn run() -> Result<(), SplitterError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = SplitCli::parse();
    let summary = split_corpus(&cli.into_config()?)?;
    print_summary(&summary);
    Ok(())
}
