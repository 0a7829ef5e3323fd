use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::circular::CircularIndex;
use crate::constants::splits::{DEV_SUFFIX, TEST_SUFFIX, TRAIN_SUFFIX};
use crate::errors::SplitterError;
use crate::types::{FoldIndex, SampleIndex};

/// Output destination for a sample within one fold.
///
/// Declaration order is load-bearing: equality, hashing, and ordering
/// follow it, and it doubles as the per-fold stream index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Destination {
    /// Training set.
    Train,
    /// Development set.
    Dev,
    /// Test set.
    Test,
}

impl Destination {
    /// Position of this destination in the canonical stream order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Filename suffix for this destination's output file.
    pub const fn suffix(self) -> &'static str {
        match self {
            Destination::Train => TRAIN_SUFFIX,
            Destination::Dev => DEV_SUFFIX,
            Destination::Test => TEST_SUFFIX,
        }
    }
}

/// Deterministic partitioning of sample indices into per-fold destinations.
///
/// Splitting the same corpus with the same ratios and no explicit seed
/// always yields the same assignment: the seed falls back to the sample
/// count itself.
#[derive(Clone, Debug)]
pub struct FoldAssigner {
    sample_count: usize,
    test_count: usize,
    dev_count: usize,
    train_count: usize,
    fold_count: usize,
    seed: u64,
}

impl FoldAssigner {
    /// Validate ratios and derive per-destination counts and fold count.
    pub fn new(
        sample_count: usize,
        test: f64,
        dev: f64,
        seed: Option<u64>,
        cross_validation: bool,
    ) -> Result<Self, SplitterError> {
        if !(0.0..1.0).contains(&test) {
            return Err(SplitterError::Configuration(
                "test proportion must lie in [0, 1)".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&dev) {
            return Err(SplitterError::Configuration(
                "dev proportion must lie in [0, 1)".to_string(),
            ));
        }
        if test + dev >= 1.0 {
            return Err(SplitterError::Configuration(
                "test and dev proportions together must stay below 1".to_string(),
            ));
        }
        if cross_validation && test == 0.0 {
            return Err(SplitterError::Configuration(
                "cross-validation requires a nonzero test proportion".to_string(),
            ));
        }
        let test_count = (sample_count as f64 * test).floor() as usize;
        let dev_count = (sample_count as f64 * dev).floor() as usize;
        let train_count = sample_count - test_count - dev_count;
        let fold_count = if cross_validation {
            (1.0 / test).floor() as usize
        } else {
            1
        };
        Ok(Self {
            sample_count,
            test_count,
            dev_count,
            train_count,
            fold_count,
            seed: seed.unwrap_or(sample_count as u64),
        })
    }

    /// Total number of samples being partitioned.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Samples per fold routed to the test set.
    pub fn test_count(&self) -> usize {
        self.test_count
    }

    /// Samples per fold routed to the dev set.
    pub fn dev_count(&self) -> usize {
        self.dev_count
    }

    /// Samples per fold routed to the training set.
    pub fn train_count(&self) -> usize {
        self.train_count
    }

    /// Number of folds (1 unless cross-validation was requested).
    pub fn fold_count(&self) -> usize {
        self.fold_count
    }

    /// Effective seed (explicit, or derived from the sample count).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Destination table: one row per sample index (ascending), one column
    /// per fold, so the orchestrator can zip rows against the sample
    /// stream directly.
    pub fn assign(&self) -> Result<Vec<Vec<Destination>>, SplitterError> {
        let mut indices: Vec<SampleIndex> = (0..self.sample_count).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);
        let ring = CircularIndex::new(indices);

        let mut table: Vec<Vec<Destination>> = (0..self.sample_count)
            .map(|_| Vec::with_capacity(self.fold_count))
            .collect();
        for fold in 0..self.fold_count {
            for (sample, destination) in self.assign_fold(&ring, fold)?.into_iter().enumerate() {
                table[sample].push(destination);
            }
        }
        Ok(table)
    }

    /// Carve one fold's TEST/DEV/TRAIN windows out of the shuffled ring and
    /// map them back to sample indices.
    fn assign_fold(
        &self,
        ring: &CircularIndex<SampleIndex>,
        fold: FoldIndex,
    ) -> Result<Vec<Destination>, SplitterError> {
        let test_start = (fold * self.test_count) as isize;
        let windows = [
            (Destination::Test, test_start, self.test_count),
            (
                Destination::Dev,
                test_start - self.dev_count as isize,
                self.dev_count,
            ),
            (
                Destination::Train,
                test_start + self.test_count as isize,
                self.train_count,
            ),
        ];

        let mut assigned: Vec<Option<Destination>> = vec![None; self.sample_count];
        for (destination, start, len) in windows {
            for sample in ring.window(start, len) {
                if assigned[sample].replace(destination).is_some() {
                    return Err(SplitterError::Invariant(format!(
                        "sample {sample} assigned to more than one destination in fold {fold}"
                    )));
                }
            }
        }
        assigned
            .into_iter()
            .enumerate()
            .map(|(sample, destination)| {
                destination.ok_or_else(|| {
                    SplitterError::Invariant(format!(
                        "sample {sample} not assigned to any destination in fold {fold}"
                    ))
                })
            })
            .collect()
    }
}
