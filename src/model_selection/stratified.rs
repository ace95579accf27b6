use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use ndarray::ArrayView1;

use crate::error::{CrossValError, Result};

/// Train/test indices for one fold.
pub type FoldIndices = (Vec<usize>, Vec<usize>);

/// Stratified K-Fold cross-validator.
///
/// Each fold keeps the class proportions of `y`: per class, the number of
/// test samples differs by at most one between folds.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    /// Shuffle each class's samples before assigning them to folds.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed the shuffle. Setting a seed also enables shuffling.
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self.shuffle = true;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate `(train_indices, test_indices)` for every fold.
    pub fn split(&self, y: ArrayView1<usize>) -> Result<Vec<FoldIndices>> {
        let n_samples = y.len();
        if self.n_splits < 2 || self.n_splits > n_samples {
            return Err(CrossValError::InvalidFolds {
                n_splits: self.n_splits,
                n_samples,
            });
        }

        let mut classes: Vec<usize> = y.iter().copied().collect();
        classes.sort_unstable();
        classes.dedup();
        let encode = |label: usize| classes.binary_search(&label).unwrap_or(0);
        let y_encoded: Vec<usize> = y.iter().map(|&l| encode(l)).collect();

        let mut class_counts = vec![0usize; classes.len()];
        for &c in &y_encoded {
            class_counts[c] += 1;
        }
        let max_count = class_counts.iter().copied().max().unwrap_or(0);
        if max_count < self.n_splits {
            return Err(CrossValError::TooFewClassMembers {
                n_splits: self.n_splits,
                largest_class: max_count,
            });
        }
        let min_count = class_counts.iter().copied().min().unwrap_or(0);
        if min_count < self.n_splits {
            log::warn!(
                "The least populated class in y has only {} members, which is less than n_splits={}",
                min_count,
                self.n_splits
            );
        }

        // Sorted labels dealt round-robin over the folds give the per-fold
        // class counts.
        let mut y_order = y_encoded.clone();
        y_order.sort_unstable();
        let mut allocation = vec![vec![0usize; classes.len()]; self.n_splits];
        for (i, &c) in y_order.iter().enumerate() {
            allocation[i % self.n_splits][c] += 1;
        }

        let mut rng = match (self.shuffle, self.random_state) {
            (true, Some(seed)) => Some(StdRng::seed_from_u64(seed)),
            (true, None) => Some(StdRng::from_entropy()),
            (false, _) => None,
        };

        let mut test_folds = vec![0usize; n_samples];
        for class_idx in 0..classes.len() {
            let mut folds_for_class: Vec<usize> = (0..self.n_splits)
                .flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class_idx]))
                .collect();
            if let Some(rng) = rng.as_mut() {
                folds_for_class.shuffle(rng);
            }

            let members = y_encoded
                .iter()
                .enumerate()
                .filter(|(_, &c)| c == class_idx)
                .map(|(i, _)| i);
            for (sample, fold) in members.zip(folds_for_class) {
                test_folds[sample] = fold;
            }
        }

        let splits = (0..self.n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..n_samples).partition(|&i| test_folds[i] == fold);
                log::trace!(
                    "Preparing fold {} with {} training samples and {} testing samples",
                    fold,
                    train.len(),
                    test.len()
                );
                (train, test)
            })
            .collect();

        Ok(splits)
    }
}
