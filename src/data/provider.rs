//! Data provider: one per context, configured once, splits once.
//!
//! `DataContext` owns a one-time-initialised `DataProvider`. The first
//! request fixes the split configuration and the dataset source; every later
//! request returns the same provider, whatever arguments it carries. The
//! provider caches the first split it computes and hands the same `Arc` back
//! on every subsequent `split` call.
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};

use ndarray::{s, Array1, Array2, Axis};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::{DatasetConfig, SplitConfig};
use crate::data::adapter::LabeledData;
use crate::data::source::{open_source, DatasetSource, Table};
use crate::error::{Result, TrainerError};

/// Label overrides applied to the full dataset before it is split.
pub const LABEL_NOISE: [(Range<usize>, usize); 3] = [(2..8, 1), (52..58, 2), (102..108, 0)];

/// Overwrite the fixed noise ranges in `labels`. Ranges past the end are clipped.
pub fn apply_label_noise(labels: &mut Array1<usize>) {
    let n = labels.len();
    for (range, label) in LABEL_NOISE.iter() {
        let end = range.end.min(n);
        if range.start >= end {
            continue;
        }
        labels.slice_mut(s![range.start..end]).fill(*label);
    }
}

/// Train/test partition. `train_indices` and `test_indices` give the row
/// positions in the unsplit dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub features_train: Array2<f64>,
    pub labels_train: Array1<usize>,
    pub features_test: Array2<f64>,
    pub labels_test: Array1<usize>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl DatasetSplit {
    /// Partition rows with a seeded shuffle: the first `ceil(test_size * n)`
    /// shuffled rows form the test set, the rest the training set.
    pub fn partition(
        features: &Array2<f64>,
        labels: &Array1<usize>,
        config: SplitConfig,
    ) -> Result<Self> {
        config.validate()?;
        let n = features.nrows();
        if n != labels.len() {
            return Err(TrainerError::Shape(format!(
                "{} feature rows but {} labels",
                n,
                labels.len()
            )));
        }

        let n_test = (config.test_size * n as f64).ceil() as usize;
        if n_test == 0 || n_test >= n {
            return Err(TrainerError::InvalidConfig(format!(
                "test_size {} leaves an empty partition for {} rows",
                config.test_size, n
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(config.random_state);
        indices.shuffle(&mut rng);
        let train_indices = indices.split_off(n_test);
        let test_indices = indices;

        Ok(Self {
            features_train: features.select(Axis(0), &train_indices),
            labels_train: labels.select(Axis(0), &train_indices),
            features_test: features.select(Axis(0), &test_indices),
            labels_test: labels.select(Axis(0), &test_indices),
            train_indices,
            test_indices,
        })
    }

    pub fn n_train(&self) -> usize {
        self.labels_train.len()
    }

    pub fn n_test(&self) -> usize {
        self.labels_test.len()
    }
}

/// Result of `DataProvider::split`.
#[derive(Debug, Clone)]
pub enum SplitOutcome {
    Computed(Arc<DatasetSplit>),
    AlreadySplit(Arc<DatasetSplit>),
}

impl SplitOutcome {
    pub fn was_computed(&self) -> bool {
        matches!(self, SplitOutcome::Computed(_))
    }

    pub fn split(&self) -> &Arc<DatasetSplit> {
        match self {
            SplitOutcome::Computed(split) | SplitOutcome::AlreadySplit(split) => split,
        }
    }

    pub fn into_split(self) -> Arc<DatasetSplit> {
        match self {
            SplitOutcome::Computed(split) | SplitOutcome::AlreadySplit(split) => split,
        }
    }
}

pub struct DataProvider {
    config: SplitConfig,
    source: Box<dyn DatasetSource + Send + Sync>,
    split: Mutex<Option<Arc<DatasetSplit>>>,
}

impl DataProvider {
    pub fn new(config: SplitConfig, source: Box<dyn DatasetSource + Send + Sync>) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Data provider configured with test_size={} random_state={} source={}",
            config.test_size,
            config.random_state,
            source.describe()
        );
        Ok(Self {
            config,
            source,
            split: Mutex::new(None),
        })
    }

    pub fn config(&self) -> SplitConfig {
        self.config
    }

    /// Load the full labelled table from the configured source.
    pub fn load(&self) -> Result<Table> {
        self.source.load()
    }

    /// Apply label noise and split `data`, unless a split already exists.
    ///
    /// The existence check and the computation run under one lock, so
    /// concurrent callers cannot produce two different splits.
    pub fn split(&self, data: &LabeledData) -> Result<SplitOutcome> {
        let mut guard = self.split.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = guard.as_ref() {
            log::info!("Data already split");
            return Ok(SplitOutcome::AlreadySplit(Arc::clone(existing)));
        }

        log::info!("Splitting data...");
        let mut labels = data.labels.clone();
        apply_label_noise(&mut labels);
        let split = Arc::new(DatasetSplit::partition(&data.features, &labels, self.config)?);
        log::debug!(
            "Split {} rows into {} train / {} test",
            data.labels.len(),
            split.n_train(),
            split.n_test()
        );

        *guard = Some(Arc::clone(&split));
        Ok(SplitOutcome::Computed(split))
    }

    /// The cached split, if one has been computed.
    pub fn current_split(&self) -> Option<Arc<DatasetSplit>> {
        self.split
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }
}

/// Long-lived handle that owns the process's data provider.
#[derive(Default)]
pub struct DataContext {
    provider: OnceCell<Arc<DataProvider>>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the provider, creating it from `config` and `dataset` on first use.
    ///
    /// Arguments of later calls are ignored; the first configuration wins.
    pub fn provider(
        &self,
        config: SplitConfig,
        dataset: &DatasetConfig,
    ) -> Result<Arc<DataProvider>> {
        self.provider_with(config, || open_source(dataset))
    }

    /// Like `provider`, with the dataset source supplied by the caller.
    pub fn provider_with<F>(&self, config: SplitConfig, source: F) -> Result<Arc<DataProvider>>
    where
        F: FnOnce() -> Box<dyn DatasetSource + Send + Sync>,
    {
        let provider = self
            .provider
            .get_or_try_init(|| DataProvider::new(config, source()).map(Arc::new))?;

        if provider.config() != config {
            log::debug!(
                "Data provider already configured with {:?}; ignoring {:?}",
                provider.config(),
                config
            );
        }
        Ok(Arc::clone(provider))
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.get().is_some()
    }
}
