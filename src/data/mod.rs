//! Dataset loading, shape adaptation and the cached train/test split.
pub mod adapter;
pub mod provider;
pub mod source;

pub use adapter::{LabeledData, TableAdapter};
pub use provider::{
    apply_label_noise, DataContext, DataProvider, DatasetSplit, SplitOutcome, LABEL_NOISE,
};
pub use source::{open_source, CsvSource, DatasetSource, IrisSource, Table};
