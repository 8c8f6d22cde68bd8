use std::path::{Path, PathBuf};

use ndarray::{concatenate, Array2, Axis};

use crate::config::DatasetConfig;
use crate::error::{Result, TrainerError};

/// Column names of the bundled Iris table, label last.
pub const IRIS_COLUMNS: [&str; 5] = [
    "sepal length (cm)",
    "sepal width (cm)",
    "petal length (cm)",
    "petal width (cm)",
    "target",
];

/// Numeric table with named columns. The label is expected in the last column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Table {
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(TrainerError::Shape(format!(
                "{} column names for {} columns",
                columns.len(),
                values.ncols()
            )));
        }
        Ok(Self { columns, values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }
}

/// Something that can produce the full labelled table on demand.
pub trait DatasetSource {
    fn load(&self) -> Result<Table>;

    fn describe(&self) -> String;
}

/// The canonical Iris data shipped with `linfa-datasets`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IrisSource;

impl DatasetSource for IrisSource {
    fn load(&self) -> Result<Table> {
        let iris = linfa_datasets::iris();
        let labels = iris
            .targets()
            .mapv(|t| t as f64)
            .insert_axis(Axis(1));
        let values = concatenate(Axis(1), &[iris.records().view(), labels.view()])
            .map_err(|e| TrainerError::Shape(e.to_string()))?;

        Table::new(IRIS_COLUMNS.iter().map(|c| c.to_string()).collect(), values)
    }

    fn describe(&self) -> String {
        "iris".to_string()
    }
}

/// A headered CSV file of numeric cells.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetSource for CsvSource {
    fn load(&self) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut data = Vec::new();
        let mut n_rows = 0;

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() != columns.len() {
                return Err(TrainerError::Shape(format!(
                    "row {} has {} fields, expected {}",
                    row,
                    record.len(),
                    columns.len()
                )));
            }
            for (col, field) in record.iter().enumerate() {
                let value = field.trim().parse::<f64>().map_err(|_| TrainerError::InvalidValue {
                    row,
                    column: columns[col].clone(),
                    value: field.to_string(),
                })?;
                data.push(value);
            }
            n_rows += 1;
        }

        let values = Array2::from_shape_vec((n_rows, columns.len()), data)
            .map_err(|e| TrainerError::Shape(e.to_string()))?;
        log::debug!(
            "Loaded {} rows x {} columns from {}",
            n_rows,
            columns.len(),
            self.path.display()
        );

        Table::new(columns, values)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Build the source named by a dataset configuration.
pub fn open_source(config: &DatasetConfig) -> Box<dyn DatasetSource + Send + Sync> {
    match config {
        DatasetConfig::Iris => Box::new(IrisSource),
        DatasetConfig::Csv { path } => Box::new(CsvSource::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn table_rejects_mismatched_column_names() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(Table::new(vec!["only_one".to_string()], values).is_err());
    }

    #[test]
    fn iris_has_canonical_layout() {
        let table = IrisSource.load().unwrap();
        assert_eq!(table.nrows(), 150);
        assert_eq!(table.ncols(), 5);
        assert_eq!(table.columns().last().map(String::as_str), Some("target"));

        for class in 0..3 {
            let count = table
                .values()
                .column(4)
                .iter()
                .filter(|v| **v == class as f64)
                .count();
            assert_eq!(count, 50);
        }
    }
}
