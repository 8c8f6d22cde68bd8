use ndarray::{s, Array1, Array2};

use crate::data::source::Table;
use crate::error::{Result, TrainerError};

/// Features and labels as the splitter expects them.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledData {
    pub features: Array2<f64>,
    pub labels: Array1<usize>,
}

/// Converts a `Table` with a trailing label column into `LabeledData`.
pub struct TableAdapter<'a> {
    table: &'a Table,
}

impl<'a> TableAdapter<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Features are every column but the last; labels are the last column.
    pub fn convert(&self) -> Result<LabeledData> {
        let values = self.table.values();
        let n_cols = values.ncols();
        if n_cols < 2 {
            return Err(TrainerError::Shape(format!(
                "expected at least one feature column and a label column, got {} column(s)",
                n_cols
            )));
        }

        let features = values.slice(s![.., ..n_cols - 1]).to_owned();
        let labels = values
            .column(n_cols - 1)
            .iter()
            .enumerate()
            .map(|(row, &value)| {
                if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
                    Ok(value as usize)
                } else {
                    Err(TrainerError::InvalidLabel { row, value })
                }
            })
            .collect::<Result<Vec<usize>>>()?;

        Ok(LabeledData {
            features,
            labels: Array1::from_vec(labels),
        })
    }
}
