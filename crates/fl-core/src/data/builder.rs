//! Builder pattern for constructing Datasets

use indexmap::IndexMap;

use super::*;

/// Builder for creating Datasets
///
/// Validates column names and lengths at construction so that mismatches
/// surface here rather than at access time.
#[derive(Default)]
pub struct DatasetBuilder {
    columns: IndexMap<String, Column>,
    nrows: Option<usize>,
}

impl DatasetBuilder {
    /// Create a new DatasetBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column to the Dataset
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        // Check dimension consistency
        match self.nrows {
            Some(n) if column.len() != n => {
                return Err(DataError::DimensionMismatch {
                    expected: format!("{} rows", n),
                    actual: format!("{} rows", column.len()),
                });
            }
            None => {
                self.nrows = Some(column.len());
            }
            _ => {}
        }

        self.columns.insert(name, column);
        Ok(self)
    }

    /// Convenience: add a column of plain values
    pub fn with_values<S: Into<String>>(self, name: S, values: Vec<f64>) -> Result<Self> {
        self.with_column(name, Column::from_values(values))
    }

    /// Build the Dataset
    pub fn build(self) -> Dataset {
        let nrows = self.nrows.unwrap_or(0);

        Dataset {
            columns: self.columns,
            nrows,
        }
    }
}
