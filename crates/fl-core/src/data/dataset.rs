//! Dataset implementation for tabular data
//!
//! A Dataset is a named collection of equal-length numeric columns. It is
//! constructed once from external input, optionally rewritten wholesale by
//! preprocessing, and treated as immutable by everything downstream.

use super::*;

use indexmap::IndexMap;

/// Main Dataset structure
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub(crate) columns: IndexMap<String, Column>,
    pub(crate) nrows: usize,
}

impl Dataset {
    /// Create an empty Dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Dataset from (name, column) pairs
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut builder = DatasetBuilder::new();

        for (name, column) in columns.into_iter() {
            builder = builder.with_column(name, column)?;
        }

        Ok(builder.build())
    }

    /// Shape of the Dataset (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.columns.len())
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get a reference to a column
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Get a column or fail with [`DataError::ColumnNotFound`]
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Keep the rows where `mask` is true
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.nrows),
                actual: format!("mask length {}", mask.len()),
            });
        }

        let mut builder = DatasetBuilder::new();

        for (name, column) in &self.columns {
            let filtered = column.filter(mask)?;
            builder = builder.with_column(name.clone(), filtered)?;
        }

        Ok(builder.build())
    }

    /// Add a new column
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        if !self.columns.is_empty() && column.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", column.len()),
            });
        }

        if self.columns.is_empty() {
            self.nrows = column.len();
        }

        self.columns.insert(name, column);
        Ok(self)
    }

    /// Replace an existing column with one of the same length
    pub fn replace_column(&mut self, name: &str, column: Column) -> Result<()> {
        if !self.columns.contains_key(name) {
            return Err(DataError::ColumnNotFound(name.to_string()));
        }
        if column.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", column.len()),
            });
        }
        self.columns.insert(name.to_string(), column);
        Ok(())
    }

    /// Row mask that is true where every named column has a present value
    pub fn complete_mask(&self, names: &[&str]) -> Result<Vec<bool>> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            columns.push(self.require_column(name)?);
        }

        let mask = (0..self.nrows)
            .map(|i| columns.iter().all(|c| c.is_present(i)))
            .collect();
        Ok(mask)
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dataset({} rows × {} cols)", self.nrows, self.ncols())
    }
}
