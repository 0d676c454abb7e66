use std::fmt;

use ndarray::{Array1, Axis};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A single typed column of a `Frame`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Missing cells are stored as `NaN`.
    Float(Array1<f64>),
    Integer(Array1<i64>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Float(values) => values.len(),
            Self::Integer(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric columns widened to `f64`. `None` for text columns.
    pub fn to_f64(&self) -> Option<Array1<f64>> {
        match self {
            Self::Float(values) => Some(values.clone()),
            Self::Integer(values) => Some(values.mapv(|v| v as f64)),
            Self::Text(_) => None,
        }
    }

    /// JSON value of the cell at `row`. Missing cells become `null`.
    pub fn value(&self, row: usize) -> Value {
        match self {
            Self::Float(values) => Value::from(values[row]),
            Self::Integer(values) => Value::from(values[row]),
            Self::Text(values) => values[row]
                .as_ref()
                .map_or(Value::Null, |s| Value::String(s.clone())),
        }
    }

    fn select(&self, positions: &[usize]) -> Self {
        match self {
            Self::Float(values) => Self::Float(values.select(Axis(0), positions)),
            Self::Integer(values) => Self::Integer(values.select(Axis(0), positions)),
            Self::Text(values) => {
                Self::Text(positions.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }

    fn display_cell(&self, row: usize) -> String {
        match self {
            Self::Float(values) => format!("{:?}", values[row]),
            Self::Integer(values) => values[row].to_string(),
            Self::Text(values) => values[row].clone().unwrap_or_else(|| "NaN".to_string()),
        }
    }
}

/// Named columns of equal length plus the source row index of every row.
///
/// The index survives `select` and `head`, so rows of a partition can always be traced back to
/// the row of the dataset they came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Frame {
    /// Build a frame whose index is `0..nrows`.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        let nrows = columns.first().map_or(0, |(_, column)| column.len());
        for (name, column) in &columns {
            if column.len() != nrows {
                return Err(Error::ColumnLength {
                    name: name.clone(),
                    expected: nrows,
                    actual: column.len(),
                });
            }
        }
        let (names, columns) = columns.into_iter().unzip();
        Ok(Self {
            names,
            columns,
            index: (0..nrows).collect(),
        })
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Take rows at `positions` (positions, not index labels), in that order.
    /// Panics if a position is out of bounds.
    pub(crate) fn select(&self, positions: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(positions)).collect(),
            index: positions.iter().map(|&i| self.index[i]).collect(),
        }
    }

    /// First `n` rows, or all of them if there are fewer.
    pub fn head(&self, n: usize) -> Self {
        let positions = (0..n.min(self.nrows())).collect::<Vec<_>>();
        self.select(&positions)
    }

    /// One JSON object per row; keys follow column order.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        (0..self.nrows())
            .map(|row| {
                self.columns()
                    .map(|(name, column)| (name.to_string(), column.value(row)))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_cells = self.index.iter().map(ToString::to_string).collect::<Vec<_>>();
        let index_width = index_cells.iter().map(String::len).max().unwrap_or(0);

        let cells = self
            .columns
            .iter()
            .map(|c| (0..self.nrows()).map(|row| c.display_cell(row)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let widths = self
            .names
            .iter()
            .zip(cells.iter())
            .map(|(name, column)| {
                column
                    .iter()
                    .map(String::len)
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.names.iter().zip(widths.iter()) {
            write!(f, "  {:>width$}", name, width = width)?;
        }
        for (row, index) in index_cells.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", index)?;
            for (column, width) in cells.iter().zip(widths.iter()) {
                write!(f, "  {:>width$}", column[row], width = width)?;
            }
        }
        Ok(())
    }
}
