// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Cost-matrix loader for the labelled CSV files written by the route pipeline.
//!
//! The file is a square table. The header row starts with an index-name cell
//! (usually empty) followed by the destination labels; every further row starts
//! with an origin label followed by one value per destination:
//!
//! ```raw
//! ,GRU,BSB,REC
//! GRU,0,872.4,inf
//! BSB,872.4,0,1650.0
//! REC,inf,1650.0,0
//! ```
//!
//! Values are decimal numbers or `inf` / `Infinity` (any case) for a missing
//! edge. Records are read with the `csv` crate, so labels may be quoted and may
//! contain the delimiter. Empty lines are skipped and surrounding whitespace is
//! trimmed from every cell. The columns may be listed in a different order than
//! the rows, but they must name the same nodes; node indices follow the row
//! order.
//!
//! The loader accepts any `BufRead`, file path, raw reader, or string slice.
//! Validation of the resulting values is delegated to `CostMatrixBuilder`.

use crate::{
    cost::EdgeCost,
    index::NodeIndex,
    matrix::{CostMatrix, CostMatrixBuilder, MatrixError},
};
use rustc_hash::FxHashMap;
use std::{
    fs::File,
    io::{BufRead, Read},
    path::Path,
};

/// The error type for the matrix loading process.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(csv::Error),
    #[error("matrix file has no header row")]
    MissingHeader,
    #[error("line {line}: could not parse `{token}` as a cost")]
    Parse { line: usize, token: String },
    #[error("line {line}: row has {found} values but the header names {expected} columns")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("header names {expected} columns but the file has {found} rows")]
    RowCount { expected: usize, found: usize },
    #[error("invalid matrix: {0}")]
    Matrix(#[from] MatrixError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        // The header counts towards the record length, so both sides drop the label cell.
        if let csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } = err.kind()
        {
            return LoaderError::RowLength {
                line: pos.as_ref().map_or(0, |p| p.line() as usize),
                expected: (*expected_len as usize).saturating_sub(1),
                found: (*len as usize).saturating_sub(1),
            };
        }
        LoaderError::Csv(err)
    }
}

/// A configurable loader for cost-matrix files.
///
/// # Configuration
/// * `delimiter`: The cell separator byte, `b','` by default.
/// * `forbid_at_least`: Any cost `>=` this value is treated as a missing edge.
///   Useful for files that encode "no edge" as a large sentinel number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixLoader {
    delimiter: u8,
    forbid_at_least: Option<f64>,
}

impl Default for MatrixLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            forbid_at_least: None,
        }
    }
}

impl MatrixLoader {
    /// Creates a new `MatrixLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cell separator.
    #[inline]
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treats every cost greater than or equal to `v` as a missing edge.
    #[inline]
    pub fn forbid_at_least(mut self, v: f64) -> Self {
        self.forbid_at_least = Some(v);
        self
    }

    /// Loads a matrix from a type implementing `BufRead`.
    #[inline]
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<CostMatrix, LoaderError> {
        self.from_reader(rdr)
    }

    /// Loads a matrix from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<CostMatrix, LoaderError> {
        let file = File::open(path)?;
        self.from_reader(file)
    }

    /// Loads a matrix from a generic reader. The `csv` reader buffers internally.
    pub fn from_reader<R: Read>(&self, r: R) -> Result<CostMatrix, LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(r);

        // The first cell names the index column and is ignored.
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();
        if columns.is_empty() {
            return Err(LoaderError::MissingHeader);
        }

        let mut row_labels: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line() as usize);

            let mut cells = record.iter();
            let label = cells.next().unwrap_or_default().to_string();
            let values = cells
                .map(|token| self.parse_cost(token, line))
                .collect::<Result<Vec<f64>, LoaderError>>()?;

            row_labels.push(label);
            rows.push(values);
        }

        self.assemble(columns, row_labels, rows)
    }

    /// Loads a matrix from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<CostMatrix, LoaderError> {
        self.from_reader(s.as_bytes())
    }

    fn parse_cost(&self, token: &str, line: usize) -> Result<f64, LoaderError> {
        // `f64::from_str` accepts `inf` and `infinity` in any case.
        let value: f64 = token.parse().map_err(|_| LoaderError::Parse {
            line,
            token: token.to_string(),
        })?;

        match self.forbid_at_least {
            Some(limit) if value >= limit => Ok(f64::INFINITY),
            _ => Ok(value),
        }
    }

    fn assemble(
        &self,
        columns: Vec<String>,
        row_labels: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<CostMatrix, LoaderError> {
        if rows.is_empty() {
            return Err(MatrixError::Empty.into());
        }
        if rows.len() != columns.len() {
            return Err(LoaderError::RowCount {
                expected: columns.len(),
                found: rows.len(),
            });
        }

        let mut row_position: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, label) in row_labels.iter().enumerate() {
            if row_position.insert(label.as_str(), i).is_some() {
                return Err(MatrixError::DuplicateLabel(label.clone()).into());
            }
        }

        // Column j of the file holds destination `column_target[j]`.
        let mut column_target = Vec::with_capacity(columns.len());
        let mut seen = vec![false; columns.len()];
        for label in &columns {
            let target = *row_position
                .get(label.as_str())
                .ok_or_else(|| MatrixError::LabelMismatch(label.clone()))?;
            if std::mem::replace(&mut seen[target], true) {
                return Err(MatrixError::DuplicateLabel(label.clone()).into());
            }
            column_target.push(target);
        }

        let mut builder = CostMatrixBuilder::new(row_labels);
        for (from, row) in rows.into_iter().enumerate() {
            for (column, value) in row.into_iter().enumerate() {
                builder.set_cost(
                    NodeIndex::new(from),
                    NodeIndex::new(column_target[column]),
                    EdgeCost::from_raw(value),
                );
            }
        }

        Ok(builder.build()?)
    }
}
