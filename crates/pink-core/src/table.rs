//! Grid of random sources shared by both Voss variants.
//!
//! Rows are time steps, columns are sources. A cell is either unset or holds
//! the value a source took at that step; [`SourceTable::forward_fill`] makes
//! every source hold its last value until it changes again.

use crate::error::{PinkError, Result};

#[derive(Debug, Clone)]
pub struct SourceTable {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl SourceTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[self.index(row, col)]
    }

    /// Writes one cell. Later writes to the same cell win.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col);
        self.cells[idx] = Some(value);
    }

    pub fn seed_row(&mut self, row: usize, values: &[f64]) {
        debug_assert_eq!(values.len(), self.cols);
        for (col, &value) in values.iter().enumerate() {
            self.set(row, col, value);
        }
    }

    pub fn seed_column(&mut self, col: usize, values: &[f64]) {
        debug_assert_eq!(values.len(), self.rows);
        for (row, &value) in values.iter().enumerate() {
            self.set(row, col, value);
        }
    }

    /// Carries the last set value of each column down through unset cells.
    pub fn forward_fill(self) -> Result<FilledTable> {
        let mut values = vec![0.0; self.rows * self.cols];

        for col in 0..self.cols {
            let mut carry = None;
            for row in 0..self.rows {
                let idx = self.index(row, col);
                if let Some(v) = self.cells[idx] {
                    carry = Some(v);
                }
                values[idx] = carry.ok_or(PinkError::UnseededColumn { column: col })?;
            }
        }

        Ok(FilledTable {
            rows: self.rows,
            cols: self.cols,
            values,
        })
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} table",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

/// A table with no unset cells.
#[derive(Debug, Clone)]
pub struct FilledTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl FilledTable {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn row_sums(&self) -> Vec<f64> {
        if self.cols == 0 {
            return vec![0.0; self.rows];
        }
        self.values
            .chunks(self.cols)
            .map(|row| row.iter().sum())
            .collect()
    }
}
