//! Voss generator where sources change at random times.

use rand::Rng;
use rand_distr::{Distribution, Geometric};
use tracing::debug;

use crate::error::{invalid, Result};
use crate::table::SourceTable;

const DEFAULT_SOURCES: usize = 10;
const CHANGE_PROBABILITY: f64 = 0.5;

/// A single source update: `column` takes `value` from `row` onwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeEvent {
    pub row: usize,
    pub column: usize,
    pub value: f64,
}

/// Stochastic-schedule Voss pink noise.
///
/// `nrows` samples are produced from `ncols` sources. There are `nrows`
/// change events; each picks a uniform row and a geometric column, so source
/// `k` changes about half as often as source `k - 1`. Columns past the last
/// source fold back onto column 0.
#[derive(Debug, Clone)]
pub struct StochasticVoss {
    nrows: usize,
    ncols: usize,
    geometric: Geometric,
}

impl StochasticVoss {
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        if nrows < 1 || ncols < 1 {
            return Err(invalid(format!(
                "stochastic generator needs nrows >= 1 and ncols >= 1, got {nrows} x {ncols}"
            )));
        }
        let geometric = Geometric::new(CHANGE_PROBABILITY)
            .map_err(|_| invalid("geometric probability must lie in [0, 1]"))?;
        Ok(Self {
            nrows,
            ncols,
            geometric,
        })
    }

    /// `nrows` samples from the default ten sources.
    pub fn with_rows(nrows: usize) -> Result<Self> {
        Self::new(nrows, DEFAULT_SOURCES)
    }

    pub fn output_len(&self) -> usize {
        self.nrows
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>> {
        let first_row: Vec<f64> = (0..self.ncols).map(|_| rng.gen()).collect();
        let first_column: Vec<f64> = (0..self.nrows).map(|_| rng.gen()).collect();
        let events = self.draw_events(rng);
        self.apply(&first_row, &first_column, &events)
    }

    /// Draws the change events, all columns first, then rows, then values.
    pub fn draw_events<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ChangeEvent> {
        let n = self.nrows;

        let columns: Vec<usize> = (0..n)
            .map(|_| {
                // rand_distr counts failures; the schedule counts trials.
                let trials = self.geometric.sample(rng).saturating_add(1);
                usize::try_from(trials)
                    .ok()
                    .filter(|&c| c < self.ncols)
                    .unwrap_or(0)
            })
            .collect();
        let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..self.nrows)).collect();

        columns
            .into_iter()
            .zip(rows)
            .map(|(column, row)| ChangeEvent {
                row,
                column,
                value: rng.gen(),
            })
            .collect()
    }

    /// Builds the table from its seeds and events and sums each row.
    ///
    /// The column seed is written after the row seed, so `first_column[0]`
    /// owns cell (0, 0). Events are applied in order.
    pub fn apply(
        &self,
        first_row: &[f64],
        first_column: &[f64],
        events: &[ChangeEvent],
    ) -> Result<Vec<f64>> {
        if first_row.len() != self.ncols || first_column.len() != self.nrows {
            return Err(invalid(format!(
                "seeds of length {} and {} do not fit a {} x {} table",
                first_row.len(),
                first_column.len(),
                self.nrows,
                self.ncols
            )));
        }

        let mut table = SourceTable::new(self.nrows, self.ncols);
        table.seed_row(0, first_row);
        table.seed_column(0, first_column);
        for event in events {
            if event.row >= self.nrows || event.column >= self.ncols {
                return Err(invalid(format!(
                    "event at ({}, {}) outside {} x {} table",
                    event.row, event.column, self.nrows, self.ncols
                )));
            }
            table.set(event.row, event.column, event.value);
        }
        debug!(
            rows = self.nrows,
            cols = self.ncols,
            events = events.len(),
            "stochastic table scheduled"
        );

        Ok(table.forward_fill()?.row_sums())
    }
}
