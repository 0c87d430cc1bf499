//! Payoff matrices over joint actions and the maximin pick.

use serde::Serialize;
use std::fmt::Write as _;

/// Row-major payoffs from side one's point of view. `None` marks a cell the
/// search skipped; it is never read as a value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PayoffMatrix {
    rows: usize,
    cols: usize,
    values: Vec<Option<f32>>,
}

impl PayoffMatrix {
    pub fn new(rows: usize, cols: usize, values: Vec<Option<f32>>) -> anyhow::Result<Self> {
        if values.len() != rows * cols {
            anyhow::bail!(
                "payoff matrix of {}x{} needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                values.len()
            );
        }
        Ok(Self { rows, cols, values })
    }

    /// Builds from a search result whose length is known to match.
    pub(crate) fn from_search(rows: usize, cols: usize, values: Vec<Option<f32>>) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        Self { rows, cols, values }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn values(&self) -> &[Option<f32>] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values[row * self.cols + col]
    }

    /// Smallest present value of each row.
    pub fn row_minimums(&self) -> Vec<Option<f32>> {
        row_minimums(&self.values, self.rows, self.cols)
    }

    pub fn safest(&self) -> (usize, f32) {
        pick_safest(&self.values, self.rows, self.cols)
    }

    /// One line per row, four decimals, absent cells left empty.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    out.push(',');
                }
                if let Some(value) = self.get(row, col) {
                    let _ = write!(out, "{value:.4}");
                }
            }
            if row + 1 < self.rows {
                out.push('\n');
            }
        }
        out
    }

    pub fn write_csv(&self, path: &std::path::Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_csv())?;
        Ok(())
    }
}

pub(crate) fn row_minimums(values: &[Option<f32>], rows: usize, cols: usize) -> Vec<Option<f32>> {
    (0..rows)
        .map(|row| {
            values[row * cols..(row + 1) * cols]
                .iter()
                .flatten()
                .copied()
                .fold(None, |min: Option<f32>, v| Some(min.map_or(v, |m| m.min(v))))
        })
        .collect()
}

/// Side one's maximin row: the first row whose smallest present payoff is
/// the largest. Rows with no present payoff are never chosen.
pub fn pick_safest(values: &[Option<f32>], rows: usize, cols: usize) -> (usize, f32) {
    let mut best_index = 0;
    let mut best_value = f32::MIN;
    for (index, minimum) in row_minimums(values, rows, cols).into_iter().enumerate() {
        if let Some(minimum) = minimum {
            if minimum > best_value {
                best_value = minimum;
                best_index = index;
            }
        }
    }
    (best_index, best_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safest_row_has_the_largest_minimum() {
        // Row 0 risks -10 for a shot at 50; row 1 never drops below 5.
        let values = vec![Some(50.0), Some(-10.0), Some(5.0), Some(8.0)];
        assert_eq!(pick_safest(&values, 2, 2), (1, 5.0));
    }

    #[test]
    fn ties_resolve_to_the_first_row() {
        let values = vec![Some(3.0), Some(7.0), Some(9.0), Some(3.0)];
        assert_eq!(pick_safest(&values, 2, 2), (0, 3.0));
    }

    #[test]
    fn absent_cells_are_not_zero() {
        // A zero in place of the absent cell would make row 1 lose to row 0.
        let values = vec![Some(-5.0), Some(-2.0), Some(4.0), None];
        assert_eq!(pick_safest(&values, 2, 2), (1, 4.0));
    }

    #[test]
    fn matrix_accessors_and_csv() {
        let matrix = PayoffMatrix::new(2, 2, vec![Some(1.0), None, Some(-2.5), Some(0.25)])
            .expect("matrix");
        assert_eq!(matrix.get(1, 0), Some(-2.5));
        assert_eq!(matrix.get(0, 1), None);
        assert_eq!(matrix.get(5, 0), None);
        assert_eq!(matrix.row_minimums(), vec![Some(1.0), Some(-2.5)]);
        assert_eq!(matrix.to_csv(), "1.0000,\n-2.5000,0.2500");
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(PayoffMatrix::new(2, 2, vec![Some(1.0)]).is_err());
    }
}
