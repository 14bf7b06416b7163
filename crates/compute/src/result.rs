use indexmap::IndexMap;
use serde::Serialize;
use statrs::statistics::Statistics;

use distboard_core::{Family, Kind, SampleShape};

use crate::moments::Moments;

/// Keys of the summary statistics, in order. Discrete families stop after
/// `entropy` because they have no loc/scale fit.
pub const STAT_KEYS: [&str; 7] = ["mean", "variance", "skewness", "kurtosis", "entropy", "loc", "scale"];

/// Round to `digits` decimal places; values too large to scale are returned as-is.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

/// Row-major 2-D grid of values. Flat draws are a single row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f64>,
}

impl Grid {
    pub fn new(shape: SampleShape, values: Vec<f64>) -> Self {
        let (rows, cols) = shape.dims();
        debug_assert_eq!(rows * cols, values.len());
        Self { rows, cols, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn map(&self, f: impl FnMut(f64) -> f64) -> Grid {
        Grid {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().copied().map(f).collect(),
        }
    }

    pub fn try_map<E>(&self, f: impl FnMut(f64) -> Result<f64, E>) -> Result<Grid, E> {
        Ok(Grid {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().copied().map(f).collect::<Result<_, _>>()?,
        })
    }

    pub fn row(&self, r: usize) -> Option<&[f64]> {
        if r >= self.rows {
            return None;
        }
        self.values.get(r * self.cols..(r + 1) * self.cols)
    }

    /// Nested rows, the 2-D view of matrix-mode draws.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.values.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// All values in row-major order.
    pub fn flatten(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Columnar table: one named column per metric, one row per variate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Transpose a metrics × samples array into named columns.
    pub fn from_metrics(names: Vec<String>, metrics: &[Grid]) -> Result<Self, String> {
        if names.len() != metrics.len() {
            return Err(format!(
                "length mismatch: {} column labels for {} metrics",
                names.len(),
                metrics.len()
            ));
        }
        let columns = names
            .into_iter()
            .zip(metrics)
            .map(|(name, grid)| Column {
                name,
                values: grid.flatten().to_vec(),
            })
            .collect();
        Ok(Self { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        self.columns.iter().map(|c| c.values.get(index).copied()).collect()
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values.iter().take(n).copied().collect(),
                })
                .collect(),
        }
    }

    /// Copy with every cell rounded, for display grids.
    pub fn rounded(&self, digits: i32) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values.iter().map(|&v| round_to(v, digits)).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub family: Family,
    pub kind: Kind,
    pub shape: SampleShape,
    /// One grid per metric: variates, density/mass, cumulative, then the
    /// user statistics. Each grid has the requested shape.
    pub array: Vec<Grid>,
    pub table: Table,
    pub stats: IndexMap<String, f64>,
    /// The distribution's own moments, as reported by the library.
    pub theoretical: Moments,
}

impl GenerationResult {
    /// Drawn variates, flattened in row-major order.
    pub fn values(&self) -> &[f64] {
        self.array.first().map(Grid::flatten).unwrap_or_default()
    }

    /// Mean of the drawn variates, unrounded.
    pub fn sample_mean(&self) -> f64 {
        Statistics::mean(self.values())
    }
}
