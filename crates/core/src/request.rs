use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::family::Family;

/// Distribution parameters, bound either by keyword or by position.
///
/// JSON objects deserialize as [`Parameters::Named`], arrays as
/// [`Parameters::Positional`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameters {
    Named(IndexMap<String, f64>),
    Positional(Vec<f64>),
}

impl Parameters {
    pub fn named<K: Into<String>>(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        Parameters::Named(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn positional(values: impl Into<Vec<f64>>) -> Self {
        Parameters::Positional(values.into())
    }

    pub fn len(&self) -> usize {
        match self {
            Parameters::Named(map) => map.len(),
            Parameters::Positional(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSpec {
    pub name: String,
    pub is_continuous: bool,
    pub parameters: Parameters,
}

impl DistributionSpec {
    /// Build a spec whose kind flag is taken from the registry.
    pub fn for_family(family: Family, parameters: Parameters) -> Self {
        Self {
            name: family.id().to_string(),
            is_continuous: family.kind().is_continuous(),
            parameters,
        }
    }
}

/// Shape of the sample draw: a flat vector or a 2-D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleShape {
    Flat(usize),
    Matrix { rows: usize, cols: usize },
}

impl SampleShape {
    /// Number of underlying variates.
    pub fn total(&self) -> usize {
        match *self {
            SampleShape::Flat(n) => n,
            SampleShape::Matrix { rows, cols } => rows.saturating_mul(cols),
        }
    }

    /// (rows, cols) of the grid; flat draws are a single row.
    pub fn dims(&self) -> (usize, usize) {
        match *self {
            SampleShape::Flat(n) => (1, n),
            SampleShape::Matrix { rows, cols } => (rows, cols),
        }
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, SampleShape::Matrix { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub spec: DistributionSpec,
    pub shape: SampleShape,
    pub primary_stat: String,
    #[serde(default)]
    pub secondary_stat: Option<String>,
    #[serde(default)]
    pub secondary_enabled: bool,
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl GenerationRequest {
    pub fn new(spec: DistributionSpec, shape: SampleShape, primary_stat: impl Into<String>) -> Self {
        Self {
            spec,
            shape,
            primary_stat: primary_stat.into(),
            secondary_stat: None,
            secondary_enabled: false,
            random_seed: None,
        }
    }

    pub fn with_secondary(mut self, stat: impl Into<String>) -> Self {
        self.secondary_stat = Some(stat.into());
        self.secondary_enabled = true;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}
