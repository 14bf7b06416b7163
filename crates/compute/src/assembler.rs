//! Sample/Stat Assembler.
//!
//! Turns a resolved distribution and a [`GenerationRequest`] into a
//! [`GenerationResult`]: variates, density (or mass), cumulative values and
//! the caller's statistics, stacked into a metrics array, transposed into a
//! named table and summarized into rounded moments.

use std::time::Instant;

use indexmap::IndexMap;
use tracing::{debug, info};

use distboard_core::config::{ColumnConfig, GenerationConfig};
use distboard_core::{Config, DistError, DistResult, GenerationRequest, Stage};

use crate::functional::Functional;
use crate::moments::sample_moments;
use crate::resolver::{resolve, ResolvedDistribution};
use crate::result::{round_to, GenerationResult, Table, STAT_KEYS};

/// Decimal places kept in the stats map.
pub const STATS_DIGITS: i32 = 4;

#[derive(Debug, Clone)]
pub struct Assembler {
    columns: ColumnConfig,
    max_sample_size: usize,
}

impl Assembler {
    pub fn new(columns: ColumnConfig) -> Self {
        Self {
            columns,
            max_sample_size: GenerationConfig::default().max_sample_size,
        }
    }

    pub fn with_max_sample_size(mut self, max_sample_size: usize) -> Self {
        self.max_sample_size = max_sample_size;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.columns.clone()).with_max_sample_size(config.generation.max_sample_size)
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    pub fn max_sample_size(&self) -> usize {
        self.max_sample_size
    }

    /// Resolve the requested distribution and assemble its result.
    pub fn generate(&self, request: &GenerationRequest) -> DistResult<GenerationResult> {
        let dist = resolve(&request.spec)?;
        self.assemble(&dist, request)
    }

    pub fn assemble(&self, dist: &ResolvedDistribution, request: &GenerationRequest) -> DistResult<GenerationResult> {
        let started = Instant::now();
        let family = dist.family();
        let kind = dist.kind();
        let fail = |stage: Stage, cause: String| DistError::failure(family.id(), stage, cause);

        // Labels first, so an unknown statistic never costs a draw.
        let primary = dist.functional(&request.primary_stat)?;
        let secondary = self.secondary(dist, request)?;

        let total = request.shape.total();
        if total == 0 {
            return Err(fail(Stage::Sampling, "sample size must be positive".to_string()));
        }
        if total > self.max_sample_size {
            return Err(fail(
                Stage::Sampling,
                format!("{} variates requested, the limit is {}", total, self.max_sample_size),
            ));
        }

        let values = dist.sample_grid(request.shape, request.random_seed);
        let density = values.map(|x| dist.density(x));
        let cumulative = values.map(|x| dist.cumulative(x));
        let primary_values = values.try_map(|x| dist.evaluate(primary, x))?;
        // The secondary statistic runs over the CDF-transformed sample.
        let secondary_values = match secondary {
            Some((_, functional)) => Some(cumulative.try_map(|p| dist.evaluate(functional, p))?),
            None => None,
        };

        let mut names = self.columns.standard(kind).to_vec();
        names.push(request.primary_stat.clone());
        let mut array = vec![values, density, cumulative, primary_values];
        if let (Some((label, _)), Some(grid)) = (secondary, secondary_values) {
            names.push(label.to_string());
            array.push(grid);
        }

        let table = Table::from_metrics(names, &array).map_err(|cause| fail(Stage::Assembly, cause))?;
        let stats = self.stats(dist, array[0].flatten())?;

        info!(
            family = %family,
            samples = total,
            matrix = request.shape.is_matrix(),
            columns = table.columns.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generated distribution data"
        );

        Ok(GenerationResult {
            family,
            kind,
            shape: request.shape,
            array,
            table,
            stats,
            theoretical: dist.moments(),
        })
    }

    fn secondary<'r>(
        &self,
        dist: &ResolvedDistribution,
        request: &'r GenerationRequest,
    ) -> DistResult<Option<(&'r str, Functional)>> {
        if !request.secondary_enabled {
            return Ok(None);
        }
        match request.secondary_stat.as_deref() {
            Some(label) => Ok(Some((label, dist.functional(label)?))),
            None => Err(DistError::unsupported(dist.family().id(), "")),
        }
    }

    /// Sample moments and entropy, plus loc/scale for refittable families.
    fn stats(&self, dist: &ResolvedDistribution, values: &[f64]) -> DistResult<IndexMap<String, f64>> {
        let moments = sample_moments(values);
        let mut stats: IndexMap<String, f64> = STAT_KEYS
            .iter()
            .zip(moments.as_array())
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        stats.insert("entropy".to_string(), dist.entropy());

        if let Some(fitted) = dist.fit(values) {
            let fitted = fitted.map_err(|e| DistError::failure(dist.family().id(), Stage::Fit, e))?;
            debug!(family = %dist.family(), loc = fitted.loc, scale = fitted.scale, "refitted loc/scale");
            stats.insert("loc".to_string(), fitted.loc);
            stats.insert("scale".to_string(), fitted.scale);
        }

        for value in stats.values_mut() {
            *value = round_to(*value, STATS_DIGITS);
        }
        Ok(stats)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(ColumnConfig::default())
    }
}
