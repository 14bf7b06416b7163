use std::env;

use serde::{Deserialize, Serialize};

use crate::family::{Family, Kind};
use crate::inputs::ObservationRange;
use crate::request::Parameters;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f64(profile: &str, key: &str, default: f64) -> f64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Comma-separated list; blank entries are dropped.
fn profiled_env_list(profile: &str, key: &str, default: &[&str]) -> Vec<String> {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub columns: ColumnConfig,
    pub ui: UiConfig,
    pub defaults: ParameterDefaults,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DISTBOARD_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("DISTBOARD_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            generation: GenerationConfig::from_env_profiled(p),
            columns: ColumnConfig::from_env_profiled(p),
            ui: UiConfig::from_env_profiled(p),
            defaults: ParameterDefaults::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  generation:  observations={}..{}, max_sample_size={}, default_seed={}",
            self.generation.min_observations,
            self.generation.max_observations,
            self.generation.max_sample_size,
            self.generation
                .default_seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(entropy)".to_string())
        );
        tracing::info!(
            "  columns:     continuous={:?}, discrete={:?}",
            self.columns.continuous,
            self.columns.discrete
        );
        tracing::info!(
            "  ui:          graph_height={}, histogram_bins={}",
            self.ui.graph_height,
            self.ui.histogram_bins
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: String::new(),
            server: ServerConfig::default(),
            generation: GenerationConfig::default(),
            columns: ColumnConfig::default(),
            ui: UiConfig::default(),
            defaults: ParameterDefaults::default(),
        }
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 3001),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origin: "*".to_string(),
        }
    }
}

// ── Generation ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Lower bound of the observation slider.
    pub min_observations: usize,
    /// Upper bound of the observation slider.
    pub max_observations: usize,
    /// Hard ceiling on variates per request, matrix mode included.
    pub max_sample_size: usize,
    pub default_seed: Option<u64>,
}

impl GenerationConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            min_observations: profiled_env_usize(p, "DISTRIBUTIONS_MIN", 10),
            max_observations: profiled_env_usize(p, "DISTRIBUTIONS_MAX", 1000),
            max_sample_size: profiled_env_usize(p, "MAX_SAMPLE_SIZE", 1_000_000),
            default_seed: profiled_env_opt(p, "RANDOM_SEED").and_then(|v| v.parse().ok()),
        }
    }

    pub fn observation_range(&self) -> ObservationRange {
        ObservationRange::new(self.min_observations, self.max_observations)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_observations: 10,
            max_observations: 1000,
            max_sample_size: 1_000_000,
            default_seed: None,
        }
    }
}

// ── Column labels ─────────────────────────────────────────────

const CONTINUOUS_COLUMNS: &[&str] = &["value", "pdf", "cdf"];
const DISCRETE_COLUMNS: &[&str] = &["value", "pmf", "cdf"];

/// Standard column labels prefixed onto every generated table, per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub continuous: Vec<String>,
    pub discrete: Vec<String>,
}

impl ColumnConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            continuous: profiled_env_list(p, "COLUMNS_CONTINUOUS", CONTINUOUS_COLUMNS),
            discrete: profiled_env_list(p, "COLUMNS_DISCRETE", DISCRETE_COLUMNS),
        }
    }

    pub fn standard(&self, kind: Kind) -> &[String] {
        match kind {
            Kind::Continuous => &self.continuous,
            Kind::Discrete => &self.discrete,
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            continuous: CONTINUOUS_COLUMNS.iter().map(|s| s.to_string()).collect(),
            discrete: DISCRETE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ── UI ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub graph_height: u32,
    pub histogram_bins: usize,
}

impl UiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            graph_height: profiled_env_u32(p, "GRAPH_HEIGHT", 600),
            histogram_bins: profiled_env_usize(p, "HISTOGRAM_BINS", 30).max(1),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            graph_height: 600,
            histogram_bins: 30,
        }
    }
}

// ── Parameter defaults ────────────────────────────────────────

/// Initial values shown in the dashboard's parameter inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefaults {
    pub mean: f64,
    pub sd: f64,
    pub events: f64,
    pub scale: f64,
    pub prob: f64,
    pub trials: f64,
    pub low: f64,
    pub high: f64,
}

impl ParameterDefaults {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            mean: profiled_env_f64(p, "DISTRIBUTIONS_MEAN_MU", d.mean),
            sd: profiled_env_f64(p, "DISTRIBUTIONS_STANDARD_DEVIATION_SIGMA", d.sd),
            events: profiled_env_f64(p, "DISTRIBUTIONS_EVENTS", d.events),
            scale: profiled_env_f64(p, "DISTRIBUTIONS_SCALE", d.scale),
            prob: profiled_env_f64(p, "DISTRIBUTIONS_PROBABILITY", d.prob),
            trials: profiled_env_f64(p, "DISTRIBUTIONS_TRIALS", d.trials),
            low: profiled_env_f64(p, "DISTRIBUTIONS_LOW", d.low),
            high: profiled_env_f64(p, "DISTRIBUTIONS_HIGH", d.high),
        }
    }

    /// Default for a schema parameter name.
    pub fn for_param(&self, name: &str) -> Option<f64> {
        match name {
            "mean" => Some(self.mean),
            "sd" => Some(self.sd),
            "events" => Some(self.events),
            "scale" => Some(self.scale),
            "prob" => Some(self.prob),
            "trials" => Some(self.trials),
            "low" => Some(self.low),
            "high" => Some(self.high),
            _ => None,
        }
    }

    /// Named parameters for `family`, filled from these defaults.
    pub fn parameters_for(&self, family: Family) -> Parameters {
        Parameters::named(
            family
                .params()
                .iter()
                .filter_map(|p| self.for_param(p.name).map(|v| (p.name, v))),
        )
    }
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            mean: 0.0,
            sd: 1.0,
            events: 4.0,
            scale: 1.0,
            prob: 0.5,
            trials: 10.0,
            low: 0.0,
            high: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns_per_kind() {
        let cols = ColumnConfig::default();
        assert_eq!(cols.standard(Kind::Continuous), ["value", "pdf", "cdf"]);
        assert_eq!(cols.standard(Kind::Discrete), ["value", "pmf", "cdf"]);
    }

    #[test]
    fn profiled_list_prefers_profile_key() {
        // Unique keys so parallel tests don't collide.
        env::set_var("CFGTEST_COLUMNS_X", "a, b,,c");
        env::set_var("COLUMNS_X", "z");
        assert_eq!(profiled_env_list("CFGTEST", "COLUMNS_X", &["d"]), ["a", "b", "c"]);
        assert_eq!(profiled_env_list("", "COLUMNS_X", &["d"]), ["z"]);
        assert_eq!(profiled_env_list("", "COLUMNS_MISSING_X", &["d"]), ["d"]);
        env::remove_var("CFGTEST_COLUMNS_X");
        env::remove_var("COLUMNS_X");
    }

    #[test]
    fn graph_height_out_of_range_falls_back() {
        env::set_var("UITEST_GRAPH_HEIGHT", "4294967296");
        assert_eq!(UiConfig::from_env_profiled("UITEST").graph_height, 600);
        env::set_var("UITEST_GRAPH_HEIGHT", "720");
        assert_eq!(UiConfig::from_env_profiled("UITEST").graph_height, 720);
        env::remove_var("UITEST_GRAPH_HEIGHT");
    }

    #[test]
    fn every_schema_param_has_a_default() {
        let defaults = ParameterDefaults::default();
        for family in Family::all() {
            for param in family.params() {
                assert!(defaults.for_param(param.name).is_some(), "{}", param.name);
            }
        }
    }

    #[test]
    fn default_parameters_bind_by_name() {
        let params = ParameterDefaults::default().parameters_for(Family::Binomial);
        assert_eq!(params, Parameters::named([("trials", 10.0), ("prob", 0.5)]));
    }
}
