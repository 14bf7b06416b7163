//! Generation endpoints: raw requests, dashboard plots and the latest plot.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use distboard_compute::{Assembler, GenerationResult, Histogram};
use distboard_compute::result::round_to;
use distboard_core::inputs::{normalize_parameters, ObservationRange};
use distboard_core::{DistributionSpec, Family, GenerationRequest, Parameters, SampleShape};

use crate::state::{AppState, PlotRecord};

use super::{api_error, dist_error, ApiError, ErrorResponse};

/// Run a generation on the blocking pool; sampling is CPU-bound.
async fn run_generation(assembler: Arc<Assembler>, request: GenerationRequest) -> Result<GenerationResult, ApiError> {
    tokio::task::spawn_blocking(move || assembler.generate(&request))
        .await
        .map_err(|e| {
            warn!("Generation task failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "generation task failed")
        })?
        .map_err(dist_error)
}

/// Generate from a full request.
#[utoipa::path(
    post,
    path = "/generate",
    tag = "Generation",
    request_body(content = Object, description = "GenerationRequest: spec, shape, primary_stat, optional secondary_stat/secondary_enabled/random_seed"),
    responses(
        (status = 200, description = "Generated table, array and stats", body = Object),
        (status = 400, description = "Unknown distribution or unsupported statistic", body = ErrorResponse),
        (status = 422, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResult>, ApiError> {
    let result = run_generation(state.assembler.clone(), request).await?;
    Ok(Json(result))
}

fn default_primary() -> String {
    "Survival Function".to_string()
}

/// Dashboard form. Missing fields fall back to configured defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotForm {
    pub distribution: String,
    #[serde(default)]
    pub parameters: Option<Parameters>,
    #[serde(default)]
    pub observations: Option<usize>,
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
    #[serde(default)]
    pub matrix: bool,
    #[serde(default = "default_primary")]
    pub primary_stat: String,
    #[serde(default)]
    pub secondary_stat: Option<String>,
    #[serde(default)]
    pub secondary_enabled: bool,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PlotForm {
    /// Normalize the form into a request: swapped bounds are reordered, the
    /// observation count is clamped into them and probabilities are clamped.
    fn into_request(self, state: &AppState) -> Result<GenerationRequest, ApiError> {
        let generation = &state.config.generation;
        let family: Family = self.distribution.parse().map_err(dist_error)?;

        let range = ObservationRange::new(
            self.min.unwrap_or(generation.min_observations),
            self.max.unwrap_or(generation.max_observations),
        )
        .normalized();
        let shape = if self.matrix {
            range.matrix_shape()
        } else {
            SampleShape::Flat(range.clamp(self.observations.unwrap_or_else(|| range.midpoint())))
        };

        let parameters = self
            .parameters
            .unwrap_or_else(|| state.config.defaults.parameters_for(family));
        let spec = DistributionSpec::for_family(family, normalize_parameters(family, parameters));

        let mut request = GenerationRequest::new(spec, shape, self.primary_stat);
        request.secondary_stat = self.secondary_stat;
        request.secondary_enabled = self.secondary_enabled;
        request.random_seed = self.seed.or(generation.default_seed);
        Ok(request)
    }
}

/// Generate for the dashboard and record the plot as the latest one.
#[utoipa::path(
    post,
    path = "/plot",
    tag = "Generation",
    request_body(content = Object, description = "Dashboard form: distribution, parameters, observations, min, max, matrix, primary_stat, secondary_stat, secondary_enabled, seed"),
    responses(
        (status = 200, description = "Plot record with histogram and sample mean", body = Object),
        (status = 400, description = "Unknown distribution or unsupported statistic", body = ErrorResponse),
        (status = 422, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn plot(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PlotForm>,
) -> Result<Json<PlotRecord>, ApiError> {
    let sequence = state.next_plot_sequence();
    let request = form.into_request(&state)?;
    let family = request.spec.name.clone();
    let result = run_generation(state.assembler.clone(), request).await?;

    let values = result.values().to_vec();
    let record = PlotRecord {
        id: Uuid::new_v4(),
        sequence,
        generated_at: Utc::now(),
        distribution: result.family.label().to_string(),
        actual_mean: round_to(result.sample_mean(), 4),
        histogram: Histogram::from_values(&values, state.config.ui.histogram_bins),
        values,
        graph_height: state.config.ui.graph_height,
        result,
    };
    info!(id = %record.id, sequence, family = %family, mean = record.actual_mean, "plot generated");

    if !state.publish(record.clone()).await {
        debug!(id = %record.id, sequence, "newer plot already published, keeping it as latest");
    }
    Ok(Json(record))
}

/// The most recent dashboard plot.
#[utoipa::path(
    get,
    path = "/latest",
    tag = "Generation",
    responses(
        (status = 200, description = "Latest plot record", body = Object),
        (status = 404, description = "No plot generated yet", body = ErrorResponse)
    )
)]
pub async fn latest(State(state): State<Arc<AppState>>) -> Result<Json<PlotRecord>, ApiError> {
    match state.latest.read().await.as_ref() {
        Some(record) => Ok(Json(record.clone())),
        None => Err(api_error(StatusCode::NOT_FOUND, "not_found", "no plot has been generated yet")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distboard_core::Config;

    fn form(json: serde_json::Value) -> PlotForm {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn form_defaults_fill_the_request() {
        let state = AppState::new(Config::default());
        let request = form(serde_json::json!({"distribution": "Binomial"})).into_request(&state).unwrap();
        assert_eq!(request.spec.name, "binom");
        assert!(!request.spec.is_continuous);
        assert_eq!(request.shape, SampleShape::Flat(500));
        assert_eq!(request.primary_stat, "Survival Function");
        assert_eq!(request.spec.parameters, Parameters::named([("trials", 10.0), ("prob", 0.5)]));
    }

    #[test]
    fn form_bounds_and_probabilities_are_normalized() {
        let state = AppState::new(Config::default());
        let request = form(serde_json::json!({
            "distribution": "geom",
            "parameters": {"prob": 1.7},
            "observations": 5000,
            "min": 200,
            "max": 20
        }))
        .into_request(&state)
        .unwrap();
        assert_eq!(request.shape, SampleShape::Flat(200));
        assert_eq!(request.spec.parameters, Parameters::named([("prob", 1.0)]));
    }

    #[test]
    fn matrix_form_draws_min_by_max() {
        let state = AppState::new(Config::default());
        let request = form(serde_json::json!({"distribution": "norm", "matrix": true, "min": 5, "max": 3}))
            .into_request(&state)
            .unwrap();
        assert_eq!(request.shape, SampleShape::Matrix { rows: 3, cols: 5 });
    }

    #[test]
    fn unknown_family_is_a_bad_request() {
        let state = AppState::new(Config::default());
        let (status, body) = form(serde_json::json!({"distribution": "frobnicate"}))
            .into_request(&state)
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.kind, "unknown_distribution");
    }
}
