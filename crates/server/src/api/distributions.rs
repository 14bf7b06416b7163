//! Family registry listing for the dashboard's selectors and inputs.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use distboard_compute::Functional;
use distboard_core::{Family, ParamSpec};

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ParamInfo {
    pub name: String,
    pub aliases: Vec<String>,
    /// Whole numbers only.
    pub integer: bool,
    pub default: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FamilyInfo {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub supports_fit: bool,
    pub parameters: Vec<ParamInfo>,
    /// Statistic labels accepted as `primary_stat`/`secondary_stat`.
    pub functionals: Vec<String>,
    /// Standard column labels prefixed onto generated tables.
    pub columns: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ObservationInfo {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DistributionsResponse {
    pub families: Vec<FamilyInfo>,
    pub observations: ObservationInfo,
    pub graph_height: u32,
    pub histogram_bins: usize,
}

fn param_info(state: &AppState, param: &ParamSpec) -> ParamInfo {
    ParamInfo {
        name: param.name.to_string(),
        aliases: param.aliases.iter().map(|a| a.to_string()).collect(),
        integer: param.integer,
        default: state.config.defaults.for_param(param.name),
    }
}

fn family_info(state: &AppState, family: Family) -> FamilyInfo {
    let kind = family.kind();
    FamilyInfo {
        id: family.id().to_string(),
        label: family.label().to_string(),
        kind: kind.to_string(),
        supports_fit: family.supports_fit(),
        parameters: family.params().iter().map(|p| param_info(state, p)).collect(),
        functionals: Functional::available(kind).map(|f| f.label().to_string()).collect(),
        columns: state.assembler.columns().standard(kind).to_vec(),
    }
}

/// List every supported family with its parameter schema and defaults.
#[utoipa::path(
    get,
    path = "/distributions",
    tag = "Distributions",
    responses(
        (status = 200, description = "Supported families and dashboard settings", body = DistributionsResponse)
    )
)]
pub async fn distributions(State(state): State<Arc<AppState>>) -> Json<DistributionsResponse> {
    let range = state.config.generation.observation_range().normalized();
    Json(DistributionsResponse {
        families: Family::all().iter().map(|&f| family_info(&state, f)).collect(),
        observations: ObservationInfo {
            min: range.min,
            max: range.max,
            default: range.clamp(range.midpoint()),
        },
        graph_height: state.config.ui.graph_height,
        histogram_bins: state.config.ui.histogram_bins,
    })
}
