//! Domain-focused API endpoint modules.
//!
//! Each sub-module owns a single responsibility area.
//! The shared error body and its mapping from generation errors live here.

pub mod doc;
mod distributions;
mod generate;
mod health;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use distboard_core::DistError;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable kind: `unknown_distribution`, `unsupported_operation`,
    /// `generation_failure`, `not_found` or `internal`.
    pub kind: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, kind: &str, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            kind: kind.to_string(),
        }),
    )
}

/// Rejected requests are 400; numeric failures on valid requests are 422.
pub(crate) fn dist_error(err: DistError) -> ApiError {
    let status = match err {
        DistError::UnknownDistribution(_) | DistError::UnsupportedOperation { .. } => StatusCode::BAD_REQUEST,
        DistError::GenerationFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    api_error(status, err.kind(), &err)
}

// ── Re-exports ───────────────────────────────────────────────────
// Flat `api::foo` paths used by router registration.

pub use distributions::distributions;
pub use generate::{generate, latest, plot};
pub use health::health;

#[cfg(test)]
mod tests {
    use super::*;
    use distboard_core::Stage;

    #[test]
    fn errors_map_to_status_codes() {
        let (status, body) = dist_error(DistError::UnknownDistribution("frobnicate".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.kind, "unknown_distribution");
        assert_eq!(body.error, "Unknown distribution: frobnicate");

        let (status, _) = dist_error(DistError::unsupported("norm", "Nonexistent Function"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = dist_error(DistError::failure("norm", Stage::Functional, "out of range"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.kind, "generation_failure");
    }
}
