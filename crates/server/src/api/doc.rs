//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into a single OpenAPI spec, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "distboard API",
        version = "0.1.0",
        description = "Distribution data generation: sampling, density and cumulative values, user-selected statistics and summary moments.",
    ),
    tags(
        (name = "Health", description = "Server liveness"),
        (name = "Distributions", description = "Supported families, parameter schemas and dashboard settings"),
        (name = "Generation", description = "Sample generation, dashboard plots and the latest plot"),
    ),
    paths(
        crate::api::health::health,
        crate::api::distributions::distributions,
        crate::api::generate::generate,
        crate::api::generate::plot,
        crate::api::generate::latest,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::health::HealthResponse,
        crate::api::distributions::DistributionsResponse,
        crate::api::distributions::FamilyInfo,
        crate::api::distributions::ParamInfo,
        crate::api::distributions::ObservationInfo,
    ))
)]
pub struct ApiDoc;
