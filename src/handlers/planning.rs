use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{PlanningBreakdown, PlanningProfile, PlanningResult};
use crate::planning;
use crate::AppState;

use super::{ApiError, ApiJson};

#[derive(Debug, Deserialize)]
pub struct PlanningRequest {
    #[serde(flatten)]
    pub profile: PlanningProfile,
    /// Opaque advisory text supplied by the caller, returned untouched
    #[serde(default)]
    pub enrichment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResponse {
    #[serde(flatten)]
    pub result: PlanningResult,
    pub breakdown: PlanningBreakdown,
    pub recommended_templates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<String>,
}

/// Derive a deployment plan for an organization profile
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PlanningRequest>,
) -> Result<Json<PlanningResponse>, ApiError> {
    req.profile
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let result = planning::plan(&req.profile);
    let breakdown = planning::explain(&req.profile);

    let catalog = state.catalog.current().await;
    let recommended_templates = catalog
        .recommend(&req.profile)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();

    Ok(Json(PlanningResponse {
        result,
        breakdown,
        recommended_templates,
        enrichment: req.enrichment,
    }))
}
