use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{CatalogStats, TemplateFilter};
use crate::models::{TemplateCategory, TemplateDefinition, TemplateSummary};
use crate::render::{self, FieldError, RenderError, RenderedConfig, VariableValues};
use crate::AppState;

use super::{ApiError, ApiJson, ApiQuery};

/// List templates, optionally filtered by vendor, model, category, use case
/// or free-text query
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<TemplateFilter>,
) -> Json<Vec<TemplateSummary>> {
    let catalog = state.catalog.current().await;
    let templates = catalog
        .query(&filter)
        .into_iter()
        .map(TemplateSummary::from)
        .collect();
    Json(templates)
}

/// Get a single template by ID
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TemplateDefinition>, ApiError> {
    let catalog = state.catalog.current().await;
    let template = catalog
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("template"))?;
    Ok(Json(template))
}

pub async fn template_stats(State(state): State<Arc<AppState>>) -> Json<CatalogStats> {
    Json(state.catalog.current().await.stats())
}

#[derive(Debug, Serialize)]
pub struct TemplateFacets {
    pub vendors: Vec<String>,
    pub categories: Vec<TemplateCategory>,
}

/// Distinct vendors and categories present in the catalog
pub async fn template_facets(State(state): State<Arc<AppState>>) -> Json<TemplateFacets> {
    let catalog = state.catalog.current().await;
    Json(TemplateFacets {
        vendors: catalog.vendors().into_iter().map(String::from).collect(),
        categories: catalog.categories(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub values: VariableValues,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub render_id: String,
    pub rendered_at: DateTime<Utc>,
    #[serde(flatten)]
    pub config: RenderedConfig,
}

/// Render a template with caller-supplied values
pub async fn render_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RenderRequest>,
) -> Result<Json<RenderResponse>, ApiError> {
    let catalog = state.catalog.current().await;
    let template = catalog
        .get(&id)
        .ok_or_else(|| ApiError::not_found("template"))?;

    match render::render(template, &req.values) {
        Ok(config) => {
            let render_id = uuid::Uuid::new_v4().to_string();
            tracing::info!(
                template = %id,
                render_id = %render_id,
                ignored = config.ignored_values.len(),
                "Rendered template"
            );
            Ok(Json(RenderResponse {
                render_id,
                rendered_at: Utc::now(),
                config,
            }))
        }
        Err(RenderError::Validation(errors)) => {
            tracing::debug!(template = %id, failures = errors.len(), "Render rejected");
            Err(ApiError::validation(
                errors.iter().map(|e| e.to_field_error()).collect(),
            ))
        }
        Err(err @ RenderError::Integrity(_)) => Err(ApiError::internal(err.to_string())),
    }
}

pub const MAX_BATCH_ITEMS: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRenderItem {
    pub template_id: String,
    #[serde(default)]
    pub values: VariableValues,
}

#[derive(Debug, Deserialize)]
pub struct BatchRenderRequest {
    pub items: Vec<BatchRenderItem>,
}

/// Outcome of one batch item; `status` is what a single render would return
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRenderResult {
    pub template_id: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<RenderedConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl BatchRenderResult {
    fn failed(template_id: String, status: u16, error: String) -> Self {
        Self {
            template_id,
            status,
            config: None,
            error: Some(error),
            errors: Vec::new(),
        }
    }

    fn from_render(template_id: String, outcome: Result<RenderedConfig, RenderError>) -> Self {
        match outcome {
            Ok(config) => Self {
                template_id,
                status: 200,
                config: Some(config),
                error: None,
                errors: Vec::new(),
            },
            Err(err @ RenderError::Validation(_)) => Self {
                template_id,
                status: 422,
                config: None,
                error: Some(err.to_string()),
                errors: err.validation_errors().iter().map(|e| e.to_field_error()).collect(),
            },
            Err(err @ RenderError::Integrity(_)) => Self::failed(template_id, 500, err.to_string()),
        }
    }
}

/// Render several templates in one request. Items are rendered in parallel
/// and reported in request order.
pub async fn render_batch(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BatchRenderRequest>,
) -> Result<Json<Vec<BatchRenderResult>>, ApiError> {
    if req.items.len() > MAX_BATCH_ITEMS {
        return Err(ApiError::bad_request(format!(
            "at most {} items per batch",
            MAX_BATCH_ITEMS
        )));
    }

    let catalog = state.catalog.current().await;
    let count = req.items.len();

    let results = tokio::task::spawn_blocking(move || {
        let jobs: Vec<(&TemplateDefinition, &VariableValues)> = req
            .items
            .iter()
            .filter_map(|item| catalog.get(&item.template_id).map(|t| (t, &item.values)))
            .collect();
        let mut rendered = render::render_batch(&jobs).into_iter();

        req.items
            .iter()
            .map(|item| {
                let id = item.template_id.clone();
                if catalog.get(&item.template_id).is_none() {
                    return BatchRenderResult::failed(id, 404, "template not found".to_string());
                }
                match rendered.next() {
                    Some(outcome) => BatchRenderResult::from_render(id, outcome),
                    None => BatchRenderResult::failed(id, 500, "render result missing".to_string()),
                }
            })
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| ApiError::internal(format!("batch render task failed: {}", e)))?;

    tracing::info!(
        items = count,
        rendered = results.iter().filter(|r| r.status == 200).count(),
        "Batch render finished"
    );
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_and_filter() {
        let (status, body) = send(app(), "GET", "/api/templates", None).await;
        assert_eq!(status, StatusCode::OK);
        let all = body.as_array().unwrap().len();
        assert!(all > 0);
        assert!(body[0].get("body").is_none());

        let (_, body) = send(app(), "GET", "/api/templates?vendor=cisco", None).await;
        let cisco = body.as_array().unwrap();
        assert!(!cisco.is_empty() && cisco.len() < all);
        assert!(cisco.iter().all(|t| t["vendor"] == "Cisco"));

        let (_, body) = send(
            app(),
            "GET",
            "/api/templates?vendor=Cisco&category=Segmentation",
            None,
        )
        .await;
        assert_eq!(body[0]["id"], "cisco-c9300-trustsec");
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let (status, body) = send(app(), "GET", "/api/templates?category=Coffee", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Coffee"));
    }

    #[tokio::test]
    async fn test_get_template() {
        let (status, body) = send(app(), "GET", "/api/templates/cisco-c9300-mab", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vendor"], "Cisco");
        assert!(body["body"].as_str().unwrap().contains("{{radius_key}}"));
        assert_eq!(body["variables"][0]["name"], "interface_range");

        let (status, body) = send(app(), "GET", "/api/templates/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "template not found");
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, body) = send(app(), "GET", "/api/templates/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["total"].as_u64().unwrap() > 0);
        assert!(body["byVendor"]["Cisco"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_render_success() {
        let payload = json!({
            "values": {
                "radius_server_ip": "10.1.1.10",
                "radius_key": "s3cretKey!",
                "access_vlan": 20,
                "unused": "x"
            }
        });
        let (status, body) = send(
            app(),
            "POST",
            "/api/templates/cisco-c9300-mab/render",
            Some(payload),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["templateId"], "cisco-c9300-mab");
        assert!(body["renderId"].as_str().is_some());
        assert!(body["renderedAt"].as_str().is_some());
        let text = body["text"].as_str().unwrap();
        assert!(text.contains("address ipv4 10.1.1.10"));
        assert!(text.contains("switchport access vlan 20"));
        assert!(!text.contains("{{"));
        assert_eq!(body["effectiveValues"]["mac_separator"], "-");
        assert_eq!(body["ignoredValues"], json!(["unused"]));
    }

    #[tokio::test]
    async fn test_render_reports_every_failure() {
        let payload = json!({
            "values": {
                "radius_server_ip": "10.1.1.300",
                "mac_separator": "/"
            }
        });
        let (status, body) = send(
            app(),
            "POST",
            "/api/templates/cisco-c9300-mab/render",
            Some(payload),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = body["errors"].as_array().unwrap();
        let reasons: Vec<(&str, &str)> = errors
            .iter()
            .map(|e| (e["variable"].as_str().unwrap(), e["reason"].as_str().unwrap()))
            .collect();
        assert!(reasons.contains(&("radius_server_ip", "InvalidIPAddress")));
        assert!(reasons.contains(&("radius_key", "MissingRequiredVariable")));
        assert!(reasons.contains(&("mac_separator", "OptionNotAllowed")));
        assert!(reasons.contains(&("access_vlan", "MissingRequiredVariable")));
        assert_eq!(errors.len(), 4);
    }

    #[tokio::test]
    async fn test_facets() {
        let (status, body) = send(app(), "GET", "/api/templates/facets", None).await;
        assert_eq!(status, StatusCode::OK);
        let vendors = body["vendors"].as_array().unwrap();
        assert!(vendors.iter().any(|v| v == "Cisco"));
        assert!(body["categories"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "Authentication"));
    }

    #[tokio::test]
    async fn test_render_batch_keeps_request_order() {
        let good = json!({
            "radius_server_ip": "10.1.1.10",
            "radius_key": "s3cretKey!",
            "access_vlan": "20"
        });
        let payload = json!({
            "items": [
                { "templateId": "cisco-c9300-mab", "values": good },
                { "templateId": "nope", "values": {} },
                { "templateId": "cisco-c9300-mab", "values": { "access_vlan": "twenty" } },
                { "templateId": "cisco-c9300-mab", "values": good }
            ]
        });
        let (status, body) = send(app(), "POST", "/api/templates/render-batch", Some(payload)).await;

        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        let statuses: Vec<u64> = results.iter().map(|r| r["status"].as_u64().unwrap()).collect();
        assert_eq!(statuses, vec![200, 404, 422, 200]);
        assert!(results[0]["config"]["text"]
            .as_str()
            .unwrap()
            .contains("switchport access vlan 20"));
        assert_eq!(results[1]["templateId"], "nope");
        assert!(results[2]["errors"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e["variable"] == "access_vlan" && e["reason"] == "TypeMismatch"));
        assert_eq!(results[0]["config"], results[3]["config"]);
    }

    #[tokio::test]
    async fn test_render_batch_limit() {
        let items: Vec<_> = (0..=super::MAX_BATCH_ITEMS)
            .map(|_| json!({ "templateId": "cisco-c9300-mab" }))
            .collect();
        let (status, _) = send(
            app(),
            "POST",
            "/api/templates/render-batch",
            Some(json!({ "items": items })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_render_unknown_template() {
        let (status, _) = send(
            app(),
            "POST",
            "/api/templates/nope/render",
            Some(json!({ "values": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
