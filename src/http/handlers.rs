use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::edge::EdgeEvent;
use crate::http::server::AppState;
use crate::policies::{CachePolicies, DistributionBehaviors};

const DEFAULT_SITE: &str = "WordPress";

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub cached_domain_configs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateParams {
    pub pattern: String,
    pub domain_config: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub domain_config: String,
    pub pattern: String,
    pub translated: String,
}

#[derive(Debug, Deserialize)]
pub struct BehaviorsParams {
    pub domain_config: Option<String>,
    pub site: Option<String>,
}

#[derive(Serialize)]
pub struct BehaviorsResponse {
    pub domain_config: String,
    pub policies: CachePolicies,
    pub behaviors: DistributionBehaviors,
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        cached_domain_configs: state.routes.cached_keys(),
    })
}

/// Run the origin-request hook on a CDN event and return the request to forward.
pub async fn origin_request(State(state): State<AppState>, Json(event): Json<EdgeEvent>) -> Response {
    match state.enricher.handle(event) {
        Some(request) => Json(request).into_response(),
        None => error_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            "edge event carried no records".to_string(),
        ),
    }
}

pub async fn translate(State(state): State<AppState>, Query(params): Query<TranslateParams>) -> Response {
    let domain_config = params
        .domain_config
        .unwrap_or_else(|| state.routes.default_domain_config().to_string());

    match state.routes.translate(&params.pattern, Some(domain_config.as_str())).await {
        Ok(translated) => Json(TranslateResponse {
            domain_config,
            pattern: params.pattern,
            translated,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to translate pattern");
            error_body(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

pub async fn behaviors(State(state): State<AppState>, Query(params): Query<BehaviorsParams>) -> Response {
    let domain_config = params
        .domain_config
        .unwrap_or_else(|| state.routes.default_domain_config().to_string());
    let site = params.site.as_deref().unwrap_or(DEFAULT_SITE);

    match state.behaviors.translated(&state.routes, Some(domain_config.as_str())).await {
        Ok(behaviors) => Json(BehaviorsResponse {
            domain_config,
            policies: CachePolicies::for_site(site),
            behaviors,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build behaviors");
            error_body(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
