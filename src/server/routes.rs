//! HTTP handlers for the IRIS lookup.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use iris_lookup::pip::IrisService;
use iris_lookup::{IrisProperties, LookupError};

/// Application state shared across handlers
pub struct AppState {
    pub service: IrisService,
}

#[derive(Debug, Default, Deserialize)]
pub struct IrisQueryParams {
    lat: Option<String>,
    lon: Option<String>,
    #[serde(rename = "codeCommune")]
    code_commune: Option<String>,
}

impl IrisQueryParams {
    /// All three parameters are required and must be non-empty
    fn parse(&self) -> Result<(f64, f64, &str), String> {
        let lat = required(&self.lat, "lat")?;
        let lon = required(&self.lon, "lon")?;
        let code_commune = required(&self.code_commune, "codeCommune")?;

        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("lat '{}' is not a number", lat))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("lon '{}' is not a number", lon))?;

        Ok((lat, lon, code_commune))
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, String> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("missing {}", name)),
    }
}

/// Resolve the IRIS zone for `lat`, `lon` and `codeCommune`
pub async fn iris_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IrisQueryParams>,
) -> Result<Json<IrisProperties>, StatusCode> {
    let (lat, lon, code_commune) = params.parse().map_err(|reason| {
        debug!("Rejected IRIS query: {}", reason);
        StatusCode::BAD_REQUEST
    })?;

    match state.service.resolve(lat, lon, code_commune) {
        Ok(properties) => Ok(Json(properties.clone())),
        Err(LookupError::InvalidInput(reason)) => {
            debug!("Rejected IRIS query: {}", reason);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(LookupError::NotFound) => Err(StatusCode::NOT_FOUND),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    features: usize,
    indexed: usize,
}

/// Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        features: state.service.store().len(),
        indexed: state.service.index().len(),
    })
}
