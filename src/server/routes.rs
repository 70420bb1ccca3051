// src/server/routes.rs
// =============================================================================
// HTTP handlers and the JSON bodies they speak.
//
// Routes:
//   GET  /                 -> "Server is running"
//   POST /check-links      -> {"links": ["host", ...]}
//                          <- {"links": {"host": "available"}, "links_num": 1}
//   POST /generate-report  -> {"links_list": [1, 2]}
//                          <- application/pdf attachment
//
// Bodies are decoded as JSON whatever Content-Type says, so a plain
// `curl -d '{"links": [...]}'` works too.
// =============================================================================

use super::error::ApiError;
use crate::checker::{Availability, Prober};
use crate::service::LinkService;
use crate::store::null_as_empty;
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    // A body without "links", or with "links": null, is an empty batch
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub links: BTreeMap<String, Availability>,
    pub links_num: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links_list: Vec<u64>,
}

pub async fn root() -> &'static str {
    "Server is running"
}

pub async fn check_links<P: Prober + 'static>(
    State(service): State<Arc<LinkService<P>>>,
    body: Bytes,
) -> Result<Json<CheckResponse>, ApiError> {
    let request: CheckRequest = serde_json::from_slice(&body)?;
    let outcome = service.check_links(request.links).await?;

    Ok(Json(CheckResponse {
        links: outcome.statuses,
        links_num: outcome.id,
    }))
}

pub async fn generate_report<P: Prober + 'static>(
    State(service): State<Arc<LinkService<P>>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ReportRequest = serde_json::from_slice(&body)?;
    let pdf = service.render_report(&request.links_list)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=report.pdf",
            ),
        ],
        pdf,
    )
        .into_response())
}
