use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};
use crate::AppState;

pub const REPORT_ERROR_MESSAGE: &str = "Post report controller error";

/// Body of a failed report request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportErrorBody {
    pub message: &'static str,
    pub more_details: Value,
}

impl ReportErrorBody {
    pub fn new(error: &pr_core::Error) -> Self {
        Self {
            message: REPORT_ERROR_MESSAGE,
            more_details: json!({ "error": error.to_string() }),
        }
    }
}

pub async fn posts_report(
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.report_builder.build_report().await;
    debug!(?result, "posts report built");

    match result {
        Ok(Some(rows)) => Json(rows).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            warn!("{}: {}", REPORT_ERROR_MESSAGE, e);
            (StatusCode::BAD_REQUEST, Json(ReportErrorBody::new(&e))).into_response()
        }
    }
}
