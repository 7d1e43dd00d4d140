use axum::{Json, extract::State};
use chrono::Local;

use super::AppState;
use super::error::TIMESTAMP_FORMAT;
use super::types::ServiceInfo;

pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "cinarr",
        description: "Movie and series catalog backed by TMDB",
        timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        status: "running",
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
