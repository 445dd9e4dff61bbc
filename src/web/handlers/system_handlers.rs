// src/web/handlers/system_handlers.rs
use crate::web::types::TextResponse;

use rocket::serde::json::Json;
use tracing::debug;

pub async fn health_handler() -> Json<&'static str> {
    debug!("Health check");
    Json("OK")
}

pub async fn root_handler() -> Json<TextResponse> {
    Json(TextResponse::success(
        "Welcome to the Job Finder API. POST your search criteria to /search-jobs.",
    ))
}
