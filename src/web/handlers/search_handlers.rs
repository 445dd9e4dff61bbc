// src/web/handlers/search_handlers.rs
use crate::search::JobSearchService;
use crate::types::{JobSearchResponse, SearchCriteria};
use crate::web::types::ErrorResponse;

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use tracing::{error, info};

pub async fn search_jobs_handler(
    criteria: Json<SearchCriteria>,
    service: &State<Arc<JobSearchService>>,
) -> Result<Json<JobSearchResponse>, Custom<Json<ErrorResponse>>> {
    let criteria = criteria.into_inner();

    if !SearchCriteria::is_specified(&criteria.position) {
        return Err(Custom(
            Status::BadRequest,
            Json(ErrorResponse::new(
                "Field 'position' is required",
                "VALIDATION_ERROR",
            )),
        ));
    }

    info!(
        "Search request: position='{}', location='{}'",
        criteria.position, criteria.location
    );

    match service.search(&criteria).await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e) => {
            error!("Search failed: {:#}", e);
            Err(Custom(
                Status::InternalServerError,
                Json(ErrorResponse::new(
                    format!("Error searching jobs: {:#}", e),
                    "SEARCH_ERROR",
                )),
            ))
        }
    }
}
