// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use crate::config::ServerConfig;
use crate::search::JobSearchService;
use crate::types::{JobSearchResponse, SearchCriteria};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/search-jobs", data = "<criteria>")]
pub async fn search_jobs(
    criteria: Json<SearchCriteria>,
    service: &State<Arc<JobSearchService>>,
) -> Result<Json<JobSearchResponse>, Custom<Json<ErrorResponse>>> {
    handlers::search_jobs_handler(criteria, service).await
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    handlers::health_handler().await
}

#[get("/")]
pub async fn root() -> Json<TextResponse> {
    handlers::root_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request format", "BAD_REQUEST"))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        format!("No route for {} {}", request.method(), request.uri()),
        "NOT_FOUND",
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Search criteria could not be read; fields must be strings",
        "INVALID_CRITERIA",
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR"))
}

/// Assemble the rocket instance without launching it.
pub fn build_rocket(service: Arc<JobSearchService>, server: &ServerConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", server.address.clone()))
        .merge(("port", server.port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(service)
        .register("/", catchers![bad_request, not_found, unprocessable, internal_error])
        .mount("/", routes![search_jobs, health, root, options])
}

pub async fn start_web_server(service: Arc<JobSearchService>, server: &ServerConfig) -> Result<()> {
    info!(
        "Starting Job Finder API server on {}:{}",
        server.address, server.port
    );

    let _rocket = build_rocket(service, server)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}
