//! # Web Service
//!
//! HTTP front end for the codec.
//!
//! ## Routes
//!
//! | Method   | Path              | Purpose                                  |
//! |----------|-------------------|------------------------------------------|
//! | GET      | `/`               | index page                               |
//! | GET/POST | `/encode`         | upload form, multipart `file` + `message` |
//! | GET/POST | `/decode`         | upload form, multipart `file`            |
//! | GET      | `/encoded/{file}` | encoded PNGs                             |
//! | GET      | `/decoded/{file}` | recovered messages                       |
//! | GET      | `/about`          | about page                               |
//! | GET      | `/api/health`     | health check                             |
//! | POST     | `/api/encode`     | JSON: multipart `image` + `message`      |
//! | POST     | `/api/decode`     | JSON: multipart `image`                  |
//!
//! Form posts redirect to the result on success and back to the form on any
//! failure. The JSON API answers with the result or an `{ "error": ... }` body.

pub mod handlers;
pub mod pages;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::common::config::WebConfig;

/// Shared state handed to every handler.
pub struct AppState {
    pub config: WebConfig,
}

/// Build the application router for `config`.
pub fn router(config: WebConfig) -> Router {
    let max_upload = config.server.max_upload_bytes;
    let encoded = ServeDir::new(&config.uploads.encode_dir);
    let decoded = ServeDir::new(&config.uploads.decode_dir);
    let state = Arc::new(AppState { config });

    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/encode",
            get(handlers::encode_page).post(handlers::encode_upload),
        )
        .route(
            "/decode",
            get(handlers::decode_page).post(handlers::decode_upload),
        )
        .route("/about", get(handlers::about))
        .route("/api/health", get(handlers::health_check))
        .route("/api/encode", post(handlers::api_encode))
        .route("/api/decode", post(handlers::api_decode))
        .nest_service("/encoded", encoded)
        .nest_service("/decoded", decoded)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
