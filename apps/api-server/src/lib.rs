//! # Quill API Server
//!
//! Actix-web application: routes, extractors, error mapping and state wiring.
//! The binary in `main.rs` only reads configuration and starts the server,
//! so integration tests can build the same app with `configure_app`.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_cors::Cors;
use actix_web::{http::header, web};

use middleware::error::{json_error_handler, query_error_handler};
use state::AppState;

/// Register state, extractor configs, routes and the 404 fallback.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state.tokens.clone()))
            .app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .configure(handlers::configure_routes)
            .default_service(web::to(handlers::route_not_found));
    }
}

/// CORS policy allowing the web client's origin.
pub fn cors(client_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(client_url)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}
