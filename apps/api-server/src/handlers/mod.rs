//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;

use actix_web::{HttpResponse, web};

use quill_core::domain::Author;
use quill_shared::ErrorResponse;
use quill_shared::dto::AuthorResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/login", web::post().to(auth::login)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    // Must be registered before /{id}
                    .route("/myposts", web::get().to(posts::my_posts))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create_comment))
                    .route("/post/{post_id}", web::get().to(comments::list_comments)),
            ),
    );
}

/// GET /
async fn index() -> HttpResponse {
    HttpResponse::Ok().body("API Running...")
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found("Route not found"))
}

fn author_response(author: Option<Author>) -> Option<AuthorResponse> {
    author.map(|a| AuthorResponse {
        id: a.id,
        username: a.username,
    })
}
