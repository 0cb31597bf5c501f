//! Signup and login handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::services::{Credentials, NewUser};
use quill_shared::dto::{AuthResponse, LoginRequest, SignupRequest, UserResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(message: &str, token: String, user: User) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        token,
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }
}

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .auth
        .register(NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;
    let token = state.auth.issue_token(&user)?;

    Ok(HttpResponse::Created().json(auth_response("User created successfully", token, user)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (user, token) = state
        .auth
        .authenticate(Credentials {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Ok().json(auth_response("Logged in successfully", token, user)))
}
