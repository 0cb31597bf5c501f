//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Authored, Comment};
use quill_core::services::NewComment;
use quill_shared::dto::{CommentResponse, CreateCommentRequest};

use super::author_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn comment_response(authored: Authored<Comment>) -> CommentResponse {
    let Authored {
        item: comment,
        author,
    } = authored;
    CommentResponse {
        id: comment.id,
        content: comment.content,
        author: author_response(author),
        post: comment.post_id,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

/// POST /api/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let comment = state
        .comments
        .create(
            &identity.author(),
            NewComment {
                content: req.content,
                post_id: req.post_id,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// GET /api/comments/post/{post_id}
pub async fn list_comments(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list_for_post(&post_id).await?;

    let body: Vec<CommentResponse> = comments.into_iter().map(comment_response).collect();
    Ok(HttpResponse::Ok().json(body))
}
