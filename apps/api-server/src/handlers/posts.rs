//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Authored, Post, PostFilter};
use quill_core::services::{NewPost, PostPatch};
use quill_shared::MessageResponse;
use quill_shared::dto::{CreatePostRequest, PostListQuery, PostResponse, UpdatePostRequest};

use super::author_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_response(authored: Authored<Post>) -> PostResponse {
    let Authored { item: post, author } = authored;
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author: author_response(author),
        tags: post.tags,
        status: post.status.to_string(),
        views: post.views,
        comment_count: post.comment_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn post_list(posts: Vec<Authored<Post>>) -> Vec<PostResponse> {
    posts.into_iter().map(post_response).collect()
}

/// GET /api/posts?search=&tag=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let PostListQuery { search, tag } = query.into_inner();
    let posts = state.posts.list(&PostFilter::new(search, tag)).await?;

    Ok(HttpResponse::Ok().json(post_list(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create(
            &identity.author(),
            NewPost {
                title: req.title,
                content: req.content,
                tags: req.tags,
                status: req.status,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/posts/myposts
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_mine(&identity.author()).await?;

    Ok(HttpResponse::Ok().json(post_list(posts)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(&id).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .update(
            &id,
            &identity.author(),
            PostPatch {
                title: req.title,
                content: req.content,
                tags: req.tags,
                status: req.status,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&id, &identity.author()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post removed successfully")))
}
