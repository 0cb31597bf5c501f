//! Discussion store: comments attached to posts.

use std::sync::Arc;

use crate::DomainError;
use crate::domain::{Author, Authored, Comment};
use crate::error::RepoError;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

use super::{parse_id, required_trimmed};
use super::posts::resolve_authors;

/// Input for a new comment. `post_id` is the raw identifier from the request.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub content: Option<String>,
    pub post_id: Option<String>,
}

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    /// Comment on an existing post and bump its comment counter.
    pub async fn create(
        &self,
        author: &Author,
        input: NewComment,
    ) -> Result<Authored<Comment>, DomainError> {
        let post_id = parse_id(input.post_id.as_deref().unwrap_or_default(), "Post")?;
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(DomainError::post_not_found)?;

        let content = required_trimmed(input.content, "Comment content is required")?;

        // Counter first: it is also the write-time existence check
        self.posts
            .increment_comment_count(post.id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::post_not_found(),
                other => DomainError::Repository(other),
            })?;

        let comment = self
            .comments
            .insert(Comment::new(post.id, author.id, content))
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post.id, "Comment created");
        Ok(Authored::new(comment, Some(author.clone())))
    }

    /// Comments for a post, newest first. An unknown or malformed id yields nothing.
    pub async fn list_for_post(
        &self,
        post_id: &str,
    ) -> Result<Vec<Authored<Comment>>, DomainError> {
        let Ok(post_id) = parse_id(post_id, "Post") else {
            return Ok(Vec::new());
        };

        let comments = self.comments.find_by_post(post_id).await?;
        let authors = resolve_authors(&*self.users, comments.iter().map(|c| c.author_id)).await?;
        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned();
                Authored::new(comment, author)
            })
            .collect())
    }
}
