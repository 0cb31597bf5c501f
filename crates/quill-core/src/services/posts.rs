//! Content store: post authoring, listing and ownership rules.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::DomainError;
use crate::domain::{Author, Authored, Post, PostFilter, PostStatus, split_tags};
use crate::error::RepoError;
use crate::ports::{PostRepository, UserRepository};

use super::{non_empty, parse_id, required, required_trimmed};

/// Input for a new post. `tags` is the raw comma-separated list.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
}

/// Partial update. Empty fields leave the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn create(
        &self,
        author: &Author,
        input: NewPost,
    ) -> Result<Authored<Post>, DomainError> {
        let title = required_trimmed(input.title, "Title is required")?;
        let content = required(input.content, "Content is required")?;
        let tags = input.tags.as_deref().map(split_tags).unwrap_or_default();
        let status = match non_empty(input.status) {
            Some(raw) => parse_status(&raw)?,
            None => PostStatus::default(),
        };

        let post = self
            .posts
            .insert(Post::new(author.id, title, content, tags, status))
            .await?;

        tracing::info!(
            post_id = %post.id,
            author_id = %author.id,
            status = %post.status,
            "Post created"
        );
        Ok(Authored::new(post, Some(author.clone())))
    }

    /// Public listing: published posts only.
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<Authored<Post>>, DomainError> {
        let posts = self.posts.find_published(filter).await?;
        self.attach_authors(posts).await
    }

    /// Every post the caller owns, drafts included.
    pub async fn list_mine(&self, author: &Author) -> Result<Vec<Authored<Post>>, DomainError> {
        let posts = self.posts.find_by_author(author.id).await?;
        Ok(posts
            .into_iter()
            .map(|post| Authored::new(post, Some(author.clone())))
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Authored<Post>, DomainError> {
        let post = self.find(id).await?;
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .map(|user| Author::from(&user));
        Ok(Authored::new(post, author))
    }

    pub async fn update(
        &self,
        id: &str,
        caller: &Author,
        patch: PostPatch,
    ) -> Result<Authored<Post>, DomainError> {
        let mut post = self.load_owned(id, caller, "update").await?;

        if let Some(title) = non_empty(patch.title) {
            post.title = required_trimmed(Some(title), "Title is required")?;
        }
        if let Some(content) = non_empty(patch.content) {
            post.content = content;
        }
        if let Some(status) = non_empty(patch.status) {
            post.status = parse_status(&status)?;
        }
        if let Some(tags) = non_empty(patch.tags) {
            post.tags = split_tags(&tags);
        }
        post.updated_at = Utc::now();

        let post = self
            .posts
            .update_content(post)
            .await
            .map_err(not_found_if_gone)?;

        tracing::info!(post_id = %post.id, "Post updated");
        Ok(Authored::new(post, Some(caller.clone())))
    }

    /// Remove a post. Its comments are left in place.
    pub async fn delete(&self, id: &str, caller: &Author) -> Result<(), DomainError> {
        let post = self.load_owned(id, caller, "delete").await?;
        self.posts.delete(post.id).await.map_err(not_found_if_gone)?;

        tracing::info!(post_id = %post.id, "Post deleted");
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Post, DomainError> {
        let id = parse_id(id, "Post")?;
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(DomainError::post_not_found)
    }

    /// Load a post and assert the caller wrote it.
    async fn load_owned(
        &self,
        id: &str,
        caller: &Author,
        action: &'static str,
    ) -> Result<Post, DomainError> {
        let post = self.find(id).await?;
        if post.author_id != caller.id {
            tracing::warn!(
                post_id = %post.id,
                caller_id = %caller.id,
                action,
                "Ownership check failed"
            );
            return Err(DomainError::Forbidden {
                action,
                entity: "post",
            });
        }
        Ok(post)
    }

    async fn attach_authors(&self, posts: Vec<Post>) -> Result<Vec<Authored<Post>>, DomainError> {
        let authors = resolve_authors(&*self.users, posts.iter().map(|p| p.author_id)).await?;
        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                Authored::new(post, author)
            })
            .collect())
    }
}

fn parse_status(raw: &str) -> Result<PostStatus, DomainError> {
    raw.parse::<PostStatus>().map_err(DomainError::Validation)
}

fn not_found_if_gone(err: RepoError) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(),
        other => DomainError::Repository(other),
    }
}

/// Resolve the distinct author ids to their public profiles in one lookup.
pub(crate) async fn resolve_authors(
    users: &dyn UserRepository,
    ids: impl Iterator<Item = Uuid>,
) -> Result<HashMap<Uuid, Author>, DomainError> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = users.find_by_ids(&ids).await?;
    Ok(users
        .iter()
        .map(|user| (user.id, Author::from(user)))
        .collect())
}
