//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Rows are kept in insertion order so that listings with equal timestamps
//! still come back newest first.
//! Note: Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostFilter, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

/// Anything stored by id.
trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for User {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Post {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Comment {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Insertion-ordered table behind an async RwLock.
struct Table<T> {
    rows: RwLock<Vec<T>>,
}

impl<T: Keyed + Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    async fn find(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.iter().find(|r| r.key() == id).cloned()
    }

    async fn insert(&self, row: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.key() == row.key()) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, row: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|r| r.key() == row.key())
            .ok_or(RepoError::NotFound)?;
        *slot = row.clone();
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.key() != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    /// Matching rows, latest inserted first.
    async fn select<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| predicate(*r))
            .cloned()
            .collect()
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    table: Table<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.table.find(id).await)
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        // Hold the write lock across the uniqueness check
        let mut rows = self.table.rows.write().await;
        if rows
            .iter()
            .any(|u| u.id == user.id || u.email == user.email || u.username == user.username)
        {
            return Err(RepoError::Constraint("User already exists".to_string()));
        }
        rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.table.update(user).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.table.select(|u| u.email == email).await.into_iter().next())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .table
            .select(|u| u.username == username)
            .await
            .into_iter()
            .next())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        Ok(self.table.select(|u| ids.contains(&u.id)).await)
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    table: Table<Post>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first<T>(
    mut rows: Vec<T>,
    created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    // Stable sort keeps the latest-inserted-first order on ties
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.table.find(id).await)
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.table.insert(post).await
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        self.table.update(post).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_published(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let rows = self.table.select(|p| filter.matches(p)).await;
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = self.table.select(|p| p.author_id == author_id).await;
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn update_content(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.table.rows.write().await;
        let stored = rows
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;

        stored.title = post.title;
        stored.content = post.content;
        stored.tags = post.tags;
        stored.status = post.status;
        stored.updated_at = post.updated_at;
        Ok(stored.clone())
    }

    async fn increment_comment_count(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.table.rows.write().await;
        let post = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        post.comment_count += 1;
        Ok(())
    }
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    table: Table<Comment>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.table.find(id).await)
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.table.insert(comment).await
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.table.update(comment).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.table.delete(id).await
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = self.table.select(|c| c.post_id == post_id).await;
        Ok(newest_first(rows, |c| c.created_at))
    }
}
