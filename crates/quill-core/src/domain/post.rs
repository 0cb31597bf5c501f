use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visibility state of a post. Only published posts are publicly listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("`{}` is not a valid status", other)),
        }
    }
}

/// Post entity - represents a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub views: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with zeroed counters.
    pub fn new(
        author_id: Uuid,
        title: String,
        content: String,
        tags: Vec<String>,
        status: PostStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            tags,
            status,
            views: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Split a comma-separated tag list, trimming each tag and dropping empty ones.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Filter for the public post listing.
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    search: Option<String>,
    tag: Option<String>,
}

impl PostFilter {
    pub fn new(search: Option<String>, tag: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()),
            tag: tag.filter(|t| !t.is_empty()),
        }
    }

    /// Case-insensitive text matched against title, content and tags.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Exact tag the post must carry.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Evaluate the filter against a post, including the published-only rule.
    pub fn matches(&self, post: &Post) -> bool {
        if !post.is_published() {
            return false;
        }

        if let Some(tag) = self.tag() {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        match self.search() {
            Some(search) => {
                let needle = search.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
                    || post.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}
