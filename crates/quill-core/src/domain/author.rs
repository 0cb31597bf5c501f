use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// The public face of a user: the only author fields ever attached to content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// A post or comment paired with its author.
///
/// `author` is `None` when the referenced user no longer resolves.
#[derive(Debug, Clone)]
pub struct Authored<T> {
    pub item: T,
    pub author: Option<Author>,
}

impl<T> Authored<T> {
    pub fn new(item: T, author: Option<Author>) -> Self {
        Self { item, author }
    }
}
