//! Domain entities - the core business objects.

mod author;
mod comment;
mod post;
mod user;

pub use author::{Author, Authored};
pub use comment::Comment;
pub use post::{Post, PostFilter, PostStatus, split_tags};
pub use user::User;
