//! # Quill Shared
//!
//! Wire types shared between the API server and its clients.
//! Everything here serializes with camelCase field names.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
