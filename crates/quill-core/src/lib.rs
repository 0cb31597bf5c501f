//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! Entities, ports and the application services that enforce the posting rules.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
