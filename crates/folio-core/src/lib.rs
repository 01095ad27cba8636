//! # Folio Core
//!
//! The domain layer of the Folio author site: posts, categories and gallery
//! images, the query builder that lists them and the accessors that mutate
//! them. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod service;
pub mod text;
pub mod validation;

pub use error::{DomainError, RepoError};
