//! # Folio Shared
//!
//! Wire types between the API and its clients (the blog frontend and the
//! dashboard). Kept free of server dependencies so a WASM client can use it.

pub mod dto;
pub mod response;

pub use response::ApiResponse;
