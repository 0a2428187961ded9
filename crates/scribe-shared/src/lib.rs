//! # Scribe Shared
//!
//! Wire types shared by the server and its clients: the response envelope
//! and request/response DTOs.

pub mod dto;
pub mod response;

pub use response::{Envelope, FieldErrors};
