//! # Scribe Core
//!
//! The domain layer of the Scribe posts API.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, ports, input validation and the post service that drives them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::DomainError;
pub use service::PostService;
