//! Core data models for the gateway.
//!
//! Catalog entities map to database tables via `sqlx::FromRow` and
//! serialize naturally as JSON via `serde`; `response` holds the envelope
//! every endpoint wraps its payload in.

pub mod carousel;
pub mod product;
pub mod response;
