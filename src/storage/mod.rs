//! Remote object-store access.
//!
//! `client` defines the capability trait the rest of the service programs
//! against; `s3` is the production implementation backed by the provider
//! SDK. Signing and wire details never leak past this module.

pub mod client;
pub mod s3;
