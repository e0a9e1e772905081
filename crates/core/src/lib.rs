//! Domain types and pure logic for the vidgate job tracker.
//!
//! Everything here is I/O-free: the canonical job model, status
//! vocabulary normalization, progress scaling, and creation-parameter
//! validation. The provider client and the HTTP surface live in their
//! own crates and build on these types.

pub mod error;
pub mod job;
pub mod status;
pub mod validation;
