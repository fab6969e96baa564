//! Integration test utilities for gamer communities
//!
//! This crate provides helpers for running the membership and moderation
//! workflows end to end through the service layer, on the in-memory store
//! or on PostgreSQL when `DATABASE_URL` is set.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
