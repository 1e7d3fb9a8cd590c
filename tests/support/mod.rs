//! Shared helpers for integration tests.

pub mod container;
pub mod synthetic;
