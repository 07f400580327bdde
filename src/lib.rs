//! trendmart library
//!
//! Research cache, link resolution and listing controller for the trendmart
//! CLI, exposed for integration tests.

pub mod cli;
pub mod controller;
pub mod data;
pub mod links;
pub mod store;
