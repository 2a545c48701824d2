//! CLI command implementations.

pub mod common;
pub mod grid;
pub mod routes;
pub mod sample;
pub mod tiles;
