//! Library crate for umpire-back, exposing modules for binaries and tests.

/// Runtime configuration.
pub mod config;
/// Result persistence.
pub mod dao;
mod dto;
mod error;
/// HTTP routers.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Scoring engine and shared application state.
pub mod state;
