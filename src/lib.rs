//! Knemo - pixel-art grid server
//!
//! HTTP front end for the `pixel-grid` conversion pipeline and editor.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
