//! Terminal browser for artifact metadata served by a catalog backend.
//!
//! The backend returns flat records keyed by lookup paths; the browser
//! renames those keys to positional column properties and renders them in a
//! grid.

pub mod app;
pub mod artifact;
pub mod backend;
pub mod browser;
pub mod config;
pub mod error;
pub mod event;
pub mod ui;
