//! Shared test utilities for the vsc-sync workspace.
//!
//! It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`LayerTree`] builder for configs repositories and editor
//!   profile directories

pub mod tree;

pub use tree::{LayerDir, LayerTree};
