//! Shared test utilities for the espansr workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`env`]: [`TestEnv`], a temporary espansr + Espanso directory layout
//! - [`templates`]: JSON template documents as the template directory stores them

pub mod env;
pub mod templates;

pub use env::TestEnv;
pub use templates::{date_var, form_var, template_json, with_variables};
