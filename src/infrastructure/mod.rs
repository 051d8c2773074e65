//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, wiring and the process runtime.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`runtime`] - Supervised run loop and shutdown

pub mod bootstrap;
pub mod config;
pub mod runtime;
