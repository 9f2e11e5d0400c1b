//! Descriptor: build intent plus lifecycle.
//!
//! A [`Recipe`] supplies the project identity and the hooks (configure,
//! requirements, build requirements, package info). A [`Descriptor`] owns one
//! invocation's state and drives the recipe and an external toolchain through
//! the phases in strict order:
//!
//! `Uninitialized → Configured → LaidOut → Built → Packaged → Finalized`
//!
//! # Submodules
//!
//! - [`lifecycle`] - The [`Descriptor`] state machine
//! - [`recipe`] - The [`Recipe`] trait and the contexts passed to its hooks

pub mod lifecycle;
pub mod recipe;
mod types;

pub use lifecycle::Descriptor;
pub use recipe::{ConfigureCtx, Recipe, RequirementsCtx};
pub use types::*;
