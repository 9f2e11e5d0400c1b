//! Orchestrator-side resolution.
//!
//! The descriptor only declares first-level requirements and option
//! overrides. This module expands them against a [`Catalog`] of dependency
//! manifests into a [`BuildPlan`]: every package in both build contexts, its
//! effective options, in dependency-first order.
//!
//! # Submodules
//!
//! - [`catalog`] - Loading dependency manifests from disk
//! - [`graph`] - Transitive closure, validation and ordering

pub mod catalog;
pub mod graph;
mod types;

pub use catalog::Catalog;
pub use graph::resolve;
pub use types::*;
