//! Requirement declaration: pinned dependencies of a descriptor.
//!
//! Requirements come in two kinds. Runtime requirements are linked into the
//! produced artifact; build-only requirements are tools needed while building
//! and are never linked. A name may appear once per kind. Versions are exact
//! pins; transitive closure is left to the resolver.

mod types;

pub use types::*;
