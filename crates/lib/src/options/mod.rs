//! Option table: per-dependency feature flag overrides.
//!
//! A descriptor only expresses overrides; defaults belong to each dependency's
//! own manifest. Values are keyed by [`FlagRef`] (dependency + flag name) and
//! the last write for a key wins, so the order of `set` calls made during
//! configure is part of the observable result.
//!
//! # Submodules
//!
//! - [`table`] - The [`OptionTable`] mapping and its write log
//! - [`value`] - [`FlagRef`] and [`OptionValue`]

mod table;
mod value;

pub use table::*;
pub use value::*;
