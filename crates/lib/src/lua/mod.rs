//! Lua recipe files.
//!
//! A recipe file returns a table describing the project and its hooks. The
//! hooks receive a `ctx` table whose functions write into the descriptor's
//! option table, requirement set and package info.
//!
//! # Submodules
//!
//! - [`ctx`] - The `ctx` tables handed to each hook
//! - [`recipe`] - [`LuaRecipe`], the [`Recipe`](crate::descriptor::Recipe) backed by a Lua file
//! - [`runtime`] - Low-level Lua VM management

pub mod ctx;
pub mod recipe;
pub mod runtime;

pub use recipe::LuaRecipe;
