//! Domain rules for the Inventra asset tracker.
//!
//! Everything in this crate is storage-agnostic: ownership scoping, the
//! two-level category tree, name normalization, asset linkage rules, and the
//! advisory response cache.

pub mod asset;
pub mod cache;
pub mod category_tree;
pub mod error;
pub mod image;
pub mod naming;
pub mod scope;
pub mod types;
