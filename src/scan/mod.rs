//! Repository scanning: ignore rules, path classification, tree walking.

pub mod patterns;
pub mod rules;
pub mod walker;

pub use patterns::{classify, IgnorePattern, IgnoreRules};
pub use walker::TreeWalker;
