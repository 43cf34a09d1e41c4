//! The built-in components.

pub mod filter;
pub mod ordering;
pub mod pagination;
pub mod search;
