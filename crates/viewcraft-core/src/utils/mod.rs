//! Utility types and functions shared across viewcraft crates.
//!
//! - [`MultiValueDict`]: an insertion-ordered dictionary holding several values per key.
//! - [`text`]: string helpers used for labels and chips.

mod multi_value_dict;
pub mod text;

pub use multi_value_dict::MultiValueDict;
