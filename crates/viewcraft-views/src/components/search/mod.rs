//! Search over the configured fields, carried in one URL-safe token.
//!
//! - [`match_type`] - Match types and field kinds
//! - [`config`] - Searchable-field configuration
//! - [`state`] - Criteria and the decoded search
//! - [`codec`] - Token encoding and decoding
//! - [`apply`] - Building the query predicate
//! - [`form`] - The search form and its POST fallback
//! - [`component`] - The component itself

pub mod apply;
pub mod codec;
pub mod component;
pub mod config;
pub mod form;
pub mod match_type;
pub mod state;

pub use codec::EncodedToken;
pub use component::{search_url_for, SearchComponent};
pub use config::{SearchConfig, SearchFieldSpec};
pub use form::SearchForm;
pub use match_type::{FieldKind, MatchType};
pub use state::{Criterion, CriterionValue, SearchState};
