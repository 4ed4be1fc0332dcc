//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup phase):
//!     (method, pattern, handler)
//!     → pattern.rs (split into literal / :named / *wildcard segments)
//!     → trie.rs (insert into the method's tree)
//!     → router.rs (store handler under the full pattern)
//!
//! Lookup (per request):
//!     (method, path)
//!     → trie.rs (backtracking search for a terminal node)
//!     → router.rs (rebuild params from the matched pattern)
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Trees are built once and only read while serving
//! - Registration order decides precedence between ambiguous siblings
//! - No regex in the hot path

pub mod pattern;
pub mod router;
mod trie;

pub use pattern::Segment;
pub use router::{Params, RouteMatch, Router};
