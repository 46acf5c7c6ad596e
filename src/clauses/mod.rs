//! Top-level Cypher clauses.
//!
//! Every clause here is a [`Statement`](crate::tree::Statement): a handle
//! over a reference-counted tree node with fluent builder methods. Clause
//! handles are cheap to clone and clones share state, so a clause can keep
//! being extended after it has been embedded into another statement.

pub mod call;
pub mod create;
pub mod foreach;
pub mod match_clause;
pub mod merge;
pub mod return_clause;
mod sub_clauses;
pub mod union;
pub mod unwind;
pub mod use_clause;
pub mod with_clause;

pub use call::{Call, CallProcedure};
pub use create::Create;
pub use foreach::Foreach;
pub use match_clause::Match;
pub use merge::Merge;
pub use return_clause::Return;
pub use union::Union;
pub use unwind::Unwind;
pub use use_clause::Use;
pub use with_clause::With;
