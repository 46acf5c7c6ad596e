//! cypher-dsl - Programmatic Cypher query construction
//!
//! This crate builds Cypher statements as trees of clause, pattern and
//! expression nodes and compiles them to query text plus a parameter map:
//! - Identity-based references: two handles render to the same variable
//!   name only if they are clones of one another
//! - Fluent clause builders (MATCH, CREATE, MERGE, WITH, UNWIND, CALL, ...)
//! - Operator combinators with fixed parenthesization
//! - Automatic parameter collection into an ordered JSON map
//!
//! ```
//! use cypher_dsl::clauses::Match;
//! use cypher_dsl::expr::operators::eq;
//! use cypher_dsl::references::{NodeRef, Param};
//! use cypher_dsl::{pattern, Statement};
//!
//! let movie = NodeRef::new(["Movie"]);
//! let title = Param::new(serde_json::json!("The Matrix"));
//! let query = Match::new(pattern::node(&movie))
//!     .where_(eq(movie.property("title"), &title))
//!     .returns([&movie]);
//!
//! let compiled = query.compile().unwrap();
//! assert_eq!(
//!     compiled.text,
//!     "MATCH (this0:`Movie`)\nWHERE this0.title = $param0\nRETURN this0"
//! );
//! ```

pub mod clauses;
pub mod errors;
pub mod expr;
pub mod pattern;
pub mod references;
pub mod scope;
pub mod tree;
pub mod utils;

pub use errors::CypherBuildError;
pub use expr::Expr;
pub use scope::Environment;
pub use tree::{CompiledQuery, Statement, ToCypher, TreeNode};
