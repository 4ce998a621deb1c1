//! Repository layer: path resolution and persistence over the namespace.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`,
//!   `UniquenessViolation`) in addition to DB transport errors.
//! - All statements are parameterized; quote stripping is interface
//!   compatibility, never escaping.

pub mod hierarchy_repo;
pub mod path;
pub mod resolver;
