//! Canonical entity identifiers rendered per result row.

pub mod accessor;
pub mod builder;
pub mod error;
pub mod row;

pub use accessor::AccessorTable;
pub use builder::EntityIdentifierBuilder;
pub use error::{IdentifierError, IdentifierResult};
pub use row::{ResultRow, TupleRow};
