pub mod error;
pub mod types;
pub mod value;

pub use error::{ModelError, Result};
pub use types::PrimitiveKind;
pub use value::{EmbeddedValue, Value};
