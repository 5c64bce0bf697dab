use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a simple attribute value, expressed the way the API
/// metadata names it (`Edm.String`, `Edm.Int64`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    String,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Decimal,
    Single,
    Double,
    Date,
    TimeOfDay,
    DateTimeOffset,
    Guid,
    Binary,
}

impl PrimitiveKind {
    /// Literal values of these kinds are wrapped in single quotes inside an
    /// entity identifier.
    pub fn is_quoted(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Decimal
                | Self::Single
                | Self::Double
        )
    }

    pub fn edm_name(&self) -> &'static str {
        match self {
            Self::String => "Edm.String",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::Decimal => "Edm.Decimal",
            Self::Single => "Edm.Single",
            Self::Double => "Edm.Double",
            Self::Date => "Edm.Date",
            Self::TimeOfDay => "Edm.TimeOfDay",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::Guid => "Edm.Guid",
            Self::Binary => "Edm.Binary",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.edm_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_strings_are_quoted() {
        assert!(PrimitiveKind::String.is_quoted());
        assert!(!PrimitiveKind::Int64.is_quoted());
        assert!(!PrimitiveKind::Date.is_quoted());
        assert!(!PrimitiveKind::Guid.is_quoted());
    }

    #[test]
    fn test_edm_names() {
        assert_eq!(PrimitiveKind::Int32.to_string(), "Edm.Int32");
        assert_eq!(PrimitiveKind::DateTimeOffset.edm_name(), "Edm.DateTimeOffset");
    }
}
