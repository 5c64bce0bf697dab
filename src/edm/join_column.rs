use crate::metamodel::JoinColumnDef;
use serde::Serialize;

/// Resolved (local column, referenced column) pair of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinColumn {
    name: String,
    referenced_column_name: String,
}

impl JoinColumn {
    pub fn new(name: impl Into<String>, referenced_column_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_column_name: referenced_column_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn referenced_column_name(&self) -> &str {
        &self.referenced_column_name
    }

    /// At least one of the two names has to be inferred.
    pub fn is_implicit(&self) -> bool {
        self.name.is_empty() || self.referenced_column_name.is_empty()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_referenced_column_name(&mut self, name: impl Into<String>) {
        self.referenced_column_name = name.into();
    }
}

impl From<&JoinColumnDef> for JoinColumn {
    fn from(def: &JoinColumnDef) -> Self {
        Self::new(def.name.trim(), def.referenced_column_name.trim())
    }
}
