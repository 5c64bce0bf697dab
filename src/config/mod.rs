use crate::edm::name_builder::{NameBuilder, NameStyle};
use crate::edm::post_processor::{MetadataPostProcessor, NoopPostProcessor};
use std::fmt;
use std::sync::Arc;

/// Settings for turning a persistence model into API metadata.
///
/// # Examples
///
/// ```
/// use ormedm::MapperConfig;
/// use ormedm::edm::NameStyle;
///
/// let config = MapperConfig::new("org.example.model")
///     .name_style(NameStyle::AsDeclared)
///     .quote_db_identifiers(true);
/// assert_eq!(config.namespace, "org.example.model");
/// ```
#[derive(Clone)]
pub struct MapperConfig {
    /// Qualifies type names: `<namespace>.<Name>`
    pub namespace: String,

    /// Derivation of default external names
    pub name_style: NameStyle,

    /// Render database field names quoted (`"ID"`)
    pub quote_db_identifiers: bool,

    /// Naming strategy invoked once per descriptor
    pub post_processor: Arc<dyn MetadataPostProcessor>,
}

impl MapperConfig {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name_style: NameStyle::Pascal,
            quote_db_identifiers: false,
            post_processor: Arc::new(NoopPostProcessor),
        }
    }

    /// Set the naming style
    pub fn name_style(mut self, style: NameStyle) -> Self {
        self.name_style = style;
        self
    }

    /// Quote database field names
    pub fn quote_db_identifiers(mut self, quote: bool) -> Self {
        self.quote_db_identifiers = quote;
        self
    }

    /// Set the naming post-processor
    pub fn post_processor(mut self, post_processor: Arc<dyn MetadataPostProcessor>) -> Self {
        self.post_processor = post_processor;
        self
    }

    pub(crate) fn name_builder(&self) -> NameBuilder {
        NameBuilder::new(
            self.namespace.clone(),
            self.name_style,
            self.quote_db_identifiers,
        )
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::new("Default")
    }
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperConfig")
            .field("namespace", &self.namespace)
            .field("name_style", &self.name_style)
            .field("quote_db_identifiers", &self.quote_db_identifiers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.namespace, "Default");
        assert_eq!(config.name_style, NameStyle::Pascal);
        assert!(!config.quote_db_identifiers);
    }

    #[test]
    fn test_builder_setters() {
        let config = MapperConfig::new("Model")
            .name_style(NameStyle::AsDeclared)
            .quote_db_identifiers(true);
        let names = config.name_builder();
        assert_eq!(names.namespace(), "Model");
        assert_eq!(names.fqn("Order"), "Model.Order");
    }
}
