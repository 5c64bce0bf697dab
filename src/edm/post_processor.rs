//! Naming strategy applied to every descriptor while the schema is named.
//!
//! The registry calls the configured [`MetadataPostProcessor`] exactly once
//! per entity type, property and navigation property, before any resolution
//! starts. Whatever names it assigns are final.

/// Mutable view on the naming data of one descriptor.
pub struct ElementNaming<'a> {
    internal_name: &'a str,
    external_name: &'a mut String,
    ignore: &'a mut bool,
}

impl<'a> ElementNaming<'a> {
    pub(crate) fn new(internal_name: &'a str, external_name: &'a mut String, ignore: &'a mut bool) -> Self {
        Self {
            internal_name,
            external_name,
            ignore,
        }
    }

    pub fn internal_name(&self) -> &str {
        self.internal_name
    }

    pub fn external_name(&self) -> &str {
        self.external_name
    }

    pub fn set_external_name(&mut self, name: impl Into<String>) {
        *self.external_name = name.into();
    }

    pub fn ignore(&self) -> bool {
        *self.ignore
    }

    pub fn set_ignore(&mut self, ignore: bool) {
        *self.ignore = ignore;
    }
}

/// Strategy for customizing external names and ignore flags.
///
/// `class_name` is the declaring class of the element.
pub trait MetadataPostProcessor: Send + Sync {
    fn process_entity_type(&self, _entity_type: &mut ElementNaming<'_>, _class_name: &str) {}

    fn process_property(&self, _property: &mut ElementNaming<'_>, _class_name: &str) {}

    fn process_navigation_property(&self, _property: &mut ElementNaming<'_>, _class_name: &str) {}
}

/// Leaves every name as the name builder produced it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPostProcessor;

impl MetadataPostProcessor for NoopPostProcessor {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Renamer;

    impl MetadataPostProcessor for Renamer {
        fn process_property(&self, property: &mut ElementNaming<'_>, class_name: &str) {
            if class_name == "org.example.Order" && property.internal_name() == "id" {
                property.set_external_name("OrderId");
                property.set_ignore(true);
            }
        }
    }

    #[test]
    fn test_naming_handle_writes_through() {
        let mut external = "Id".to_string();
        let mut ignore = false;
        {
            let mut naming = ElementNaming::new("id", &mut external, &mut ignore);
            Renamer.process_property(&mut naming, "org.example.Order");
            assert_eq!(naming.external_name(), "OrderId");
        }
        assert_eq!(external, "OrderId");
        assert!(ignore);
    }

    #[test]
    fn test_noop_keeps_names() {
        let mut external = "Id".to_string();
        let mut ignore = false;
        let mut naming = ElementNaming::new("id", &mut external, &mut ignore);
        NoopPostProcessor.process_property(&mut naming, "org.example.Order");
        NoopPostProcessor.process_navigation_property(&mut naming, "org.example.Order");
        assert_eq!(naming.external_name(), "Id");
        assert!(!naming.ignore());
    }
}
