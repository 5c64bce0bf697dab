use super::error::{IdentifierError, IdentifierResult};
use crate::core::{EmbeddedValue, Value};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Getter = Arc<dyn Fn(&EmbeddedValue) -> Option<Value> + Send + Sync>;

/// Typed getters for the components of embeddable values, keyed by
/// embeddable class and internal attribute name.
///
/// Built once next to the persistence model and shared by every
/// identifier builder.
///
/// # Examples
///
/// ```
/// use ormedm::core::{EmbeddedValue, Value};
/// use ormedm::identifier::AccessorTable;
///
/// struct OrderKey {
///     value: i64,
/// }
///
/// let accessors = AccessorTable::new()
///     .with::<OrderKey, _>("org.example.OrderKey", "value", |key| Value::Integer(key.value));
/// let embedded = EmbeddedValue::new("org.example.OrderKey", OrderKey { value: 7 });
/// assert_eq!(accessors.read(&embedded, "value", "Value").unwrap(), Value::Integer(7));
/// ```
#[derive(Clone, Default)]
pub struct AccessorTable {
    getters: HashMap<String, HashMap<String, Getter>>,
}

impl AccessorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the getter of `attribute` on the embeddable `class_name`,
    /// whose instances carry a payload of type `T`.
    pub fn register<T, F>(&mut self, class_name: &str, attribute: &str, getter: F)
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let getter: Getter = Arc::new(move |embedded: &EmbeddedValue| {
            embedded.downcast_ref::<T>().map(&getter)
        });
        self.getters
            .entry(class_name.to_string())
            .or_default()
            .insert(attribute.to_string(), getter);
    }

    pub fn with<T, F>(mut self, class_name: &str, attribute: &str, getter: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.register::<T, F>(class_name, attribute, getter);
        self
    }

    pub fn contains(&self, class_name: &str, attribute: &str) -> bool {
        self.getters
            .get(class_name)
            .is_some_and(|attributes| attributes.contains_key(attribute))
    }

    /// Reads `attribute` (internal name) off `embedded`. `external_name`
    /// only names the component in errors.
    pub fn read(
        &self,
        embedded: &EmbeddedValue,
        attribute: &str,
        external_name: &str,
    ) -> IdentifierResult<Value> {
        let getter = self
            .getters
            .get(embedded.class_name())
            .and_then(|attributes| attributes.get(attribute))
            .ok_or_else(|| IdentifierError::GetterNotFound(external_name.to_string()))?;

        getter(embedded).ok_or_else(|| {
            IdentifierError::InvalidValue(format!(
                "{}: payload is not an instance of '{}'",
                external_name,
                embedded.class_name()
            ))
        })
    }
}

impl fmt::Debug for AccessorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<_> = self.getters.keys().collect();
        classes.sort();
        f.debug_struct("AccessorTable")
            .field("classes", &classes)
            .finish()
    }
}
