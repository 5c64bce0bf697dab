use super::accessor::AccessorTable;
use super::error::{IdentifierError, IdentifierResult};
use super::row::TupleRow;
use crate::core::{EmbeddedValue, Value};
use crate::edm::{EntityType, PATH_SEPARATOR, Path, Property};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters a URI reference may not contain.
    static ref FORBIDDEN_URI_CHARS: Regex =
        Regex::new(r#"[\s\x00-\x1F\x7F"<>\\^`{|}]"#).expect("static pattern");
}

/// Renders the canonical identifier of one row, e.g. `Order(42)`,
/// `Order('AB')`, `Order(id=1,year=2020)` or
/// `Order(address/country='DE',address/zip=10115)`.
///
/// Pure and stateless per call; one builder may serve any number of rows
/// and threads.
#[derive(Debug, Clone)]
pub struct EntityIdentifierBuilder<'a> {
    entity_name: String,
    accessors: &'a AccessorTable,
}

impl<'a> EntityIdentifierBuilder<'a> {
    pub fn new(entity_name: impl Into<String>, accessors: &'a AccessorTable) -> Self {
        Self {
            entity_name: entity_name.into(),
            accessors,
        }
    }

    /// Builder named after the external name of `entity`.
    pub fn for_entity(entity: &EntityType<'_>, accessors: &'a AccessorTable) -> Self {
        Self::new(entity.external_name(), accessors)
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Identifier from the resolved key of `entity`.
    pub fn build_for(&self, entity: &EntityType<'_>, row: &dyn TupleRow) -> IdentifierResult<String> {
        let keys = entity.key()?;
        self.build(&keys, row)
    }

    /// Identifier from `keys` in order, values read from `row` by
    /// external name.
    pub fn build(&self, keys: &[Property<'_>], row: &dyn TupleRow) -> IdentifierResult<String> {
        let mut id = String::with_capacity(self.entity_name.len() + 16);
        id.push_str(&self.entity_name);
        id.push('(');
        match keys {
            [] => return Err(IdentifierError::NoKey(self.entity_name.clone())),
            [single] => self.format_key(*single, row_value(row, single)?, &mut id)?,
            compound => {
                for (pos, key) in compound.iter().enumerate() {
                    if pos > 0 {
                        id.push(',');
                    }
                    id.push_str(key.external_name());
                    id.push('=');
                    self.format_key(*key, row_value(row, key)?, &mut id)?;
                }
            }
        }
        id.push(')');

        if let Some(found) = FORBIDDEN_URI_CHARS.find(&id) {
            return Err(IdentifierError::Malformed(format!(
                "{}: '{}' not allowed in '{}'",
                self.entity_name,
                found.as_str().escape_default(),
                id
            )));
        }
        Ok(id)
    }

    fn format_key(&self, key: Property<'_>, value: &Value, out: &mut String) -> IdentifierResult<()> {
        let Some(embedded_type) = key.structured_type() else {
            return format_value(key, value, out);
        };

        let paths = embedded_type.path_list()?;
        if let [single] = paths.as_slice() {
            let leaf_value = match value {
                Value::Embedded(embedded) => self.read_path(embedded, single)?,
                plain => plain.clone(),
            };
            return self.format_key(single.leaf(), &leaf_value, out);
        }

        let embedded = value.as_embedded().ok_or_else(|| {
            IdentifierError::InvalidValue(format!(
                "{}: expected an embedded value, got {}",
                key.external_name(),
                value.type_name()
            ))
        })?;
        for (pos, path) in paths.iter().enumerate() {
            if pos > 0 {
                out.push(',');
            }
            out.push_str(key.external_name());
            out.push(PATH_SEPARATOR);
            out.push_str(path.alias());
            out.push('=');
            let component = self.read_path(embedded, path)?;
            if component.is_null() {
                return Err(IdentifierError::KeyValueMissing(format!(
                    "{}{}{}",
                    key.external_name(),
                    PATH_SEPARATOR,
                    path.alias()
                )));
            }
            self.format_key(path.leaf(), &component, out)?;
        }
        Ok(())
    }

    /// Follows `path` through nested embedded values down to its leaf.
    fn read_path(&self, embedded: &EmbeddedValue, path: &Path<'_>) -> IdentifierResult<Value> {
        let mut current = Value::Embedded(embedded.clone());
        for attribute in path.attributes() {
            let holder = current.as_embedded().ok_or_else(|| {
                IdentifierError::InvalidValue(format!(
                    "{}: expected an embedded value, got {}",
                    path.alias(),
                    current.type_name()
                ))
            })?;
            let next = self
                .accessors
                .read(holder, attribute.internal_name(), attribute.external_name())?;
            current = next;
        }
        Ok(current)
    }
}

fn row_value<'v>(row: &'v dyn TupleRow, key: &Property<'_>) -> IdentifierResult<&'v Value> {
    row.get(key.external_name())
        .ok_or_else(|| IdentifierError::KeyValueMissing(key.external_name().to_string()))
}

fn format_value(key: Property<'_>, value: &Value, out: &mut String) -> IdentifierResult<()> {
    match value {
        Value::Null => Err(IdentifierError::KeyValueMissing(
            key.external_name().to_string(),
        )),
        Value::Embedded(embedded) => Err(IdentifierError::InvalidValue(format!(
            "{}: simple key holds an instance of '{}'",
            key.external_name(),
            embedded.class_name()
        ))),
        _ if key.primitive_kind().is_some_and(|kind| kind.is_quoted()) => {
            out.push('\'');
            out.push_str(&value.to_string().replace('\'', "''"));
            out.push('\'');
            Ok(())
        }
        _ => {
            out.push_str(&value.to_string());
            Ok(())
        }
    }
}
