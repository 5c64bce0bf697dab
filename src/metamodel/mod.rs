//! Persistence object model as delivered by introspection.
//!
//! These types are plain data: one [`ManagedType`] per persistence class with
//! its declared attributes, relationship annotations and join columns. The
//! [`SchemaRegistry`](crate::edm::SchemaRegistry) turns a [`Metamodel`] into
//! API metadata. All types round-trip through serde so a model can also be
//! loaded from JSON.

use crate::core::{ModelError, PrimitiveKind, Result};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Complete persistence model: every entity and embeddable class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metamodel {
    #[serde(default)]
    pub types: Vec<ManagedType>,
}

impl Metamodel {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    pub fn with_type(mut self, managed: ManagedType) -> Self {
        self.types.push(managed);
        self
    }

    pub fn add(&mut self, managed: ManagedType) {
        self.types.push(managed);
    }

    pub fn get(&self, class_name: &str) -> Result<&ManagedType> {
        self.types
            .iter()
            .find(|t| t.class_name == class_name)
            .ok_or_else(|| ModelError::TypeNotFound(class_name.to_string()))
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Entity,
    Embeddable,
}

/// Explicit identifier type of an entity: a primitive or an id class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdType {
    Primitive(PrimitiveKind),
    Class(String),
}

/// One persistence class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedType {
    /// Fully qualified class name, e.g. `org.example.BusinessPartner`.
    pub class_name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub is_abstract: bool,
    /// Class name of the base entity, if any.
    #[serde(default)]
    pub supertype: Option<String>,
    #[serde(default)]
    pub id_type: Option<IdType>,
    #[serde(default)]
    pub ignore: bool,
    /// Declared attributes in declaration order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl ManagedType {
    pub fn entity(class_name: impl Into<String>) -> Self {
        Self::new(class_name, TypeKind::Entity)
    }

    pub fn embeddable(class_name: impl Into<String>) -> Self {
        Self::new(class_name, TypeKind::Embeddable)
    }

    fn new(class_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            class_name: class_name.into(),
            kind,
            is_abstract: false,
            supertype: None,
            id_type: None,
            ignore: false,
            attributes: Vec::new(),
        }
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn id_type(mut self, id_type: IdType) -> Self {
        self.id_type = Some(id_type);
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn is_entity(&self) -> bool {
        self.kind == TypeKind::Entity
    }

    /// Simple class name: the part after the last `.`.
    pub fn simple_name(&self) -> &str {
        self.class_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.class_name)
    }
}

/// What an attribute holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    Basic(PrimitiveKind),
    /// Embeddable class name.
    Embedded(String),
    Relationship(Relationship),
}

/// One declared attribute of a managed type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Internal (field) name.
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default)]
    pub collection: bool,
    #[serde(default)]
    pub key: bool,
    /// Database column name; defaults to the internal name.
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub ignore: bool,
    /// Class that declares the attribute; defaults to the owning type.
    #[serde(default)]
    pub declaring_class: Option<String>,
}

impl Attribute {
    pub fn basic(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, AttributeKind::Basic(kind))
    }

    pub fn embedded(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Embedded(class_name.into()))
    }

    pub fn relationship(name: impl Into<String>, relationship: Relationship) -> Self {
        let collection = relationship.kind.is_to_many();
        let mut attribute = Self::new(name, AttributeKind::Relationship(relationship));
        attribute.collection = collection;
        attribute
    }

    fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            collection: false,
            key: false,
            column_name: None,
            nullable: true,
            ignore: false,
            declaring_class: None,
        }
    }

    pub fn key(mut self) -> Self {
        self.key = true;
        self.nullable = false;
        self
    }

    pub fn column(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn declared_by(mut self, class_name: impl Into<String>) -> Self {
        self.declaring_class = Some(class_name.into());
        self
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.kind, AttributeKind::Embedded(_))
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match &self.kind {
            AttributeKind::Relationship(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub fn is_to_many(&self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }

    /// The "one" side of the association is the source of this relationship.
    pub fn is_source_one(&self) -> bool {
        matches!(self, Self::OneToMany | Self::OneToOne)
    }

    /// Only these kinds carry a `mappedBy` back-reference.
    pub fn supports_mapped_by(&self) -> bool {
        matches!(self, Self::OneToMany | Self::OneToOne)
    }

    /// Only these kinds carry an explicit optional flag.
    pub fn has_optional_flag(&self) -> bool {
        matches!(self, Self::OneToOne | Self::ManyToOne)
    }
}

/// Relationship annotation of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    /// Element class of the relationship (for collections, the element type).
    pub target_class: String,
    #[serde(default = "default_true")]
    pub optional: bool,
    #[serde(default)]
    pub mapped_by: Option<String>,
    #[serde(default)]
    pub join_columns: JoinColumnSpec,
}

impl Relationship {
    pub fn new(kind: RelationshipKind, target_class: impl Into<String>) -> Self {
        Self {
            kind,
            target_class: target_class.into(),
            optional: true,
            mapped_by: None,
            join_columns: JoinColumnSpec::None,
        }
    }

    pub fn one_to_one(target_class: impl Into<String>) -> Self {
        Self::new(RelationshipKind::OneToOne, target_class)
    }

    pub fn one_to_many(target_class: impl Into<String>) -> Self {
        Self::new(RelationshipKind::OneToMany, target_class)
    }

    pub fn many_to_one(target_class: impl Into<String>) -> Self {
        Self::new(RelationshipKind::ManyToOne, target_class)
    }

    pub fn many_to_many(target_class: impl Into<String>) -> Self {
        Self::new(RelationshipKind::ManyToMany, target_class)
    }

    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    pub fn mapped_by(mut self, attribute: impl Into<String>) -> Self {
        self.mapped_by = Some(attribute.into());
        self
    }

    pub fn join_column(mut self, column: JoinColumnDef) -> Self {
        self.join_columns = JoinColumnSpec::Single(column);
        self
    }

    pub fn join_columns(mut self, columns: Vec<JoinColumnDef>) -> Self {
        self.join_columns = JoinColumnSpec::Multiple(columns);
        self
    }

    /// `mappedBy` as it applies to this relationship kind; blank counts as absent.
    pub fn effective_mapped_by(&self) -> Option<&str> {
        if !self.kind.supports_mapped_by() {
            return None;
        }
        self.mapped_by.as_deref().filter(|m| !m.is_empty())
    }
}

/// Join columns declared on a relationship. The three sources are mutually
/// exclusive; without explicit columns an inverse side copies the columns of
/// its owning side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinColumnSpec {
    #[default]
    None,
    Single(JoinColumnDef),
    Multiple(Vec<JoinColumnDef>),
}

/// A declared join column; either name may be left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinColumnDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub referenced_column_name: String,
}

impl JoinColumnDef {
    pub fn new(name: impl Into<String>, referenced_column_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_column_name: referenced_column_name.into(),
        }
    }

    /// Only the local column name is given.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }
}
