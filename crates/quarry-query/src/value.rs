//! Values, references and variables shared by descriptions and conditions.
//!
//! Wiki entities are addressed by title and namespace number. Resources from
//! imported vocabularies carry their prefix and base URI so that conditions
//! referencing them can report the namespaces they need.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical slot in a graph pattern, rendered as `?name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Derived variable sharing this variable's name plus `suffix`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Internal numeric id of a category page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal numeric id of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

/// A wiki page, identified by title and namespace number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub title: String,
    pub namespace: i32,
}

impl EntityRef {
    pub const MAIN_NAMESPACE: i32 = 0;
    pub const CATEGORY_NAMESPACE: i32 = 14;
    pub const CONCEPT_NAMESPACE: i32 = 108;

    pub fn new(title: impl Into<String>, namespace: i32) -> Self {
        Self {
            title: title.into(),
            namespace,
        }
    }

    /// Page in the main namespace
    pub fn page(title: impl Into<String>) -> Self {
        Self::new(title, Self::MAIN_NAMESPACE)
    }

    pub fn category(title: impl Into<String>) -> Self {
        Self::new(title, Self::CATEGORY_NAMESPACE)
    }

    pub fn concept(title: impl Into<String>) -> Self {
        Self::new(title, Self::CONCEPT_NAMESPACE)
    }

    /// Title with spaces replaced by underscores, as stored.
    pub fn db_key(&self) -> String {
        self.title.trim().replace(' ', "_")
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == Self::MAIN_NAMESPACE {
            write!(f, "wiki:{}", self.db_key())
        } else {
            write!(f, "wiki:{}:{}", self.namespace, self.db_key())
        }
    }
}

/// An external vocabulary: a prefix bound to a base URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vocabulary {
    pub prefix: String,
    pub uri: String,
}

impl Vocabulary {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// A concrete resource a join variable can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceRef {
    Page(EntityRef),
    External { vocabulary: Vocabulary, local: String },
}

impl ResourceRef {
    pub fn page(title: impl Into<String>) -> Self {
        Self::Page(EntityRef::page(title))
    }

    pub fn external(vocabulary: Vocabulary, local: impl Into<String>) -> Self {
        Self::External {
            vocabulary,
            local: local.into(),
        }
    }

    /// Identity used when comparing bindings: two resources denote the same
    /// entity iff their canonical forms are equal.
    pub fn canonical(&self) -> String {
        match self {
            Self::Page(entity) => entity.to_string(),
            Self::External { vocabulary, local } => format!("{}{}", vocabulary.uri, local),
        }
    }

    /// Value that orders this resource among others of its kind.
    pub fn sort_key(&self) -> String {
        match self {
            Self::Page(entity) => entity.title.clone(),
            Self::External { local, .. } => local.clone(),
        }
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        match self {
            Self::Page(_) => None,
            Self::External { vocabulary, .. } => Some(vocabulary),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(entity) => entity.fmt(f),
            Self::External { vocabulary, local } => write!(f, "{}:{}", vocabulary.prefix, local),
        }
    }
}

/// Reference to a property as written in a query.
///
/// `inverse` flips the direction of the relation: `-Has child` matches the
/// subjects pointing at the current entity rather than its objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyRef {
    pub key: String,
    #[serde(default)]
    pub inverse: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vocabulary>,
}

impl PropertyRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            inverse: false,
            vocabulary: None,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.inverse = !self.inverse;
        self
    }

    pub fn imported_from(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.vocabulary {
            Some(vocabulary) => write!(f, "{}:{}", vocabulary.prefix, self.key.replace(' ', "_")),
            None => write!(f, "property:{}", self.key.replace(' ', "_")),
        }
    }
}

/// Storage type of a property's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Page,
    Text,
    Number,
    Boolean,
}

impl ValueType {
    /// Resource-typed values are stored as joins to other entities; all
    /// other values are stored inline.
    pub fn is_resource(self) -> bool {
        matches!(self, Self::Page)
    }
}

/// A literal appearing in a value comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DataValue {
    Page(ResourceRef),
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl DataValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Page(_) => ValueType::Page,
            Self::Text(_) => ValueType::Text,
            Self::Number(_) => ValueType::Number,
            Self::Boolean(_) => ValueType::Boolean,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceRef> {
        match self {
            Self::Page(resource) => Some(resource),
            _ => None,
        }
    }
}

impl From<ResourceRef> for DataValue {
    fn from(resource: ResourceRef) -> Self {
        Self::Page(resource)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(resource) => resource.fmt(f),
            Self::Text(text) => write!(f, "{}", quote(text)),
            Self::Number(number) => write!(f, "{}", number),
            Self::Boolean(flag) => write!(f, "{}", flag),
        }
    }
}

/// Double-quote `text`, escaping backslashes and quotes.
pub(crate) fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Comparison operator of a value description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparator {
    Eq,
    Less,
    Greater,
    Leq,
    Geq,
    Neq,
    Like,
    NotLike,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_display_and_suffix() {
        let var = Variable::new("v1");
        assert_eq!(var.to_string(), "?v1");
        assert_eq!(var.with_suffix("sk").to_string(), "?v1sk");
    }

    #[test]
    fn test_canonical_identity_ignores_spacing() {
        let a = ResourceRef::page("Ada Lovelace");
        let b = ResourceRef::page("Ada_Lovelace");
        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(a.canonical(), ResourceRef::page("Alan Turing").canonical());
    }

    #[test]
    fn test_external_resource_canonical_uses_full_uri() {
        let foaf = Vocabulary::new("foaf", "http://xmlns.com/foaf/0.1/");
        let person = ResourceRef::external(foaf.clone(), "Person");
        assert_eq!(person.canonical(), "http://xmlns.com/foaf/0.1/Person");
        assert_eq!(person.to_string(), "foaf:Person");
        assert_eq!(person.vocabulary(), Some(&foaf));
    }

    #[test]
    fn test_entity_display_includes_namespace() {
        assert_eq!(EntityRef::page("Main Page").to_string(), "wiki:Main_Page");
        assert_eq!(EntityRef::category("Cities").to_string(), "wiki:14:Cities");
    }

    #[test]
    fn test_property_display_replaces_spaces() {
        let foaf = Vocabulary::new("foaf", "http://xmlns.com/foaf/0.1/");
        assert_eq!(PropertyRef::new("Has spouse").to_string(), "property:Has_spouse");
        assert_eq!(
            PropertyRef::new("Has spouse").imported_from(foaf).to_string(),
            "foaf:Has_spouse"
        );
    }

    #[test]
    fn test_text_literal_quoting() {
        let value = DataValue::Text(r#"say "hi"\"#.to_string());
        assert_eq!(value.to_string(), r#""say \"hi\"\\""#);
    }

    #[test]
    fn test_number_display() {
        assert_eq!(DataValue::Number(18.0).to_string(), "18");
        assert_eq!(DataValue::Number(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_only_pages_are_resources() {
        assert!(ValueType::Page.is_resource());
        assert!(!ValueType::Text.is_resource());
        assert!(!ValueType::Number.is_resource());
        assert!(!ValueType::Boolean.is_resource());
    }
}
