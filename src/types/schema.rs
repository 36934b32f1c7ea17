use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Declared primitive type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Number,
    String,
}

/// The attribute whitelist rules are checked and evaluated against.
///
/// Built once at startup, either with [`Schema::builder()`] or from a JSON
/// document of the form:
///
/// ```json
/// { "attributes": { "age": "number", "department": "string" } }
/// ```
///
/// A `Schema` is immutable; share it by reference (or inside an
/// [`Engine`](crate::Engine)) across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: HashMap<String, AttributeType>,
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    attributes: HashMap<String, AttributeType>,
}

impl SchemaBuilder {
    /// Declare an attribute. A later declaration of the same name wins.
    #[must_use]
    pub fn attribute(mut self, name: &str, ty: AttributeType) -> Self {
        self.attributes.insert(name.to_owned(), ty);
        self
    }

    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            attributes: self.attributes,
        }
    }
}

impl Schema {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Parse a schema from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed or declares
    /// a type other than `number` or `string`.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and parse a JSON schema file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O or parse failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Declared type of an attribute, or `None` if it is not in the schema.
    #[must_use]
    pub fn attribute_type(&self, name: &str) -> Option<AttributeType> {
        self.attributes.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over all declared (name, type) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AttributeType)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
