use serde::{Deserialize, Serialize};

use crate::EnvelopeItem;

/// A name/value pair, used for build parameters and VCS root settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    /// Parameter or setting name, e.g. `env.PORT`.
    pub name: String,
    /// Value as text.
    pub value: String,
    /// Set when the value comes from a parent project or template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
}

impl Property {
    /// A non-inherited property.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inherited: None,
        }
    }
}

impl EnvelopeItem for Property {
    const KEY: &'static str = "property";
}

/// A `{"count": N, "property": [...]}` collection.
///
/// Serializes in the same shape, so it can be sent back to the server by
/// replace-all operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Properties {
    /// Item count reported by the server; informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// The properties, in server order.
    pub property: Vec<Property>,
}

/// Project and build configuration parameters share the property shape.
pub type Parameters = Properties;

impl Properties {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a property value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.property
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Sets `name` to `value`, replacing an existing entry in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.property.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.property.push(Property::new(name, value)),
        }
        self.count = Some(self.property.len() as u64);
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.property.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.property.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (name, value) in iter {
            properties.set(name, value);
        }
        properties
    }
}
