//! ConfigElement - Read-only view over a hierarchical configuration document
//!
//! Mirrors scene-description documents: an element has a name, string
//! attributes, optional text, and child elements. Sensors only ever read
//! through this interface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::ContractError;

/// Read interface over one configuration element.
pub trait ConfigElement {
    /// Element tag, e.g. `sensor`.
    fn element_name(&self) -> &str;

    /// Attribute value, e.g. `name` or `type`.
    fn attribute(&self, key: &str) -> Option<&str>;

    /// Text content of this element.
    fn text(&self) -> Option<&str>;

    /// First child element with the given tag.
    fn child(&self, name: &str) -> Option<&dyn ConfigElement>;
}

impl<'a> dyn ConfigElement + 'a {
    /// True if a child element with the given tag exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Trimmed text of a child element, if present.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text()).map(str::trim)
    }

    /// Parse the text of a child element.
    ///
    /// Returns `Ok(None)` when the child is absent.
    ///
    /// # Errors
    /// `MalformedField` when the child exists but its text does not parse.
    pub fn get<T>(&self, name: &str) -> Result<Option<T>, ContractError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.child_text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| ContractError::malformed_field(name, raw, e.to_string())),
        }
    }

    /// Parse a child element, falling back to `default` when absent.
    pub fn get_or<T>(&self, name: &str, default: T) -> Result<T, ContractError>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(self.get(name)?.unwrap_or(default))
    }
}

/// Loosely typed configuration value as found in TOML/JSON scene files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ConfigValue>),
    Table(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Text form of a scalar; lists of scalars join with single spaces.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::List(items) => items
                .iter()
                .map(|item| match item {
                    Self::List(_) | Self::Table(_) => None,
                    scalar => scalar.as_text(),
                })
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.join(" ")),
            Self::Table(_) => None,
        }
    }
}

/// Owned element tree implementing [`ConfigElement`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementNode {
    name: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Shorthand for a child holding only text, e.g. `<update_rate>10</update_rate>`.
    pub fn with_child_text(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(ElementNode::new(name).with_text(text))
    }

    pub fn children(&self) -> &[ElementNode] {
        &self.children
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Build an element from a key/value table.
    ///
    /// Keys listed in `attribute_keys` holding scalars become attributes.
    /// Scalars and scalar lists become text children, nested tables become
    /// nested elements, and lists of tables become repeated children.
    pub fn from_table(
        name: impl Into<String>,
        table: &BTreeMap<String, ConfigValue>,
        attribute_keys: &[&str],
    ) -> Self {
        let mut node = ElementNode::new(name);
        for (key, value) in table {
            if attribute_keys.contains(&key.as_str()) {
                if let Some(text) = value.as_text() {
                    node.attributes.insert(key.clone(), text);
                    continue;
                }
            }
            node.push_value(key, value);
        }
        node
    }

    fn push_value(&mut self, key: &str, value: &ConfigValue) {
        match value {
            ConfigValue::Table(inner) => {
                self.children.push(ElementNode::from_table(key, inner, &[]));
            }
            ConfigValue::List(items)
                if items.iter().all(|item| matches!(item, ConfigValue::Table(_))) && !items.is_empty() =>
            {
                for item in items {
                    self.push_value(key, item);
                }
            }
            other => {
                let mut child = ElementNode::new(key);
                child.text = other.as_text();
                self.children.push(child);
            }
        }
    }
}

impl ConfigElement for ElementNode {
    fn element_name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn child(&self, name: &str) -> Option<&dyn ConfigElement> {
        self.children
            .iter()
            .find(|c| c.name == name)
            .map(|c| c as &dyn ConfigElement)
    }
}
