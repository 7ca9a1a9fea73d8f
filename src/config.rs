//! Binding attribute configuration
//!
//! The attribute names that mark bindings are configurable so templates can
//! avoid clashing with other `data-*` users. Configurations load from TOML;
//! keys left out of the file keep their defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::dom::Selector;

/// Errors that can occur when loading or parsing a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Attribute name for {field} must not be empty")]
    EmptyAttribute { field: &'static str },
}

/// Names of the binding attributes and the collapsing switch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TempleConfig {
    /// Element filled from `data[key]`
    pub id_attribute: String,
    /// Guard kept only when the key is present
    pub true_attribute: String,
    /// Guard kept only when the key is absent
    pub false_attribute: String,
    /// Placeholder replaced by another template's content
    pub partial_attribute: String,
    /// Keep surviving guard elements instead of unwrapping them
    pub leave_conditional_wrapper: bool,
}

impl Default for TempleConfig {
    fn default() -> Self {
        Self {
            id_attribute: "data-id".to_string(),
            true_attribute: "data-true".to_string(),
            false_attribute: "data-false".to_string(),
            partial_attribute: "data-template".to_string(),
            leave_conditional_wrapper: false,
        }
    }
}

impl TempleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: TempleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config.normalized())
    }

    /// Parsed attribute names are lower case, so configured ones are too
    fn normalized(mut self) -> Self {
        for name in [
            &mut self.id_attribute,
            &mut self.true_attribute,
            &mut self.false_attribute,
            &mut self.partial_attribute,
        ] {
            name.make_ascii_lowercase();
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("id_attribute", &self.id_attribute),
            ("true_attribute", &self.true_attribute),
            ("false_attribute", &self.false_attribute),
            ("partial_attribute", &self.partial_attribute),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyAttribute { field });
            }
        }
        Ok(())
    }

    pub fn with_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.id_attribute = attribute_name(name);
        self
    }

    pub fn with_true_attribute(mut self, name: impl Into<String>) -> Self {
        self.true_attribute = attribute_name(name);
        self
    }

    pub fn with_false_attribute(mut self, name: impl Into<String>) -> Self {
        self.false_attribute = attribute_name(name);
        self
    }

    pub fn with_partial_attribute(mut self, name: impl Into<String>) -> Self {
        self.partial_attribute = attribute_name(name);
        self
    }

    pub fn with_leave_conditional_wrapper(mut self, leave: bool) -> Self {
        self.leave_conditional_wrapper = leave;
        self
    }

    /// Elements carrying an id, true, or false attribute
    pub fn binding_selector(&self) -> Selector {
        Selector::any_attribute(&[
            &self.id_attribute,
            &self.true_attribute,
            &self.false_attribute,
        ])
    }

    /// Surviving guard elements
    pub fn conditional_selector(&self) -> Selector {
        Selector::any_attribute(&[&self.true_attribute, &self.false_attribute])
    }

    /// Partial placeholders
    pub fn partial_selector(&self) -> Selector {
        Selector::any_attribute(&[&self.partial_attribute])
    }
}

fn attribute_name(name: impl Into<String>) -> String {
    let mut name: String = name.into();
    name.make_ascii_lowercase();
    name
}
