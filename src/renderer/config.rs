//! Configuration for HTML output

/// Configuration options for HTML output
#[derive(Debug, Clone, Default)]
pub struct HtmlConfig {
    /// Put every node on its own indented line
    pub pretty_print: bool,

    /// Drop text nodes that contain only whitespace
    pub trim_whitespace_text: bool,

    /// Indentation unit used when pretty-printing
    pub indent: Option<String>,
}

impl HtmlConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set whether whitespace-only text nodes are dropped
    pub fn with_trim_whitespace_text(mut self, trim: bool) -> Self {
        self.trim_whitespace_text = trim;
        self
    }

    /// Set the indentation unit (two spaces when unset)
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    pub(crate) fn indent_unit(&self) -> &str {
        self.indent.as_deref().unwrap_or("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HtmlConfig::default();
        assert!(!config.pretty_print);
        assert!(!config.trim_whitespace_text);
        assert_eq!(config.indent_unit(), "  ");
    }

    #[test]
    fn test_builder_pattern() {
        let config = HtmlConfig::new()
            .with_pretty_print(true)
            .with_trim_whitespace_text(true)
            .with_indent("\t");

        assert!(config.pretty_print);
        assert!(config.trim_whitespace_text);
        assert_eq!(config.indent_unit(), "\t");
    }
}
