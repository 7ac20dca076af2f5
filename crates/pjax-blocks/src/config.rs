//! URL-to-decorator configuration, loaded from JSON.
//!
//! ```json
//! {
//!   "urls": [
//!     ["^/articles/", "@pjax_block(block='content', title_block='title')"],
//!     ["^/gallery/", ["@pjax_template()", "@pjax_block()"]]
//!   ]
//! }
//! ```

use crate::error::PjaxError;
use serde::Deserialize;
use std::path::Path;

/// One decorator expression, or several applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DecoratorSource {
    One(String),
    Many(Vec<String>),
}

impl DecoratorSource {
    pub fn sources(&self) -> &[String] {
        match self {
            DecoratorSource::One(source) => std::slice::from_ref(source),
            DecoratorSource::Many(sources) => sources,
        }
    }
}

impl From<&str> for DecoratorSource {
    fn from(source: &str) -> Self {
        DecoratorSource::One(source.to_string())
    }
}

impl From<Vec<&str>> for DecoratorSource {
    fn from(sources: Vec<&str>) -> Self {
        DecoratorSource::Many(sources.into_iter().map(str::to_string).collect())
    }
}

/// Ordered `(url pattern, decorators)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PjaxConfig {
    #[serde(default)]
    pub urls: Vec<(String, DecoratorSource)>,
}

impl PjaxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: impl Into<String>, decorators: impl Into<DecoratorSource>) -> Self {
        self.urls.push((pattern.into(), decorators.into()));
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, PjaxError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PjaxError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = PjaxConfig::from_json_str(
            r#"{"urls": [
                ["^/one", "@pjax_block()"],
                ["^/two", ["@pjax_template()", "@pjax_block('main')"]]
            ]}"#,
        )
        .unwrap();
        let expected = PjaxConfig::new()
            .route("^/one", "@pjax_block()")
            .route("^/two", vec!["@pjax_template()", "@pjax_block('main')"]);
        assert_eq!(config, expected);
        assert_eq!(config.urls[1].1.sources().len(), 2);
        assert_eq!(config.urls[0].1.sources(), ["@pjax_block()"]);
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(PjaxConfig::from_json_str("{}").unwrap(), PjaxConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(PjaxConfig::from_json_str(r#"{"urls": [["^/"]]}"#), Err(PjaxError::Json(_))));
        assert!(matches!(PjaxConfig::from_json_str(r#"{"urls": [["^/", 3]]}"#), Err(PjaxError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = PjaxConfig::from_path("/nonexistent/pjax.json").unwrap_err();
        assert!(matches!(err, PjaxError::Io(_)));
    }
}
