use std::collections::HashMap;
use std::sync::Arc;

use crate::document::Document;

/// Looks up compiled templates by name. Implemented by the host framework.
pub trait TemplateLoader: Send + Sync {
    fn load(&self, name: &str) -> Option<Arc<Document>>;
}

impl<F> TemplateLoader for F
where
    F: Fn(&str) -> Option<Arc<Document>> + Send + Sync,
{
    fn load(&self, name: &str) -> Option<Arc<Document>> {
        self(name)
    }
}

/// A loader over a fixed set of in-memory templates.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: HashMap<String, Arc<Document>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, doc: Arc<Document>) -> Option<Arc<Document>> {
        self.templates.insert(name.into(), doc)
    }

    pub fn with(mut self, name: impl Into<String>, doc: Arc<Document>) -> Self {
        self.insert(name, doc);
        self
    }
}

impl TemplateLoader for MemoryLoader {
    fn load(&self, name: &str) -> Option<Arc<Document>> {
        self.templates.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader() {
        let doc = Document::named("a.html", |b| b.text("a"));
        let loader = MemoryLoader::new().with("a.html", Arc::clone(&doc));
        assert!(Arc::ptr_eq(&loader.load("a.html").unwrap(), &doc));
        assert!(loader.load("b.html").is_none());
    }

    #[test]
    fn test_closure_loader() {
        let doc = Document::build(|b| b.text("x"));
        let loader = move |name: &str| (name == "x").then(|| Arc::clone(&doc));
        assert!(loader.load("x").is_some());
        assert!(loader.load("y").is_none());
    }
}
