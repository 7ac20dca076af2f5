use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::capture::CaptureSet;
use crate::document::Document;

/// A value bound in a [`RenderContext`].
#[derive(Debug, Clone)]
pub enum ContextValue {
    /// Any JSON-compatible value.
    Json(Value),
    /// A compiled document, e.g. a parent template chosen by the view.
    Template(Arc<Document>),
}

impl From<Value> for ContextValue {
    fn from(v: Value) -> Self {
        ContextValue::Json(v)
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Json(Value::String(s.to_string()))
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::Json(Value::String(s))
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Json(Value::Bool(b))
    }
}

impl From<i32> for ContextValue {
    fn from(n: i32) -> Self {
        ContextValue::Json(Value::Number(n.into()))
    }
}

impl From<i64> for ContextValue {
    fn from(n: i64) -> Self {
        ContextValue::Json(Value::Number(n.into()))
    }
}

impl From<Arc<Document>> for ContextValue {
    fn from(doc: Arc<Document>) -> Self {
        ContextValue::Template(doc)
    }
}

/// A borrowed view of a resolved (possibly dotted) lookup.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    Json(&'a Value),
    Template(&'a Arc<Document>),
}

impl Resolved<'_> {
    /// Text a variable leaf emits for this value.
    pub fn display(&self) -> String {
        match self {
            Resolved::Json(Value::String(s)) => s.clone(),
            Resolved::Json(Value::Null) => String::new(),
            Resolved::Json(Value::Bool(true)) => "True".to_string(),
            Resolved::Json(Value::Bool(false)) => "False".to_string(),
            Resolved::Json(other) => other.to_string(),
            Resolved::Template(doc) => doc.display_name(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Resolved::Json(Value::Null) => false,
            Resolved::Json(Value::Bool(b)) => *b,
            Resolved::Json(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Resolved::Json(Value::String(s)) => !s.is_empty(),
            Resolved::Json(Value::Array(a)) => !a.is_empty(),
            Resolved::Json(Value::Object(o)) => !o.is_empty(),
            Resolved::Template(_) => true,
        }
    }
}

/// Variables for one render, plus the capture set of an active block capture.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    vars: IndexMap<String, ContextValue>,
    pub(crate) captures: Option<CaptureSet>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from the entries of a JSON object. Other values
    /// produce an empty context.
    pub fn from_json(value: Value) -> Self {
        let mut ctx = Self::new();
        if let Value::Object(map) = value {
            for (k, v) in map {
                ctx.vars.insert(k, ContextValue::Json(v));
            }
        }
        ctx
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Option<ContextValue> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Copies every binding of `other` into this context, replacing existing
    /// names.
    pub fn extend(&mut self, other: RenderContext) {
        self.vars.extend(other.vars);
    }

    /// Resolves `a.b.0.c` style paths: the first segment names a variable,
    /// the rest index into JSON objects and arrays.
    pub fn resolve(&self, path: &str) -> Option<Resolved<'_>> {
        let mut segments = path.split('.');
        let head = self.vars.get(segments.next()?)?;
        let mut current = match head {
            ContextValue::Template(doc) => {
                return segments.next().is_none().then_some(Resolved::Template(doc));
            }
            ContextValue::Json(value) => value,
        };
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(Resolved::Json(current))
    }

    /// The capture set of the capture currently running, if any.
    pub fn captures(&self) -> Option<&CaptureSet> {
        self.captures.as_ref()
    }
}
