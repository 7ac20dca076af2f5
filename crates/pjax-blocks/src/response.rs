//! Outbound responses, including deferred template responses.

use crate::error::PjaxError;
use http::header::{HeaderMap, HeaderValue, LOCATION};
use http::StatusCode;
use pjax_blocks_template::{DecorationSpec, Document, Engine, RenderContext};
use std::sync::Arc;

/// Which template a deferred response renders.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Candidate names, the first one the loader finds wins.
    Names(Vec<String>),
    Document(Arc<Document>),
}

impl From<&str> for TemplateSource {
    fn from(name: &str) -> Self {
        TemplateSource::Names(vec![name.to_string()])
    }
}

impl From<String> for TemplateSource {
    fn from(name: String) -> Self {
        TemplateSource::Names(vec![name])
    }
}

impl From<Vec<String>> for TemplateSource {
    fn from(names: Vec<String>) -> Self {
        TemplateSource::Names(names)
    }
}

impl From<Arc<Document>> for TemplateSource {
    fn from(doc: Arc<Document>) -> Self {
        TemplateSource::Document(doc)
    }
}

/// A template and context pair whose rendering waits until the content is
/// asked for, so decorators can still change what gets rendered.
#[derive(Debug, Clone)]
pub struct TemplateResponse {
    template: TemplateSource,
    context: RenderContext,
    decoration: Option<DecorationSpec>,
}

impl TemplateResponse {
    pub fn new(template: impl Into<TemplateSource>, context: RenderContext) -> Self {
        Self { template: template.into(), context, decoration: None }
    }

    pub fn template(&self) -> &TemplateSource {
        &self.template
    }

    pub fn set_template(&mut self, template: impl Into<TemplateSource>) {
        self.template = template.into();
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    pub fn decoration(&self) -> Option<&DecorationSpec> {
        self.decoration.as_ref()
    }

    pub fn decorate(&mut self, spec: DecorationSpec) {
        self.decoration = Some(spec);
    }

    pub fn resolve_template(&self, engine: &Engine) -> Result<Arc<Document>, PjaxError> {
        match &self.template {
            TemplateSource::Names(names) => Ok(engine.select_template(names)?),
            TemplateSource::Document(doc) => Ok(Arc::clone(doc)),
        }
    }

    /// Renders the template, capturing only the decorated block if a
    /// decoration is attached.
    pub fn rendered_content(&self, engine: &Engine) -> Result<String, PjaxError> {
        let doc = self.resolve_template(engine)?;
        let mut ctx = self.context.clone();
        let html = match &self.decoration {
            Some(spec) => engine.render_fragment(&doc, &mut ctx, spec)?,
            None => engine.render(&doc, &mut ctx)?,
        };
        Ok(html)
    }
}

#[derive(Debug, Clone)]
pub enum Body {
    Deferred(TemplateResponse),
    Content(String),
}

#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    pub fn new(status: StatusCode, body: Body) -> Self {
        Self { status, headers: HeaderMap::new(), body }
    }

    pub fn template(template: impl Into<TemplateSource>, context: RenderContext) -> Self {
        Self::new(StatusCode::OK, Body::Deferred(TemplateResponse::new(template, context)))
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, Body::Content(text.into()))
    }

    /// A `302 Found` pointing at `location`.
    pub fn redirect(location: &str) -> Result<Self, PjaxError> {
        let mut response = Self::new(StatusCode::FOUND, Body::Content(String::new()));
        response.headers.insert(LOCATION, HeaderValue::from_str(location)?);
        Ok(response)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection() && self.headers.contains_key(LOCATION)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.body, Body::Deferred(_))
    }

    pub fn template_response(&self) -> Option<&TemplateResponse> {
        match &self.body {
            Body::Deferred(tr) => Some(tr),
            Body::Content(_) => None,
        }
    }

    pub fn template_response_mut(&mut self) -> Option<&mut TemplateResponse> {
        match &mut self.body {
            Body::Deferred(tr) => Some(tr),
            Body::Content(_) => None,
        }
    }

    pub fn rendered_content(&self, engine: &Engine) -> Result<String, PjaxError> {
        match &self.body {
            Body::Deferred(tr) => tr.rendered_content(engine),
            Body::Content(text) => Ok(text.clone()),
        }
    }

    /// Renders a deferred body in place, leaving finalized content.
    pub fn render(mut self, engine: &Engine) -> Result<Self, PjaxError> {
        if let Body::Deferred(tr) = &self.body {
            self.body = Body::Content(tr.rendered_content(engine)?);
        }
        Ok(self)
    }
}
