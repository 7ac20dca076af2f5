//! View decorators turning deferred responses into PJAX fragments.
//!
//! [`PjaxBlock`] attaches a [`DecorationSpec`] so only one block (plus an
//! optional title) is rendered. [`PjaxTemplate`] swaps the response's
//! template for a fragment-specific one. Both only act on PJAX requests.

use crate::error::PjaxError;
use crate::request::Request;
use crate::response::{Body, Response, TemplateResponse, TemplateSource};
use crate::utils::{
    is_pjax, parse_selector, pjaxify_template_var_with_container, strip_pjax_parameter, X_PJAX_CONTAINER,
    X_PJAX_URL,
};
use http::header::{HeaderMap, HeaderValue, VARY};
use pjax_blocks_config::{parse_decorator, DecoratorCall};
use pjax_blocks_template::{DecorationSpec, TitleSource};
use std::fmt;
use std::sync::Arc;

const VARY_ON: &str = "X-PJAX-Container";

/// A request handler.
pub trait View {
    fn call(&self, request: &mut Request) -> Result<Response, PjaxError>;
}

impl<F> View for F
where
    F: Fn(&mut Request) -> Result<Response, PjaxError>,
{
    fn call(&self, request: &mut Request) -> Result<Response, PjaxError> {
        self(request)
    }
}

pub type BlockFn = dyn Fn(&Request) -> Result<Option<String>, PjaxError> + Send + Sync;
pub type TemplateFn = dyn Fn(&Request, &TemplateSource) -> Result<Vec<String>, PjaxError> + Send + Sync;

/// Where the block to capture is named.
#[derive(Clone, Default)]
pub enum BlockSource {
    /// The `X-PJAX-Container` header, else the `_pjax` parameter.
    #[default]
    Auto,
    Fixed(String),
    /// Computed per request. `None` renders the whole template.
    Computed(Arc<BlockFn>),
}

impl fmt::Debug for BlockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSource::Auto => f.write_str("Auto"),
            BlockSource::Fixed(name) => f.debug_tuple("Fixed").field(name).finish(),
            BlockSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl BlockSource {
    fn resolve(&self, request: &Request) -> Result<Option<String>, PjaxError> {
        match self {
            BlockSource::Auto => {
                let selector = request
                    .header(&X_PJAX_CONTAINER)
                    .or_else(|| request.pjax_param())
                    .ok_or(PjaxError::NoBlockName)?;
                Ok(Some(parse_selector(selector)?.to_string()))
            }
            BlockSource::Fixed(name) => Ok(Some(name.clone())),
            BlockSource::Computed(f) => f(request),
        }
    }
}

/// Renders only the requested block of a deferred response.
#[derive(Debug, Clone, Default)]
pub struct PjaxBlock {
    block: BlockSource,
    spec: DecorationSpec,
}

impl PjaxBlock {
    /// Fails on an empty fixed block name, or when both title sources are
    /// given.
    pub fn new(
        block: BlockSource,
        title_variable: Option<&str>,
        title_block: Option<&str>,
    ) -> Result<Self, PjaxError> {
        if matches!(&block, BlockSource::Fixed(name) if name.is_empty()) {
            return Err(PjaxError::EmptyBlockName);
        }
        let spec = DecorationSpec::new(None, title_variable.map(str::to_string), title_block.map(str::to_string))?;
        Ok(Self { block, spec })
    }

    pub fn named(block: &str) -> Result<Self, PjaxError> {
        Self::new(BlockSource::Fixed(block.to_string()), None, None)
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Request) -> Result<Option<String>, PjaxError> + Send + Sync + 'static,
    {
        Self { block: BlockSource::Computed(Arc::new(f)), spec: DecorationSpec::default() }
    }

    pub fn block(&self) -> &BlockSource {
        &self.block
    }

    pub fn title(&self) -> &TitleSource {
        self.spec.title()
    }

    fn apply(&self, request: &Request, response: &mut TemplateResponse) -> Result<(), PjaxError> {
        let block = self.block.resolve(request)?;
        tracing::debug!(path = request.path(), block = ?block, "capturing PJAX block");
        response.decorate(self.spec.clone().with_block(block));
        Ok(())
    }
}

/// How a fragment-specific template is chosen.
#[derive(Clone)]
pub enum TemplateChoice {
    Static(String),
    /// Derives candidate names from the request and the current template.
    Computed(Arc<TemplateFn>),
}

impl fmt::Debug for TemplateChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateChoice::Static(name) => f.debug_tuple("Static").field(name).finish(),
            TemplateChoice::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Replaces the template of a deferred response.
#[derive(Debug, Clone)]
pub struct PjaxTemplate {
    choice: TemplateChoice,
}

impl Default for PjaxTemplate {
    /// `page.html` becomes `[page-pjax=<container>.html, page.html]`.
    fn default() -> Self {
        let f: Arc<TemplateFn> = Arc::new(pjaxify_template_var_with_container);
        Self { choice: TemplateChoice::Computed(f) }
    }
}

impl PjaxTemplate {
    pub fn new(choice: TemplateChoice) -> Result<Self, PjaxError> {
        if matches!(&choice, TemplateChoice::Static(name) if name.is_empty()) {
            return Err(PjaxError::EmptyTemplate);
        }
        Ok(Self { choice })
    }

    pub fn named(template: &str) -> Result<Self, PjaxError> {
        Self::new(TemplateChoice::Static(template.to_string()))
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Request, &TemplateSource) -> Result<Vec<String>, PjaxError> + Send + Sync + 'static,
    {
        Self { choice: TemplateChoice::Computed(Arc::new(f)) }
    }

    pub fn choice(&self) -> &TemplateChoice {
        &self.choice
    }

    fn apply(&self, request: &Request, response: &mut TemplateResponse) -> Result<(), PjaxError> {
        let names = match &self.choice {
            TemplateChoice::Static(name) => vec![name.clone()],
            TemplateChoice::Computed(f) => f(request, response.template())?,
        };
        if names.iter().all(String::is_empty) {
            return Err(PjaxError::EmptyTemplate);
        }
        tracing::debug!(path = request.path(), templates = ?names, "switching to PJAX template");
        response.set_template(names);
        Ok(())
    }
}

/// Either decorator, as configured.
#[derive(Debug, Clone)]
pub enum Decoration {
    Block(PjaxBlock),
    Template(PjaxTemplate),
}

impl From<PjaxBlock> for Decoration {
    fn from(block: PjaxBlock) -> Self {
        Decoration::Block(block)
    }
}

impl From<PjaxTemplate> for Decoration {
    fn from(template: PjaxTemplate) -> Self {
        Decoration::Template(template)
    }
}

impl Decoration {
    /// Parses a decorator expression such as `@pjax_block(block='main')`.
    pub fn parse(source: &str) -> Result<Self, PjaxError> {
        Self::from_call(parse_decorator(source)?)
    }

    pub fn from_call(call: DecoratorCall) -> Result<Self, PjaxError> {
        match call {
            DecoratorCall::Block { block, title_variable, title_block } => {
                let source = block.map(BlockSource::Fixed).unwrap_or_default();
                Ok(PjaxBlock::new(source, title_variable.as_deref(), title_block.as_deref())?.into())
            }
            DecoratorCall::Template { template: Some(template) } => Ok(PjaxTemplate::named(&template)?.into()),
            DecoratorCall::Template { template: None } => Ok(PjaxTemplate::default().into()),
        }
    }

    /// Post-processes a view's response. Non-PJAX requests only get the
    /// `Vary` header. Redirects pass with the URL header set; any other
    /// response must be deferred.
    pub fn process(&self, request: &mut Request, mut response: Response) -> Result<Response, PjaxError> {
        patch_vary(response.headers_mut())?;
        if !is_pjax(request) {
            return Ok(response);
        }
        strip_pjax_parameter(request);

        let url = match response.location() {
            Some(location) => location.to_string(),
            None => request.full_path(),
        };
        response.headers_mut().insert(X_PJAX_URL, HeaderValue::from_str(&url)?);

        let redirect = response.is_redirect();
        match response.body_mut() {
            Body::Deferred(tr) => match self {
                Decoration::Block(block) => block.apply(request, tr)?,
                Decoration::Template(template) => template.apply(request, tr)?,
            },
            Body::Content(_) if redirect => {
                tracing::debug!(path = request.path(), location = %url, "PJAX redirect");
            }
            Body::Content(_) => return Err(PjaxError::NotDeferred),
        }
        Ok(response)
    }

    pub fn wrap<V: View>(self, view: V) -> Decorated<V> {
        Decorated { decoration: self, view }
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoration::Block(block) => {
                let mut args = Vec::new();
                match &block.block {
                    BlockSource::Auto => {}
                    BlockSource::Fixed(name) => args.push(format!("block='{name}'")),
                    BlockSource::Computed(_) => args.push("block=<computed>".to_string()),
                }
                match block.title() {
                    TitleSource::None => {}
                    TitleSource::Variable(name) => args.push(format!("title_variable='{name}'")),
                    TitleSource::Block(name) => args.push(format!("title_block='{name}'")),
                }
                write!(f, "@pjax_block({})", args.join(", "))
            }
            Decoration::Template(template) => match &template.choice {
                TemplateChoice::Static(name) => write!(f, "@pjax_template(template='{name}')"),
                TemplateChoice::Computed(_) => f.write_str("@pjax_template()"),
            },
        }
    }
}

/// A view wrapped by a [`Decoration`]. Decorated views are views, so
/// decorations stack.
#[derive(Debug, Clone)]
pub struct Decorated<V> {
    decoration: Decoration,
    view: V,
}

impl<V> Decorated<V> {
    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }
}

impl<V: View> View for Decorated<V> {
    fn call(&self, request: &mut Request) -> Result<Response, PjaxError> {
        strip_pjax_parameter(request);
        let response = self.view.call(request)?;
        self.decoration.process(request, response)
    }
}

/// Adds `X-PJAX-Container` to `Vary` unless already listed.
fn patch_vary(headers: &mut HeaderMap) -> Result<(), PjaxError> {
    let mut fields: Vec<String> = headers
        .get_all(VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.iter().any(|f| f.eq_ignore_ascii_case(VARY_ON)) {
        return Ok(());
    }
    fields.push(VARY_ON.to_string());
    headers.insert(VARY, HeaderValue::from_str(&fields.join(", "))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pjax_blocks_template::{RenderContext, TemplateError};

    fn template_view(_: &mut Request) -> Result<Response, PjaxError> {
        Ok(Response::template("page.html", RenderContext::new()))
    }

    #[test]
    fn test_conflicting_titles_rejected_at_construction() {
        let err = PjaxBlock::new(BlockSource::Auto, Some("t"), Some("t")).unwrap_err();
        assert!(matches!(err, PjaxError::Template(TemplateError::ConflictingTitle)));
    }

    #[test]
    fn test_empty_arguments_rejected() {
        assert!(matches!(PjaxBlock::named(""), Err(PjaxError::EmptyBlockName)));
        assert!(matches!(PjaxTemplate::named(""), Err(PjaxError::EmptyTemplate)));
    }

    #[test]
    fn test_from_call() {
        let Decoration::Block(block) = Decoration::parse("@pjax_block(title_variable='t')").unwrap() else {
            panic!("expected a block decoration");
        };
        assert!(matches!(block.block(), BlockSource::Auto));
        assert_eq!(block.title(), &TitleSource::Variable("t".into()));

        let Decoration::Template(template) = Decoration::parse("@pjax_template()").unwrap() else {
            panic!("expected a template decoration");
        };
        assert!(matches!(template.choice(), TemplateChoice::Computed(_)));

        assert!(matches!(
            Decoration::parse("@pjax_block('main', 'a', 'b')"),
            Err(PjaxError::Template(TemplateError::ConflictingTitle))
        ));
        assert!(matches!(Decoration::parse("pjax_block()"), Err(PjaxError::Config(_))));
    }

    #[test]
    fn test_display() {
        for source in [
            "@pjax_block()",
            "@pjax_block(block='main', title_block='title')",
            "@pjax_block(title_variable='page_title')",
            "@pjax_template(template='static.html')",
            "@pjax_template()",
        ] {
            assert_eq!(Decoration::parse(source).unwrap().to_string(), source);
        }
    }

    #[test]
    fn test_vary_added_once() {
        let view = Decoration::from(PjaxBlock::named("main").unwrap()).wrap(template_view);
        let view = Decoration::from(PjaxBlock::named("main").unwrap()).wrap(view);
        let response = view.call(&mut Request::get("/")).unwrap();
        assert_eq!(response.headers().get_all(VARY).iter().count(), 1);
        assert_eq!(response.headers()[VARY], "X-PJAX-Container");
    }

    #[test]
    fn test_vary_merges_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(VARY, HeaderValue::from_static("Cookie, Accept-Encoding"));
        patch_vary(&mut headers).unwrap();
        assert_eq!(headers[VARY], "Cookie, Accept-Encoding, X-PJAX-Container");
    }

    #[test]
    fn test_auto_block_resolution() {
        let req = Request::get("/").pjax("#sidebar").unwrap();
        assert_eq!(BlockSource::Auto.resolve(&req).unwrap().as_deref(), Some("sidebar"));

        let mut req = Request::get("/?_pjax=%23content").with_header(crate::X_PJAX, "true").unwrap();
        strip_pjax_parameter(&mut req);
        assert_eq!(BlockSource::Auto.resolve(&req).unwrap().as_deref(), Some("content"));

        let req = Request::get("/").with_header(crate::X_PJAX, "true").unwrap();
        assert!(matches!(BlockSource::Auto.resolve(&req), Err(PjaxError::NoBlockName)));

        let req = Request::get("/").pjax("sidebar").unwrap();
        assert!(matches!(BlockSource::Auto.resolve(&req), Err(PjaxError::InvalidSelector(_))));
    }
}
