//! The capture renderer.
//!
//! A render pass walks the document tree depth-first, in order, resolving
//! inheritance the usual way: the most derived definition of a block wins.
//! When a capture set is installed on the context, each block reports its
//! output into it, and once nothing is pending the pass stops early.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::capture::CaptureSet;
use crate::context::{RenderContext, Resolved};
use crate::document::Document;
use crate::error::TemplateError;
use crate::fragment::{DecorationSpec, TitleSource};
use crate::graft::{Behavior, GraftRegistry};
use crate::loader::{MemoryLoader, TemplateLoader};
use crate::node::{BlockNode, ExtendsNode, Node, NodeKind, ParentRef};

/// `Break` means every requested block has been captured.
pub(crate) type Step = Result<ControlFlow<()>, TemplateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Stop rendering as soon as every requested block is captured.
    pub early_termination: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { early_termination: true }
    }
}

/// Loader, graft registry and options shared by all render passes.
#[derive(Clone)]
pub struct Engine {
    loader: Arc<dyn TemplateLoader>,
    registry: Arc<GraftRegistry>,
    options: RenderOptions,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(MemoryLoader::new())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine over `loader` using the process-wide registry.
    pub fn new(loader: impl TemplateLoader + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
            registry: GraftRegistry::global(),
            options: RenderOptions::default(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<GraftRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn loader(&self) -> &dyn TemplateLoader {
        self.loader.as_ref()
    }

    pub fn registry(&self) -> &Arc<GraftRegistry> {
        &self.registry
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Loads the first template of `names` the loader knows.
    pub fn select_template(&self, names: &[String]) -> Result<Arc<Document>, TemplateError> {
        names
            .iter()
            .find_map(|name| self.loader.load(name))
            .ok_or_else(|| TemplateError::TemplateNotFound(names.to_vec()))
    }

    /// Renders the whole document.
    pub fn render(&self, doc: &Arc<Document>, ctx: &mut RenderContext) -> Result<String, TemplateError> {
        let mut out = String::new();
        Pass::new(self, ctx).render_document(doc, &mut out)?;
        Ok(out)
    }

    /// Renders `doc` and returns the output of each named block. Blocks
    /// that were never rendered stay pending in the result.
    pub fn render_blocks<I, S>(
        &self,
        doc: &Arc<Document>,
        ctx: &mut RenderContext,
        names: I,
    ) -> Result<CaptureSet, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ctx.captures = Some(CaptureSet::new(names));
        let mut sink = String::new();
        let result = Pass::new(self, ctx).render_document(doc, &mut sink);
        let captures = ctx.captures.take().unwrap_or_default();
        if let ControlFlow::Break(()) = result? {
            tracing::debug!(document = %doc.display_name(), "render stopped early, all blocks captured");
        }
        Ok(captures)
    }

    /// Renders the fragment described by `spec`: the captured block, prefixed
    /// by a `<title>` element when a title source is configured. Without a
    /// block the whole document is rendered.
    pub fn render_fragment(
        &self,
        doc: &Arc<Document>,
        ctx: &mut RenderContext,
        spec: &DecorationSpec,
    ) -> Result<String, TemplateError> {
        let Some(block) = spec.block() else {
            return self.render(doc, ctx);
        };
        let title_block = match spec.title() {
            TitleSource::Block(name) => Some(name.as_str()),
            _ => None,
        };
        let captures = self.render_blocks(doc, ctx, [Some(block), title_block].into_iter().flatten())?;

        let content = captures
            .get(block)
            .ok_or_else(|| TemplateError::BlockNotFound(block.to_string()))?;
        let title = match spec.title() {
            TitleSource::None => None,
            TitleSource::Block(name) => {
                let text = captures
                    .get(name)
                    .ok_or_else(|| TemplateError::TitleBlockNotFound(name.clone()))?;
                (!text.is_empty()).then(|| text.to_string())
            }
            TitleSource::Variable(name) => {
                let value = ctx
                    .resolve(name)
                    .ok_or_else(|| TemplateError::TitleVariableNotFound(name.clone()))?;
                value.is_truthy().then(|| value.display())
            }
        };

        Ok(match title {
            Some(title) => format!("<title>{title}</title>\n{content}"),
            None => content.to_string(),
        })
    }
}

/// State of one render pass.
pub(crate) struct Pass<'e> {
    engine: &'e Engine,
    ctx: &'e mut RenderContext,
    dispatch: [Option<Arc<Behavior>>; NodeKind::COUNT],
    /// Parents resolved during this pass, keyed by link identity.
    parents: HashMap<usize, Arc<Document>>,
    /// Most derived definition of each block seen so far along the chain.
    overrides: HashMap<String, Arc<BlockNode>>,
    /// Documents currently being rendered, for cycle detection.
    chain: Vec<usize>,
}

impl<'e> Pass<'e> {
    fn new(engine: &'e Engine, ctx: &'e mut RenderContext) -> Self {
        Self {
            engine,
            ctx,
            dispatch: Default::default(),
            parents: HashMap::new(),
            overrides: HashMap::new(),
            chain: Vec::new(),
        }
    }

    fn behavior(&mut self, kind: NodeKind) -> Arc<Behavior> {
        if let Some(found) = &self.dispatch[kind.index()] {
            return Arc::clone(found);
        }
        let behavior = self.engine.registry.graft(kind);
        self.dispatch[kind.index()] = Some(Arc::clone(&behavior));
        behavior
    }

    fn render_document(&mut self, doc: &Arc<Document>, out: &mut String) -> Step {
        let id = Arc::as_ptr(doc) as usize;
        if self.chain.contains(&id) {
            return Err(TemplateError::InheritanceCycle(doc.display_name()));
        }
        let graft = doc.graft(&self.engine.registry);
        if graft.link().is_some() {
            // Levels are entered child first, so an existing entry is nearer.
            for block in graft.blocks() {
                self.overrides
                    .entry(block.name().to_string())
                    .or_insert_with(|| Arc::clone(block));
            }
        }
        self.chain.push(id);
        let flow = self.render_list(doc.nodelist(), out);
        self.chain.pop();
        flow
    }

    fn render_list(&mut self, nodes: &[Node], out: &mut String) -> Step {
        for node in nodes {
            if self.render_node(node, out)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn render_node(&mut self, node: &Node, out: &mut String) -> Step {
        let behavior = self.behavior(node.kind());
        behavior.render(self, node, out)
    }

    /// Renders the most derived definition of `block` into `out`.
    fn render_block_body(&mut self, block: &Arc<BlockNode>, out: &mut String) -> Step {
        let effective = self
            .overrides
            .get(block.name())
            .cloned()
            .unwrap_or_else(|| Arc::clone(block));
        self.render_list(effective.nodelist(), out)
    }

    fn resolve_parent(&mut self, link: &Arc<ExtendsNode>) -> Result<Arc<Document>, TemplateError> {
        let key = Arc::as_ptr(link) as usize;
        if let Some(parent) = self.parents.get(&key) {
            return Ok(Arc::clone(parent));
        }
        let parent = match link.parent() {
            ParentRef::Document(doc) => Arc::clone(doc),
            ParentRef::Name(name) => self.load(name)?,
            ParentRef::Variable(var) => match self.ctx.resolve(var) {
                Some(Resolved::Template(doc)) => Arc::clone(doc),
                Some(Resolved::Json(serde_json::Value::String(name))) => {
                    let name = name.clone();
                    self.load(&name)?
                }
                _ => return Err(TemplateError::ParentNotFound(var.clone())),
            },
        };
        tracing::trace!(parent = %parent.display_name(), via = %link.parent(), "resolved parent");
        self.parents.insert(key, Arc::clone(&parent));
        Ok(parent)
    }

    fn load(&self, name: &str) -> Result<Arc<Document>, TemplateError> {
        self.engine
            .loader
            .load(name)
            .ok_or_else(|| TemplateError::ParentNotFound(name.to_string()))
    }

    fn capture(&mut self, name: &str, rendered: &str) -> ControlFlow<()> {
        let Some(captures) = self.ctx.captures.as_mut() else {
            return ControlFlow::Continue(());
        };
        if captures.record(name, rendered) {
            tracing::trace!(block = name, len = rendered.len(), "captured block");
            if self.engine.options.early_termination && captures.is_complete() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}

/// Renders a node with no capture involvement. A link renders its parent,
/// which the pass grafts on entry.
pub(crate) fn render_plain(pass: &mut Pass<'_>, node: &Node, out: &mut String) -> Step {
    match node {
        Node::Leaf(leaf) => {
            out.push_str(&leaf.render(pass.ctx)?);
            Ok(ControlFlow::Continue(()))
        }
        Node::Container(children) => pass.render_list(children, out),
        Node::Block(block) => pass.render_block_body(block, out),
        Node::Extends(link) => {
            let parent = pass.resolve_parent(link)?;
            pass.render_document(&parent, out)
        }
    }
}

/// Block rendering that also reports into the active capture set.
pub(crate) fn render_block_captured(pass: &mut Pass<'_>, node: &Node, out: &mut String) -> Step {
    let start = out.len();
    let flow = render_plain(pass, node, out)?;
    match node {
        Node::Block(block) if flow.is_continue() => Ok(pass.capture(block.name(), &out[start..])),
        _ => Ok(flow),
    }
}
