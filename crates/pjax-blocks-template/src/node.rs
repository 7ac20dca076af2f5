//! Node kinds of a compiled template tree.
//!
//! Trees are produced by a host template compiler (or by [`NodeListBuilder`])
//! and are immutable afterwards.

use std::fmt;
use std::sync::Arc;

use crate::context::RenderContext;
use crate::document::Document;
use crate::error::TemplateError;

/// An opaque renderable unit supplied by a host compiler.
pub trait Renderable: fmt::Debug + Send + Sync {
    fn render(&self, ctx: &RenderContext) -> Result<String, TemplateError>;
}

/// Discriminant of [`Node`], used as the key of the graft registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Leaf,
    Container,
    Block,
    Extends,
}

impl NodeKind {
    pub const COUNT: usize = 4;

    pub(crate) const fn index(self) -> usize {
        match self {
            NodeKind::Leaf => 0,
            NodeKind::Container => 1,
            NodeKind::Block => 2,
            NodeKind::Extends => 3,
        }
    }

    /// Whether nodes of this kind take part in capture.
    pub const fn is_graftable(self) -> bool {
        matches!(self, NodeKind::Block | NodeKind::Extends)
    }
}

/// A leaf renderable: text, a variable reference, or a host-defined unit.
#[derive(Debug, Clone)]
pub enum Leaf {
    /// Literal text, emitted as-is.
    Text(String),
    /// Dotted context lookup (`user.name`). Missing variables render empty.
    Var(String),
    /// Host-defined renderable.
    Custom(Arc<dyn Renderable>),
}

impl Leaf {
    pub fn render(&self, ctx: &RenderContext) -> Result<String, TemplateError> {
        match self {
            Leaf::Text(text) => Ok(text.clone()),
            Leaf::Var(path) => Ok(ctx.resolve(path).map(|v| v.display()).unwrap_or_default()),
            Leaf::Custom(unit) => unit.render(ctx),
        }
    }
}

pub type NodeList = Vec<Node>;

#[derive(Debug, Clone)]
pub enum Node {
    Leaf(Leaf),
    Container(NodeList),
    Block(Arc<BlockNode>),
    Extends(Arc<ExtendsNode>),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Container(_) => NodeKind::Container,
            Node::Block(_) => NodeKind::Block,
            Node::Extends(_) => NodeKind::Extends,
        }
    }

    /// Child nodes, if this node has any.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Leaf(_) => &[],
            Node::Container(nodes) => nodes,
            Node::Block(block) => block.nodelist(),
            Node::Extends(link) => link.nodelist(),
        }
    }
}

/// A named, overridable region.
#[derive(Debug)]
pub struct BlockNode {
    name: String,
    nodelist: NodeList,
}

impl BlockNode {
    pub fn new(name: impl Into<String>, nodelist: NodeList) -> Self {
        Self { name: name.into(), nodelist }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodelist(&self) -> &[Node] {
        &self.nodelist
    }
}

/// How an inheritance link names its parent document.
#[derive(Debug, Clone)]
pub enum ParentRef {
    /// A document known at compile time.
    Document(Arc<Document>),
    /// A template name, resolved through the engine's loader.
    Name(String),
    /// A context variable holding either a document or a template name.
    Variable(String),
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRef::Document(doc) => write!(f, "{}", doc.display_name()),
            ParentRef::Name(name) => write!(f, "\"{name}\""),
            ParentRef::Variable(var) => write!(f, "{var}"),
        }
    }
}

/// An inheritance link. Its children hold the blocks overriding the parent's.
#[derive(Debug)]
pub struct ExtendsNode {
    parent: ParentRef,
    nodelist: NodeList,
}

impl ExtendsNode {
    pub fn new(parent: ParentRef, nodelist: NodeList) -> Self {
        Self { parent, nodelist }
    }

    pub fn parent(&self) -> &ParentRef {
        &self.parent
    }

    pub fn nodelist(&self) -> &[Node] {
        &self.nodelist
    }
}

/// Chained construction of node lists.
///
/// ```
/// use pjax_blocks_template::NodeListBuilder;
///
/// let nodes = NodeListBuilder::new()
///     .text("Hello ")
///     .block("name", |b| b.var("user.name"))
///     .build();
/// assert_eq!(nodes.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct NodeListBuilder {
    nodes: NodeList,
}

impl NodeListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.node(Node::Leaf(Leaf::Text(text.into())))
    }

    pub fn var(self, path: impl Into<String>) -> Self {
        self.node(Node::Leaf(Leaf::Var(path.into())))
    }

    pub fn custom(self, unit: Arc<dyn Renderable>) -> Self {
        self.node(Node::Leaf(Leaf::Custom(unit)))
    }

    pub fn container(self, f: impl FnOnce(NodeListBuilder) -> NodeListBuilder) -> Self {
        let children = f(NodeListBuilder::new()).build();
        self.node(Node::Container(children))
    }

    pub fn block(
        self,
        name: impl Into<String>,
        f: impl FnOnce(NodeListBuilder) -> NodeListBuilder,
    ) -> Self {
        let children = f(NodeListBuilder::new()).build();
        self.node(Node::Block(Arc::new(BlockNode::new(name, children))))
    }

    pub fn extends(
        self,
        parent: ParentRef,
        f: impl FnOnce(NodeListBuilder) -> NodeListBuilder,
    ) -> Self {
        let children = f(NodeListBuilder::new()).build();
        self.node(Node::Extends(Arc::new(ExtendsNode::new(parent, children))))
    }

    pub fn build(self) -> NodeList {
        self.nodes
    }
}
