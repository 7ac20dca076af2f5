//! Compiled documents and their one-time graft.

use std::sync::{Arc, OnceLock};

use crate::graft::GraftRegistry;
use crate::node::{BlockNode, ExtendsNode, Node, NodeKind, NodeList, NodeListBuilder};

/// A compiled template: a root node list plus an optional name.
///
/// Documents are shared as `Arc<Document>` and never change after
/// construction, except for the graft computed on first render.
#[derive(Debug)]
pub struct Document {
    name: Option<String>,
    nodelist: NodeList,
    graft: OnceLock<DocumentGraft>,
}

/// What a document looks like to the capture renderer.
#[derive(Debug)]
pub struct DocumentGraft {
    blocks: Vec<Arc<BlockNode>>,
    link: Option<Arc<ExtendsNode>>,
}

impl DocumentGraft {
    fn index(nodelist: &[Node]) -> Self {
        let mut graft = Self { blocks: Vec::new(), link: None };
        graft.walk(nodelist);
        graft
    }

    /// Depth-first, in document order. Blocks below a link belong to this
    /// level since they override the parent's.
    fn walk(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Leaf(_) => {}
                Node::Container(children) => self.walk(children),
                Node::Block(block) => {
                    self.blocks.push(Arc::clone(block));
                    self.walk(block.nodelist());
                }
                Node::Extends(link) => {
                    self.link.get_or_insert_with(|| Arc::clone(link));
                    self.walk(link.nodelist());
                }
            }
        }
    }

    /// Blocks defined at this inheritance level, nested ones included.
    pub fn blocks(&self) -> &[Arc<BlockNode>] {
        &self.blocks
    }

    /// The document's inheritance link, if it extends another document.
    /// Render passes seed their block overrides from [`Self::blocks`] when
    /// this is set.
    pub fn link(&self) -> Option<&Arc<ExtendsNode>> {
        self.link.as_ref()
    }
}

impl Document {
    pub fn new(name: Option<String>, nodelist: NodeList) -> Arc<Self> {
        Arc::new(Self { name, nodelist, graft: OnceLock::new() })
    }

    /// Builds an anonymous document.
    pub fn build(f: impl FnOnce(NodeListBuilder) -> NodeListBuilder) -> Arc<Self> {
        Self::new(None, f(NodeListBuilder::new()).build())
    }

    /// Builds a named document.
    pub fn named(
        name: impl Into<String>,
        f: impl FnOnce(NodeListBuilder) -> NodeListBuilder,
    ) -> Arc<Self> {
        Self::new(Some(name.into()), f(NodeListBuilder::new()).build())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<anonymous>".to_string())
    }

    pub fn nodelist(&self) -> &[Node] {
        &self.nodelist
    }

    /// Whether the graft has already been computed.
    pub fn is_grafted(&self) -> bool {
        self.graft.get().is_some()
    }

    /// Grafts the document in place, at most once, registering capture
    /// behavior for every graftable kind it contains.
    pub fn graft(&self, registry: &GraftRegistry) -> &DocumentGraft {
        self.graft.get_or_init(|| {
            let graft = DocumentGraft::index(&self.nodelist);
            if !graft.blocks.is_empty() {
                registry.graft(NodeKind::Block);
            }
            if graft.link.is_some() {
                registry.graft(NodeKind::Extends);
            }
            tracing::trace!(
                document = %self.display_name(),
                blocks = graft.blocks.len(),
                extends = graft.link.is_some(),
                "grafted document"
            );
            graft
        })
    }

    /// Names of the blocks defined at this level, in document order.
    pub fn block_names(&self, registry: &GraftRegistry) -> Vec<&str> {
        self.graft(registry).blocks.iter().map(|b| b.name()).collect()
    }
}
