//! Graft registry: memoized capture behavior per node kind.
//!
//! A behavior is the render routine a render pass dispatches to for a node
//! kind. Blocks get a routine that renders exactly like the plain one and
//! additionally reports into the active capture set. Links keep the plain
//! routine; grafting one marks the parent for grafting when the pass enters
//! it. Graftable kinds are built once and shared by every render pass in the
//! process.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::node::{Node, NodeKind};
use crate::render::{self, Pass, Step};

pub(crate) type RenderFn = for<'p, 'e> fn(&'p mut Pass<'e>, &Node, &mut String) -> Step;

/// The render routine bound to one node kind.
pub struct Behavior {
    kind: NodeKind,
    render: RenderFn,
}

impl Behavior {
    fn combine(kind: NodeKind) -> Self {
        let render: RenderFn = match kind {
            NodeKind::Block => render::render_block_captured,
            NodeKind::Extends | NodeKind::Leaf | NodeKind::Container => render::render_plain,
        };
        Self { kind, render }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn render(&self, pass: &mut Pass<'_>, node: &Node, out: &mut String) -> Step {
        (self.render)(pass, node, out)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior").field("kind", &self.kind).finish()
    }
}

/// Process-lifetime cache of combined behaviors, keyed by node kind.
///
/// Entries are created lazily on first graft and never evicted. Concurrent
/// first use of a kind is serialized by the write lock, so each kind gets
/// exactly one behavior.
#[derive(Debug, Default)]
pub struct GraftRegistry {
    table: RwLock<HashMap<NodeKind, Arc<Behavior>>>,
}

static GLOBAL: OnceLock<Arc<GraftRegistry>> = OnceLock::new();

impl GraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by engines that were not given one explicitly.
    pub fn global() -> Arc<GraftRegistry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(GraftRegistry::new())))
    }

    /// Returns the behavior for `kind`, creating it on first use.
    ///
    /// Kinds that do not take part in capture are served the plain routine
    /// without being recorded.
    pub fn graft(&self, kind: NodeKind) -> Arc<Behavior> {
        if !kind.is_graftable() {
            return Arc::new(Behavior::combine(kind));
        }
        if let Some(found) = self.table.read().unwrap_or_else(PoisonError::into_inner).get(&kind) {
            return Arc::clone(found);
        }
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let entry = table.entry(kind).or_insert_with(|| {
            tracing::debug!(?kind, "registering capture behavior");
            Arc::new(Behavior::combine(kind))
        });
        Arc::clone(entry)
    }

    /// Returns the behavior for `kind` if it has been grafted.
    pub fn get(&self, kind: NodeKind) -> Option<Arc<Behavior>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner).get(&kind).cloned()
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<NodeKind> {
        let mut kinds: Vec<NodeKind> =
            self.table.read().unwrap_or_else(PoisonError::into_inner).keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
