//! Selective block rendering over compiled template trees.
//!
//! # Overview
//!
//! A [`Document`] is a pre-compiled node tree made of text and variable
//! leaves, containers, named blocks and inheritance links. The [`Engine`]
//! renders it top to bottom, resolving inheritance so that the most derived
//! definition of each block wins, and can capture the output of selected
//! blocks instead of returning the whole page. Rendering stops as soon as
//! every requested block has been captured.
//!
//! # Example
//!
//! ```
//! use pjax_blocks_template::{DecorationSpec, Document, Engine, RenderContext};
//!
//! let doc = Document::build(|b| {
//!     b.block("title", |b| b.text("T"))
//!         .text("X")
//!         .block("main", |b| b.text("hello ").var("name"))
//!         .text("Y")
//! });
//! let engine = Engine::default();
//! let mut ctx = RenderContext::new().with("name", "world");
//!
//! let spec = DecorationSpec::new(Some("main".into()), None, Some("title".into())).unwrap();
//! let html = engine.render_fragment(&doc, &mut ctx, &spec).unwrap();
//! assert_eq!(html, "<title>T</title>\nhello world");
//! ```

pub mod capture;
pub mod context;
pub mod document;
pub mod error;
pub mod fragment;
pub mod graft;
pub mod loader;
pub mod node;
pub mod render;

pub use capture::CaptureSet;
pub use context::{ContextValue, RenderContext, Resolved};
pub use document::{Document, DocumentGraft};
pub use error::TemplateError;
pub use fragment::{DecorationSpec, TitleSource};
pub use graft::{Behavior, GraftRegistry};
pub use loader::{MemoryLoader, TemplateLoader};
pub use node::{BlockNode, ExtendsNode, Leaf, Node, NodeKind, NodeList, NodeListBuilder, ParentRef, Renderable};
pub use render::{Engine, RenderOptions};
